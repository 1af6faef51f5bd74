use chrono::{Datelike, Duration, TimeZone, Utc};
use chrono_tz::Tz;

use crate::domain::models::{property::Property, recurrence::RecurrenceRule, slot::Slot};
use crate::error::AppError;

pub struct ExpandedRule {
    pub candidates: Vec<Slot>,
    /// Dates whose local wall-clock time does not exist (DST gap) or is
    /// ambiguous on that calendar day.
    pub skipped: usize,
}

/// Expands a recurrence rule into one candidate slot per matching date.
/// Times are wall-clock in the property's timezone, so a rule spanning a
/// DST transition keeps the same local hour on every date.
pub fn expand_rule(property: &Property, rule: &RecurrenceRule) -> Result<ExpandedRule, AppError> {
    rule.validate()?;

    let tz: Tz = property.timezone.parse()
        .map_err(|_| AppError::Validation(format!("Property has invalid timezone: {}", property.timezone)))?;

    let mut candidates = Vec::new();
    let mut skipped = 0;

    let mut date = rule.start_date;
    while date <= rule.end_date {
        if rule.days_of_week.contains(&(date.weekday().num_days_from_sunday() as u8)) {
            let start_local = tz.from_local_datetime(&date.and_time(rule.daily_start_time)).single();
            let end_local = tz.from_local_datetime(&date.and_time(rule.daily_end_time)).single();

            match (start_local, end_local) {
                (Some(start), Some(end)) => {
                    candidates.push(Slot::new(
                        property.id.clone(),
                        start.with_timezone(&Utc),
                        end.with_timezone(&Utc),
                        rule.price_override,
                    ));
                }
                _ => skipped += 1,
            }
        }
        date += Duration::days(1);
    }

    Ok(ExpandedRule { candidates, skipped })
}
