use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};
use serde::Serialize;

use crate::domain::models::{booking::Booking, property::Property, slot::Slot};
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct CalendarSlot {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub price: i64,
    pub is_booked: bool,
}

#[derive(Debug, Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub slots: Vec<CalendarSlot>,
    pub has_availability: bool,
    pub is_fully_booked: bool,
}

/// Read-only projection of one month: per-day slot listing plus
/// availability flags. A day with no slots is unscheduled, not fully
/// booked. Days are bucketed by slot start in the property's timezone.
pub fn project_month(
    property: &Property,
    year: i32,
    month: u32,
    slots: &[Slot],
    confirmed_slot_ids: &HashSet<String>,
) -> Result<Vec<CalendarDay>, AppError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Validation("Invalid year/month".into()))?;
    let tz: Tz = property.timezone.parse()
        .map_err(|_| AppError::Validation(format!("Property has invalid timezone: {}", property.timezone)))?;

    let mut days = Vec::new();
    let mut index = std::collections::HashMap::new();
    let mut date = first;
    while date.month() == month {
        index.insert(date, days.len());
        days.push(CalendarDay {
            date: date.format("%Y-%m-%d").to_string(),
            slots: Vec::new(),
            has_availability: false,
            is_fully_booked: false,
        });
        date += Duration::days(1);
    }

    for slot in slots {
        let local_date = slot.start_time.with_timezone(&tz).date_naive();
        if let Some(&i) = index.get(&local_date) {
            let is_booked = confirmed_slot_ids.contains(&slot.id);
            days[i].slots.push(CalendarSlot {
                id: slot.id.clone(),
                start_time: slot.start_time,
                end_time: slot.end_time,
                status: slot.status.clone(),
                price: slot.effective_price(property),
                is_booked,
            });
        }
    }

    for day in &mut days {
        if !day.slots.is_empty() {
            day.has_availability = day.slots.iter().any(|s| s.status == "AVAILABLE" && !s.is_booked);
            day.is_fully_booked = !day.has_availability;
        }
    }

    Ok(days)
}

/// Generates an iCalendar (.ics) string for a confirmed booking
pub fn generate_ics(property: &Property, slot: &Slot, booking: &Booking) -> String {
    let mut calendar = Calendar::new();

    let ical_event = IcalEvent::new()
        .summary(&property.name)
        .description(&format!("Booking at {}", property.name))
        .location(&property.location)
        .starts(slot.start_time)
        .ends(slot.end_time)
        .uid(&booking.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
