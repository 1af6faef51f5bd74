use chrono::{NaiveDate, NaiveTime};

use crate::error::AppError;

/// Weekday mask uses 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone)]
pub struct RecurrenceRule {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub daily_start_time: NaiveTime,
    pub daily_end_time: NaiveTime,
    pub days_of_week: Vec<u8>,
    pub price_override: Option<i64>,
}

impl RecurrenceRule {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.end_date < self.start_date {
            return Err(AppError::Validation("end_date must not be before start_date".into()));
        }
        if self.daily_end_time <= self.daily_start_time {
            return Err(AppError::Validation("daily_end_time must be after daily_start_time".into()));
        }
        if self.days_of_week.is_empty() {
            return Err(AppError::Validation("days_of_week must not be empty".into()));
        }
        if self.days_of_week.iter().any(|d| *d > 6) {
            return Err(AppError::Validation("days_of_week entries must be between 0 (Sunday) and 6 (Saturday)".into()));
        }
        Ok(())
    }
}
