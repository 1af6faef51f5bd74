use serde::Serialize;

use crate::domain::models::{booking::Booking, slot::Slot};
use crate::domain::services::calendar::CalendarDay;

#[derive(Serialize)]
pub struct ClaimResponse {
    pub booking: Booking,
    pub client_secret: String,
}

#[derive(Serialize)]
pub struct GenerationResponse {
    pub created: usize,
    pub rejected: usize,
    pub slots: Vec<Slot>,
}

#[derive(Serialize)]
pub struct CalendarResponse {
    pub property_id: String,
    pub year: i32,
    pub month: u32,
    pub calendar: Vec<CalendarDay>,
}
