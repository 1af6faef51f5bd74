use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreatePropertyRequest {
    pub name: String,
    pub location: String,
    pub hourly_rate: i64,
    pub timezone: String,
}

#[derive(Deserialize)]
pub struct CreateSlotRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price_override: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateSlotRequest {
    pub status: Option<String>,
    pub price_override: Option<i64>,
}

#[derive(Deserialize)]
pub struct RecurringAvailabilityRequest {
    pub start_date: String,       // YYYY-MM-DD
    pub end_date: String,
    pub daily_start_time: String, // HH:MM
    pub daily_end_time: String,
    pub days_of_week: Vec<u8>,    // 0 = Sunday .. 6 = Saturday
    pub price_override: Option<i64>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ClaimSlotRequest {
    pub special_requests: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfirmPaymentRequest {
    pub payment_reference: String,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct CalendarQuery {
    pub year: i32,
    pub month: u32,
}

#[derive(Deserialize)]
pub struct BookingListQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct PaymentWebhookPayload {
    pub event_type: String,
    pub payment_reference: String,
    pub booking_id: String,
}
