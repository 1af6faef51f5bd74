use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub property_id: String,
    pub slot_id: String,
    pub customer_email: String,
    pub price: i64,
    pub special_requests: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub payment_reference: Option<String>,
    pub refund_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub user_id: String,
    pub customer_email: String,
    pub property_id: String,
    pub slot_id: String,
    pub price: i64,
    pub special_requests: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: params.user_id,
            property_id: params.property_id,
            slot_id: params.slot_id,
            customer_email: params.customer_email,
            price: params.price,
            special_requests: params.special_requests,
            status: "PENDING".to_string(),
            payment_status: "PENDING".to_string(),
            payment_reference: None,
            refund_reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == "PENDING" || self.status == "CONFIRMED"
    }
}
