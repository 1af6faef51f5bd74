use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::models::property::Property;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Slot {
    pub id: String,
    pub property_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price_override: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Slot {
    pub fn new(property_id: String, start_time: DateTime<Utc>, end_time: DateTime<Utc>, price_override: Option<i64>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            property_id,
            start_time,
            end_time,
            price_override,
            status: "AVAILABLE".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Override if set, else the property default.
    pub fn effective_price(&self, property: &Property) -> i64 {
        self.price_override.unwrap_or(property.hourly_rate)
    }
}
