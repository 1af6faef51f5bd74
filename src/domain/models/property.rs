use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Property {
    pub id: String,
    pub provider_id: String,
    pub name: String,
    pub location: String,
    pub hourly_rate: i64,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

impl Property {
    pub fn new(provider_id: String, name: String, location: String, hourly_rate: i64, timezone: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            provider_id,
            name,
            location,
            hourly_rate,
            timezone,
            created_at: Utc::now(),
        }
    }
}
