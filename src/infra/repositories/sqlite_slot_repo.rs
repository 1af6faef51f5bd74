use crate::domain::{models::slot::Slot, ports::{SlotBatchReport, SlotRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteSlotRepo {
    pool: SqlitePool,
}

impl SqliteSlotRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotRepository for SqliteSlotRepo {
    async fn create(&self, slot: &Slot) -> Result<Slot, AppError> {
        sqlx::query_as::<_, Slot>(
            "INSERT INTO availability_slots (id, property_id, start_time, end_time, price_override, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&slot.id).bind(&slot.property_id).bind(slot.start_time).bind(slot.end_time)
            .bind(slot.price_override).bind(&slot.status).bind(slot.created_at).bind(slot.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn insert_batch(&self, slots: &[Slot]) -> Result<SlotBatchReport, AppError> {
        // OR IGNORE keeps the whole batch in one transaction while still
        // reporting how many rows were rejected as duplicates.
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let mut created = Vec::new();
        let mut rejected = 0;
        for slot in slots {
            let res = sqlx::query_as::<_, Slot>(
                "INSERT OR IGNORE INTO availability_slots (id, property_id, start_time, end_time, price_override, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *"
            )
                .bind(&slot.id).bind(&slot.property_id).bind(slot.start_time).bind(slot.end_time)
                .bind(slot.price_override).bind(&slot.status).bind(slot.created_at).bind(slot.updated_at)
                .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
            match res {
                Some(s) => created.push(s),
                None => rejected += 1,
            }
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(SlotBatchReport { created, rejected })
    }
    async fn find_by_id(&self, property_id: &str, id: &str) -> Result<Option<Slot>, AppError> {
        sqlx::query_as::<_, Slot>("SELECT * FROM availability_slots WHERE id = ? AND property_id = ?").bind(id).bind(property_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_property(&self, property_id: &str) -> Result<Vec<Slot>, AppError> {
        sqlx::query_as::<_, Slot>("SELECT * FROM availability_slots WHERE property_id = ? ORDER BY start_time ASC").bind(property_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_range(&self, property_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Slot>, AppError> {
        sqlx::query_as::<_, Slot>("SELECT * FROM availability_slots WHERE property_id = ? AND start_time >= ? AND start_time < ? ORDER BY start_time ASC").bind(property_id).bind(start).bind(end).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update(&self, slot: &Slot) -> Result<Slot, AppError> {
        sqlx::query_as::<_, Slot>(
            "UPDATE availability_slots SET status = ?, price_override = ?, updated_at = ? WHERE id = ? AND property_id = ? RETURNING *"
        )
            .bind(&slot.status).bind(slot.price_override).bind(Utc::now())
            .bind(&slot.id).bind(&slot.property_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .ok_or_else(|| AppError::NotFound("Slot not found".into()))
    }
}
