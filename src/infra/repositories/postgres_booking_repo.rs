use crate::domain::{models::booking::Booking, ports::BookingRepository};
use crate::error::{is_unique_violation, AppError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn claim(&self, booking: &Booking) -> Result<Booking, AppError> {
        // Single conditional insert: the slot-status guard and the partial
        // unique index on active bookings decide the race atomically.
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, user_id, property_id, slot_id, customer_email, price, special_requests, status, payment_status, payment_reference, refund_reference, created_at, updated_at)
             SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13
             WHERE EXISTS (SELECT 1 FROM availability_slots WHERE id = $4 AND property_id = $3 AND status = 'AVAILABLE')
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.user_id).bind(&booking.property_id).bind(&booking.slot_id)
            .bind(&booking.customer_email).bind(booking.price).bind(&booking.special_requests).bind(&booking.status)
            .bind(&booking.payment_status).bind(&booking.payment_reference).bind(&booking.refund_reference)
            .bind(booking.created_at).bind(booking.updated_at)
            .fetch_optional(&self.pool).await
            .map_err(|e| if is_unique_violation(&e) { AppError::SlotAlreadyClaimed } else { AppError::Database(e) })?
            .ok_or_else(|| AppError::SlotUnavailable("Slot is not open for booking".to_string()))
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_user(&self, user_id: &str, status: Option<&str>) -> Result<Vec<Booking>, AppError> {
        match status {
            Some(status) => sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE user_id = $1 AND status = $2 ORDER BY created_at DESC").bind(user_id).bind(status).fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE user_id = $1 ORDER BY created_at DESC").bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }
    async fn find_confirmed_slot_ids(&self, property_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar("SELECT slot_id FROM bookings WHERE property_id = $1 AND status = 'CONFIRMED'").bind(property_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn confirm_paid(&self, id: &str) -> Result<Option<Booking>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let confirmed = sqlx::query_as::<_, Booking>("UPDATE bookings SET status = 'CONFIRMED', payment_status = 'PAID', updated_at = $1 WHERE id = $2 AND status = 'PENDING' AND payment_status = 'PENDING' RETURNING *")
            .bind(Utc::now()).bind(id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        if let Some(ref booking) = confirmed {
            sqlx::query("UPDATE availability_slots SET status = 'BOOKED', updated_at = $1 WHERE id = $2")
                .bind(Utc::now()).bind(&booking.slot_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(confirmed)
    }
    async fn cancel(&self, id: &str, refund_reference: Option<String>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let cancelled = match refund_reference {
            Some(refund_ref) => sqlx::query_as::<_, Booking>("UPDATE bookings SET status = 'CANCELLED', payment_status = 'REFUNDED', refund_reference = $1, updated_at = $2 WHERE id = $3 AND status IN ('PENDING', 'CONFIRMED') RETURNING *")
                .bind(refund_ref).bind(Utc::now()).bind(id)
                .fetch_optional(&mut *tx).await.map_err(AppError::Database)?,
            None => sqlx::query_as::<_, Booking>("UPDATE bookings SET status = 'CANCELLED', updated_at = $1 WHERE id = $2 AND status IN ('PENDING', 'CONFIRMED') RETURNING *")
                .bind(Utc::now()).bind(id)
                .fetch_optional(&mut *tx).await.map_err(AppError::Database)?,
        }
            .ok_or_else(|| AppError::Conflict("Booking is already finalized".to_string()))?;
        sqlx::query("UPDATE availability_slots SET status = 'AVAILABLE', updated_at = $1 WHERE id = $2")
            .bind(Utc::now()).bind(&cancelled.slot_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }
    async fn find_stale_pending(&self, cutoff: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE status = 'PENDING' AND payment_status = 'PENDING' AND created_at < $1 ORDER BY created_at ASC")
            .bind(cutoff)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn expire(&self, id: &str) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let expired = sqlx::query_as::<_, Booking>("UPDATE bookings SET status = 'EXPIRED', payment_status = 'EXPIRED', updated_at = $1 WHERE id = $2 AND status = 'PENDING' AND payment_status = 'PENDING' RETURNING *")
            .bind(Utc::now()).bind(id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;
        let Some(booking) = expired else {
            tx.rollback().await.map_err(AppError::Database)?;
            return Ok(false);
        };
        sqlx::query("UPDATE availability_slots SET status = 'AVAILABLE', updated_at = $1 WHERE id = $2")
            .bind(Utc::now()).bind(&booking.slot_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(true)
    }
}
