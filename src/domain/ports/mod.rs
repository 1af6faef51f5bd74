use crate::domain::models::{booking::Booking, property::Property, slot::Slot};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait PropertyRepository: Send + Sync {
    async fn create(&self, property: &Property) -> Result<Property, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Property>, AppError>;
    async fn list_by_provider(&self, provider_id: &str) -> Result<Vec<Property>, AppError>;
}

pub struct SlotBatchReport {
    pub created: Vec<Slot>,
    pub rejected: usize,
}

#[async_trait]
pub trait SlotRepository: Send + Sync {
    async fn create(&self, slot: &Slot) -> Result<Slot, AppError>;
    async fn insert_batch(&self, slots: &[Slot]) -> Result<SlotBatchReport, AppError>;
    async fn find_by_id(&self, property_id: &str, id: &str) -> Result<Option<Slot>, AppError>;
    async fn list_by_property(&self, property_id: &str) -> Result<Vec<Slot>, AppError>;
    async fn list_by_range(&self, property_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Slot>, AppError>;
    async fn update(&self, slot: &Slot) -> Result<Slot, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Atomic check-and-claim. Loses to a concurrent claim on the same
    /// slot with `SlotAlreadyClaimed`.
    async fn claim(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_by_user(&self, user_id: &str, status: Option<&str>) -> Result<Vec<Booking>, AppError>;
    async fn find_confirmed_slot_ids(&self, property_id: &str) -> Result<Vec<String>, AppError>;
    /// `None` means the booking was no longer pending.
    async fn confirm_paid(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn cancel(&self, id: &str, refund_reference: Option<String>) -> Result<Booking, AppError>;
    async fn find_stale_pending(&self, cutoff: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
    /// Returns false if the booking was no longer pending.
    async fn expire(&self, id: &str) -> Result<bool, AppError>;
}

#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct Refund {
    pub id: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, amount: i64, booking_id: &str) -> Result<PaymentIntent, AppError>;
    async fn refund(&self, payment_reference: &str) -> Result<Refund, AppError>;
}

#[derive(Debug, Clone)]
pub struct ReceiptDocument {
    pub reference: String,
    pub html: String,
}

#[async_trait]
pub trait ReceiptGenerator: Send + Sync {
    async fn generate(&self, booking: &Booking, property: &Property, slot: &Slot) -> Result<ReceiptDocument, AppError>;
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send_confirmation(&self, booking: &Booking, property: &Property, slot: &Slot, receipt: Option<&ReceiptDocument>) -> Result<(), AppError>;
    async fn send_cancellation(&self, booking: &Booking, property: &Property, slot: &Slot) -> Result<(), AppError>;
    async fn send_expiration(&self, booking: &Booking, property: &Property, slot: &Slot) -> Result<(), AppError>;
}
