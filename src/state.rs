use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, NotificationSender, PaymentGateway, PropertyRepository,
    ReceiptGenerator, SlotRepository,
};
use crate::domain::services::booking_engine::BookingEngine;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub property_repo: Arc<dyn PropertyRepository>,
    pub slot_repo: Arc<dyn SlotRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn NotificationSender>,
    pub receipt_generator: Arc<dyn ReceiptGenerator>,
    pub booking_engine: Arc<BookingEngine>,
}
