use crate::domain::models::{booking::Booking, property::Property, slot::Slot};
use crate::domain::ports::{ReceiptDocument, ReceiptGenerator};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tera::Tera;

/// Renders a receipt document to disk and hands back its reference.
pub struct FileReceiptGenerator {
    dir: PathBuf,
    templates: Tera,
}

impl FileReceiptGenerator {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let mut tera = Tera::default();
        tera.add_raw_template("receipt.html", include_str!("../templates/receipt.html"))
            .expect("Failed to load receipt template");

        Self { dir: dir.into(), templates: tera }
    }
}

#[async_trait]
impl ReceiptGenerator for FileReceiptGenerator {
    async fn generate(&self, booking: &Booking, property: &Property, slot: &Slot) -> Result<ReceiptDocument, AppError> {
        let mut context = tera::Context::new();
        context.insert("booking_id", &booking.id);
        context.insert("property_name", &property.name);
        context.insert("location", &property.location);
        context.insert("start_time", &slot.start_time.to_rfc3339());
        context.insert("end_time", &slot.end_time.to_rfc3339());
        context.insert("price", &booking.price);
        context.insert("payment_reference", &booking.payment_reference.as_deref().unwrap_or(""));
        context.insert("issued_at", &Utc::now().to_rfc3339());

        let html = self.templates.render("receipt.html", &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Receipt render error: {:?}", e)))?;

        tokio::fs::create_dir_all(&self.dir).await
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to create receipts dir: {}", e)))?;

        let path = self.dir.join(format!("receipt_{}.html", booking.id));
        tokio::fs::write(&path, &html).await
            .map_err(|e| AppError::InternalWithMsg(format!("Failed to write receipt: {}", e)))?;

        Ok(ReceiptDocument {
            reference: path.to_string_lossy().into_owned(),
            html,
        })
    }
}
