use crate::domain::models::{booking::Booking, property::Property, slot::Slot};
use crate::domain::ports::{NotificationSender, ReceiptDocument};
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Serialize;
use tera::Tera;
use tracing::error;

pub struct HttpNotificationService {
    client: Client,
    api_url: String,
    api_key: String,
    templates: Tera,
}

impl HttpNotificationService {
    pub fn new(api_url: String, api_key: String) -> Self {
        let mut tera = Tera::default();
        tera.add_raw_template("confirmation.html", include_str!("../../templates/confirmation.html"))
            .expect("Failed to load confirmation template");
        tera.add_raw_template("cancellation.html", include_str!("../../templates/cancellation.html"))
            .expect("Failed to load cancellation template");
        tera.add_raw_template("expiration.html", include_str!("../../templates/expiration.html"))
            .expect("Failed to load expiration template");

        Self {
            client: Client::new(),
            api_url,
            api_key,
            templates: tera,
        }
    }

    fn render(&self, template: &str, booking: &Booking, property: &Property, slot: &Slot) -> Result<String, AppError> {
        let mut context = tera::Context::new();
        context.insert("property_name", &property.name);
        context.insert("location", &property.location);
        context.insert("start_time", &slot.start_time.to_rfc3339());
        context.insert("end_time", &slot.end_time.to_rfc3339());
        context.insert("price", &booking.price);
        context.insert("booking_id", &booking.id);
        context.insert("refunded", &(booking.payment_status == "REFUNDED"));

        self.templates.render(template, &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))
    }

    async fn send(&self, recipient: &str, subject: &str, html_body: &str, attachments: Vec<AttachmentPayload>) -> Result<(), AppError> {
        let payload = EmailPayload {
            from_alias: "bookings".to_string(),
            to_addr: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
            attachments,
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Mail service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Mail service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct AttachmentPayload {
    filename: String,
    content_base64: String,
}

impl AttachmentPayload {
    fn new(filename: &str, data: &[u8]) -> Self {
        Self {
            filename: filename.to_string(),
            content_base64: general_purpose::STANDARD.encode(data),
        }
    }
}

#[derive(Serialize)]
struct EmailPayload {
    from_alias: String,
    to_addr: String,
    subject: String,
    html_body: String,
    attachments: Vec<AttachmentPayload>,
}

#[async_trait]
impl NotificationSender for HttpNotificationService {
    async fn send_confirmation(&self, booking: &Booking, property: &Property, slot: &Slot, receipt: Option<&ReceiptDocument>) -> Result<(), AppError> {
        let body = self.render("confirmation.html", booking, property, slot)?;

        let mut attachments = vec![
            AttachmentPayload::new("invite.ics", generate_ics(property, slot, booking).as_bytes()),
        ];
        if let Some(doc) = receipt {
            attachments.push(AttachmentPayload::new("receipt.html", doc.html.as_bytes()));
        }

        let subject = format!("Booking confirmed - {}", property.name);
        self.send(&booking.customer_email, &subject, &body, attachments).await
    }

    async fn send_cancellation(&self, booking: &Booking, property: &Property, slot: &Slot) -> Result<(), AppError> {
        let body = self.render("cancellation.html", booking, property, slot)?;
        let subject = format!("Booking cancelled - {}", property.name);
        self.send(&booking.customer_email, &subject, &body, Vec::new()).await
    }

    async fn send_expiration(&self, booking: &Booking, property: &Property, slot: &Slot) -> Result<(), AppError> {
        let body = self.render("expiration.html", booking, property, slot)?;
        let subject = format!("Booking expired - {}", property.name);
        self.send(&booking.customer_email, &subject, &body, Vec::new()).await
    }
}
