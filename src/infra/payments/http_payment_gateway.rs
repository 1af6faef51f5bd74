use crate::domain::ports::{PaymentGateway, PaymentIntent, Refund};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

pub struct HttpPaymentGateway {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpPaymentGateway {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct IntentMetadata<'a> {
    booking_id: &'a str,
}

#[derive(Serialize)]
struct CreateIntentPayload<'a> {
    amount: i64,
    currency: &'a str,
    metadata: IntentMetadata<'a>,
}

#[derive(Deserialize)]
struct IntentResponse {
    id: String,
    client_secret: String,
}

#[derive(Serialize)]
struct RefundPayload<'a> {
    payment_reference: &'a str,
}

#[derive(Deserialize)]
struct RefundResponse {
    id: String,
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_intent(&self, amount: i64, booking_id: &str) -> Result<PaymentIntent, AppError> {
        let payload = CreateIntentPayload {
            amount,
            currency: "inr",
            metadata: IntentMetadata { booking_id },
        };

        let res = self.client.post(format!("{}/intents", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Payment gateway connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Payment intent creation failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let body: IntentResponse = res.json().await
            .map_err(|e| AppError::InternalWithMsg(format!("Invalid payment gateway response: {}", e)))?;

        Ok(PaymentIntent { id: body.id, client_secret: body.client_secret })
    }

    async fn refund(&self, payment_reference: &str) -> Result<Refund, AppError> {
        let res = self.client.post(format!("{}/refunds", self.api_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&RefundPayload { payment_reference })
            .send()
            .await
            .map_err(|e| AppError::RefundFailed(format!("Payment gateway connection error: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(AppError::RefundFailed(format!("Status: {}, Body: {}", status, text)));
        }

        let body: RefundResponse = res.json().await
            .map_err(|e| AppError::RefundFailed(format!("Invalid refund response: {}", e)))?;

        Ok(Refund { id: body.id })
    }
}
