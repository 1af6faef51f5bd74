use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::PaymentWebhookPayload;
use crate::error::AppError;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Gateway events land on the same idempotent confirmation path as the
/// synchronous confirm endpoint, so duplicate deliveries are harmless.
pub async fn payment_webhook(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PaymentWebhookPayload>,
) -> Result<impl IntoResponse, AppError> {
    if payload.event_type == "payment_intent.succeeded" {
        info!("Payment webhook received for booking {}", payload.booking_id);
        state.booking_engine
            .confirm_payment(&payload.booking_id, &payload.payment_reference)
            .await?;
    }

    Ok(Json(json!({ "received": true })))
}
