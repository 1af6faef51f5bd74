use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{availability, booking, calendar, health, property, webhooks};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Properties
        .route("/api/v1/properties", post(property::create_property).get(property::list_my_properties))
        .route("/api/v1/properties/{property_id}", get(property::get_property))

        // Provider Availability
        .route("/api/v1/properties/{property_id}/availability", get(availability::list_availability).post(availability::create_slot))
        .route("/api/v1/properties/{property_id}/availability/recurring", post(availability::generate_recurring))
        .route("/api/v1/properties/{property_id}/availability/{slot_id}", put(availability::update_slot))

        // Calendar Projection
        .route("/api/v1/properties/{property_id}/calendar", get(calendar::get_calendar))

        // Booking Flow
        .route("/api/v1/properties/{property_id}/slots/{slot_id}/book", post(booking::claim_slot))
        .route("/api/v1/bookings", get(booking::list_bookings))
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking))
        .route("/api/v1/bookings/{booking_id}/confirm-payment", post(booking::confirm_payment))
        .route("/api/v1/bookings/{booking_id}/cancel", post(booking::cancel_booking))

        // Payment Gateway Callbacks
        .route("/webhooks/payments", post(webhooks::payment_webhook))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
