mod common;

use axum::http::StatusCode;
use common::{customer, parse_body, provider, TestApp};
use serde_json::{json, Value};
use std::sync::atomic::Ordering;

async fn create_property(app: &TestApp, hourly_rate: i64) -> String {
    let res = app.send("POST", "/api/v1/properties", Some(&provider()), Some(json!({
        "name": "Court One",
        "location": "Mumbai",
        "hourly_rate": hourly_rate,
        "timezone": "UTC"
    }))).await;
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn create_slot(app: &TestApp, pid: &str, start: &str, end: &str, price_override: Option<i64>) -> String {
    let res = app.send("POST", &format!("/api/v1/properties/{}/availability", pid), Some(&provider()), Some(json!({
        "start_time": start,
        "end_time": end,
        "price_override": price_override
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

async fn claim(app: &TestApp, pid: &str, slot_id: &str) -> Value {
    let res = app.send("POST", &format!("/api/v1/properties/{}/slots/{}/book", pid, slot_id), Some(&customer()), Some(json!({
        "special_requests": "near the entrance please"
    }))).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    parse_body(res).await
}

async fn fetch_slot(app: &TestApp, pid: &str, slot_id: &str) -> Value {
    let res = app.send("GET", &format!("/api/v1/properties/{}/availability", pid), None, None).await;
    parse_body(res).await.as_array().unwrap().iter()
        .find(|s| s["id"] == slot_id)
        .cloned()
        .expect("slot missing from listing")
}

#[tokio::test]
async fn test_claim_creates_pending_booking_with_payment_handle() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;

    let body = claim(&app, &pid, &slot_id).await;
    let booking = &body["booking"];

    assert_eq!(booking["status"], "PENDING");
    assert_eq!(booking["payment_status"], "PENDING");
    assert_eq!(booking["price"], 80000);
    assert_eq!(booking["user_id"], "user-1");
    assert_eq!(booking["special_requests"], "near the entrance please");
    assert!(booking["payment_reference"].as_str().unwrap().starts_with("pi_"));
    assert!(body["client_secret"].as_str().unwrap().ends_with("_secret"));

    // The slot stays AVAILABLE until payment lands; the active booking is
    // what blocks a second claim.
    assert_eq!(fetch_slot(&app, &pid, &slot_id).await["status"], "AVAILABLE");
    assert_eq!(app.payments.intents.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_claim_uses_price_override_when_set() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", Some(95000)).await;

    let body = claim(&app, &pid, &slot_id).await;
    assert_eq!(body["booking"]["price"], 95000);
}

#[tokio::test]
async fn test_claim_rejects_missing_or_taken_slots() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;

    let missing = app.send("POST", &format!("/api/v1/properties/{}/slots/{}/book", pid, "no-such-slot"), Some(&customer()), Some(json!({}))).await;
    assert_eq!(missing.status(), StatusCode::CONFLICT);

    claim(&app, &pid, &slot_id).await;

    let second = app.send("POST", &format!("/api/v1/properties/{}/slots/{}/book", pid, slot_id), Some(&customer()), Some(json!({}))).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = parse_body(second).await;
    assert_eq!(body["error"], "Slot already claimed");
}

#[tokio::test]
async fn test_confirm_payment_books_slot() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;

    let body = claim(&app, &pid, &slot_id).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();
    let reference = body["booking"]["payment_reference"].as_str().unwrap().to_string();

    let res = app.send("POST", &format!("/api/v1/bookings/{}/confirm-payment", booking_id), Some(&customer()), Some(json!({
        "payment_reference": reference
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
    let confirmed = parse_body(res).await;
    assert_eq!(confirmed["status"], "CONFIRMED");
    assert_eq!(confirmed["payment_status"], "PAID");

    assert_eq!(fetch_slot(&app, &pid, &slot_id).await["status"], "BOOKED");
    assert_eq!(app.receipts.generated.load(Ordering::SeqCst), 1);
    assert_eq!(app.notifier.confirmations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_confirm_payment_is_idempotent() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;

    let body = claim(&app, &pid, &slot_id).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();
    let reference = body["booking"]["payment_reference"].as_str().unwrap().to_string();

    let confirm = json!({ "payment_reference": reference });
    let first = app.send("POST", &format!("/api/v1/bookings/{}/confirm-payment", booking_id), Some(&customer()), Some(confirm.clone())).await;
    assert_eq!(first.status(), StatusCode::OK);

    // Duplicate webhook delivery replays the same confirmation.
    let second = app.send("POST", &format!("/api/v1/bookings/{}/confirm-payment", booking_id), Some(&customer()), Some(confirm)).await;
    assert_eq!(second.status(), StatusCode::OK);
    let replayed = parse_body(second).await;
    assert_eq!(replayed["status"], "CONFIRMED");
    assert_eq!(replayed["payment_status"], "PAID");

    assert_eq!(fetch_slot(&app, &pid, &slot_id).await["status"], "BOOKED");
    assert_eq!(app.receipts.generated.load(Ordering::SeqCst), 1, "replay must not re-process the booking");
}

#[tokio::test]
async fn test_confirm_payment_rejects_wrong_reference() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;

    let body = claim(&app, &pid, &slot_id).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let res = app.send("POST", &format!("/api/v1/bookings/{}/confirm-payment", booking_id), Some(&customer()), Some(json!({
        "payment_reference": "pi_someone_elses_intent"
    }))).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = app.send("POST", "/api/v1/bookings/no-such-booking/confirm-payment", Some(&customer()), Some(json!({
        "payment_reference": "pi_x"
    }))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_webhook_confirms_payment() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;

    let body = claim(&app, &pid, &slot_id).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();
    let reference = body["booking"]["payment_reference"].as_str().unwrap().to_string();

    let res = app.send("POST", "/webhooks/payments", None, Some(json!({
        "event_type": "payment_intent.succeeded",
        "payment_reference": reference,
        "booking_id": booking_id
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);

    assert_eq!(fetch_slot(&app, &pid, &slot_id).await["status"], "BOOKED");

    // Unrelated events are acknowledged without touching anything.
    let res = app.send("POST", "/webhooks/payments", None, Some(json!({
        "event_type": "payment_intent.created",
        "payment_reference": "pi_x",
        "booking_id": "irrelevant"
    }))).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cancel_unpaid_booking_releases_slot_without_refund() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;

    let body = claim(&app, &pid, &slot_id).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let res = app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking_id), Some(&customer()), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cancelled = parse_body(res).await;
    assert_eq!(cancelled["status"], "CANCELLED");

    assert!(app.payments.refunds.lock().unwrap().is_empty());
    assert_eq!(app.notifier.cancellations.load(Ordering::SeqCst), 1);

    // Slot can be claimed again.
    claim(&app, &pid, &slot_id).await;
}

#[tokio::test]
async fn test_cancel_paid_booking_refunds_once() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;

    let body = claim(&app, &pid, &slot_id).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();
    let reference = body["booking"]["payment_reference"].as_str().unwrap().to_string();

    app.send("POST", &format!("/api/v1/bookings/{}/confirm-payment", booking_id), Some(&customer()), Some(json!({
        "payment_reference": reference
    }))).await;

    let res = app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking_id), Some(&customer()), None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cancelled = parse_body(res).await;
    assert_eq!(cancelled["status"], "CANCELLED");
    assert_eq!(cancelled["payment_status"], "REFUNDED");
    assert!(cancelled["refund_reference"].as_str().unwrap().starts_with("re_"));

    let refunds = app.payments.refunds.lock().unwrap();
    assert_eq!(refunds.len(), 1);
    assert_eq!(refunds[0], reference);
    drop(refunds);

    assert_eq!(fetch_slot(&app, &pid, &slot_id).await["status"], "AVAILABLE");
}

#[tokio::test]
async fn test_failed_refund_leaves_booking_untouched() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;

    let body = claim(&app, &pid, &slot_id).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();
    let reference = body["booking"]["payment_reference"].as_str().unwrap().to_string();

    app.send("POST", &format!("/api/v1/bookings/{}/confirm-payment", booking_id), Some(&customer()), Some(json!({
        "payment_reference": reference
    }))).await;

    app.payments.fail_refund.store(true, Ordering::SeqCst);

    let res = app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking_id), Some(&customer()), None).await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    // No partial mutation: still confirmed, slot still booked.
    let res = app.send("GET", &format!("/api/v1/bookings/{}", booking_id), Some(&customer()), None).await;
    let booking = parse_body(res).await;
    assert_eq!(booking["status"], "CONFIRMED");
    assert_eq!(booking["payment_status"], "PAID");
    assert_eq!(fetch_slot(&app, &pid, &slot_id).await["status"], "BOOKED");
}

#[tokio::test]
async fn test_cancel_requires_booking_ownership() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;

    let body = claim(&app, &pid, &slot_id).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let stranger = venue_booking_backend::domain::models::user::Principal {
        id: "user-2".to_string(),
        role: "USER".to_string(),
        email: "other@example.com".to_string(),
    };

    let res = app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking_id), Some(&stranger), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_bookings_filters_by_status() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let first = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;
    let second = create_slot(&app, &pid, "2024-05-01T10:00:00Z", "2024-05-01T11:00:00Z", None).await;

    claim(&app, &pid, &first).await;
    let body = claim(&app, &pid, &second).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    app.send("POST", &format!("/api/v1/bookings/{}/cancel", booking_id), Some(&customer()), None).await;

    let res = app.send("GET", "/api/v1/bookings", Some(&customer()), None).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);

    let res = app.send("GET", "/api/v1/bookings?status=PENDING", Some(&customer()), None).await;
    let pending = parse_body(res).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
    assert_eq!(pending[0]["slot_id"], first);
}

#[tokio::test]
async fn test_get_booking_allows_owner_and_provider_only() {
    let app = TestApp::new().await;
    let pid = create_property(&app, 80000).await;
    let slot_id = create_slot(&app, &pid, "2024-05-01T09:00:00Z", "2024-05-01T10:00:00Z", None).await;

    let body = claim(&app, &pid, &slot_id).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let owner = app.send("GET", &format!("/api/v1/bookings/{}", booking_id), Some(&customer()), None).await;
    assert_eq!(owner.status(), StatusCode::OK);

    let property_provider = app.send("GET", &format!("/api/v1/bookings/{}", booking_id), Some(&provider()), None).await;
    assert_eq!(property_provider.status(), StatusCode::OK);

    let stranger = venue_booking_backend::domain::models::user::Principal {
        id: "user-2".to_string(),
        role: "USER".to_string(),
        email: "other@example.com".to_string(),
    };
    let res = app.send("GET", &format!("/api/v1/bookings/{}", booking_id), Some(&stranger), None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
