use venue_booking_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::{booking::Booking, property::Property, slot::Slot, user::Principal},
    domain::ports::{
        NotificationSender, PaymentGateway, PaymentIntent, ReceiptDocument, ReceiptGenerator, Refund,
    },
    domain::services::booking_engine::BookingEngine,
    infra::repositories::{
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_property_repo::SqlitePropertyRepo,
        sqlite_slot_repo::SqliteSlotRepo,
    },
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::Value;

pub struct MockPaymentGateway {
    pub intents: Mutex<Vec<String>>,
    pub refunds: Mutex<Vec<String>>,
    pub fail_refund: AtomicBool,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            intents: Mutex::new(Vec::new()),
            refunds: Mutex::new(Vec::new()),
            fail_refund: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_intent(&self, _amount: i64, booking_id: &str) -> Result<PaymentIntent, AppError> {
        self.intents.lock().unwrap().push(booking_id.to_string());
        let id = format!("pi_{}", Uuid::new_v4().simple());
        let client_secret = format!("{}_secret", id);
        Ok(PaymentIntent { id, client_secret })
    }

    async fn refund(&self, payment_reference: &str) -> Result<Refund, AppError> {
        if self.fail_refund.load(Ordering::SeqCst) {
            return Err(AppError::RefundFailed("gateway rejected refund".to_string()));
        }
        self.refunds.lock().unwrap().push(payment_reference.to_string());
        Ok(Refund { id: format!("re_{}", Uuid::new_v4().simple()) })
    }
}

#[derive(Default)]
pub struct MockNotificationSender {
    pub confirmations: AtomicUsize,
    pub cancellations: AtomicUsize,
    pub expirations: AtomicUsize,
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_confirmation(&self, _booking: &Booking, _property: &Property, _slot: &Slot, _receipt: Option<&ReceiptDocument>) -> Result<(), AppError> {
        self.confirmations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
    async fn send_cancellation(&self, _booking: &Booking, _property: &Property, _slot: &Slot) -> Result<(), AppError> {
        self.cancellations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
    async fn send_expiration(&self, _booking: &Booking, _property: &Property, _slot: &Slot) -> Result<(), AppError> {
        self.expirations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockReceiptGenerator {
    pub generated: AtomicUsize,
}

#[async_trait]
impl ReceiptGenerator for MockReceiptGenerator {
    async fn generate(&self, booking: &Booking, _property: &Property, _slot: &Slot) -> Result<ReceiptDocument, AppError> {
        self.generated.fetch_add(1, Ordering::SeqCst);
        Ok(ReceiptDocument {
            reference: format!("receipt_{}.html", booking.id),
            html: "<html>receipt</html>".to_string(),
        })
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub payments: Arc<MockPaymentGateway>,
    pub notifier: Arc<MockNotificationSender>,
    pub receipts: Arc<MockReceiptGenerator>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            payment_service_url: "http://localhost".to_string(),
            payment_service_key: "key".to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            receipts_dir: "./receipts".to_string(),
            reaper_interval_secs: 300,
            payment_grace_minutes: 30,
        };

        let property_repo = Arc::new(SqlitePropertyRepo::new(pool.clone()));
        let slot_repo = Arc::new(SqliteSlotRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));

        let payments = Arc::new(MockPaymentGateway::new());
        let notifier = Arc::new(MockNotificationSender::default());
        let receipts = Arc::new(MockReceiptGenerator::default());

        let booking_engine = Arc::new(BookingEngine::new(
            property_repo.clone(),
            slot_repo.clone(),
            booking_repo.clone(),
            payments.clone(),
            notifier.clone(),
            receipts.clone(),
        ));

        let state = Arc::new(AppState {
            config,
            property_repo,
            slot_repo,
            booking_repo,
            payment_gateway: payments.clone(),
            notifier: notifier.clone(),
            receipt_generator: receipts.clone(),
            booking_engine,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            payments,
            notifier,
            receipts,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, principal: Option<&Principal>, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user) = principal {
            builder = builder
                .header("X-User-Id", user.id.as_str())
                .header("X-User-Role", user.role.as_str())
                .header("X-User-Email", user.email.as_str());
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

#[allow(dead_code)]
pub fn provider() -> Principal {
    Principal {
        id: "provider-1".to_string(),
        role: "PROVIDER".to_string(),
        email: "provider@example.com".to_string(),
    }
}

#[allow(dead_code)]
pub fn customer() -> Principal {
    Principal {
        id: "user-1".to_string(),
        role: "USER".to_string(),
        email: "user@example.com".to_string(),
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
