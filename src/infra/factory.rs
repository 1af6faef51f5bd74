use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::services::booking_engine::BookingEngine;
use crate::infra::email::http_notification_service::HttpNotificationService;
use crate::infra::payments::http_payment_gateway::HttpPaymentGateway;
use crate::infra::receipts::FileReceiptGenerator;
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_property_repo::PostgresPropertyRepo,
    postgres_slot_repo::PostgresSlotRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_property_repo::SqlitePropertyRepo,
    sqlite_slot_repo::SqliteSlotRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let payment_gateway = Arc::new(HttpPaymentGateway::new(
        config.payment_service_url.clone(),
        config.payment_service_key.clone(),
    ));
    let notifier = Arc::new(HttpNotificationService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
    ));
    let receipt_generator = Arc::new(FileReceiptGenerator::new(config.receipts_dir.clone()));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let property_repo = Arc::new(PostgresPropertyRepo::new(pool.clone()));
        let slot_repo = Arc::new(PostgresSlotRepo::new(pool.clone()));
        let booking_repo = Arc::new(PostgresBookingRepo::new(pool.clone()));

        let booking_engine = Arc::new(BookingEngine::new(
            property_repo.clone(),
            slot_repo.clone(),
            booking_repo.clone(),
            payment_gateway.clone(),
            notifier.clone(),
            receipt_generator.clone(),
        ));

        AppState {
            config: config.clone(),
            property_repo,
            slot_repo,
            booking_repo,
            payment_gateway,
            notifier,
            receipt_generator,
            booking_engine,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let property_repo = Arc::new(SqlitePropertyRepo::new(pool.clone()));
        let slot_repo = Arc::new(SqliteSlotRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));

        let booking_engine = Arc::new(BookingEngine::new(
            property_repo.clone(),
            slot_repo.clone(),
            booking_repo.clone(),
            payment_gateway.clone(),
            notifier.clone(),
            receipt_generator.clone(),
        ));

        AppState {
            config: config.clone(),
            property_repo,
            slot_repo,
            booking_repo,
            payment_gateway,
            notifier,
            receipt_generator,
            booking_engine,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
