use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::migrate::Migrator;
use sqlx::{postgres::{PgConnectOptions, PgPoolOptions}, sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}};
use sqlx::{ConnectOptions, Postgres, Sqlite};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::ports::{BookingRepository, EventRepository};
use crate::domain::services::{booking_service::BookingService, event_service::EventService};
use crate::error::AppError;
use crate::infra::db::{ConnectFuture, LazyPool, Shutdown};
use crate::infra::repositories::{
    postgres_booking_repo::PostgresBookingRepo, postgres_event_repo::PostgresEventRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_event_repo::SqliteEventRepo,
};
use crate::state::AppState;

static POSTGRES_MIGRATOR: Migrator = sqlx::migrate!("./migrations/postgres");
static SQLITE_MIGRATOR: Migrator = sqlx::migrate!("./migrations/sqlite");

/// Wires repositories and services. No connection is opened until first use.
pub fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let events: Arc<dyn EventRepository>;
    let bookings: Arc<dyn BookingRepository>;
    let database: Arc<dyn Shutdown>;

    if config.is_postgres() {
        info!("Configuring PostgreSQL backend...");
        let db = Arc::new(postgres_pool(config)?);
        events = Arc::new(PostgresEventRepo::new(db.clone()));
        bookings = Arc::new(PostgresBookingRepo::new(db.clone()));
        database = db;
    } else {
        info!("Configuring SQLite backend with WAL mode...");
        let db = Arc::new(sqlite_pool(config)?);
        events = Arc::new(SqliteEventRepo::new(db.clone()));
        bookings = Arc::new(SqliteBookingRepo::new(db.clone()));
        database = db;
    }

    Ok(AppState {
        config: config.clone(),
        event_service: Arc::new(EventService::new(events.clone(), bookings.clone(), config.time_policy)),
        booking_service: Arc::new(BookingService::new(events, bookings)),
        database,
    })
}

pub fn postgres_pool(config: &Config) -> Result<LazyPool<Postgres>, AppError> {
    let opts = PgConnectOptions::from_str(&config.database_url)
        .map_err(|e| AppError::Configuration(format!("Invalid Postgres URL: {}", e)))?
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));
    let max_connections = config.max_connections.unwrap_or(10);

    Ok(LazyPool::new("postgres", move || {
        let opts = opts.clone();
        let fut: ConnectFuture<Postgres> = Box::pin(async move {
            let pool = PgPoolOptions::new()
                .max_connections(max_connections)
                .connect_with(opts)
                .await?;
            POSTGRES_MIGRATOR.run(&pool).await?;
            Ok::<_, sqlx::Error>(pool)
        });
        fut
    }))
}

pub fn sqlite_pool(config: &Config) -> Result<LazyPool<Sqlite>, AppError> {
    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|e| AppError::Configuration(format!("Invalid SQLite connection string: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));
    let max_connections = config.max_connections.unwrap_or(5);

    Ok(LazyPool::new("sqlite", move || {
        let opts = opts.clone();
        let fut: ConnectFuture<Sqlite> = Box::pin(async move {
            let pool = SqlitePoolOptions::new()
                .max_connections(max_connections)
                .connect_with(opts)
                .await?;
            SQLITE_MIGRATOR.run(&pool).await?;
            Ok::<_, sqlx::Error>(pool)
        });
        fut
    }))
}
