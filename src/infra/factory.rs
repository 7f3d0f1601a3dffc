use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::{AppState, Repositories};
use crate::infra::events::broadcast_sink::BroadcastEventSink;
use crate::infra::repositories::{
    postgres_student_repo::PostgresStudentRepo, postgres_plan_repo::PostgresPlanRepo,
    postgres_subscription_repo::PostgresSubscriptionRepo, postgres_appointment_repo::PostgresAppointmentRepo,
    postgres_attendance_repo::PostgresAttendanceRepo,
    sqlite_student_repo::SqliteStudentRepo, sqlite_plan_repo::SqlitePlanRepo,
    sqlite_subscription_repo::SqliteSubscriptionRepo, sqlite_appointment_repo::SqliteAppointmentRepo,
    sqlite_attendance_repo::SqliteAttendanceRepo,
};

pub fn is_postgres_url(database_url: &str) -> bool {
    database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")
}

pub async fn bootstrap_state(config: &Config, events: Arc<BroadcastEventSink>) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    let repos = if is_postgres_url(database_url) {
        info!("Initializing PostgreSQL connection...");

        let opts: PgConnectOptions = database_url.parse()
            .map_err(AppError::Database)?;
        let opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;
        postgres_repositories(pool)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;
        sqlite_repositories(pool)
    };

    Ok(AppState::new(config.clone(), repos, events))
}

pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        students: Arc::new(PostgresStudentRepo::new(pool.clone())),
        plans: Arc::new(PostgresPlanRepo::new(pool.clone())),
        subscriptions: Arc::new(PostgresSubscriptionRepo::new(pool.clone())),
        appointments: Arc::new(PostgresAppointmentRepo::new(pool.clone())),
        attendances: Arc::new(PostgresAttendanceRepo::new(pool)),
    }
}

pub fn sqlite_repositories(pool: SqlitePool) -> Repositories {
    Repositories {
        students: Arc::new(SqliteStudentRepo::new(pool.clone())),
        plans: Arc::new(SqlitePlanRepo::new(pool.clone())),
        subscriptions: Arc::new(SqliteSubscriptionRepo::new(pool.clone())),
        appointments: Arc::new(SqliteAppointmentRepo::new(pool.clone())),
        attendances: Arc::new(SqliteAttendanceRepo::new(pool)),
    }
}

pub async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))
}
