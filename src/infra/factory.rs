use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;
use crate::infra::repositories::{
    postgres_appointment_repo::PostgresAppointmentRepo, postgres_auth_repo::PostgresAuthRepo,
    postgres_availability_repo::PostgresAvailabilityRepo, postgres_job_repo::PostgresJobRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_appointment_repo::SqliteAppointmentRepo, sqlite_auth_repo::SqliteAuthRepo,
    sqlite_availability_repo::SqliteAvailabilityRepo, sqlite_job_repo::SqliteJobRepo,
    sqlite_user_repo::SqliteUserRepo,
};

fn is_postgres(url: &str) -> bool {
    url.starts_with("postgres://") || url.starts_with("postgresql://")
}

pub async fn bootstrap_state(config: &Config) -> Result<AppState, AppError> {
    let database_url = &config.database_url;

    if is_postgres(database_url) {
        info!("Initializing PostgreSQL connection...");

        let opts = PgConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Config(format!("Invalid Postgres URL: {}", e)))?
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await?;

        run_postgres_migrations(&pool).await?;

        Ok(AppState::assemble(
            config.clone(),
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresAuthRepo::new(pool.clone())),
            Arc::new(PostgresAvailabilityRepo::new(pool.clone())),
            Arc::new(PostgresAppointmentRepo::new(pool.clone())),
            Arc::new(PostgresJobRepo::new(pool)),
        ))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Config(format!("Invalid SQLite connection string: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await?;

        run_sqlite_migrations(&pool).await?;

        Ok(AppState::assemble(
            config.clone(),
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteAuthRepo::new(pool.clone())),
            Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            Arc::new(SqliteAppointmentRepo::new(pool.clone())),
            Arc::new(SqliteJobRepo::new(pool)),
        ))
    }
}

async fn run_postgres_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("Postgres migrations failed: {}", e)))
}

async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("SQLite migrations failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::is_postgres;

    #[test]
    fn backend_is_picked_from_the_url_scheme() {
        assert!(is_postgres("postgres://u:p@localhost/chambee"));
        assert!(is_postgres("postgresql://localhost/chambee"));
        assert!(!is_postgres("sqlite://chambee.db"));
        assert!(!is_postgres("sqlite::memory:"));
    }
}
