//! Postgres pool construction and schema migrations.

use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;
use crate::error::AppError;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Open the pool, retrying transient connection failures with capped
/// exponential backoff.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    let url = config.url()?;
    let mut attempt = 0;

    loop {
        let result = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(url)
            .await;

        match result {
            Ok(pool) => {
                info!(max_connections = config.max_connections, "connected to database");
                return Ok(pool);
            }
            Err(err) if attempt < config.connect_retries && is_transient(&err) => {
                let delay = retry_delay(attempt, config.max_retry_delay());
                attempt += 1;
                warn!(
                    attempt,
                    retries = config.connect_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "database connection failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    debug!("applying pending migrations");
    MIGRATOR.run(pool).await?;
    info!("migrations applied");
    Ok(())
}

/// Delay before retry number `attempt` (zero based), doubling up to `max`.
pub fn retry_delay(attempt: u32, max: Duration) -> Duration {
    let factor = 1_u32.checked_shl(attempt).unwrap_or(u32::MAX);
    INITIAL_RETRY_DELAY
        .checked_mul(factor)
        .map_or(max, |delay| delay.min(max))
}

/// Failures worth retrying: the server is unreachable, starting up, or out
/// of connection slots.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::Tls(_) => true,
        sqlx::Error::Database(db) => matches!(
            db.code().as_deref(),
            Some("57P03" | "53300" | "08000" | "08001" | "08006")
        ),
        _ => false,
    }
}
