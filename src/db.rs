use sqlx::postgres::{PgPool, PgPoolOptions};
use std::future::Future;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::ApiError;

/// Type alias for the PostgreSQL connection pool
pub type DbPool = PgPool;

/// Creates and configures a PostgreSQL connection pool
///
/// Connections are checked out per query and returned to the pool when the
/// query future completes or is dropped, so every exit path releases them.
///
/// # Example
/// ```ignore
/// let pool = create_pool(&config).await?;
/// ```
pub async fn create_pool(config: &AppConfig) -> Result<DbPool, sqlx::Error> {
    tracing::debug!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.store_timeout)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Run a single store round-trip under an explicit deadline
///
/// A query that outlives `limit` is abandoned (its connection goes back to
/// the pool) and reported as `StoreUnavailable`.
pub async fn timed<T, F>(limit: Duration, operation: &str, query: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => {
            tracing::error!("Store call '{}' exceeded {:?}", operation, limit);
            Err(ApiError::StoreUnavailable(format!(
                "{} timed out after {}ms",
                operation,
                limit.as_millis()
            )))
        }
    }
}
