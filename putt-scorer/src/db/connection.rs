use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::db::errors::{DatabaseError, Result};

/// Build the connection pool once at startup; handlers receive it through `AppState`
pub async fn create_pool(config: &Config) -> Result<PgPool> {
    let mut database_url = config.database_url.clone();

    if config.require_ssl && !database_url.contains("sslmode=") {
        let separator = if database_url.contains('?') { "&" } else { "?" };
        database_url = format!("{}{}sslmode=require", database_url, separator);
        info!("Added sslmode=require to database URL");
    }

    info!(max_connections = config.db_max_connections, "Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(0)
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(30))
        .test_before_acquire(true)
        .connect(&database_url)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("Failed to create pool: {}", e)))?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

/// Pool that connects on first use, for tests and tooling that may never touch the database
pub fn create_lazy_pool(database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy(database_url)
        .map_err(|e| DatabaseError::ConnectionError(format!("Failed to create pool: {}", e)))
}

pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await?;
    Ok(())
}
