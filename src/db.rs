// src/db.rs
//! Database pool configuration and migrations

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::config::server::DatabaseConfig;

/// Create a SQLite connection pool with the PRAGMAs the schema relies on
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL: {}", database_url))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))
}

/// Apply the embedded migrations. Applied versions are tracked in `_sqlx_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    info!("Migrations complete");
    Ok(())
}

/// Open the configured database and bring its schema up to date.
/// Needs nothing beyond the database settings.
pub async fn open_database(config: &DatabaseConfig) -> Result<SqlitePool> {
    let pool = create_pool(&config.url, config.max_connections).await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Current unix timestamp in seconds
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// New primary key
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
