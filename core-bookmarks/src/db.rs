//! # Database Connection Pool Module
//!
//! SQLite connection pooling for the bookmark store.
//!
//! - **WAL Mode**: enabled for better concurrency (multiple readers, one writer)
//! - **Foreign Keys**: enforced
//! - **Automatic Migrations**: run on initialization
//!
//! For tests, use an in-memory database via [`create_test_pool`].

use crate::{BookmarkError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Database configuration for the SQLite connection pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database file path or `sqlite::memory:` for an in-memory database.
    pub database_url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    /// Maximum time to wait for a connection from the pool.
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Configuration backed by the given SQLite file.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        let path = database_path.into();
        Self {
            database_url: format!("sqlite:{}", path.display()),
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// Configuration for an in-memory database (useful for testing).
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Create a configured SQLite connection pool with migrations applied.
///
/// # Errors
///
/// Returns an error if the database cannot be opened, pool creation fails,
/// or migrations fail to apply.
pub async fn create_pool(config: DatabaseConfig) -> Result<Pool<Sqlite>> {
    info!(
        database_url = %config.database_url,
        max_connections = config.max_connections,
        "Creating bookmark database connection pool"
    );

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(BookmarkError::Database)?
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(connect_options)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create connection pool");
            BookmarkError::Database(e)
        })?;

    run_migrations(&pool).await?;
    health_check(&pool).await?;

    Ok(pool)
}

/// Connection pool for testing with an in-memory database.
pub async fn create_test_pool() -> Result<Pool<Sqlite>> {
    create_pool(DatabaseConfig::in_memory()).await
}

/// Apply pending migrations embedded at compile time from `migrations/`.
async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    debug!("Running bookmark database migrations");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Migration failed");
            BookmarkError::Migration(e.to_string())
        })?;

    Ok(())
}

async fn health_check(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map_err(|e| {
        warn!(error = %e, "Database health check failed");
        BookmarkError::Database(e)
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_pool() {
        let pool = create_pool(DatabaseConfig::in_memory()).await;
        assert!(pool.is_ok(), "Should create in-memory pool successfully");
    }

    #[tokio::test]
    async fn test_migrations_create_table() {
        let pool = create_test_pool().await.unwrap();

        let result: (i32,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='remote_playlists'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();

        assert_eq!(result.0, 1, "remote_playlists table should exist");
    }

    #[tokio::test]
    async fn test_identity_is_unique() {
        let pool = create_test_pool().await.unwrap();

        let insert = "INSERT INTO remote_playlists \
                      (service_id, url, name, stream_count, last_updated) \
                      VALUES (0, 'https://example.com/p/1', 'Mix', 0, 0)";
        sqlx::query(insert).execute(&pool).await.unwrap();
        let duplicate = sqlx::query(insert).execute(&pool).await;
        assert!(duplicate.is_err(), "duplicate identity should be rejected");
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DatabaseConfig::in_memory()
            .min_connections(2)
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(60));

        assert_eq!(config.min_connections, 2);
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.acquire_timeout, Duration::from_secs(60));
    }
}
