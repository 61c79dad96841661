//! Shared database types for Parley
//!
//! Pool construction and schema migrations. Every pool enables SQLite foreign
//! keys so message rows cascade with their conversation. File databases run
//! in WAL mode so readers never wait on the single writer.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use thiserror::Error;

use crate::error::Error;

/// How long a writer waits for the lock held by another writer
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("Record not found".to_string()),
            RepositoryError::Connection(e) => Error::Database(e),
            RepositoryError::Migration(e) => Error::Internal(format!("Migration failed: {}", e)),
        }
    }
}

/// Connect to the database at `url` and bring its schema up to date
pub async fn connect(url: &str, max_connections: u32) -> Result<SqlitePool, RepositoryError> {
    let options = SqliteConnectOptions::from_str(url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    tracing::debug!(url, max_connections, "Database pool ready");
    Ok(pool)
}

/// Private in-memory database, used by tests.
///
/// An in-memory SQLite database lives only as long as its connection, so the
/// pool is pinned to one connection that never expires.
pub async fn connect_in_memory() -> Result<SqlitePool, RepositoryError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    migrate(&pool).await?;
    Ok(pool)
}

/// Apply pending migrations from the workspace `migrations/` directory
pub async fn migrate(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
