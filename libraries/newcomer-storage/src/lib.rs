//! Newcomer Storage
//!
//! `SQLite` persistence for user accounts, credentials, sessions and the
//! follow graph.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each concern owns its own queries (`users`,
//!   `credentials`, `follows`, `sessions`)
//! - **Single Edge Table**: Followers and following lists are two views of
//!   the same `follows` rows, so they cannot drift apart
//! - **Injected Handle**: [`LocalUserStore`] implements
//!   [`newcomer_core::UserStore`] and is handed to the server at startup
//!
//! # Example
//!
//! ```rust,no_run
//! use newcomer_storage::{create_pool, run_migrations, LocalUserStore};
//! use newcomer_core::UserStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://newcomer.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = LocalUserStore::new(pool);
//! let users = store.get_all_users().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod credentials;
pub mod follows;
pub mod sessions;
pub mod users;

pub use context::LocalUserStore;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://newcomer.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool created");

    Ok(pool)
}

/// Current time as the unix-seconds value stored in timestamp columns
pub(crate) fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Convert a stored unix-seconds column back into a UTC timestamp
pub(crate) fn from_timestamp(secs: i64) -> newcomer_core::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| newcomer_core::NewcomerError::storage(format!("invalid timestamp: {secs}")))
}
