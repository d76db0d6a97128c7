//! Walk-up Storage
//!
//! Roster and lineup store for the walk-up music manager.
//!
//! The store keeps the roster and the batting lineup in memory and rewrites
//! two named JSON records after every mutation. Records live in a small
//! `SQLite` table, or in memory for tests and throwaway sessions.
//!
//! # Architecture
//!
//! - **Records**: `RecordStore` trait with `SqliteRecordStore` and
//!   `MemoryRecordStore` backends
//! - **Roster**: `RosterStore` owns players and lineup order, validates
//!   commands, derives available players, persists on change
//! - **Seed**: built-in sample roster used when nothing valid is stored
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use walkup_core::LocalAudioLibrary;
//! use walkup_storage::{RosterStore, SqliteRecordStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let records = SqliteRecordStore::connect("sqlite://walkup.db").await?;
//! let store = RosterStore::open(Arc::new(records), LocalAudioLibrary::new()).await?;
//!
//! for player in store.available_players() {
//!     println!("{} #{}", player.name, player.number);
//! }
//! # Ok(())
//! # }
//! ```

mod error;

pub mod records;
pub mod roster;
pub mod seed;

pub use error::StorageError;
pub use records::{MemoryRecordStore, RecordStore, SqliteRecordStore, LINEUP_KEY, ROSTER_KEY};
pub use roster::{LoadReport, RosterStore};
pub use seed::sample_roster;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// In-memory URLs get a single long-lived connection, since every `SQLite`
/// connection to `:memory:` opens a separate database.
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating SQLite pool for {}", database_url);

    let in_memory = database_url.contains(":memory:");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(std::time::Duration::from_secs(30));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = pool_options.connect_with(options).await?;

    tracing::debug!("SQLite pool ready");

    Ok(pool)
}
