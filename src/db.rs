//! SQLite database connection management.
//!
//! Two kinds of pool are handed out:
//!
//! - [`connect`] creates the database file (and parent directories) when
//!   missing and enables WAL. Only `chatbot init` uses it.
//! - [`connect_read_only`] opens an existing file with `query_only` set.
//!   The knowledge loader uses it, so loading can never create or modify
//!   the store. The connection itself is read-write at the file level so
//!   that WAL databases (which need their `-shm` file) still open.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

use crate::config::Config;

/// Create (if needed) and connect to the configured SQLite database.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    let db_path = &config.db.path;

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Open an existing SQLite database for reading only.
///
/// Fails if the file does not exist; it is never created. Any write
/// statement on this pool fails with `SQLITE_READONLY`.
pub async fn connect_read_only(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(false)
        .pragma("query_only", "ON");

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}
