//! Database test utilities
//!
//! Provides in-memory SQLite database setup for testing.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Database connection pool type alias
pub type TestDbPool = SqlitePool;

/// Create an in-memory SQLite connection pool for testing.
///
/// The database starts with no schema; the caller sets up whatever tables
/// it needs.
pub async fn open_test_db() -> Result<TestDbPool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        // Single connection for in-memory to maintain state
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}
