//! Database setup and schema management

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Database connection pool type alias
pub type DbPool = SqlitePool;

/// Open the janitor state database at the given path, creating it if needed
pub async fn open_db(path: &Path) -> Result<DbPool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create state directory")?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", path.display());
    let options = SqliteConnectOptions::from_str(&db_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("Failed to open janitor state database")?;

    setup_schema(&pool).await?;

    Ok(pool)
}

/// Setup database schema
pub async fn setup_schema(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resources (
            resource_id TEXT NOT NULL,
            region TEXT NOT NULL,
            resource_kind TEXT NOT NULL,
            tags TEXT NOT NULL,
            opt_out_of_cleanup INTEGER NOT NULL DEFAULT 0,
            termination_reason TEXT,
            launch_time TEXT,
            expected_termination_time TEXT,
            state TEXT,
            owner_email TEXT,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (resource_id, region)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            event_id TEXT PRIMARY KEY,
            event_type TEXT NOT NULL,
            resource_id TEXT NOT NULL,
            region TEXT NOT NULL,
            timestamp TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_resources_kind ON resources(resource_kind)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_events_resource ON events(resource_id)")
        .execute(pool)
        .await?;

    Ok(())
}
