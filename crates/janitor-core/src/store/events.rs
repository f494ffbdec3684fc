//! Append-only audit log of opt-state changes

use super::db::DbPool;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use janitor_common::{OptEvent, OptEventType};
use sqlx::Row;

/// Append-only sink of opt events. Rows are never updated or deleted.
#[derive(Clone)]
pub struct EventSink {
    pool: DbPool,
}

impl EventSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Append an event to the log.
    pub async fn record_event(&self, event: &OptEvent) -> Result<()> {
        sqlx::query(
            "INSERT INTO events (event_id, event_type, resource_id, region, timestamp)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&event.event_id)
        .bind(event.event_type.as_str())
        .bind(&event.resource_id)
        .bind(&event.region)
        .bind(event.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Failed to record opt event")?;

        Ok(())
    }

    /// Most recent events, newest first.
    pub async fn recent_events(&self, limit: u32) -> Result<Vec<OptEvent>> {
        let rows = sqlx::query(
            "SELECT event_id, event_type, resource_id, region, timestamp
             FROM events ORDER BY timestamp DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut events = Vec::new();
        for row in rows {
            let type_str: String = row.get("event_type");
            let event_type = OptEventType::parse(&type_str)
                .with_context(|| format!("Unknown event type '{type_str}' in log"))?;

            let ts_str: String = row.get("timestamp");
            let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                .context("Invalid event timestamp")?
                .with_timezone(&Utc);

            events.push(OptEvent {
                event_id: row.get("event_id"),
                event_type,
                resource_id: row.get("resource_id"),
                region: row.get("region"),
                timestamp,
            });
        }

        Ok(events)
    }

    /// Total number of recorded events.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
