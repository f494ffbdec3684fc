//! Durable per-resource opt state keyed by (resource id, region)

use super::db::DbPool;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use janitor_common::{Resource, ResourceKind};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::HashMap;

/// Store of tracked resources and their opt-out flags
#[derive(Clone)]
pub struct ResourceOptStore {
    pool: DbPool,
}

impl ResourceOptStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Look up a resource by (id, region).
    pub async fn get_resource(&self, id: &str, region: &str) -> Result<Option<Resource>> {
        let row = sqlx::query(
            "SELECT resource_id, region, resource_kind, tags, opt_out_of_cleanup,
                    termination_reason, launch_time, expected_termination_time, state, owner_email
             FROM resources WHERE resource_id = ? AND region = ?",
        )
        .bind(id)
        .bind(region)
        .fetch_optional(&self.pool)
        .await?;

        row.map(resource_from_row).transpose()
    }

    /// Insert or update a resource, keyed on (id, region).
    pub async fn add_or_update(&self, resource: &Resource) -> Result<()> {
        let tags_json = serde_json::to_string(&resource.tags)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO resources (resource_id, region, resource_kind, tags, opt_out_of_cleanup,
                                    termination_reason, launch_time, expected_termination_time,
                                    state, owner_email, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(resource_id, region) DO UPDATE SET
                 resource_kind = excluded.resource_kind,
                 tags = excluded.tags,
                 opt_out_of_cleanup = excluded.opt_out_of_cleanup,
                 termination_reason = excluded.termination_reason,
                 launch_time = excluded.launch_time,
                 expected_termination_time = excluded.expected_termination_time,
                 state = excluded.state,
                 owner_email = excluded.owner_email,
                 updated_at = excluded.updated_at",
        )
        .bind(&resource.id)
        .bind(&resource.region)
        .bind(resource.kind.as_str())
        .bind(&tags_json)
        .bind(resource.opt_out_of_cleanup)
        .bind(&resource.termination_reason)
        .bind(resource.launch_time.map(|t| t.to_rfc3339()))
        .bind(resource.expected_termination_time.map(|t| t.to_rfc3339()))
        .bind(&resource.state)
        .bind(&resource.owner_email)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List all tracked resources.
    pub async fn list_resources(&self) -> Result<Vec<Resource>> {
        let rows = sqlx::query(
            "SELECT resource_id, region, resource_kind, tags, opt_out_of_cleanup,
                    termination_reason, launch_time, expected_termination_time, state, owner_email
             FROM resources ORDER BY region, resource_id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(resource_from_row).collect()
    }
}

fn resource_from_row(row: SqliteRow) -> Result<Resource> {
    let kind_str: String = row.get("resource_kind");
    let kind = ResourceKind::parse(&kind_str)
        .with_context(|| format!("Unknown resource kind '{kind_str}' in store"))?;

    let tags_json: String = row.get("tags");
    let tags: HashMap<String, String> =
        serde_json::from_str(&tags_json).context("Invalid tags JSON in store")?;

    Ok(Resource {
        id: row.get("resource_id"),
        region: row.get("region"),
        kind,
        tags,
        opt_out_of_cleanup: row.get("opt_out_of_cleanup"),
        termination_reason: row.get("termination_reason"),
        launch_time: parse_optional_ts(row.get("launch_time"))?,
        expected_termination_time: parse_optional_ts(row.get("expected_termination_time"))?,
        state: row.get("state"),
        owner_email: row.get("owner_email"),
    })
}

fn parse_optional_ts(value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .context("Invalid timestamp in store")
                .map(|dt| dt.with_timezone(&Utc))
        })
        .transpose()
}
