//! Per-cycle summary reporting
//!
//! After the clean phase the orchestrator collects every unit's result
//! buckets into a `CycleSummary`, which can be rendered as a console table,
//! an HTML email body, or a JSON artifact file. Rendering format is not part
//! of the orchestration contract; only the bucket contents labeled by
//! resource kind, region, and bucket name are.

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use janitor_common::tags::{TAG_ENVIRONMENT, TAG_NAME, TAG_OWNER, TAG_ZONE};
use janitor_common::Resource;
use janitor_common::ResourceKind;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{error, info};

use crate::config::JanitorConfig;
use crate::notify::NotificationGateway;
use crate::unit::CleanupUnit;

/// Result bucket names, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Marked,
    Unmarked,
    Cleaned,
    FailedToClean,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Marked => "markings",
            Bucket::Unmarked => "unmarkings",
            Bucket::Cleaned => "cleanups",
            Bucket::FailedToClean => "failures",
        }
    }

    /// Accent color used in the HTML rendering
    fn color(self) -> &'static str {
        match self {
            Bucket::Marked => "blue",
            Bucket::Unmarked => "orange",
            Bucket::Cleaned => "green",
            Bucket::FailedToClean => "red",
        }
    }
}

/// One unit's bucket contents, labeled for reporting
#[derive(Debug, Clone)]
pub struct BucketReport {
    pub kind: ResourceKind,
    pub region: String,
    pub bucket: Bucket,
    pub resources: Vec<Resource>,
}

/// Summary of one run cycle across all units
#[derive(Debug, Clone, Default)]
pub struct CycleSummary {
    pub buckets: Vec<BucketReport>,
}

impl CycleSummary {
    /// Collect bucket contents from every unit, in unit order.
    pub fn from_units(units: &[Box<dyn CleanupUnit>]) -> Self {
        let mut buckets = Vec::new();
        for unit in units {
            let labeled: [(Bucket, &[Resource]); 4] = [
                (Bucket::Marked, unit.marked_resources()),
                (Bucket::Unmarked, unit.unmarked_resources()),
                (Bucket::Cleaned, unit.cleaned_resources()),
                (Bucket::FailedToClean, unit.failed_to_clean_resources()),
            ];
            for (bucket, resources) in labeled {
                buckets.push(BucketReport {
                    kind: unit.resource_kind(),
                    region: unit.region().to_string(),
                    bucket,
                    resources: resources.to_vec(),
                });
            }
        }
        Self { buckets }
    }

    /// Render a condensed console table of bucket counts.
    pub fn render_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Resource Type", "Region", "Bucket", "Count"]);

        for report in &self.buckets {
            table.add_row(vec![
                Cell::new(report.kind.as_str()),
                Cell::new(&report.region),
                Cell::new(report.bucket.as_str()),
                Cell::new(report.resources.len()),
            ]);
        }

        table.to_string()
    }

    /// Render the HTML email body: per-bucket headings with a row per resource.
    pub fn render_html(&self) -> String {
        let mut body = String::from("<center>");
        for report in &self.buckets {
            let _ = write!(
                body,
                "<h3>Total <font color='{}'>{}</font> for {} = <b>{}</b> in region {}</h3>",
                report.bucket.color(),
                report.bucket.as_str(),
                report.kind,
                report.resources.len(),
                report.region,
            );
            body.push_str(
                "<table border='2' cellpadding='4'>\
                 <tr><td>Resource ID</td><td>Name</td><td>Owner</td><td>Environment</td><td>Zone</td></tr>",
            );
            if report.resources.is_empty() {
                body.push_str("<tr><td colspan='5'>-- No resources to list --</td></tr>");
            }
            for resource in &report.resources {
                let _ = write!(
                    body,
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    resource.id,
                    resource.tag(TAG_NAME).unwrap_or(""),
                    resource.tag(TAG_OWNER).unwrap_or(""),
                    resource.tag(TAG_ENVIRONMENT).unwrap_or(""),
                    resource.tag(TAG_ZONE).unwrap_or(""),
                );
            }
            body.push_str("</table>");
        }
        body.push_str("</center>");
        body
    }

    /// Write the summary as a JSON artifact.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let written_at = chrono::Utc::now();

        let buckets: Vec<serde_json::Value> = self
            .buckets
            .iter()
            .map(|report| {
                serde_json::json!({
                    "resource_kind": report.kind.as_str(),
                    "region": report.region,
                    "bucket": report.bucket.as_str(),
                    "count": report.resources.len(),
                    "resources": report.resources,
                })
            })
            .collect();

        let output = serde_json::json!({
            "written_at": written_at.to_rfc3339(),
            "buckets": buckets,
        });

        std::fs::write(path, serde_json::to_string_pretty(&output)?)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!(path = %path.display(), "Summary written");
        Ok(())
    }
}

/// Summary email subject for the last cycle.
pub fn summary_email_subject(account_name: &str, region: &str) -> String {
    format!("Janitor execution summary ({account_name}, {region})")
}

/// Send the cycle summary email if a valid target is configured.
///
/// An empty target disables the summary silently; an invalid target is
/// logged and skipped. Neither aborts the cycle.
pub async fn send_summary_email(
    summary: &CycleSummary,
    cfg: &JanitorConfig,
    notifier: &dyn NotificationGateway,
) {
    let Some(target) = cfg.summary_email_to() else {
        return;
    };

    if !notifier.is_valid_email(target) {
        error!(target = %target, "Summary email target address is invalid");
        return;
    }

    let subject = summary_email_subject(cfg.account_name(), cfg.region());
    let body = summary.render_html();
    if let Err(e) = notifier.send_email(target, &subject, &body).await {
        error!(target = %target, error = ?e, "Failed to send summary email");
    }
}
