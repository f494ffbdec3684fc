//! Opt-in/opt-out audit events
//!
//! Every opt-state mutation produces exactly one event, appended to the
//! event sink before the resource is persisted. Events are immutable once
//! created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of an opt-state change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptEventType {
    /// Resource opted back in to cleanup consideration
    OptIn,
    /// Resource excluded from cleanup
    OptOut,
}

impl OptEventType {
    /// Stable string form used in the event log
    pub fn as_str(self) -> &'static str {
        match self {
            OptEventType::OptIn => "OPT_IN_RESOURCE",
            OptEventType::OptOut => "OPT_OUT_RESOURCE",
        }
    }

    /// Parse from the stable string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "OPT_IN_RESOURCE" => Some(OptEventType::OptIn),
            "OPT_OUT_RESOURCE" => Some(OptEventType::OptOut),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded opt-state change for one resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptEvent {
    /// Synthetic id: `"{resource_id}@{timestamp_millis}"`. The same resource
    /// can be toggled repeatedly, so the timestamp keeps ids distinct.
    pub event_id: String,
    /// Direction of the change
    pub event_type: OptEventType,
    /// Affected resource id
    pub resource_id: String,
    /// Region of the affected resource
    pub region: String,
    /// When the change was made
    pub timestamp: DateTime<Utc>,
}

impl OptEvent {
    /// Build an event for a resource at the given time.
    pub fn new(
        event_type: OptEventType,
        resource_id: impl Into<String>,
        region: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let resource_id = resource_id.into();
        let event_id = format!("{}@{}", resource_id, timestamp.timestamp_millis());
        Self {
            event_id,
            event_type,
            resource_id,
            region: region.into(),
            timestamp,
        }
    }
}
