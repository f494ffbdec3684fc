//! The tracked cloud resource model
//!
//! A resource is identified by `(id, region)`. Cleanup units discover and
//! create resources during their mark phase; the orchestrator only ever
//! updates the opt-out flag through its opt transaction.

use crate::resource_kind::ResourceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A cloud resource tracked for cleanup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Cloud-assigned resource id (e.g., "i-0abc123")
    pub id: String,
    /// Region the resource lives in
    pub region: String,
    /// Resource type
    pub kind: ResourceKind,
    /// Arbitrary key/value tags from the cloud provider
    pub tags: HashMap<String, String>,
    /// Excluded from automated cleanup. Mutated only by the orchestrator's
    /// opt transaction; cleanup units must treat it as authoritative.
    pub opt_out_of_cleanup: bool,
    /// Why the resource was (or will be) terminated
    pub termination_reason: Option<String>,
    /// When the resource was launched
    pub launch_time: Option<DateTime<Utc>>,
    /// When the resource is expected to be cleaned
    pub expected_termination_time: Option<DateTime<Utc>>,
    /// Provider-reported state (e.g., "running", "available")
    pub state: Option<String>,
    /// Owner email for per-resource notifications
    pub owner_email: Option<String>,
}

impl Resource {
    /// Create a resource with identity and kind; everything else defaulted.
    pub fn new(id: impl Into<String>, region: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            region: region.into(),
            kind,
            tags: HashMap::new(),
            opt_out_of_cleanup: false,
            termination_reason: None,
            launch_time: None,
            expected_termination_time: None,
            state: None,
            owner_email: None,
        }
    }

    /// Look up a tag value
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Set a tag value
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }
}
