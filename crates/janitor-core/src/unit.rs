//! Cleanup unit contract
//!
//! One unit per managed resource type. The orchestrator drives every unit
//! through prepare -> mark -> clean each cycle and reads the result buckets
//! for logging and the summary report. Units are opaque to the core: how a
//! unit decides what to mark or clean (retention policy, grace periods) is
//! its own business.

use anyhow::Result;
use async_trait::async_trait;
use janitor_common::{Resource, ResourceKind};

/// A plugin implementing mark/clean logic for one resource type.
///
/// Contract:
/// - `prepare_to_run` never fails; it resets the per-cycle result buckets.
/// - `mark_resources` and `cleanup_resources` may fail; after a failure the
///   bucket accessors reflect whatever partial progress was made.
/// - Units must honor `Resource::opt_out_of_cleanup` and must not re-derive
///   opt status from tag data.
#[async_trait]
pub trait CleanupUnit: Send + Sync {
    /// Resource type this unit manages
    fn resource_kind(&self) -> ResourceKind;

    /// Region this unit operates in
    fn region(&self) -> &str;

    /// Reset per-cycle result buckets so monitoring stays sane.
    fn prepare_to_run(&mut self);

    /// Discover resources and mark those eligible for future cleanup.
    async fn mark_resources(&mut self) -> Result<()>;

    /// Clean resources previously marked and past their grace period.
    async fn cleanup_resources(&mut self) -> Result<()>;

    /// Resources marked for cleanup in the current cycle
    fn marked_resources(&self) -> &[Resource];

    /// Resources unmarked (no longer eligible) in the current cycle
    fn unmarked_resources(&self) -> &[Resource];

    /// Resources cleaned in the current cycle
    fn cleaned_resources(&self) -> &[Resource];

    /// Resources that failed to clean in the current cycle
    fn failed_to_clean_resources(&self) -> &[Resource];
}
