//! Run-cycle engine
//!
//! `JanitorEngine` executes one full mark -> notify -> clean -> summarize
//! cycle with per-unit failure isolation, and exposes the administrative
//! opt-in/opt-out transaction. One unit's failure never stops the cycle;
//! failures are counted and logged, and every remaining unit still runs.

use anyhow::Result;
use janitor_common::{OptEvent, OptEventType};
use tracing::{error, info};

use super::monitor::JanitorMonitor;
use crate::calendar::Calendar;
use crate::config::JanitorConfig;
use crate::notify::NotificationGateway;
use crate::report::{send_summary_email, CycleSummary};
use crate::store::{EventSink, ResourceOptStore};
use crate::unit::CleanupUnit;

/// Composes cleanup units, config, stores, and notifier into run cycles.
///
/// The unit list is fixed for the engine's lifetime and processed in the
/// caller-supplied order, deterministically, each cycle.
pub struct JanitorEngine {
    units: Vec<Box<dyn CleanupUnit>>,
    cfg: JanitorConfig,
    calendar: Box<dyn Calendar>,
    store: ResourceOptStore,
    events: EventSink,
    notifier: Box<dyn NotificationGateway>,
    monitor: JanitorMonitor,
    last_summary: Option<CycleSummary>,
}

impl JanitorEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        units: Vec<Box<dyn CleanupUnit>>,
        cfg: JanitorConfig,
        calendar: Box<dyn Calendar>,
        store: ResourceOptStore,
        events: EventSink,
        notifier: Box<dyn NotificationGateway>,
        monitor: JanitorMonitor,
    ) -> Self {
        Self {
            units,
            cfg,
            calendar,
            store,
            events,
            notifier,
            monitor,
            last_summary: None,
        }
    }

    // ── Read-only accessors ─────────────────────────────────────────────

    /// Shared counter handle for external monitoring.
    pub fn monitor(&self) -> JanitorMonitor {
        self.monitor.clone()
    }

    /// Summary assembled by the most recent enabled cycle, if any.
    pub fn last_summary(&self) -> Option<&CycleSummary> {
        self.last_summary.as_ref()
    }

    pub fn store(&self) -> &ResourceOptStore {
        &self.store
    }

    pub fn events(&self) -> &EventSink {
        &self.events
    }

    /// Re-read the backing configuration file. Callers should do this
    /// before each scheduled cycle so config edits take effect.
    pub fn reload_config(&mut self) -> Result<()> {
        self.cfg.reload()?;
        Ok(())
    }

    // ── Run cycle ───────────────────────────────────────────────────────

    /// Execute one full run cycle.
    ///
    /// When disabled this is a fully inert no-op: no counters move, no unit
    /// is touched, nothing is sent. When enabled the phases run in strict
    /// order: prepare-all, mark-all, notify, clean-all, summarize. Unit
    /// failures are contained; only a fault in the orchestration bookkeeping
    /// itself can propagate, and the running gauge is reset even then.
    pub async fn run_cycle(&mut self) -> Result<()> {
        self.last_summary = None;

        if !self.cfg.enabled() {
            info!("Janitor is disabled, skipping cycle");
            return Ok(());
        }

        self.monitor.record_run();
        let _running = self.monitor.start_running();

        info!(units = self.units.len(), "Marking resources");
        for unit in &mut self.units {
            unit.prepare_to_run();
        }

        for unit in &mut self.units {
            info!(
                resource_kind = %unit.resource_kind(),
                region = %unit.region(),
                "Running mark phase"
            );
            if let Err(e) = unit.mark_resources().await {
                self.monitor.record_error();
                error!(
                    resource_kind = %unit.resource_kind(),
                    region = %unit.region(),
                    error = ?e,
                    "Mark phase failed"
                );
            }
            info!(
                resource_kind = %unit.resource_kind(),
                marked = unit.marked_resources().len(),
                unmarked = unit.unmarked_resources().len(),
                "Mark phase finished"
            );
        }

        if self.cfg.leashed() {
            info!("Janitor is leashed, no notification is sent");
        } else if let Err(e) = self.notifier.send_notifications().await {
            self.monitor.record_error();
            error!(error = ?e, "Failed to dispatch pending notifications");
        }

        info!(units = self.units.len(), "Cleaning resources");
        for unit in &mut self.units {
            if let Err(e) = unit.cleanup_resources().await {
                self.monitor.record_error();
                error!(
                    resource_kind = %unit.resource_kind(),
                    region = %unit.region(),
                    error = ?e,
                    "Clean phase failed"
                );
            }
            info!(
                resource_kind = %unit.resource_kind(),
                cleaned = unit.cleaned_resources().len(),
                failed_to_clean = unit.failed_to_clean_resources().len(),
                "Clean phase finished"
            );
        }

        if self.cfg.summary_email_enabled() {
            let summary = CycleSummary::from_units(&self.units);
            send_summary_email(&summary, &self.cfg, self.notifier.as_ref()).await;
            self.last_summary = Some(summary);
        }

        Ok(())
    }

    // ── Opt transaction ─────────────────────────────────────────────────

    /// Flip a resource's cleanup-eligibility flag, recording an audit event.
    ///
    /// The event append happens before the resource upsert; if either write
    /// fails the operation fails as a whole from the caller's perspective.
    /// An unknown resource yields `Ok(None)` with no event and no write.
    pub async fn set_resource_opt_state(
        &self,
        resource_id: &str,
        region: Option<&str>,
        opt_in: bool,
    ) -> Result<Option<OptEvent>> {
        let region = region.unwrap_or_else(|| self.cfg.region());

        let Some(mut resource) = self.store.get_resource(resource_id, region).await? else {
            return Ok(None);
        };

        let event_type = if opt_in {
            OptEventType::OptIn
        } else {
            OptEventType::OptOut
        };
        let event = OptEvent::new(event_type, resource_id, region, self.calendar.now());
        self.events.record_event(&event).await?;

        resource.opt_out_of_cleanup = !opt_in;
        self.store.add_or_update(&resource).await?;

        info!(
            resource_id = %resource_id,
            region = %region,
            event_type = %event.event_type,
            "Recorded opt-state change"
        );
        Ok(Some(event))
    }

    /// Opt a resource back in to cleanup consideration.
    pub async fn opt_in_resource(
        &self,
        resource_id: &str,
        region: Option<&str>,
    ) -> Result<Option<OptEvent>> {
        self.set_resource_opt_state(resource_id, region, true).await
    }

    /// Exclude a resource from cleanup.
    pub async fn opt_out_resource(
        &self,
        resource_id: &str,
        region: Option<&str>,
    ) -> Result<Option<OptEvent>> {
        self.set_resource_opt_state(resource_id, region, false).await
    }
}
