//! Run-cycle orchestration
//!
//! `JanitorEngine` composes the cleanup units, config, calendar, durable
//! stores, and notifier into one run cycle, and owns the opt-in/opt-out
//! transaction. `JanitorMonitor` holds the process-wide counters read by
//! external monitoring.

mod engine;
mod monitor;

pub use engine::JanitorEngine;
pub use monitor::{JanitorMonitor, MonitorSnapshot, RunningGuard};
