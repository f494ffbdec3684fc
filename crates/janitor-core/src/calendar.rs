//! Time source for the orchestrator
//!
//! Opt events are stamped from this seam rather than `Utc::now()` directly
//! so tests can pin the clock.

use chrono::{DateTime, Utc};

/// Provides the current time for event stamping
pub trait Calendar: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock calendar
#[derive(Debug, Default, Clone)]
pub struct SystemCalendar;

impl Calendar for SystemCalendar {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
