//! Process-wide run counters
//!
//! Counters persist across cycles and are read by an external metrics
//! puller. Increments use atomics because opt calls and cycles may run
//! concurrently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

struct MonitorInner {
    /// Cycles where the orchestrator was enabled and actually executed
    runs: AtomicU64,
    /// Individual unit-call failures across mark and clean phases
    errors: AtomicU64,
    /// 1 only during an in-flight enabled cycle
    running: AtomicU64,
}

/// Cloneable handle to the shared counters
#[derive(Clone)]
pub struct JanitorMonitor {
    inner: Arc<MonitorInner>,
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSnapshot {
    pub runs: u64,
    pub errors: u64,
    pub running: u64,
}

impl JanitorMonitor {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                runs: AtomicU64::new(0),
                errors: AtomicU64::new(0),
                running: AtomicU64::new(0),
            }),
        }
    }

    /// Record the start of an enabled cycle.
    pub fn record_run(&self) {
        self.inner.runs.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one contained unit-call failure.
    pub fn record_error(&self) {
        self.inner.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Raise the running gauge; the returned guard lowers it on drop,
    /// on every exit path including orchestration-level faults.
    pub fn start_running(&self) -> RunningGuard {
        self.inner.running.store(1, Ordering::SeqCst);
        RunningGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn runs(&self) -> u64 {
        self.inner.runs.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> u64 {
        self.inner.errors.load(Ordering::Relaxed)
    }

    pub fn running(&self) -> u64 {
        self.inner.running.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        MonitorSnapshot {
            runs: self.runs(),
            errors: self.errors(),
            running: self.running(),
        }
    }
}

impl Default for JanitorMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowers the running gauge when dropped
pub struct RunningGuard {
    inner: Arc<MonitorInner>,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.inner.running.store(0, Ordering::SeqCst);
    }
}
