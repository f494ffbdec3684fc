//! Shared fixtures for engine integration tests:
//! scripted cleanup units, a recording notifier, and a fixed calendar.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use janitor_common::{Resource, ResourceKind};
use janitor_core::calendar::Calendar;
use janitor_core::config::JanitorConfig;
use janitor_core::notify::NotificationGateway;
use janitor_core::orchestrator::{JanitorEngine, JanitorMonitor};
use janitor_core::store::{setup_schema, EventSink, ResourceOptStore};
use janitor_core::unit::CleanupUnit;
use janitor_test_utils::open_test_db;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Shared call log, ordered across units and the notifier
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn log_entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Scripted cleanup unit recording every call into the shared log
pub struct MockUnit {
    kind: ResourceKind,
    region: String,
    fail_mark: bool,
    fail_clean: bool,
    script_marked: Vec<Resource>,
    script_cleaned: Vec<Resource>,
    marked: Vec<Resource>,
    unmarked: Vec<Resource>,
    cleaned: Vec<Resource>,
    failed: Vec<Resource>,
    log: CallLog,
}

impl MockUnit {
    pub fn new(kind: ResourceKind, log: CallLog) -> Self {
        Self {
            kind,
            region: "us-east-1".to_string(),
            fail_mark: false,
            fail_clean: false,
            script_marked: Vec::new(),
            script_cleaned: Vec::new(),
            marked: Vec::new(),
            unmarked: Vec::new(),
            cleaned: Vec::new(),
            failed: Vec::new(),
            log,
        }
    }

    pub fn failing_mark(mut self) -> Self {
        self.fail_mark = true;
        self
    }

    pub fn failing_clean(mut self) -> Self {
        self.fail_clean = true;
        self
    }

    /// Resources the unit will report as marked after a successful mark phase
    pub fn with_marked(mut self, resources: Vec<Resource>) -> Self {
        self.script_marked = resources;
        self
    }

    /// Resources the unit will report as cleaned after a successful clean phase
    pub fn with_cleaned(mut self, resources: Vec<Resource>) -> Self {
        self.script_cleaned = resources;
        self
    }

    fn record(&self, call: &str) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:{}", call, self.kind));
    }
}

#[async_trait]
impl CleanupUnit for MockUnit {
    fn resource_kind(&self) -> ResourceKind {
        self.kind
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn prepare_to_run(&mut self) {
        self.record("prepare");
        self.marked.clear();
        self.unmarked.clear();
        self.cleaned.clear();
        self.failed.clear();
    }

    async fn mark_resources(&mut self) -> Result<()> {
        self.record("mark");
        if self.fail_mark {
            return Err(anyhow!("scripted mark failure"));
        }
        self.marked = self.script_marked.clone();
        Ok(())
    }

    async fn cleanup_resources(&mut self) -> Result<()> {
        self.record("clean");
        if self.fail_clean {
            return Err(anyhow!("scripted clean failure"));
        }
        self.cleaned = self.script_cleaned.clone();
        Ok(())
    }

    fn marked_resources(&self) -> &[Resource] {
        &self.marked
    }

    fn unmarked_resources(&self) -> &[Resource] {
        &self.unmarked
    }

    fn cleaned_resources(&self) -> &[Resource] {
        &self.cleaned
    }

    fn failed_to_clean_resources(&self) -> &[Resource] {
        &self.failed
    }
}

/// One sent email: (to, subject, body)
pub type SentEmail = (String, String, String);

/// Notifier that records calls instead of delivering anything
#[derive(Clone)]
pub struct RecordingNotifier {
    log: CallLog,
    pub emails: Arc<Mutex<Vec<SentEmail>>>,
    pub dispatch_count: Arc<Mutex<u32>>,
}

impl RecordingNotifier {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            emails: Arc::new(Mutex::new(Vec::new())),
            dispatch_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn sent_emails(&self) -> Vec<SentEmail> {
        self.emails.lock().unwrap().clone()
    }

    pub fn dispatches(&self) -> u32 {
        *self.dispatch_count.lock().unwrap()
    }
}

#[async_trait]
impl NotificationGateway for RecordingNotifier {
    fn is_valid_email(&self, address: &str) -> bool {
        address.contains('@')
    }

    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        self.emails
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }

    async fn send_notifications(&self) -> Result<()> {
        self.log.lock().unwrap().push("notify".to_string());
        *self.dispatch_count.lock().unwrap() += 1;
        Ok(())
    }
}

/// Calendar pinned to a known instant, advancing 1s per call so repeated
/// opt toggles get distinct timestamps
pub struct SteppingCalendar {
    current: Mutex<DateTime<Utc>>,
}

impl SteppingCalendar {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()),
        }
    }
}

impl Calendar for SteppingCalendar {
    fn now(&self) -> DateTime<Utc> {
        let mut current = self.current.lock().unwrap();
        let now = *current;
        *current = now + chrono::Duration::seconds(1);
        now
    }
}

/// Engine plus the handles tests observe through
pub struct TestHarness {
    pub engine: JanitorEngine,
    pub store: ResourceOptStore,
    pub events: EventSink,
    pub notifier: RecordingNotifier,
}

/// Build an engine over an in-memory database, sharing the call log with
/// the notifier so phase ordering is observable across collaborators.
pub async fn harness(
    units: Vec<Box<dyn CleanupUnit>>,
    config: &[(&str, &str)],
    log: CallLog,
) -> TestHarness {
    let pool = open_test_db().await.unwrap();
    setup_schema(&pool).await.unwrap();
    let store = ResourceOptStore::new(pool.clone());
    let events = EventSink::new(pool);

    let cfg = JanitorConfig::from_map(
        config
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    );

    let notifier = RecordingNotifier::new(log.clone());
    let engine = JanitorEngine::new(
        units,
        cfg,
        Box::new(SteppingCalendar::new()),
        store.clone(),
        events.clone(),
        Box::new(notifier.clone()),
        JanitorMonitor::new(),
    );

    TestHarness {
        engine,
        store,
        events,
        notifier,
    }
}
