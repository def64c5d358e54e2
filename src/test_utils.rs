//! In-memory backend, change feed and harness shared by unit tests.

use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::context::AppContext;
use crate::environment::Environment;
use crate::events::{Event, EventSender};
use crate::panel::clipboard::Clipboard;
use crate::panel::{PanelNotice, ResourcePanel};
use crate::realtime::memory::MemoryFeed;
use crate::realtime::{ChangeEvent, ChangeFeed, ChangeKind};
use crate::resources::Resource;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Default)]
struct FakeState {
    /// Rows per table, in insertion order.
    tables: HashMap<String, Vec<Value>>,
    users: Vec<Value>,
    /// Rows exactly as the client sent them.
    inserted: HashMap<String, Vec<Value>>,
    patches: HashMap<String, Vec<Value>>,
    update_delays: VecDeque<Duration>,
    fail_select: Option<String>,
    fail_write: Option<String>,
    fail_names: bool,
    name_counters: HashMap<String, u32>,
    updates_applied: usize,
    sql_responses: Vec<(String, Value)>,
    sql_log: Vec<String>,
    status_refreshes: usize,
    sequence: u64,
}

/// Backend that keeps tables in memory and publishes every write to a feed.
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
    feed: Option<MemoryFeed>,
    environment: Environment,
}

fn rejected(message: &str) -> BackendError {
    BackendError::Http {
        status: 400,
        message: message.to_string(),
    }
}

impl FakeBackend {
    pub fn new(feed: Option<MemoryFeed>) -> Self {
        Self {
            feed,
            ..Self::default()
        }
    }

    fn publish(&self, table: &str, kind: ChangeKind, record: Value) {
        if let Some(feed) = &self.feed {
            feed.publish(ChangeEvent::new(table, kind).with_record(record));
        }
    }

    fn stamp(state: &mut FakeState, mut row: Value) -> Value {
        state.sequence += 1;
        let stamp = format!("2026-01-01T00:00:00.{:06}Z", state.sequence);
        if let Some(object) = row.as_object_mut() {
            object.insert("id".into(), json!(uuid::Uuid::new_v4().to_string()));
            object.entry("enabled").or_insert(json!(true));
            object.entry("created_at").or_insert(json!(stamp.clone()));
            object.entry("last_checked").or_insert(json!(stamp));
        }
        row
    }

    /// Adds a row as if another client wrote it. Returns the assigned id.
    pub fn seed(&self, table: &str, row: Value) -> String {
        let row = self.store(table, row);
        self.publish(table, ChangeKind::Insert, row.clone());
        row["id"].as_str().unwrap_or_default().to_string()
    }

    /// Inserts without notifying subscribers, as if the feed was down.
    pub fn seed_unannounced(&self, table: &str, row: Value) -> String {
        let row = self.store(table, row);
        row["id"].as_str().unwrap_or_default().to_string()
    }

    fn store(&self, table: &str, row: Value) -> Value {
        let mut state = self.state.lock().unwrap();
        let row = Self::stamp(&mut state, row);
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        row
    }

    pub fn seed_user(&self, email: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let user = Self::stamp(&mut state, json!({ "email": email }));
        let id = user["id"].as_str().unwrap_or_default().to_string();
        state.users.push(user);
        id
    }

    pub fn fail_next_select(&self, message: &str) {
        self.state.lock().unwrap().fail_select = Some(message.to_string());
    }

    pub fn fail_next_write(&self, message: &str) {
        self.state.lock().unwrap().fail_write = Some(message.to_string());
    }

    pub fn fail_name_generation(&self) {
        self.state.lock().unwrap().fail_names = true;
    }

    /// Delays the next updates, one duration per call, in call order.
    pub fn delay_updates(&self, delays: impl IntoIterator<Item = Duration>) {
        self.state.lock().unwrap().update_delays.extend(delays);
    }

    /// Answers `execute_sql` calls whose text contains `fragment`.
    pub fn respond_to_sql(&self, fragment: &str, payload: Value) {
        self.state
            .lock()
            .unwrap()
            .sql_responses
            .push((fragment.to_string(), payload));
    }

    pub fn inserted_rows(&self, table: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .inserted
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn last_patch(&self, table: &str) -> Option<Value> {
        self.state
            .lock()
            .unwrap()
            .patches
            .get(table)
            .and_then(|p| p.last().cloned())
    }

    pub fn updates_applied(&self) -> usize {
        self.state.lock().unwrap().updates_applied
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.state.lock().unwrap().sql_log.clone()
    }

    pub fn status_refreshes(&self) -> usize {
        self.state.lock().unwrap().status_refreshes
    }
}

#[async_trait::async_trait]
impl Backend for FakeBackend {
    fn environment(&self) -> &Environment {
        &self.environment
    }

    async fn select_all(&self, table: &str, order_by: &str) -> Result<Vec<Value>, BackendError> {
        let mut state = self.state.lock().unwrap();
        if let Some(message) = state.fail_select.take() {
            return Err(rejected(&message));
        }
        let mut rows = state.tables.get(table).cloned().unwrap_or_default();
        let key = |row: &Value| row[order_by].as_str().unwrap_or_default().to_string();
        rows.sort_by_key(|row| std::cmp::Reverse(key(row)));
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), BackendError> {
        let stored = {
            let mut state = self.state.lock().unwrap();
            if let Some(message) = state.fail_write.take() {
                return Err(rejected(&message));
            }
            state
                .inserted
                .entry(table.to_string())
                .or_default()
                .push(row.clone());
            let stored = Self::stamp(&mut state, row);
            state
                .tables
                .entry(table.to_string())
                .or_default()
                .push(stored.clone());
            stored
        };
        self.publish(table, ChangeKind::Insert, stored);
        Ok(())
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<(), BackendError> {
        let delay = self.state.lock().unwrap().update_delays.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let updated = {
            let mut state = self.state.lock().unwrap();
            if let Some(message) = state.fail_write.take() {
                return Err(rejected(&message));
            }
            state
                .patches
                .entry(table.to_string())
                .or_default()
                .push(patch.clone());
            state.updates_applied += 1;
            let row = state
                .tables
                .get_mut(table)
                .and_then(|rows| rows.iter_mut().find(|r| r["id"] == id));
            let Some(row) = row else {
                return Ok(());
            };
            if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
                for (key, value) in fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            row.clone()
        };
        self.publish(table, ChangeKind::Update, updated);
        Ok(())
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), BackendError> {
        {
            let mut state = self.state.lock().unwrap();
            if let Some(message) = state.fail_write.take() {
                return Err(rejected(&message));
            }
            if let Some(rows) = state.tables.get_mut(table) {
                rows.retain(|r| r["id"] != id);
            }
        }
        self.publish(table, ChangeKind::Delete, json!({ "id": id }));
        Ok(())
    }

    async fn generate_unique_provider_name(
        &self,
        provider_type: &str,
    ) -> Result<String, BackendError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_names {
            return Err(rejected("function generate_unique_provider_name does not exist"));
        }
        let counter = state
            .name_counters
            .entry(provider_type.to_string())
            .or_default();
        *counter += 1;
        Ok(format!("{}-{}", provider_type, counter))
    }

    async fn execute_sql(&self, sql_query: &str) -> Result<Value, BackendError> {
        let mut state = self.state.lock().unwrap();
        state.sql_log.push(sql_query.to_string());
        Ok(state
            .sql_responses
            .iter()
            .find(|(fragment, _)| sql_query.contains(fragment.as_str()))
            .map(|(_, payload)| payload.clone())
            .unwrap_or_else(|| json!([])))
    }

    async fn update_system_status(&self) -> Result<(), BackendError> {
        self.state.lock().unwrap().status_refreshes += 1;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<Value>, BackendError> {
        Ok(self.state.lock().unwrap().users.clone())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), BackendError> {
        self.state
            .lock()
            .unwrap()
            .users
            .retain(|u| u["id"] != user_id);
        Ok(())
    }
}

/// Clipboard that records what was copied.
#[derive(Default)]
pub struct RecordingClipboard {
    copied: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl RecordingClipboard {
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn contents(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn copy(&self, text: &str) -> std::io::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("no clipboard"));
        }
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Everything a view needs, backed by fakes.
pub struct TestHarness {
    pub backend: Arc<FakeBackend>,
    pub feed: MemoryFeed,
    pub clipboard: Arc<RecordingClipboard>,
    pub events: EventSender,
    receiver: Mutex<mpsc::Receiver<Event>>,
    realtime: bool,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::build(true)
    }

    /// Harness whose panels have no change feed.
    pub fn without_feed() -> Self {
        Self::build(false)
    }

    fn build(realtime: bool) -> Self {
        let feed = MemoryFeed::new();
        let (events, receiver) = EventSender::channel();
        Self {
            backend: Arc::new(FakeBackend::new(realtime.then(|| feed.clone()))),
            feed,
            clipboard: Arc::new(RecordingClipboard::default()),
            events,
            receiver: Mutex::new(receiver),
            realtime,
        }
    }

    pub fn ctx(&self) -> AppContext {
        let feed = self
            .realtime
            .then(|| Arc::new(self.feed.clone()) as Arc<dyn ChangeFeed>);
        AppContext::new(
            self.backend.clone(),
            feed,
            self.events.clone(),
            self.clipboard.clone(),
        )
    }

    /// Events raised so far, oldest first.
    pub fn drain_events(&self) -> Vec<Event> {
        let mut receiver = self.receiver.lock().unwrap();
        let mut events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

const WAIT_LIMIT: Duration = Duration::from_secs(2);
const WAIT_STEP: Duration = Duration::from_millis(5);

/// Pumps `panel` until `done` holds, returning the notices seen on the way.
pub async fn pump_until<R: Resource>(
    panel: &mut ResourcePanel<R>,
    done: impl Fn(&ResourcePanel<R>) -> bool,
) -> Vec<PanelNotice> {
    let mut notices = Vec::new();
    let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
    loop {
        notices.extend(panel.pump());
        if done(panel) {
            return notices;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "panel did not reach the expected state"
        );
        tokio::time::sleep(WAIT_STEP).await;
    }
}

/// Pumps `panel` for a short while so in-flight work lands.
pub async fn settle<R: Resource>(panel: &mut ResourcePanel<R>) -> Vec<PanelNotice> {
    let mut notices = Vec::new();
    for _ in 0..20 {
        notices.extend(panel.pump());
        tokio::time::sleep(WAIT_STEP).await;
    }
    notices.extend(panel.pump());
    notices
}

/// Polls `done` until it holds or the wait limit passes.
pub async fn wait_until(mut done: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
    while !done() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached in time"
        );
        tokio::time::sleep(WAIT_STEP).await;
    }
}
