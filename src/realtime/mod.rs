//! Row change notifications.
//!
//! A [`ChangeFeed`] hands out one [`Subscription`] per table and caller.
//! Subscriptions are never shared; dropping one tears down whatever the feed
//! keeps alive for it.

use crate::consts::cli_consts::CHANGE_QUEUE_SIZE;
use serde_json::Value;
use std::str::FromStr;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[cfg(test)]
pub mod memory;
pub mod phoenix;
mod socket;

pub use socket::RealtimeClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
    /// The feed rejoined after a drop; changes made meanwhile were missed.
    Resync,
}

impl FromStr for ChangeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INSERT" => Ok(ChangeKind::Insert),
            "UPDATE" => Ok(ChangeKind::Update),
            "DELETE" => Ok(ChangeKind::Delete),
            other => Err(format!("unknown change type: {}", other)),
        }
    }
}

/// One committed row change.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub table: String,
    pub kind: ChangeKind,
    pub record: Option<Value>,
    pub old_record: Option<Value>,
}

impl ChangeEvent {
    pub fn new(table: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            table: table.into(),
            kind,
            record: None,
            old_record: None,
        }
    }

    pub fn with_record(mut self, record: Value) -> Self {
        self.record = Some(record);
        self
    }
}

/// Receiving end of a per-table change stream. Cancels its producer on drop.
#[derive(Debug)]
pub struct Subscription {
    table: String,
    receiver: mpsc::Receiver<ChangeEvent>,
    token: CancellationToken,
}

impl Subscription {
    /// Creates a subscription and the sender its producer feeds.
    pub fn channel(table: &str) -> (mpsc::Sender<ChangeEvent>, CancellationToken, Self) {
        let (sender, receiver) = mpsc::channel(CHANGE_QUEUE_SIZE);
        let token = CancellationToken::new();
        let subscription = Self {
            table: table.to_string(),
            receiver,
            token: token.clone(),
        };
        (sender, token, subscription)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Waits for the next change. `None` once the producer has stopped.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Source of per-table change subscriptions.
pub trait ChangeFeed: Send + Sync {
    /// Starts listening for inserts, updates and deletes on `table`.
    ///
    /// Must be called from within a tokio runtime.
    fn subscribe(&self, table: &str) -> Subscription;
}
