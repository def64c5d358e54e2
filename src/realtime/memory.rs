//! In-process change feed used by tests.

use crate::realtime::{ChangeEvent, ChangeFeed, Subscription};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

struct Subscriber {
    table: String,
    sender: mpsc::Sender<ChangeEvent>,
    token: CancellationToken,
}

#[derive(Clone, Default)]
pub struct MemoryFeed {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl MemoryFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every live subscriber of its table.
    pub fn publish(&self, event: ChangeEvent) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|s| !s.token.is_cancelled() && !s.sender.is_closed());
        for subscriber in subscribers.iter().filter(|s| s.table == event.table) {
            let _ = subscriber.sender.try_send(event.clone());
        }
    }

    /// Number of subscriptions that have not been dropped.
    pub fn active_subscriptions(&self, table: &str) -> usize {
        self.subscribers
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.table == table && !s.token.is_cancelled())
            .count()
    }
}

impl ChangeFeed for MemoryFeed {
    fn subscribe(&self, table: &str) -> Subscription {
        let (sender, token, subscription) = Subscription::channel(table);
        self.subscribers.lock().unwrap().push(Subscriber {
            table: table.to_string(),
            sender,
            token,
        });
        subscription
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::ChangeKind;

    #[tokio::test]
    async fn test_publish_reaches_only_matching_table() {
        let feed = MemoryFeed::new();
        let mut keys = feed.subscribe("ai_api_keys");
        let _projects = feed.subscribe("projects");

        feed.publish(ChangeEvent::new("ai_api_keys", ChangeKind::Insert));
        let event = keys.recv().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Insert);
        assert_eq!(feed.active_subscriptions("projects"), 1);
    }

    #[tokio::test]
    async fn test_dropped_subscription_is_pruned() {
        let feed = MemoryFeed::new();
        let subscription = feed.subscribe("projects");
        assert_eq!(feed.active_subscriptions("projects"), 1);
        drop(subscription);
        assert_eq!(feed.active_subscriptions("projects"), 0);
        feed.publish(ChangeEvent::new("projects", ChangeKind::Delete));
    }
}
