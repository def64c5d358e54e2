//! Websocket transport for change subscriptions.
//!
//! Each subscription owns one socket and one channel. The task reconnects
//! after drops and stops when the subscription is dropped or its receiver
//! goes away.

use crate::consts::cli_consts::realtime;
use crate::environment::Environment;
use crate::events::{Event, EventSender, Source};
use crate::logging::LogLevel;
use crate::realtime::phoenix::{Frame, Inbound, topic_for};
use crate::realtime::{ChangeEvent, ChangeFeed, ChangeKind, Subscription};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, interval_at};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

/// Connection lifecycle, reported through the event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FeedStatus {
    Connecting,
    Joined,
    Disconnected,
    Reconnecting,
}

#[derive(Clone)]
pub struct RealtimeClient {
    url: String,
    api_key: String,
    events: Option<EventSender>,
    reconnect_delay: Duration,
}

impl RealtimeClient {
    pub fn new(environment: &Environment, api_key: &str) -> Self {
        Self {
            url: environment.realtime_url(api_key),
            api_key: api_key.to_string(),
            events: None,
            reconnect_delay: realtime::reconnect_delay(),
        }
    }

    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    #[cfg(test)]
    fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

impl ChangeFeed for RealtimeClient {
    fn subscribe(&self, table: &str) -> Subscription {
        let (sender, token, subscription) = Subscription::channel(table);
        let channel = Channel {
            url: self.url.clone(),
            api_key: self.api_key.clone(),
            table: table.to_string(),
            topic: topic_for(table),
            events: self.events.clone(),
            reconnect_delay: self.reconnect_delay,
        };
        tokio::spawn(channel.run(sender, token));
        subscription
    }
}

/// Why a connection attempt ended.
enum Exit {
    /// Stop for good.
    Shutdown,
    Reconnect,
}

struct Channel {
    url: String,
    api_key: String,
    table: String,
    topic: String,
    events: Option<EventSender>,
    reconnect_delay: Duration,
}

impl Channel {
    fn report(&self, status: FeedStatus) {
        let msg = format!("{} ({})", status, self.table);
        match &self.events {
            Some(events) => events.send(Event::refresh(Source::Realtime, msg, LogLevel::Debug)),
            None => log::debug!("realtime: {}", msg),
        }
    }

    async fn run(self, sender: mpsc::Sender<ChangeEvent>, token: CancellationToken) {
        let mut joined_before = false;
        loop {
            self.report(FeedStatus::Connecting);
            match self.session(&sender, &token, &mut joined_before).await {
                Exit::Shutdown => break,
                Exit::Reconnect => {
                    self.report(FeedStatus::Disconnected);
                }
            }

            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.reconnect_delay) => {
                    self.report(FeedStatus::Reconnecting);
                }
            }
        }
        log::debug!("realtime: stopped listening on {}", self.table);
    }

    /// One socket lifetime: connect, join, then pump frames until something ends it.
    ///
    /// A rejoin after an earlier successful join emits a [`ChangeKind::Resync`]
    /// so the subscriber reloads whatever changed while the socket was down.
    async fn session(
        &self,
        sender: &mpsc::Sender<ChangeEvent>,
        token: &CancellationToken,
        joined_before: &mut bool,
    ) -> Exit {
        let connected = tokio::select! {
            _ = token.cancelled() => return Exit::Shutdown,
            result = connect_async(self.url.as_str()) => result,
        };
        let (stream, _) = match connected {
            Ok(connection) => connection,
            Err(e) => {
                log::warn!("realtime: failed to connect for {}: {}", self.table, e);
                return Exit::Reconnect;
            }
        };
        let (mut write, mut read) = stream.split();

        let mut reference: u64 = 1;
        let join = Frame::join(&self.topic, &self.table, &self.api_key, reference);
        let join_ref = reference.to_string();
        if let Err(e) = send_frame(&mut write, &join).await {
            log::warn!("realtime: failed to join {}: {}", self.topic, e);
            return Exit::Reconnect;
        }

        let period = realtime::heartbeat_interval();
        let mut heartbeat = interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    reference += 1;
                    let _ = send_frame(&mut write, &Frame::leave(&self.topic, reference)).await;
                    let _ = write.close().await;
                    return Exit::Shutdown;
                }

                _ = heartbeat.tick() => {
                    reference += 1;
                    if let Err(e) = send_frame(&mut write, &Frame::heartbeat(reference)).await {
                        log::warn!("realtime: heartbeat failed: {}", e);
                        return Exit::Reconnect;
                    }
                }

                message = read.next() => {
                    let text = match message {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(_))) | None => return Exit::Reconnect,
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => {
                            log::warn!("realtime: socket error on {}: {}", self.topic, e);
                            return Exit::Reconnect;
                        }
                    };
                    let frame = match serde_json::from_str::<Frame>(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            log::debug!("realtime: unreadable frame: {}", e);
                            continue;
                        }
                    };
                    match frame.classify(&self.topic, Some(&join_ref)) {
                        Inbound::Joined => {
                            self.report(FeedStatus::Joined);
                            if std::mem::replace(joined_before, true) {
                                let resync =
                                    ChangeEvent::new(self.table.as_str(), ChangeKind::Resync);
                                if sender.send(resync).await.is_err() {
                                    return Exit::Shutdown;
                                }
                            }
                        }
                        Inbound::JoinRejected(reason) => {
                            log::error!("realtime: join of {} rejected: {}", self.topic, reason);
                            return Exit::Reconnect;
                        }
                        Inbound::Change(change) => {
                            // Receiver gone means the subscription was dropped.
                            if sender.send(change).await.is_err() {
                                return Exit::Shutdown;
                            }
                        }
                        Inbound::ChannelClosed => return Exit::Reconnect,
                        Inbound::Ignored => {}
                    }
                }
            }
        }
    }
}

async fn send_frame<S>(write: &mut S, frame: &Frame) -> Result<(), String>
where
    S: futures::Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let text = serde_json::to_string(frame).map_err(|e| e.to_string())?;
    write.send(Message::Text(text)).await.map_err(|e| e.to_string())
}
