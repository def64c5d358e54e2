//! Event System
//!
//! Notifications raised by panels and the realtime transport, rendered as
//! toasts and kept in the session activity log.

use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Source {
    /// A resource panel, identified by the label of its resource.
    Panel(&'static str),
    /// The realtime change feed.
    Realtime,
    /// The SQL console and catalog views.
    Console,
    /// Navigation and application-level notices.
    App,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub source: Source,
    /// Short headline, e.g. "Success" or "Copied".
    pub title: String,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    /// Navigation session of the sender that raised it.
    pub session: u64,
}

impl Event {
    pub fn new(
        source: Source,
        title: impl Into<String>,
        msg: impl Into<String>,
        event_type: EventType,
        log_level: LogLevel,
    ) -> Self {
        Self {
            source,
            title: title.into(),
            msg: msg.into(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            session: 0,
        }
    }

    pub fn success(source: Source, msg: impl Into<String>) -> Self {
        Self::new(source, "Success", msg, EventType::Success, LogLevel::Info)
    }

    pub fn error(source: Source, msg: impl Into<String>) -> Self {
        Self::new(source, "Error", msg, EventType::Error, LogLevel::Error)
    }

    pub fn info(source: Source, title: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::new(source, title, msg, EventType::Info, LogLevel::Info)
    }

    pub fn refresh(source: Source, msg: impl Into<String>, log_level: LogLevel) -> Self {
        Self::new(source, "Refresh", msg, EventType::Refresh, log_level)
    }

    /// Whether the event is raised as a toast, as opposed to only being logged.
    pub fn is_toast(&self) -> bool {
        matches!(
            self.event_type,
            EventType::Success | EventType::Error | EventType::Info
        )
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.event_type, self.timestamp, self.title, self.msg
        )
    }
}

/// Cloneable handle used by panels and background tasks to raise events.
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
    session: u64,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender, session: 0 }
    }

    /// Creates a sender together with the receiving end drained by the UI.
    pub fn channel() -> (Self, mpsc::Receiver<Event>) {
        let (sender, receiver) = mpsc::channel(EVENT_QUEUE_SIZE);
        (Self::new(sender), receiver)
    }

    /// A sender on the same channel whose events belong to the next session.
    /// Work still holding the old sender keeps its old session number.
    pub fn next_session(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            session: self.session + 1,
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Logs the event and queues it for the UI. Never blocks; a full or
    /// closed queue drops the event.
    pub fn send(&self, mut event: Event) {
        event.session = self.session;
        match event.log_level {
            LogLevel::Error => log::error!("{}", event),
            LogLevel::Warn => log::warn!("{}", event),
            LogLevel::Info => log::info!("{}", event),
            LogLevel::Debug => log::debug!("{}", event),
            LogLevel::Trace => log::trace!("{}", event),
        }
        let _ = self.sender.try_send(event);
    }

    pub fn success(&self, source: Source, msg: impl Into<String>) {
        self.send(Event::success(source, msg));
    }

    pub fn error(&self, source: Source, msg: impl Into<String>) {
        self.send(Event::error(source, msg));
    }

    pub fn info(&self, source: Source, title: impl Into<String>, msg: impl Into<String>) {
        self.send(Event::info(source, title, msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_classification() {
        assert!(Event::success(Source::App, "saved").is_toast());
        assert!(Event::error(Source::App, "boom").is_toast());
        assert!(!Event::refresh(Source::Realtime, "joined", LogLevel::Debug).is_toast());
    }

    #[test]
    fn test_display_includes_title_and_message() {
        let event = Event::info(Source::Console, "Copied", "API key copied to clipboard");
        let rendered = event.to_string();
        assert!(rendered.starts_with("Info ["));
        assert!(rendered.ends_with("Copied: API key copied to clipboard"));
    }

    #[tokio::test]
    async fn test_sender_delivers_events() {
        let (sender, mut receiver) = EventSender::channel();
        sender.success(Source::Panel("GitHub token"), "GitHub token deleted successfully");
        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event_type, EventType::Success);
        assert_eq!(event.source, Source::Panel("GitHub token"));
    }

    #[tokio::test]
    async fn test_next_session_stamps_events() {
        let (first, mut receiver) = EventSender::channel();
        let second = first.next_session();
        first.info(Source::App, "Old", "from the first session");
        second.info(Source::App, "New", "from the second session");

        assert_eq!(receiver.recv().await.unwrap().session, 0);
        assert_eq!(receiver.recv().await.unwrap().session, 1);
        assert_eq!(second.session(), 1);
    }
}
