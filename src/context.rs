//! Shared handles passed to every view.

use crate::backend::Backend;
use crate::events::EventSender;
use crate::panel::clipboard::Clipboard;
use crate::realtime::ChangeFeed;
use std::sync::Arc;

/// Built once at startup and cloned into each panel.
#[derive(Clone)]
pub struct AppContext {
    pub backend: Arc<dyn Backend>,
    /// `None` when realtime updates are switched off.
    pub feed: Option<Arc<dyn ChangeFeed>>,
    pub events: EventSender,
    pub clipboard: Arc<dyn Clipboard>,
}

impl AppContext {
    pub fn new(
        backend: Arc<dyn Backend>,
        feed: Option<Arc<dyn ChangeFeed>>,
        events: EventSender,
        clipboard: Arc<dyn Clipboard>,
    ) -> Self {
        Self {
            backend,
            feed,
            events,
            clipboard,
        }
    }
}
