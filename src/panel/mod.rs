//! Resource Panel
//!
//! A list of rows bound to one backend collection. The panel loads the rows,
//! reloads them whenever the change feed reports a write, and forwards
//! mutations to the backend. It never edits its own copy of the rows: every
//! change becomes visible through a reload.
//!
//! Background work reports back over a channel that the UI drains with
//! [`ResourcePanel::pump`]. Dropping the panel cancels its listener and closes
//! that channel, so late results are discarded.

pub mod clipboard;
pub mod masking;

use crate::backend::Backend;
use crate::backend::error::BackendError;
use crate::consts::cli_consts::PANEL_QUEUE_SIZE;
use crate::context::AppContext;
use crate::events::Source;
use crate::resources::{
    Credential, Draft, DraftError, FieldValues, Project, ProjectStatus, Resource, RowSource,
    ServiceStatus,
};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No load has finished yet; rows are hidden.
    Loading,
    Ready,
}

/// Outcomes the owning view reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelNotice {
    /// A create succeeded; the form can close.
    Created,
    /// A create failed; the form stays open with its values.
    CreateFailed(String),
}

enum PanelMessage<R> {
    Loaded(Result<Vec<R>, String>),
    Notice(PanelNotice),
}

pub struct ResourcePanel<R: Resource> {
    ctx: AppContext,
    rows: Vec<R>,
    state: LoadState,
    /// Ids whose secret is currently shown in clear.
    visible: HashSet<String>,
    subscribed: bool,
    sender: mpsc::Sender<PanelMessage<R>>,
    receiver: mpsc::Receiver<PanelMessage<R>>,
    token: CancellationToken,
    _resource: PhantomData<R>,
}

/// Fetches all rows of `R`. Rows that fail to decode are skipped.
pub async fn fetch<R: Resource>(backend: &dyn Backend) -> Result<Vec<R>, BackendError> {
    let raw = match R::SOURCE {
        RowSource::Table(table) => backend.select_all(table, R::ORDER_BY).await?,
        RowSource::AuthUsers => backend.list_users().await?,
    };
    Ok(raw
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<R>(row) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("Skipping malformed {} row: {}", R::LABEL, e);
                None
            }
        })
        .collect())
}

fn spawn_load<R: Resource>(backend: Arc<dyn Backend>, sender: mpsc::Sender<PanelMessage<R>>) {
    tokio::spawn(async move {
        let result = fetch::<R>(backend.as_ref())
            .await
            .map_err(|e| e.to_string());
        // Closed channel: the panel is gone.
        let _ = sender.send(PanelMessage::Loaded(result)).await;
    });
}

impl<R: Resource> ResourcePanel<R> {
    /// Creates an idle panel. Nothing is fetched until [`Self::load`].
    pub fn new(ctx: AppContext) -> Self {
        let (sender, receiver) = mpsc::channel(PANEL_QUEUE_SIZE);
        Self {
            ctx,
            rows: Vec::new(),
            state: LoadState::Loading,
            visible: HashSet::new(),
            subscribed: false,
            sender,
            receiver,
            token: CancellationToken::new(),
            _resource: PhantomData,
        }
    }

    /// Creates a panel, starts the initial load and subscribes to changes.
    pub fn mount(ctx: AppContext) -> Self {
        let mut panel = Self::new(ctx);
        panel.load();
        panel.subscribe_to_changes();
        panel
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn row(&self, id: &str) -> Option<&R> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Whether reloads are driven by the change feed.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    fn source(&self) -> Source {
        Source::Panel(R::LABEL)
    }

    /// Starts a full fetch. The last fetch to finish wins.
    pub fn load(&self) {
        spawn_load::<R>(self.ctx.backend.clone(), self.sender.clone());
    }

    /// Reloads on every insert, update or delete reported for the table.
    ///
    /// No-op without a change feed or for sources that have none.
    pub fn subscribe_to_changes(&mut self) {
        if self.subscribed {
            return;
        }
        let (Some(feed), Some(table)) = (self.ctx.feed.clone(), R::SOURCE.table()) else {
            return;
        };

        let mut subscription = feed.subscribe(table);
        let token = self.token.clone();
        let backend = self.ctx.backend.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    change = subscription.recv() => match change {
                        Some(change) => {
                            log::debug!("{} changed ({}), reloading", change.table, change.kind);
                            spawn_load::<R>(backend.clone(), sender.clone());
                        }
                        None => break,
                    },
                }
            }
        });
        self.subscribed = true;
    }

    /// Applies finished background work. Call once per UI tick.
    pub fn pump(&mut self) -> Vec<PanelNotice> {
        let mut notices = Vec::new();
        while let Ok(message) = self.receiver.try_recv() {
            match message {
                PanelMessage::Loaded(Ok(rows)) => {
                    self.rows = rows;
                    self.state = LoadState::Ready;
                }
                PanelMessage::Loaded(Err(e)) => {
                    log::error!("Error fetching {} rows: {}", R::LABEL, e);
                    self.state = LoadState::Ready;
                }
                PanelMessage::Notice(notice) => notices.push(notice),
            }
        }
        notices
    }

    /// Runs a mutation in the background, toasting its outcome.
    ///
    /// A direct reload follows success only when no subscription will do it.
    fn dispatch<F>(&self, call: F, success: String, failure: String, notify: bool)
    where
        F: Future<Output = Result<(), BackendError>> + Send + 'static,
    {
        let events = self.ctx.events.clone();
        let backend = self.ctx.backend.clone();
        let sender = self.sender.clone();
        let source = self.source();
        let reload = !self.subscribed;
        tokio::spawn(async move {
            match call.await {
                Ok(()) => {
                    events.success(source, success);
                    if notify {
                        let _ = sender.send(PanelMessage::Notice(PanelNotice::Created)).await;
                    }
                    if reload {
                        spawn_load::<R>(backend, sender);
                    }
                }
                Err(e) => {
                    let message = format!("{}: {}", failure, e);
                    events.error(source, message.clone());
                    if notify {
                        let _ = sender
                            .send(PanelMessage::Notice(PanelNotice::CreateFailed(message)))
                            .await;
                    }
                }
            }
        });
    }

    /// Validates the form and inserts a new row.
    ///
    /// Validation errors are returned and toasted; nothing is sent.
    pub fn create<D>(&self, values: &FieldValues) -> Result<(), DraftError>
    where
        D: Draft<Target = R>,
    {
        let draft = match D::from_fields(values) {
            Ok(draft) => draft,
            Err(e) => {
                self.ctx.events.error(self.source(), e.to_string());
                return Err(e);
            }
        };
        let table = R::SOURCE.table().ok_or(DraftError::ReadOnly(R::LABEL))?;
        let backend = self.ctx.backend.clone();
        let call = async move {
            let generated = match draft.provider_type().map(str::to_string) {
                Some(provider) => Some(
                    match backend.generate_unique_provider_name(&provider).await {
                        Ok(name) => name,
                        Err(e) => {
                            log::warn!("Error generating unique name: {}", e);
                            provider
                        }
                    },
                ),
                None => None,
            };
            backend.insert(table, draft.into_row(generated)).await
        };
        self.dispatch(
            call,
            format!("{} added successfully", R::LABEL),
            format!("Failed to add {}", R::LABEL),
            true,
        );
        Ok(())
    }

    /// Sends a partial update for one row.
    pub fn update_fields(&self, id: &str, patch: Value, success: String) {
        let Some(table) = R::SOURCE.table() else {
            log::warn!("{} rows cannot be updated", R::LABEL);
            return;
        };
        let backend = self.ctx.backend.clone();
        let id = id.to_string();
        self.dispatch(
            async move { backend.update(table, &id, patch).await },
            success,
            format!("Failed to update {}", R::LABEL),
            false,
        );
    }

    /// Deletes a row immediately. There is no confirmation and no undo.
    pub fn delete(&self, id: &str) {
        let backend = self.ctx.backend.clone();
        let id = id.to_string();
        let source = R::SOURCE;
        self.dispatch(
            async move {
                match source {
                    RowSource::Table(table) => backend.delete(table, &id).await,
                    RowSource::AuthUsers => backend.delete_user(&id).await,
                }
            },
            format!("{} deleted successfully", R::LABEL),
            format!("Failed to delete {}", R::LABEL),
            false,
        );
    }

    pub fn reveal_secret(&mut self, id: &str) {
        self.visible.insert(id.to_string());
    }

    pub fn mask_secret(&mut self, id: &str) {
        self.visible.remove(id);
    }

    pub fn toggle_visibility(&mut self, id: &str) {
        if !self.visible.remove(id) {
            self.visible.insert(id.to_string());
        }
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.visible.contains(id)
    }
}

impl<R: Credential> ResourcePanel<R> {
    /// Patches only `enabled`. The list changes once a reload observes it.
    pub fn toggle_enabled(&self, id: &str, next: bool) {
        let state = if next { "enabled" } else { "disabled" };
        self.update_fields(
            id,
            json!({ "enabled": next }),
            format!("{} {}", R::SECRET_NOUN, state),
        );
    }

    /// The secret as it should be drawn: clear when revealed, masked otherwise.
    pub fn displayed_secret(&self, row: &R) -> String {
        if self.is_revealed(row.id()) {
            row.secret().to_string()
        } else {
            masking::mask(row.secret())
        }
    }

    /// Copies the raw secret. Always reported as copied.
    pub fn copy_secret(&self, id: &str) {
        let Some(row) = self.row(id) else {
            return;
        };
        if let Err(e) = self.ctx.clipboard.copy(row.secret()) {
            log::warn!("Clipboard write failed: {}", e);
        }
        self.ctx.events.info(
            self.source(),
            "Copied",
            format!("{} copied to clipboard", R::SECRET_NOUN),
        );
    }
}

impl ResourcePanel<Project> {
    /// Moves a project to any status.
    pub fn set_status(&self, id: &str, status: &ProjectStatus) {
        self.update_fields(
            id,
            json!({ "status": status.as_str() }),
            format!("Project marked {}", status.as_str()),
        );
    }
}

impl ResourcePanel<ServiceStatus> {
    /// Asks the backend to probe its services again.
    pub fn request_health_check(&self) {
        let backend = self.ctx.backend.clone();
        self.dispatch(
            async move { backend.update_system_status().await },
            "Service status refresh requested".to_string(),
            "Failed to refresh service status".to_string(),
            false,
        );
    }
}

impl<R: Resource> Drop for ResourcePanel<R> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
