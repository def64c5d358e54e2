//! Developer portal
//!
//! Administration sections listed in a sidebar. Only the selected section's
//! view is alive; switching sections drops it and mounts the next one from
//! scratch.

mod renderer;

pub use renderer::render_developer;

use crate::context::AppContext;
use crate::resources::{
    AiKey, AiKeyDraft, GithubToken, GithubTokenDraft, NetlifyKey, NetlifyKeyDraft, YoutubeKey,
    YoutubeKeyDraft,
};
use crate::ui::views::{
    CredentialView, DatabaseView, OverviewView, PlaceholderView, ProjectsView, QueryView,
    SectionView, StatusView, UsersView,
};
use crossterm::event::KeyEvent;
use strum::IntoEnumIterator;

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum Section {
    Overview,
    #[strum(serialize = "User Management")]
    UserManagement,
    #[strum(serialize = "Project Approval")]
    ProjectApproval,
    #[strum(serialize = "API Keys")]
    ApiKeys,
    Database,
    #[strum(serialize = "Query Runner")]
    QueryRunner,
    Analytics,
    #[strum(serialize = "Config Analytics")]
    ConfigAnalytics,
    #[strum(serialize = "YouTube API")]
    YoutubeApi,
    #[strum(serialize = "GitHub")]
    Github,
    Deployments,
    Security,
    #[strum(serialize = "System Settings")]
    SystemSettings,
    #[strum(serialize = "Email Config")]
    EmailConfig,
    Payments,
    Webhooks,
    Domains,
    Monitoring,
    Backups,
    #[strum(serialize = "Audit Logs")]
    AuditLogs,
    #[strum(serialize = "File Manager")]
    FileManager,
}

impl Section {
    fn index(self) -> usize {
        Section::iter().position(|s| s == self).unwrap_or(0)
    }

    /// The next section in sidebar order, wrapping around.
    pub fn step(self, delta: isize) -> Section {
        let sections: Vec<Section> = Section::iter().collect();
        let len = sections.len() as isize;
        let index = (self.index() as isize + delta).rem_euclid(len);
        sections[index as usize]
    }

    fn mount(self, ctx: AppContext) -> Box<dyn SectionView> {
        match self {
            Section::Overview => Box::new(OverviewView::new(ctx)),
            Section::UserManagement => Box::new(UsersView::new(ctx)),
            Section::ProjectApproval => Box::new(ProjectsView::new(ctx)),
            Section::ApiKeys => {
                Box::new(CredentialView::<AiKey, AiKeyDraft>::new("AI PROVIDER KEYS", ctx))
            }
            Section::Database => Box::new(DatabaseView::new(ctx)),
            Section::QueryRunner => Box::new(QueryView::new(ctx)),
            Section::YoutubeApi => Box::new(CredentialView::<YoutubeKey, YoutubeKeyDraft>::new(
                "YOUTUBE API KEYS",
                ctx,
            )),
            Section::Github => Box::new(CredentialView::<GithubToken, GithubTokenDraft>::new(
                "GITHUB TOKENS",
                ctx,
            )),
            Section::Deployments => Box::new(CredentialView::<NetlifyKey, NetlifyKeyDraft>::new(
                "NETLIFY KEYS",
                ctx,
            )),
            Section::Monitoring => Box::new(StatusView::new(ctx)),
            other => Box::new(PlaceholderView::new(other.to_string())),
        }
    }
}

pub struct DeveloperState {
    ctx: AppContext,
    section: Section,
    view: Box<dyn SectionView>,
}

impl DeveloperState {
    pub fn new(ctx: AppContext) -> Self {
        let section = Section::Overview;
        Self {
            view: section.mount(ctx.clone()),
            ctx,
            section,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn view(&self) -> &dyn SectionView {
        self.view.as_ref()
    }

    /// Unmounts the current section and mounts `section`.
    pub fn select(&mut self, section: Section) {
        if section == self.section {
            return;
        }
        log::debug!("Switching section: {} -> {}", self.section, section);
        self.section = section;
        self.view = section.mount(self.ctx.clone());
    }

    pub fn next_section(&mut self) {
        self.select(self.section.step(1));
    }

    pub fn previous_section(&mut self) {
        self.select(self.section.step(-1));
    }

    pub fn tick(&mut self) {
        self.view.tick();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.view.handle_key(key);
    }

    pub fn captures_input(&self) -> bool {
        self.view.captures_input()
    }
}
