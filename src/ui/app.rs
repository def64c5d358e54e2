//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::consts::cli_consts::MAX_ACTIVITY_LOGS;
use crate::consts::cli_consts::ui::tick;
use crate::context::AppContext;
use crate::events::{Event as UiEvent, Source};
use crate::ui::components::{ToastStack, render_toasts};
use crate::ui::creator::{CreatorState, render_creator};
use crate::ui::developer::{DeveloperState, render_developer};
use crate::ui::landing::render_landing;
use crate::ui::views::ViewContext;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Block;
use ratatui::{Frame, Terminal, backend::Backend};
use std::collections::VecDeque;
use std::time::Instant;
use tokio::sync::mpsc;

/// The portal to open, chosen on the landing screen or from the command line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum Portal {
    Creator,
    Developer,
}

/// UI configuration data grouped by concern
#[derive(Debug, Clone, Default)]
pub struct UIConfig {
    pub with_background_color: bool,
    /// Skips the landing screen.
    pub initial_portal: Option<Portal>,
}

impl UIConfig {
    pub fn new(with_background_color: bool, initial_portal: Option<Portal>) -> Self {
        Self {
            with_background_color,
            initial_portal,
        }
    }
}

/// The different screens in the application.
pub enum Screen {
    /// Portal selection, shown at start and after going home.
    Landing,
    Creator(Box<CreatorState>),
    Developer(Box<DeveloperState>),
}

/// Application state
pub struct App {
    /// Shared handles for every panel.
    ctx: AppContext,

    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Receives events raised by panels and the realtime transport.
    event_receiver: mpsc::Receiver<UiEvent>,

    /// Events of this session, oldest first.
    activity_logs: VecDeque<UiEvent>,

    toasts: ToastStack,

    /// Whether to paint a background color
    with_background_color: bool,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(ctx: AppContext, event_receiver: mpsc::Receiver<UiEvent>, ui_config: UIConfig) -> Self {
        let mut app = Self {
            ctx,
            current_screen: Screen::Landing,
            event_receiver,
            activity_logs: VecDeque::new(),
            toasts: ToastStack::default(),
            with_background_color: ui_config.with_background_color,
        };
        if let Some(portal) = ui_config.initial_portal {
            app.open(portal);
        }
        app
    }

    pub fn screen(&self) -> &Screen {
        &self.current_screen
    }

    pub fn activity_logs(&self) -> &VecDeque<UiEvent> {
        &self.activity_logs
    }

    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    pub fn open(&mut self, portal: Portal) {
        log::info!("Opening {:?} portal", portal);
        self.current_screen = match portal {
            Portal::Creator => Screen::Creator(Box::new(CreatorState::new(self.ctx.clone()))),
            Portal::Developer => {
                Screen::Developer(Box::new(DeveloperState::new(self.ctx.clone())))
            }
        };
    }

    /// Back to the landing screen. Every panel is dropped and the session's
    /// toasts and activity are discarded. Background work the dropped panels
    /// started may still finish; its events are ignored.
    pub fn go_home(&mut self) {
        self.current_screen = Screen::Landing;
        self.ctx.events = self.ctx.events.next_session();
        self.activity_logs.clear();
        self.toasts.clear();
    }

    pub fn add_event(&mut self, event: UiEvent) {
        if event.is_toast() {
            self.toasts.push(event.clone());
        }
        if self.activity_logs.len() >= MAX_ACTIVITY_LOGS {
            self.activity_logs.pop_front();
        }
        self.activity_logs.push_back(event);
    }

    /// Applies queued events and finished background work.
    pub fn tick(&mut self) {
        let session = self.ctx.events.session();
        while let Ok(event) = self.event_receiver.try_recv() {
            // Realtime notices describe the shared connection, not a session.
            if event.session < session && event.source != Source::Realtime {
                log::debug!("Dropping event from an earlier session: {}", event);
                continue;
            }
            self.add_event(event);
        }
        self.toasts.expire(Instant::now());
        match &mut self.current_screen {
            Screen::Landing => {}
            Screen::Creator(state) => state.tick(),
            Screen::Developer(state) => state.tick(),
        }
    }

    fn captures_input(&self) -> bool {
        match &self.current_screen {
            Screen::Landing => false,
            Screen::Creator(state) => state.captures_input(),
            Screen::Developer(state) => state.captures_input(),
        }
    }

    /// Handles one key press. Returns `true` when the application should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        if self.captures_input() {
            match &mut self.current_screen {
                Screen::Landing => {}
                Screen::Creator(state) => state.handle_key(key),
                Screen::Developer(state) => state.handle_key(key),
            }
            return false;
        }

        match &mut self.current_screen {
            Screen::Landing => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return true,
                KeyCode::Char('c') => self.open(Portal::Creator),
                KeyCode::Char('d') => self.open(Portal::Developer),
                _ => {}
            },
            Screen::Creator(state) => match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('h') => self.go_home(),
                KeyCode::Tab => state.next_section(),
                KeyCode::BackTab => state.previous_section(),
                _ => state.handle_key(key),
            },
            Screen::Developer(state) => match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Char('h') => self.go_home(),
                KeyCode::Tab => state.next_section(),
                KeyCode::BackTab => state.previous_section(),
                _ => state.handle_key(key),
            },
        }
        false
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| render(f, &app))?;

        // Poll for key events
        if event::poll(tick())? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }
                if app.handle_key(key) {
                    return Ok(());
                }
            }
        }

        // Let spawned backend calls make progress between frames.
        tokio::task::yield_now().await;
    }
}

/// Renders the current screen based on the application state.
pub fn render(f: &mut Frame, app: &App) {
    let area: Rect = f.area();
    if app.with_background_color {
        f.render_widget(
            Block::default().style(Style::default().bg(Color::Rgb(16, 20, 24))),
            area,
        );
    }
    let view_ctx = ViewContext {
        activity: &app.activity_logs,
    };
    match &app.current_screen {
        Screen::Landing => render_landing(f, area),
        Screen::Creator(state) => render_creator(f, area, state, &view_ctx),
        Screen::Developer(state) => render_developer(f, area, state, &view_ctx),
    }
    render_toasts(f, area, &app.toasts);
}
