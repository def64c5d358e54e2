mod backend;
mod cli_messages;
mod config;
mod console;
mod consts;
mod context;
mod environment;
mod events;
mod logging;
mod panel;
mod realtime;
mod resources;
#[cfg(test)]
mod test_utils;
mod ui;

use crate::backend::client::BackendClient;
use crate::backend::sql::{SqlOutcome, run_sql};
use crate::config::{Config, get_config_dir, get_config_path};
use crate::context::AppContext;
use crate::environment::Environment;
use crate::events::EventSender;
use crate::panel::clipboard::Osc52Clipboard;
use crate::realtime::{ChangeFeed, RealtimeClient};
use crate::ui::{Portal, UIConfig};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::path::Path;
use std::sync::Arc;
use std::{error::Error, io};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Terminal console for the site builder backend
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

/// Connection overrides. Each falls back to its environment variable, then to the config file.
#[derive(clap::Args, Debug, Default)]
struct Connection {
    /// Backend base URL, or `local`
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,

    /// Backend API key
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the console
    Start {
        /// Open a portal directly instead of the landing screen
        #[arg(long, value_enum)]
        portal: Option<Portal>,

        /// Reload lists only on demand instead of following backend changes
        #[arg(long)]
        no_realtime: bool,

        /// Paint a background color behind the UI
        #[arg(long)]
        with_background: bool,

        #[command(flatten)]
        connection: Connection,
    },
    /// Run one SQL statement through `execute_sql` and print the result
    Query {
        /// Statement to run
        #[arg(long, value_name = "SQL")]
        sql: String,

        #[command(flatten)]
        connection: Connection,
    },
    /// Save the backend URL and API key
    Configure {
        /// Backend base URL, or `local`
        #[arg(long, value_name = "URL", default_value = "local")]
        backend_url: String,

        /// Backend API key
        #[arg(long, value_name = "KEY")]
        api_key: String,
    },
    /// Clear the saved configuration.
    Logout,
}

fn load_stored(config_path: &Path) -> Option<Config> {
    if !config_path.exists() {
        return None;
    }
    match Config::load_from_file(config_path) {
        Ok(config) => Some(config),
        Err(e) => {
            print_cmd_warn!("Ignoring unreadable config file", "{}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config_path = get_config_path()?;
    let args = Args::parse();
    match args.command {
        Command::Start {
            portal,
            no_realtime,
            with_background,
            connection,
        } => {
            let (environment, api_key) = Config::resolve(
                load_stored(&config_path),
                connection.backend_url,
                connection.api_key,
            )
            .map_err(|e| e.to_string())?;
            logging::init_file_logging(&get_config_dir()?.join("console.log"))?;
            start(
                environment,
                api_key,
                !no_realtime,
                UIConfig::new(with_background, portal),
            )
            .await
        }
        Command::Query { sql, connection } => {
            logging::init_stderr_logging();
            let (environment, api_key) = Config::resolve(
                load_stored(&config_path),
                connection.backend_url,
                connection.api_key,
            )
            .map_err(|e| e.to_string())?;
            query(environment, api_key, &sql).await
        }
        Command::Configure {
            backend_url,
            api_key,
        } => {
            let environment = backend_url
                .parse::<Environment>()
                .map_err(|_| config::ConfigError::InvalidBackendUrl(backend_url.clone()).to_string())?;
            Config::new(backend_url.trim().to_string(), api_key)
                .save(&config_path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            print_cmd_success!(
                "Configuration saved",
                "{} ({})",
                config_path.display(),
                environment.backend_url()
            );
            Ok(())
        }
        Command::Logout => {
            print_cmd_info!("Logging out", "clearing {}", config_path.display());
            Config::clear(&config_path).map_err(Into::into)
        }
    }
}

/// Runs one statement and prints the rows, or the embedded error with a failing exit code.
async fn query(environment: Environment, api_key: String, sql: &str) -> Result<(), Box<dyn Error>> {
    let client = BackendClient::new(environment, api_key)?;
    match run_sql(&client, sql).await {
        Ok(SqlOutcome::Rows(rows)) => {
            println!("{}", rows.to_text());
            print_cmd_success!("Query finished", "{} row(s)", rows.rows.len());
            Ok(())
        }
        Ok(SqlOutcome::Failed(message)) => {
            print_cmd_error!("Query failed", &message);
            std::process::exit(1);
        }
        Err(e) => {
            print_cmd_error!("Request failed", &e.to_string());
            std::process::exit(1);
        }
    }
}

/// Starts the console UI.
///
/// # Arguments
/// * `environment` - The backend to connect to.
/// * `api_key` - Key used for REST calls and the realtime socket.
/// * `realtime` - Whether panels follow backend changes.
/// * `ui_config` - Presentation options.
async fn start(
    environment: Environment,
    api_key: String,
    realtime: bool,
    ui_config: UIConfig,
) -> Result<(), Box<dyn Error>> {
    log::info!("Starting console against {}", environment);
    let (events, event_receiver) = EventSender::channel();
    let feed = realtime.then(|| {
        Arc::new(RealtimeClient::new(&environment, &api_key).with_events(events.clone()))
            as Arc<dyn ChangeFeed>
    });
    let backend = Arc::new(BackendClient::new(environment, api_key)?);
    let ctx = AppContext::new(backend, feed, events, Arc::new(Osc52Clipboard));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Initialize the terminal with Crossterm backend.
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = ui::App::new(ctx, event_receiver, ui_config);
    let res = ui::run(&mut terminal, app).await;

    // Clean up the terminal after running the application.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    log::info!("Console closed");
    Ok(())
}
