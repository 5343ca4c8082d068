//! keygate - terminal admin console guarded by a session credential gate.
//!
//! In hosted mode the console asks for the admin API key before showing
//! anything that talks to the admin server. In desktop mode the gate is
//! always open.

mod app;
mod texts;
mod ui;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use keygate_core::Config;

use app::{App, AppState, Root};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file prefix inside `<data dir>/logs`
const LOG_FILE_PREFIX: &str = "keygate.log";

/// Why `run_app` returned
enum Exit {
    Quit,
    Reload,
}

/// Initialize the tracing subscriber for logging.
///
/// The terminal belongs to the UI, so logs go to a daily file. Use the
/// RUST_LOG env var to control log level (e.g., RUST_LOG=debug).
fn init_tracing(data_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(data_dir.join("logs"), LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let data_dir = Config::data_dir()?;
    let _log_guard = init_tracing(&data_dir);
    info!(data_dir = %data_dir.display(), "keygate starting");

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        let mut config = Config::default();
        config.apply_env();
        config
    });
    let root = Root::new(config, data_dir);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &root);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("keygate shutting down");
    Ok(())
}

/// Build an `App` and drive it, rebuilding it whenever the gate asks for a
/// reload.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, root: &Root) -> Result<()> {
    loop {
        let mut app = App::new(root)?;
        app.refresh_accounts();

        match run_app(terminal, &mut app, root)? {
            Exit::Quit => return Ok(()),
            Exit::Reload => info!("Reloading application"),
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    root: &Root,
) -> Result<Exit> {
    loop {
        app.sync_gate();
        app.check_background_tasks();

        // Draw UI
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(Exit::Quit);
                }

                if handle_input(app, key)? {
                    return Ok(Exit::Quit);
                }
            }
        }

        if root.reload.take() {
            return Ok(Exit::Reload);
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(Exit::Quit);
        }
    }
}
