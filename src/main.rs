//! posts-view — a terminal viewer for a user's posts.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────────┐ ViewState ┌──────────┐  draw()  ┌──────────┐
//! │ lifecycle.rs │ ────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (one task    │  (watch)  │ (state)  │          │ (render) │
//! │  per cycle)  │ ◄──────── └──────────┘          └──────────┘
//! └──────────────┘ observe()      ▲
//!        │                        │ handle_key_event()
//!        ▼                   ┌──────────┐
//! ┌──────────────┐           │ input.rs │
//! │  source/     │           └──────────┘
//! │ (transport)  │
//! └──────────────┘
//! ```
//!
//! * **`source/`** — the `Transport` trait plus the HTTP and flaky
//!   implementations.
//! * **`lifecycle`** — fetches a user's posts, one cycle per user change,
//!   and drops the result of any cycle that was superseded or abandoned.
//! * **`state`** — the published `ViewState` and its display priority.
//! * **`app`** — owns UI state (selected user, scroll position, status).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`config`** — config file and command-line flags.
//! * **`main`** — wires everything together: parse args, set up logging,
//!   the runtime and the terminal, and run the event loop.

mod app;
mod config;
mod error;
mod input;
mod lifecycle;
mod model;
mod source;
mod state;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use config::{Cli, Config};
use lifecycle::PostsController;
use source::{FlakyTransport, HttpTransport, Transport};

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the default hook prints a panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Setup
// ---------------------------------------------------------------------------

/// Log to a file; stdout is the UI.  `RUST_LOG` overrides the `info` default.
fn init_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn build_transport(config: &Config) -> Result<Arc<dyn Transport>> {
    let http: Arc<dyn Transport> = Arc::new(
        HttpTransport::new(config.request_timeout()).context("building HTTP client")?,
    );
    if config.flaky.enabled {
        return Ok(Arc::new(FlakyTransport::new(http, &config.flaky)));
    }
    Ok(http)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    init_tracing(&config.log_path())?;
    info!(base_url = %config.base_url, flaky = config.flaky.enabled, users = config.users.len(), "starting");

    let runtime = Runtime::new().context("failed to initialise Tokio runtime")?;
    let transport = build_transport(&config)?;
    let controller =
        PostsController::new(runtime.handle().clone(), transport, config.base_url.clone());

    install_panic_hook();
    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(config.users.clone(), controller);

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Pull the latest state from the controller.
    //   2. Render the UI.
    //   3. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        app.sync();

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    app.shutdown();
    drop(app);
    runtime.shutdown_timeout(Duration::from_millis(200));
    info!("exiting");

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
