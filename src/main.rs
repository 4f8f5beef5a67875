//! Recipe Search - Search recipes and browse them from a local cache
//!
//! A terminal UI application that searches a recipe API, caches every result
//! in SQLite, and pages through results and recipe details.

use std::fs::{self, OpenOptions};
use std::io;
use std::panic;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use recipe_search::app::{App, AppState};
use recipe_search::cli::{Cli, StartupConfig};
use recipe_search::ui;

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Sends tracing output to `<log_dir>/recipe-search.log`.
///
/// The TUI owns stdout, so logs never go to the terminal. Filtering follows
/// `RUST_LOG`, defaulting to `info`.
fn init_tracing(log_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("recipe-search.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match &app.state {
        AppState::RecipeList => {
            ui::render_recipe_list(frame, app);
        }
        AppState::RecipeDetail(recipe_id) => {
            ui::render_recipe_detail(frame, app, *recipe_id);
        }
    }

    ui::render_dialog(frame, app.active_dialogs());

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(2);
        }
    };

    if let Some(log_dir) = config.resolve_log_dir() {
        if let Err(e) = init_tracing(&log_dir) {
            eprintln!("warning: logging disabled: {}", e);
        }
    }
    info!(
        base_url = %config.base_url,
        network_available = config.network_available,
        "recipe-search starting"
    );

    // Open the cache before touching the terminal so errors print normally
    let mut app = App::from_config(&config)?;
    if config.token.is_none() && config.network_available {
        warn!("no API token configured; requests may be rejected");
    }

    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Trigger initial data load
    app.start(&config);

    // Main event loop
    loop {
        // Fold in whatever the use cases have emitted
        app.poll();

        // Render UI
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    info!("recipe-search exiting");

    Ok(())
}
