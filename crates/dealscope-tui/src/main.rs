use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

mod action;
mod app;
mod backend;
mod input;
mod theme;
mod tui_event;
mod view;

use action::Action;
use app::App;
use backend::Command;

/// Dealscope - interactive workbench for remote startup document analysis.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Documents to stage on startup
    files: Vec<PathBuf>,

    /// Analysis service endpoint (falls back to DEALSCOPE_API_URL)
    #[arg(long)]
    endpoint: Option<String>,

    /// Business sector hint passed to the service
    #[arg(long)]
    sector: Option<String>,

    /// Funding stage hint passed to the service
    #[arg(long)]
    stage: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Validate any file paths provided on the command line
    for path in &args.files {
        if !path.exists() {
            anyhow::bail!("file not found: {}", path.display());
        }
    }

    // Resolve the endpoint from CLI flag > env var; it can also be entered
    // interactively once the TUI is up.
    let endpoint = args
        .endpoint
        .clone()
        .or_else(|| std::env::var("DEALSCOPE_API_URL").ok());

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(endpoint.clone(), args.sector.clone(), args.stage.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    // Stage files given on the command line
    for path in args.files.clone() {
        backend::execute(Command::LoadFile { path }, tx.clone(), cancel.clone());
    }
    // A prefilled endpoint gets probed immediately
    if endpoint.is_some() {
        if let Some(cmd) = app.update(Action::TestConnection, Instant::now()) {
            backend::execute(cmd, tx.clone(), cancel.clone());
        }
    }

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        // Draw
        terminal.draw(|f| app.view(f))?;

        // Poll for events with timeout for tick
        let timeout = tick_rate;

        tokio::select! {
            // Backend events (non-blocking drain)
            maybe_event = rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event, Instant::now());
                    // Drain any additional queued backend events
                    while let Ok(evt) = rx.try_recv() {
                        app.handle_backend_event(evt, Instant::now());
                    }
                }
            }
            // Terminal input events
            _ = async {
                if event::poll(timeout).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let action = input::map_event(&evt, app.input_mode);
                        if let Some(cmd) = app.update(action, Instant::now()) {
                            backend::execute(cmd, tx.clone(), cancel.clone());
                        }
                    }
                }
            } => {}
        }

        // Process tick
        let _ = app.update(Action::Tick, Instant::now());

        if app.should_quit || cancel.is_cancelled() {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
