use trw::api;
use trw::app;
use trw::cli;
use trw::events;
use trw::input;
use trw::tui;

use api::client::ApiClient;
use api::fetcher;
use app::AppState;
use clap::Parser;
use cli::Cli;
use color_eyre::eyre::{eyre, Result};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use events::{AppEvent, EventHandler};
use input::{Action, InputContext};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::{Duration, Instant};

fn setup_verbose_logging() -> Result<()> {
    let state_dir = state_dir_or_fallback();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    tracing::info!(
        "trw v{} starting with verbose logging",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

fn state_dir_or_fallback() -> std::path::PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        std::path::PathBuf::from(state).join("trw")
    } else if let Some(home) = std::env::var_os("HOME") {
        std::path::PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("trw")
    } else {
        std::path::PathBuf::from("/tmp/trw")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    let client = ApiClient::new(&args.base_url)?;
    let mut state = AppState::new(args.base_url.clone());

    // Setup terminal with panic hook
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Event handler
    let events = EventHandler::new(Duration::from_millis(100));
    let tx = events.sender();

    // First page
    state.begin_load(app::PAGE_SIZE);
    {
        let client = client.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            fetcher::fetch_runs(client, app::PAGE_SIZE, tx).await;
        });
    }

    let result = run_app(&mut terminal, &mut state, events, &tx, &client).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    mut events: EventHandler,
    tx: &tokio::sync::mpsc::UnboundedSender<AppEvent>,
    client: &ApiClient,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| tui::render::render(f, state))?;

        // Announcements clear themselves; stale errors age out
        state.announcer.prune_expired();
        state.prune_error();

        if let Some(event) = events.next().await {
            match event {
                AppEvent::Key(key) => {
                    let ctx = InputContext {
                        has_error: state.error.is_some(),
                        is_loading: state.is_loading(),
                    };
                    match input::map_key(key, &ctx) {
                        Action::Quit => state.should_quit = true,
                        Action::DismissError => state.clear_error(),
                        Action::MoveUp => state.move_cursor_up(),
                        Action::MoveDown => state.move_cursor_down(),
                        Action::Toggle => {
                            if let Some(id) = state.selected_run_id().map(ToString::to_string) {
                                if let Some(run_id) = state.toggle_details(&id) {
                                    let client = client.clone();
                                    let tx = tx.clone();
                                    tokio::spawn(async move {
                                        fetcher::fetch_detail_for_run(client, run_id, tx).await;
                                    });
                                }
                            }
                        }
                        Action::Collapse => {
                            if let Some(id) = state.selected_run_id().map(ToString::to_string) {
                                state.collapse_details(&id);
                            }
                        }
                        Action::Refresh => {
                            let limit = state.limit;
                            state.begin_load(limit);
                            let client = client.clone();
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                fetcher::fetch_runs(client, limit, tx).await;
                            });
                        }
                        Action::LoadMore => {
                            if let Some(limit) = state.request_more() {
                                state.begin_load(limit);
                                let client = client.clone();
                                let tx = tx.clone();
                                tokio::spawn(async move {
                                    fetcher::fetch_runs(client, limit, tx).await;
                                });
                            }
                        }
                        Action::QuickSelect(n) => state.quick_select(n),
                        Action::None => {}
                    }
                }
                AppEvent::Tick => {
                    if last_tick.elapsed() >= Duration::from_millis(100) {
                        state.advance_spinner();
                        last_tick = Instant::now();
                    }
                }
                AppEvent::RunsResult(runs) => {
                    state.apply_runs(runs);
                }
                AppEvent::RunsError(reason) => {
                    state.apply_load_error(&reason);
                }
                AppEvent::DetailResult { run_id, detail } => {
                    state.apply_detail(&run_id, detail);
                }
                AppEvent::DetailError { run_id } => {
                    state.apply_detail_error(&run_id);
                }
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}
