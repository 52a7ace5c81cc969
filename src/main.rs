mod app;
mod check;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::UiEvent;
use anyhow::Context;
use bracket_engine::{MatchupKey, loader};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{LevelFilter, info};
use std::io::Stdout;
use std::path::Path;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

/// Used until `DEALTUI_LOG` says otherwise.
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args()? {
        return Ok(());
    }

    better_panic::install();

    tui_logger::init_logger(DEFAULT_LOG_LEVEL)?;
    tui_logger::set_default_level(DEFAULT_LOG_LEVEL);

    // Bad bracket data is reported before the terminal is taken over.
    let settings = AppSettings::load();
    let bracket = loader::load(settings.bracket_path.as_deref())
        .context("failed to load bracket")?;
    info!(
        "loaded '{}': {} rounds, {} matchups",
        bracket.title(),
        bracket.round_count(),
        bracket.matchup_count()
    );

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (deal_tx, deal_rx) = mpsc::channel::<MatchupKey>(100);

    let app = Arc::new(Mutex::new(App::new(settings, bracket, deal_tx)));

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Animation tick thread, 80ms ≈ 12.5 FPS
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(80));
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });
    drop(ui_event_tx);

    main_ui_loop(terminal, app, ui_event_rx, deal_rx).await;

    input_handler.abort();
    animation_task.abort();
    cleanup_terminal();

    Ok(())
}

fn handle_cli_args() -> anyhow::Result<bool> {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return Ok(false);
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            Ok(true)
        }
        "-V" | "--version" => {
            println!("dealtui {}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
        "--check" => {
            let Some(path) = args.next() else {
                eprintln!("--check needs a bracket path\n\n{}", usage_text());
                std::process::exit(2);
            };
            let report = check::check_bracket(Path::new(&path));
            println!("{}", serde_json::to_string_pretty(&report)?);
            std::process::exit(if report.ok { 0 } else { 1 });
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "dealtui - deal out a tournament bracket one matchup at a time

Usage:
  dealtui
  dealtui --check <path>
  dealtui --help
  dealtui --version

Environment:
  DEALTUI_BRACKET_JSON   Path to a bracket JSON document (default: bundled sample)
  DEALTUI_DEAL_MS        Deal animation length in milliseconds (default 2000)
  DEALTUI_LOG            Log level: off, error, warn, info, debug, trace (default warn)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    mut deal_completions: mpsc::Receiver<MatchupKey>,
) {
    {
        let mut app_guard = app.lock().await;
        draw::draw(&mut terminal, &mut app_guard);
    }

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                if handle_ui_event(ui_event, &app).await {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard);
                }
            }

            Some(key) = deal_completions.recv() => {
                let mut app_guard = app.lock().await;
                app_guard.on_deal_completed(key);
                draw::draw(&mut terminal, &mut app_guard);
            }

            else => break,
        }
    }
}

async fn handle_ui_event(ui_event: UiEvent, app: &Arc<Mutex<App>>) -> bool {
    match ui_event {
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            guard.advance_animation();
            true
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Restore the terminal. Best effort, it also runs from the panic hook.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
