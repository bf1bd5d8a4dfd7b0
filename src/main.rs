mod audio;
mod backend;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod platform;
mod search;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use audio::{MediaListener, RodioOutput};
use backend::{LocalIdentity, LocalStore};
use controller::{AppController, AppEvent, Services};
use model::{AppModel, PlaybackEngine, Player};
use platform::{FullscreenListener, TerminalFullscreen};
use search::ItunesClient;
use view::AppView;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Music App Starting ===");

    let config = config::load();
    let data_dir = config.data_dir();
    tracing::info!(data_dir = %data_dir.display(), "Using data directory");

    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let search = Arc::new(ItunesClient::new(&config.search)?);
    let identity = Arc::new(LocalIdentity::new(&data_dir, config.account.clone()));
    let store = Arc::new(LocalStore::new(&data_dir));

    let media_events = events_tx.clone();
    let media_listener: MediaListener = Arc::new(move |event| {
        AppController::send(&media_events, AppEvent::Media(event));
    });
    let http_client = reqwest::Client::builder()
        .user_agent(concat!("music-app-rs/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let output = RodioOutput::new(http_client, media_listener)?;

    let fullscreen_events = events_tx.clone();
    let fullscreen_listener: FullscreenListener = Arc::new(move |active| {
        AppController::send(&fullscreen_events, AppEvent::FullscreenChanged(active));
    });
    let fullscreen = TerminalFullscreen::new(config.ui.native_fullscreen, fullscreen_listener);

    let engine = PlaybackEngine::new(Box::new(output), config.audio.volume);
    let notification_ttl = Duration::from_secs(config.ui.notification_secs);
    let app_model = AppModel::new(Player::new(engine), notification_ttl);

    let services = Services {
        search,
        identity,
        store,
        fullscreen: Box::new(fullscreen),
    };
    let mut controller = AppController::new(app_model, services, config, events_tx);
    controller.start();

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (cols, rows) = crossterm::terminal::size()?;
    controller.on_resize(cols, rows);

    let res = run_app(&mut terminal, &mut controller, events_rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Music App shutting down");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut AppController,
    mut events: UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    loop {
        // Apply everything the background tasks finished since the last frame
        while let Ok(event) = events.try_recv() {
            controller.handle_event(event);
        }
        controller.tick();

        terminal.draw(|f| AppView::render(f, controller.model()))?;

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => controller.handle_key_event(key),
                Event::Resize(cols, rows) => controller.on_resize(cols, rows),
                _ => {}
            }
        }

        if controller.should_quit() {
            break;
        }
    }

    Ok(())
}
