//! Terminal UI for Strictly Chess

#![warn(missing_docs)]

mod app;
mod input;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

use crate::client::{GameService, RestChessClient};
use crate::config::ClientConfig;
use crate::controller::Event;

use app::App;

const INPUT_POLL: Duration = Duration::from_millis(10);
const IDLE_TICK: Duration = Duration::from_millis(10);
const DEFAULT_LOG_FILTER: &str = "info,strictly_chess=debug";

/// Run the interactive board against the configured service.
pub async fn run_tui(config: ClientConfig) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(config.log_file())?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(base_url = %config.base_url(), "Starting Strictly Chess TUI");
    let service = Arc::new(RestChessClient::new(&config)?);
    service.load_session(config.session_file())?;

    enable_raw_mode()?;
    let mut terminal = restore_on_error(enter_terminal, leave_terminal)?;

    let res = run_app(&mut terminal, Arc::clone(&service)).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = service.save_session(config.session_file()) {
        warn!(error = %err, "Failed to save session");
    }
    if let Err(err) = &res {
        error!(error = ?err, "TUI loop error");
    }
    res
}

fn enter_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Best-effort undo of raw mode and the alternate screen.
fn leave_terminal() {
    if let Err(err) = disable_raw_mode() {
        warn!(error = %err, "Failed to disable raw mode");
    }
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture) {
        warn!(error = %err, "Failed to leave alternate screen");
    }
}

/// Runs `setup`, calling `restore` if it fails.
fn restore_on_error<T>(
    setup: impl FnOnce() -> io::Result<T>,
    restore: impl FnOnce(),
) -> io::Result<T> {
    setup().inspect_err(|err| {
        error!(error = %err, "Terminal setup failed");
        restore();
    })
}

#[instrument(skip_all)]
async fn run_app<S: GameService + 'static>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    service: Arc<S>,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut app = App::new(service, event_tx);
    app.handle_event(Event::Started);

    loop {
        let mut grid = ratatui::layout::Rect::default();
        terminal.draw(|frame| {
            grid = ui::panels(frame.area()).grid;
            ui::draw(frame, app.controller(), app.cursor());
        })?;

        if event::poll(INPUT_POLL)? {
            match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key.code),
                TermEvent::Mouse(mouse) => app.on_mouse(mouse, grid),
                _ => {}
            }
        }
        if app.should_quit() {
            info!("Leaving TUI");
            return Ok(());
        }

        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        // Spawned requests only progress while this task is parked.
        tokio::time::sleep(IDLE_TICK).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn failed_setup_restores_terminal() {
        let restored = Cell::new(false);
        let result: io::Result<()> = restore_on_error(
            || Err(io::Error::other("no tty")),
            || restored.set(true),
        );
        assert!(result.is_err());
        assert!(restored.get());
    }

    #[test]
    fn successful_setup_leaves_terminal_alone() {
        let restored = Cell::new(false);
        let result = restore_on_error(|| Ok(5), || restored.set(true));
        assert_eq!(result.unwrap(), 5);
        assert!(!restored.get());
    }
}
