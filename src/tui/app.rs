//! Application state and logic.

use std::sync::Arc;

use crossterm::event::{KeyCode, MouseEvent};
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::chess::Square;
use crate::client::GameService;
use crate::controller::{Controller, Event};
use crate::driver::spawn_command;

use super::input::{KeyAction, clicked_square, key_action};

/// Main application state.
///
/// Owns the controller and the keyboard cursor. Commands the controller
/// emits are spawned onto the runtime; their outcomes come back through
/// the channel handed to [`App::new`].
pub struct App<S> {
    controller: Controller,
    cursor: Square,
    service: Arc<S>,
    events: mpsc::UnboundedSender<Event>,
    should_quit: bool,
}

impl<S: GameService + 'static> App<S> {
    /// Creates a new application.
    pub fn new(service: Arc<S>, events: mpsc::UnboundedSender<Event>) -> Self {
        Self {
            controller: Controller::new(),
            // White's king file on the first rank.
            cursor: Square::new(7, 4),
            service,
            events,
            should_quit: false,
        }
    }

    /// Gets the controller.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Gets the keyboard cursor.
    pub fn cursor(&self) -> Square {
        self.cursor
    }

    /// Whether the user asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Feeds an event to the controller and launches whatever it asks for.
    #[instrument(skip(self, event))]
    pub fn handle_event(&mut self, event: Event) {
        for command in self.controller.dispatch(event) {
            debug!(?command, "Spawning command");
            spawn_command(Arc::clone(&self.service), command, self.events.clone());
        }
    }

    /// Handles a key press.
    pub fn on_key(&mut self, key: KeyCode) {
        match key_action(key, self.cursor) {
            KeyAction::Quit => {
                debug!("User quit");
                self.should_quit = true;
            }
            KeyAction::MoveCursor(square) => self.cursor = square,
            KeyAction::Dispatch(event) => self.handle_event(event),
            KeyAction::Ignore => {}
        }
    }

    /// Handles a mouse event over a frame whose board rows occupy `grid`.
    pub fn on_mouse(&mut self, mouse: MouseEvent, grid: Rect) {
        if let Some(square) = clicked_square(mouse, grid) {
            self.cursor = square;
            self.handle_event(Event::CellClicked(square));
        }
    }
}
