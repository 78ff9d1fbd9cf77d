//! Selection and synchronization state machine.
//!
//! [`Controller`] never touches the network. Input arrives as [`Event`]s,
//! and [`Controller::dispatch`] answers with the [`Command`]s the caller must
//! carry out (fetch legal moves, submit a move, schedule a notice clear...).
//! Results of those commands come back as further events. This keeps every
//! transition testable without a terminal or a server.
//!
//! Every request carries a sequence number. A response is applied only if
//! its number still matches the state that issued it; anything else is a
//! superseded response and is dropped.

use std::collections::HashSet;
use std::time::Duration;

use strum::Display;
use tracing::{debug, info, instrument, warn};

use crate::chess::{BoardSnapshot, GameSnapshot, Side, Square};
use crate::client::ServiceError;
use crate::notice::{Notice, NoticeBoard};
use crate::render::{VisualCell, render};
use crate::session_log::MoveHistory;

const MOVE_OK: (&str, u64) = ("Move successful!", 1000);
const MOVE_FAILED: (&str, u64) = ("Error making move. Please try again.", 2000);
const MOVES_FAILED: (&str, u64) = ("Could not load moves. Please try again.", 2000);
const SYNC_FAILED: (&str, u64) = ("Error loading game. Press 's' to retry.", 3000);
const GAME_OP_OK_MS: u64 = 1500;
const GAME_OP_FAILED_MS: u64 = 2000;

/// Where the user is in picking a move.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing selected.
    #[default]
    Idle,
    /// A piece was clicked and its legal moves are being fetched.
    AwaitingMoves {
        /// Clicked square.
        square: Square,
        /// Sequence number of the fetch.
        request: u64,
    },
    /// A piece is selected and its destinations are highlighted.
    Selected {
        /// Selected square.
        square: Square,
        /// Destinations from the latest legal-moves response for `square`.
        destinations: HashSet<Square>,
    },
    /// A move was sent and the service has not answered yet.
    Submitting {
        /// Origin.
        from: Square,
        /// Destination.
        to: Square,
        /// Sequence number of the submission.
        request: u64,
    },
}

impl Selection {
    /// The square drawn as selected.
    pub fn selected_square(&self) -> Option<Square> {
        match self {
            Selection::Idle => None,
            Selection::AwaitingMoves { square, .. } | Selection::Selected { square, .. } => {
                Some(*square)
            }
            Selection::Submitting { from, .. } => Some(*from),
        }
    }

    /// Squares drawn as valid destinations. Empty outside `Selected`.
    pub fn destinations(&self) -> HashSet<Square> {
        match self {
            Selection::Selected { destinations, .. } => destinations.clone(),
            _ => HashSet::new(),
        }
    }
}

/// Whole-game operations that replace the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum GameOp {
    /// Start a new game.
    #[strum(serialize = "new game")]
    NewGame,
    /// Reset the current game.
    #[strum(serialize = "reset")]
    Reset,
}

impl GameOp {
    fn success_text(self) -> &'static str {
        match self {
            GameOp::NewGame => "New game started!",
            GameOp::Reset => "Game reset!",
        }
    }

    fn failure_text(self) -> &'static str {
        match self {
            GameOp::NewGame => "Error starting new game. Please try again.",
            GameOp::Reset => "Error resetting game. Please try again.",
        }
    }
}

/// Input to the state machine.
#[derive(Debug, Clone)]
pub enum Event {
    /// Controller came up; load the game.
    Started,
    /// User asked to reload board and info.
    ResyncRequested,
    /// User clicked a cell.
    CellClicked(Square),
    /// User asked for a new game.
    NewGameRequested,
    /// User asked to reset the game.
    ResetRequested,
    /// A [`Command::Sync`] finished.
    Synced {
        /// Sequence number of the sync.
        request: u64,
        /// Outcome.
        result: Result<GameSnapshot, ServiceError>,
    },
    /// A [`Command::FetchLegalMoves`] finished.
    LegalMovesLoaded {
        /// Sequence number of the fetch.
        request: u64,
        /// Outcome.
        result: Result<HashSet<Square>, ServiceError>,
    },
    /// A [`Command::SubmitMove`] finished.
    MoveResolved {
        /// Sequence number of the submission.
        request: u64,
        /// Outcome.
        result: Result<GameSnapshot, ServiceError>,
    },
    /// A [`Command::RunGameOp`] finished.
    GameOpResolved {
        /// Sequence number of the operation.
        request: u64,
        /// Outcome.
        result: Result<GameSnapshot, ServiceError>,
    },
    /// The auto-clear timer of a notice fired.
    NoticeExpired(u64),
}

/// Work the caller must perform on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch board and info, answer with [`Event::Synced`].
    Sync {
        /// Sequence number to echo back.
        request: u64,
    },
    /// Fetch legal moves, answer with [`Event::LegalMovesLoaded`].
    FetchLegalMoves {
        /// Sequence number to echo back.
        request: u64,
        /// Square to query.
        square: Square,
    },
    /// Submit a move, answer with [`Event::MoveResolved`].
    SubmitMove {
        /// Sequence number to echo back.
        request: u64,
        /// Origin.
        from: Square,
        /// Destination.
        to: Square,
    },
    /// Run a new-game or reset request, answer with [`Event::GameOpResolved`].
    RunGameOp {
        /// Sequence number to echo back.
        request: u64,
        /// Which operation.
        op: GameOp,
    },
    /// After `after`, send [`Event::NoticeExpired`] with `id`.
    ClearNoticeAfter {
        /// Notice to clear.
        id: u64,
        /// Delay.
        after: Duration,
    },
}

/// Client-side game state: the last authoritative snapshot plus everything
/// the user is doing on top of it.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    game: Option<GameSnapshot>,
    selection: Selection,
    history: MoveHistory,
    notices: NoticeBoard,
    pending_sync: Option<u64>,
    pending_game_op: Option<(GameOp, u64)>,
    last_request: u64,
}

impl Controller {
    /// Controller with no game loaded. Dispatch [`Event::Started`] to load one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller that already holds `game`, as after a successful sync.
    pub fn with_game(game: GameSnapshot) -> Self {
        Self {
            game: Some(game),
            ..Self::default()
        }
    }

    /// Last authoritative snapshot.
    pub fn game(&self) -> Option<&GameSnapshot> {
        self.game.as_ref()
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Session move log.
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Message on display, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notices.current()
    }

    /// Whether a move, new game or reset is in flight.
    ///
    /// Board clicks and further mutations are ignored while this holds.
    pub fn is_busy(&self) -> bool {
        matches!(self.selection, Selection::Submitting { .. }) || self.pending_game_op.is_some()
    }

    /// Whether the loading indicator should show.
    pub fn is_loading(&self) -> bool {
        self.is_busy() || self.pending_sync.is_some()
    }

    /// Side to move according to the last sync.
    pub fn side_to_move(&self) -> Option<Side> {
        self.game.as_ref().map(|game| *game.info().current_player())
    }

    /// Visual cells for the current state.
    pub fn cells(&self) -> Vec<VisualCell> {
        let empty = BoardSnapshot::empty();
        let board = self.game.as_ref().map_or(&empty, |game| game.board());
        render(
            board,
            &self.selection.destinations(),
            self.selection.selected_square(),
        )
    }

    /// Applies one event and returns the commands it triggers.
    #[instrument(skip(self, event), fields(event = event_name(&event)))]
    pub fn dispatch(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Started | Event::ResyncRequested => self.start_sync(),
            Event::CellClicked(square) => self.click(square),
            Event::NewGameRequested => self.start_game_op(GameOp::NewGame),
            Event::ResetRequested => self.start_game_op(GameOp::Reset),
            Event::Synced { request, result } => self.finish_sync(request, result),
            Event::LegalMovesLoaded { request, result } => self.finish_legal_moves(request, result),
            Event::MoveResolved { request, result } => self.finish_move(request, result),
            Event::GameOpResolved { request, result } => self.finish_game_op(request, result),
            Event::NoticeExpired(id) => {
                self.notices.expire(id);
                Vec::new()
            }
        }
    }

    fn next_request(&mut self) -> u64 {
        self.last_request += 1;
        self.last_request
    }

    fn notify(&mut self, text: impl AsRef<str>, millis: u64) -> Command {
        let notice = self.notices.notify(text, Duration::from_millis(millis));
        Command::ClearNoticeAfter {
            id: *notice.id(),
            after: *notice.duration(),
        }
    }

    /// Replaces the authoritative snapshot. Any sync still in flight was
    /// issued before this state existed, so it is dropped.
    fn adopt(&mut self, game: GameSnapshot) {
        debug!(
            current_player = %game.info().current_player(),
            game_state = %game.info().game_state(),
            move_count = game.info().move_count(),
            "Adopting authoritative snapshot"
        );
        self.game = Some(game);
        self.pending_sync = None;
    }

    fn start_sync(&mut self) -> Vec<Command> {
        if self.is_busy() {
            debug!("Sync ignored while a mutation is in flight");
            return Vec::new();
        }
        let request = self.next_request();
        self.pending_sync = Some(request);
        info!(request, "Syncing with service");
        vec![Command::Sync { request }]
    }

    fn finish_sync(
        &mut self,
        request: u64,
        result: Result<GameSnapshot, ServiceError>,
    ) -> Vec<Command> {
        if self.pending_sync != Some(request) {
            debug!(request, "Dropping superseded sync response");
            return Vec::new();
        }
        self.pending_sync = None;

        match result {
            Ok(game) => {
                self.adopt(game);
                if !matches!(self.selection, Selection::Submitting { .. }) {
                    self.selection = Selection::Idle;
                }
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Sync failed");
                vec![self.notify(SYNC_FAILED.0, SYNC_FAILED.1)]
            }
        }
    }

    /// Whether a click on `square` may start a selection.
    fn owns(&self, square: Square) -> bool {
        let Some(game) = &self.game else {
            return false;
        };
        game.board().side_at(square) == Some(*game.info().current_player())
    }

    fn select(&mut self, square: Square) -> Vec<Command> {
        let request = self.next_request();
        debug!(square = %square, request, "Selecting piece");
        self.selection = Selection::AwaitingMoves { square, request };
        vec![Command::FetchLegalMoves { request, square }]
    }

    fn submit(&mut self, from: Square, to: Square) -> Vec<Command> {
        let request = self.next_request();
        info!(from = %from, to = %to, request, "Submitting move");
        self.selection = Selection::Submitting { from, to, request };
        vec![Command::SubmitMove { request, from, to }]
    }

    fn click(&mut self, square: Square) -> Vec<Command> {
        if self.is_busy() {
            debug!(square = %square, "Click ignored while a mutation is in flight");
            return Vec::new();
        }
        let Some(game) = &self.game else {
            debug!(square = %square, "Click ignored before first sync");
            return Vec::new();
        };
        if game.info().game_state().is_terminal() {
            debug!(square = %square, "Click ignored, game is over");
            return Vec::new();
        }

        match self.selection.clone() {
            Selection::Idle => {
                if self.owns(square) {
                    self.select(square)
                } else {
                    debug!(square = %square, "Click on empty or opponent cell ignored");
                    Vec::new()
                }
            }
            Selection::AwaitingMoves { square: pending, .. } => {
                if pending == square {
                    debug!(square = %square, "Selection withdrawn before moves arrived");
                    self.selection = Selection::Idle;
                    Vec::new()
                } else if self.owns(square) {
                    self.select(square)
                } else {
                    self.submit(pending, square)
                }
            }
            Selection::Selected { square: selected, .. } => {
                if selected == square {
                    debug!(square = %square, "Deselected");
                    self.selection = Selection::Idle;
                    Vec::new()
                } else {
                    self.submit(selected, square)
                }
            }
            Selection::Submitting { .. } => Vec::new(),
        }
    }

    fn finish_legal_moves(
        &mut self,
        request: u64,
        result: Result<HashSet<Square>, ServiceError>,
    ) -> Vec<Command> {
        let square = match self.selection {
            Selection::AwaitingMoves {
                square,
                request: current,
            } if current == request => square,
            _ => {
                debug!(request, "Dropping superseded legal-moves response");
                return Vec::new();
            }
        };

        match result {
            Ok(destinations) => {
                debug!(square = %square, count = destinations.len(), "Destinations highlighted");
                self.selection = Selection::Selected {
                    square,
                    destinations,
                };
                Vec::new()
            }
            Err(e) => {
                warn!(square = %square, error = %e, "Legal moves unavailable");
                self.selection = Selection::Idle;
                vec![self.notify(e.user_message(MOVES_FAILED.0), MOVES_FAILED.1)]
            }
        }
    }

    fn finish_move(
        &mut self,
        request: u64,
        result: Result<GameSnapshot, ServiceError>,
    ) -> Vec<Command> {
        let (from, to) = match self.selection {
            Selection::Submitting {
                from,
                to,
                request: current,
            } if current == request => (from, to),
            _ => {
                debug!(request, "Dropping superseded move response");
                return Vec::new();
            }
        };
        self.selection = Selection::Idle;

        match result {
            Ok(game) => {
                self.adopt(game);
                let record = self.history.append(from, to);
                info!(entry = %record, "Move accepted");
                vec![self.notify(MOVE_OK.0, MOVE_OK.1)]
            }
            Err(e) => {
                warn!(from = %from, to = %to, error = %e, "Move not applied");
                vec![self.notify(e.user_message(MOVE_FAILED.0), MOVE_FAILED.1)]
            }
        }
    }

    fn start_game_op(&mut self, op: GameOp) -> Vec<Command> {
        if self.is_busy() {
            debug!(%op, "Ignored while another mutation is in flight");
            return Vec::new();
        }
        let request = self.next_request();
        info!(%op, request, "Requesting game operation");
        self.selection = Selection::Idle;
        self.pending_game_op = Some((op, request));
        vec![Command::RunGameOp { request, op }]
    }

    fn finish_game_op(
        &mut self,
        request: u64,
        result: Result<GameSnapshot, ServiceError>,
    ) -> Vec<Command> {
        let op = match self.pending_game_op {
            Some((op, current)) if current == request => op,
            _ => {
                debug!(request, "Dropping superseded game operation response");
                return Vec::new();
            }
        };
        self.pending_game_op = None;
        self.selection = Selection::Idle;

        match result {
            Ok(game) => {
                self.adopt(game);
                self.history.clear();
                info!(%op, "Game replaced");
                vec![self.notify(op.success_text(), GAME_OP_OK_MS)]
            }
            Err(e) => {
                warn!(%op, error = %e, "Game operation failed");
                vec![self.notify(e.user_message(op.failure_text()), GAME_OP_FAILED_MS)]
            }
        }
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Started => "started",
        Event::ResyncRequested => "resync_requested",
        Event::CellClicked(_) => "cell_clicked",
        Event::NewGameRequested => "new_game_requested",
        Event::ResetRequested => "reset_requested",
        Event::Synced { .. } => "synced",
        Event::LegalMovesLoaded { .. } => "legal_moves_loaded",
        Event::MoveResolved { .. } => "move_resolved",
        Event::GameOpResolved { .. } => "game_op_resolved",
        Event::NoticeExpired(_) => "notice_expired",
    }
}
