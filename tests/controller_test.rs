//! Tests for the selection and synchronization state machine.
//!
//! Every test drives the controller with hand-built events; no service is
//! involved.

use std::collections::HashSet;
use std::time::Duration;

use strictly_chess::{
    BoardSnapshot, Command, Controller, Event, GameInfo, GameOp, GameSnapshot, GameStatus,
    PieceCode, Selection, ServiceError, Side, Square,
};

fn sq(notation: &str) -> Square {
    notation.parse().unwrap()
}

fn squares(list: &[&str]) -> HashSet<Square> {
    list.iter().map(|s| sq(s)).collect()
}

fn after_e2e4() -> GameSnapshot {
    let board = BoardSnapshot::standard()
        .with(sq("e2"), None)
        .with(sq("e4"), Some(PieceCode::new("WP")));
    let info = GameInfo::new(Side::Black, GameStatus::Active, 1, Some("e2-e4".to_string()));
    GameSnapshot::new(board, info)
}

fn with_status(status: GameStatus) -> GameSnapshot {
    let info = GameInfo::new(Side::White, status, 30, None);
    GameSnapshot::new(BoardSnapshot::standard(), info)
}

/// Selects `from` and answers the legal-moves fetch with `destinations`.
fn selected(controller: &mut Controller, from: &str, destinations: &[&str]) {
    let commands = controller.dispatch(Event::CellClicked(sq(from)));
    let Some(Command::FetchLegalMoves { request, square }) = commands.first().cloned() else {
        panic!("expected a legal-moves fetch, got {:?}", commands);
    };
    assert_eq!(square, sq(from));
    controller.dispatch(Event::LegalMovesLoaded {
        request,
        result: Ok(squares(destinations)),
    });
}

/// Clicks `to` from a selection and returns the submission's request id.
fn submit(controller: &mut Controller, to: &str) -> u64 {
    match controller.dispatch(Event::CellClicked(sq(to))).as_slice() {
        [Command::SubmitMove { request, .. }] => *request,
        other => panic!("expected a move submission, got {:?}", other),
    }
}

#[test]
fn test_started_requests_sync() {
    let mut controller = Controller::new();
    let commands = controller.dispatch(Event::Started);
    assert_eq!(commands, vec![Command::Sync { request: 1 }]);
    assert!(controller.is_loading());

    let commands = controller.dispatch(Event::Synced {
        request: 1,
        result: Ok(GameSnapshot::initial()),
    });
    assert!(commands.is_empty());
    assert!(!controller.is_loading());
    assert_eq!(controller.side_to_move(), Some(Side::White));
}

#[test]
fn test_clicks_ignored_before_first_sync() {
    let mut controller = Controller::new();
    assert!(controller.dispatch(Event::CellClicked(sq("e2"))).is_empty());
    assert_eq!(controller.selection(), &Selection::Idle);
}

#[test]
fn test_sync_failure_posts_retry_notice() {
    let mut controller = Controller::new();
    controller.dispatch(Event::Started);
    let commands = controller.dispatch(Event::Synced {
        request: 1,
        result: Err(ServiceError::network("connection refused")),
    });

    let notice = controller.notice().unwrap();
    assert_eq!(notice.text(), "Error loading game. Press 's' to retry.");
    assert_eq!(
        commands,
        vec![Command::ClearNoticeAfter {
            id: *notice.id(),
            after: Duration::from_millis(3000),
        }]
    );
    assert!(controller.game().is_none());
}

#[test]
fn test_click_on_empty_or_opponent_cell_ignored() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    assert!(controller.dispatch(Event::CellClicked(sq("e4"))).is_empty());
    assert!(controller.dispatch(Event::CellClicked(sq("e7"))).is_empty());
    assert_eq!(controller.selection(), &Selection::Idle);
}

#[test]
fn test_select_highlights_destinations() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    let commands = controller.dispatch(Event::CellClicked(sq("e2")));
    assert_eq!(
        commands,
        vec![Command::FetchLegalMoves {
            request: 1,
            square: sq("e2"),
        }]
    );
    assert_eq!(
        controller.selection(),
        &Selection::AwaitingMoves {
            square: sq("e2"),
            request: 1,
        }
    );

    controller.dispatch(Event::LegalMovesLoaded {
        request: 1,
        result: Ok(squares(&["e3", "e4"])),
    });
    assert_eq!(controller.selection().destinations(), squares(&["e3", "e4"]));

    let cells = controller.cells();
    let flagged: HashSet<Square> = cells
        .iter()
        .filter(|cell| cell.valid_move)
        .map(|cell| cell.square)
        .collect();
    assert_eq!(flagged, squares(&["e3", "e4"]));
    assert_eq!(
        cells.iter().filter(|cell| cell.selected).map(|cell| cell.square).collect::<Vec<_>>(),
        vec![sq("e2")]
    );
}

#[test]
fn test_click_selected_square_deselects() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    selected(&mut controller, "e2", &["e3", "e4"]);

    assert!(controller.dispatch(Event::CellClicked(sq("e2"))).is_empty());
    assert_eq!(controller.selection(), &Selection::Idle);
    assert!(controller.cells().iter().all(|cell| !cell.selected && !cell.valid_move));
}

#[test]
fn test_click_pending_square_withdraws_selection() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    controller.dispatch(Event::CellClicked(sq("e2")));
    controller.dispatch(Event::CellClicked(sq("e2")));
    assert_eq!(controller.selection(), &Selection::Idle);

    // The late answer for the withdrawn selection changes nothing.
    controller.dispatch(Event::LegalMovesLoaded {
        request: 1,
        result: Ok(squares(&["e3"])),
    });
    assert_eq!(controller.selection(), &Selection::Idle);
}

#[test]
fn test_latest_legal_moves_request_wins() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    controller.dispatch(Event::CellClicked(sq("e2")));
    let commands = controller.dispatch(Event::CellClicked(sq("d2")));
    assert_eq!(
        commands,
        vec![Command::FetchLegalMoves {
            request: 2,
            square: sq("d2"),
        }]
    );

    controller.dispatch(Event::LegalMovesLoaded {
        request: 1,
        result: Ok(squares(&["e3", "e4"])),
    });
    assert_eq!(
        controller.selection(),
        &Selection::AwaitingMoves {
            square: sq("d2"),
            request: 2,
        }
    );

    controller.dispatch(Event::LegalMovesLoaded {
        request: 2,
        result: Ok(squares(&["d3", "d4"])),
    });
    assert_eq!(controller.selection().selected_square(), Some(sq("d2")));
    assert_eq!(controller.selection().destinations(), squares(&["d3", "d4"]));
}

#[test]
fn test_legal_moves_failure_returns_to_idle() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    controller.dispatch(Event::CellClicked(sq("e2")));
    controller.dispatch(Event::LegalMovesLoaded {
        request: 1,
        result: Err(ServiceError::network("timed out")),
    });

    assert_eq!(controller.selection(), &Selection::Idle);
    assert_eq!(
        controller.notice().unwrap().text(),
        "Could not load moves. Please try again."
    );
}

#[test]
fn test_successful_move_adopts_response_and_logs() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    selected(&mut controller, "e2", &["e3", "e4"]);
    let request = submit(&mut controller, "e4");
    assert!(controller.is_busy());
    assert_eq!(controller.selection().selected_square(), Some(sq("e2")));

    let commands = controller.dispatch(Event::MoveResolved {
        request,
        result: Ok(after_e2e4()),
    });

    assert_eq!(controller.selection(), &Selection::Idle);
    assert_eq!(controller.game(), Some(&after_e2e4()));
    assert_eq!(controller.history().lines(), vec!["1. e2-e4".to_string()]);
    assert_eq!(controller.side_to_move(), Some(Side::Black));

    let notice = controller.notice().unwrap();
    assert_eq!(notice.text(), "Move successful!");
    assert_eq!(
        commands,
        vec![Command::ClearNoticeAfter {
            id: *notice.id(),
            after: Duration::from_millis(1000),
        }]
    );
}

#[test]
fn test_move_to_unhighlighted_cell_still_submitted() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    selected(&mut controller, "e2", &["e3", "e4"]);
    let commands = controller.dispatch(Event::CellClicked(sq("e5")));
    assert_eq!(
        commands,
        vec![Command::SubmitMove {
            request: 2,
            from: sq("e2"),
            to: sq("e5"),
        }]
    );
}

#[test]
fn test_piece_without_destinations_can_still_submit() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    selected(&mut controller, "a1", &[]);
    assert_eq!(
        controller.selection(),
        &Selection::Selected {
            square: sq("a1"),
            destinations: HashSet::new(),
        }
    );
    assert!(controller.cells().iter().all(|cell| !cell.valid_move));

    let commands = controller.dispatch(Event::CellClicked(sq("a3")));
    assert_eq!(
        commands,
        vec![Command::SubmitMove {
            request: 2,
            from: sq("a1"),
            to: sq("a3"),
        }]
    );
}

#[test]
fn test_click_while_awaiting_moves_submits() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    controller.dispatch(Event::CellClicked(sq("g1")));
    let commands = controller.dispatch(Event::CellClicked(sq("f3")));
    assert_eq!(
        commands,
        vec![Command::SubmitMove {
            request: 2,
            from: sq("g1"),
            to: sq("f3"),
        }]
    );
}

#[test]
fn test_rejected_move_keeps_board_and_shows_reason() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    selected(&mut controller, "e2", &["e3", "e4"]);
    let request = submit(&mut controller, "e5");

    controller.dispatch(Event::MoveResolved {
        request,
        result: Err(ServiceError::rejected("Invalid move!")),
    });

    assert_eq!(controller.selection(), &Selection::Idle);
    assert_eq!(controller.game(), Some(&GameSnapshot::initial()));
    assert!(controller.history().is_empty());
    assert_eq!(controller.notice().unwrap().text(), "Invalid move!");
}

#[test]
fn test_network_failure_on_move_shows_generic_message() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    selected(&mut controller, "e2", &["e4"]);
    let request = submit(&mut controller, "e4");

    controller.dispatch(Event::MoveResolved {
        request,
        result: Err(ServiceError::malformed("missing board")),
    });

    assert_eq!(controller.game(), Some(&GameSnapshot::initial()));
    assert_eq!(
        controller.notice().unwrap().text(),
        "Error making move. Please try again."
    );
}

#[test]
fn test_input_ignored_while_submitting() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    selected(&mut controller, "e2", &["e4"]);
    let request = submit(&mut controller, "e4");

    assert!(controller.dispatch(Event::CellClicked(sq("d2"))).is_empty());
    assert!(controller.dispatch(Event::NewGameRequested).is_empty());
    assert!(controller.dispatch(Event::ResetRequested).is_empty());
    assert!(controller.dispatch(Event::ResyncRequested).is_empty());
    assert!(matches!(
        controller.selection(),
        Selection::Submitting { request: r, .. } if *r == request
    ));
}

#[test]
fn test_new_game_clears_selection_and_history() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    selected(&mut controller, "e2", &["e4"]);
    let request = submit(&mut controller, "e4");
    controller.dispatch(Event::MoveResolved {
        request,
        result: Ok(after_e2e4()),
    });
    selected(&mut controller, "e7", &["e5"]);

    let commands = controller.dispatch(Event::NewGameRequested);
    let Some(Command::RunGameOp { request, op }) = commands.first().cloned() else {
        panic!("expected a game operation, got {:?}", commands);
    };
    assert_eq!(op, GameOp::NewGame);
    assert_eq!(controller.selection(), &Selection::Idle);
    assert!(controller.is_busy());
    assert!(controller.dispatch(Event::CellClicked(sq("e7"))).is_empty());

    controller.dispatch(Event::GameOpResolved {
        request,
        result: Ok(GameSnapshot::initial()),
    });
    assert!(!controller.is_busy());
    assert!(controller.history().is_empty());
    assert_eq!(controller.game(), Some(&GameSnapshot::initial()));
    assert_eq!(controller.notice().unwrap().text(), "New game started!");
}

#[test]
fn test_failed_reset_keeps_game_and_history() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    selected(&mut controller, "e2", &["e4"]);
    let request = submit(&mut controller, "e4");
    controller.dispatch(Event::MoveResolved {
        request,
        result: Ok(after_e2e4()),
    });

    let commands = controller.dispatch(Event::ResetRequested);
    let Some(Command::RunGameOp { request, op }) = commands.first().cloned() else {
        panic!("expected a game operation, got {:?}", commands);
    };
    assert_eq!(op, GameOp::Reset);

    let commands = controller.dispatch(Event::GameOpResolved {
        request,
        result: Err(ServiceError::network("unreachable")),
    });
    assert_eq!(controller.game(), Some(&after_e2e4()));
    assert_eq!(controller.history().len(), 1);
    let notice = controller.notice().unwrap();
    assert_eq!(notice.text(), "Error resetting game. Please try again.");
    assert_eq!(
        commands,
        vec![Command::ClearNoticeAfter {
            id: *notice.id(),
            after: Duration::from_millis(2000),
        }]
    );
}

#[test]
fn test_sync_issued_before_move_is_dropped() {
    let mut controller = Controller::new();
    controller.dispatch(Event::Started);
    controller.dispatch(Event::Synced {
        request: 1,
        result: Ok(GameSnapshot::initial()),
    });

    let commands = controller.dispatch(Event::ResyncRequested);
    let Some(Command::Sync { request: sync }) = commands.first().cloned() else {
        panic!("expected a sync, got {:?}", commands);
    };

    selected(&mut controller, "e2", &["e4"]);
    let request = submit(&mut controller, "e4");
    controller.dispatch(Event::MoveResolved {
        request,
        result: Ok(after_e2e4()),
    });

    controller.dispatch(Event::Synced {
        request: sync,
        result: Ok(GameSnapshot::initial()),
    });
    assert_eq!(controller.game(), Some(&after_e2e4()));
}

#[test]
fn test_finished_game_ignores_clicks() {
    for status in [
        GameStatus::Checkmate,
        GameStatus::Stalemate,
        GameStatus::Draw,
        GameStatus::WhiteWin,
        GameStatus::BlackWin,
    ] {
        let mut controller = Controller::with_game(with_status(status));
        assert!(
            controller.dispatch(Event::CellClicked(sq("e2"))).is_empty(),
            "{} should ignore clicks",
            status
        );
    }

    let mut controller = Controller::with_game(with_status(GameStatus::Check));
    assert_eq!(controller.dispatch(Event::CellClicked(sq("e2"))).len(), 1);
}

#[test]
fn test_finished_game_still_accepts_new_game() {
    let mut controller = Controller::with_game(with_status(GameStatus::Checkmate));
    let commands = controller.dispatch(Event::NewGameRequested);
    assert!(matches!(
        commands.as_slice(),
        [Command::RunGameOp {
            op: GameOp::NewGame,
            ..
        }]
    ));
}

#[test]
fn test_superseded_notice_timer_is_ignored() {
    let mut controller = Controller::with_game(GameSnapshot::initial());
    controller.dispatch(Event::CellClicked(sq("e2")));
    controller.dispatch(Event::LegalMovesLoaded {
        request: 1,
        result: Err(ServiceError::network("down")),
    });
    let first = *controller.notice().unwrap().id();

    controller.dispatch(Event::CellClicked(sq("d2")));
    controller.dispatch(Event::LegalMovesLoaded {
        request: 2,
        result: Err(ServiceError::rejected("No piece at d2")),
    });
    let second = *controller.notice().unwrap().id();
    assert_ne!(first, second);

    controller.dispatch(Event::NoticeExpired(first));
    assert_eq!(controller.notice().unwrap().text(), "No piece at d2");

    controller.dispatch(Event::NoticeExpired(second));
    assert!(controller.notice().is_none());
}
