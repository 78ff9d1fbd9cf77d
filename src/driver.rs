//! Runs controller commands against a [`GameService`].

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::client::GameService;
use crate::controller::{Command, Controller, Event, GameOp};

/// Performs one command and returns the event that reports its outcome.
///
/// [`Command::ClearNoticeAfter`] sleeps for its delay before answering.
#[instrument(skip(service))]
pub async fn perform<S: GameService + ?Sized>(service: &S, command: Command) -> Event {
    match command {
        Command::Sync { request } => Event::Synced {
            request,
            result: service.sync().await,
        },
        Command::FetchLegalMoves { request, square } => Event::LegalMovesLoaded {
            request,
            result: service.fetch_legal_moves(square).await,
        },
        Command::SubmitMove { request, from, to } => Event::MoveResolved {
            request,
            result: service.submit_move(from, to).await,
        },
        Command::RunGameOp { request, op } => Event::GameOpResolved {
            request,
            result: match op {
                GameOp::NewGame => service.new_game().await,
                GameOp::Reset => service.reset_game().await,
            },
        },
        Command::ClearNoticeAfter { id, after } => {
            tokio::time::sleep(after).await;
            Event::NoticeExpired(id)
        }
    }
}

/// Spawns `command` on the runtime; its outcome event is sent on `events`.
///
/// Used by interactive frontends so input keeps flowing while requests are
/// pending.
pub fn spawn_command<S: GameService + 'static>(
    service: Arc<S>,
    command: Command,
    events: mpsc::UnboundedSender<Event>,
) {
    tokio::spawn(async move {
        let event = perform(service.as_ref(), command).await;
        if events.send(event).is_err() {
            debug!("Event receiver dropped, discarding command outcome");
        }
    });
}

/// Owns a controller and runs each command to completion before the next.
///
/// Notice timers are not awaited here; notices stay up until a test or
/// caller dispatches [`Event::NoticeExpired`] itself. Headless tools and
/// tests use this; the terminal frontend spawns commands instead.
#[derive(Debug)]
pub struct SequentialDriver<S> {
    service: Arc<S>,
    controller: Controller,
}

impl<S: GameService> SequentialDriver<S> {
    /// Driver with a fresh controller.
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            controller: Controller::new(),
        }
    }

    /// The controller.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Dispatches `event` and settles every command it triggers, including
    /// commands triggered by their outcomes.
    #[instrument(skip(self, event))]
    pub async fn settle(&mut self, event: Event) {
        let mut queue = self.controller.dispatch(event);
        while !queue.is_empty() {
            let command = queue.remove(0);
            if let Command::ClearNoticeAfter { id, .. } = command {
                debug!(id, "Leaving notice timer unscheduled");
                continue;
            }
            let outcome = perform(self.service.as_ref(), command).await;
            queue.extend(self.controller.dispatch(outcome));
        }
    }

    /// Dispatches `event` without performing the commands, handing them back
    /// so the caller can interleave outcomes by hand.
    pub fn dispatch(&mut self, event: Event) -> Vec<Command> {
        self.controller.dispatch(event)
    }
}
