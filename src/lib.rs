//! Strictly Chess library - typed client for a remote chess service
//!
//! The service owns the rules: move legality, check, checkmate and turn
//! order all come from it. This crate handles everything around that:
//! talking to the service, tracking what the user has selected, and
//! drawing the board.
//!
//! # Architecture
//!
//! - **Chess**: Board, piece and square types plus algebraic notation
//! - **Client**: The [`GameService`] seam and its HTTP implementation
//! - **Controller**: Pure selection/synchronization state machine
//! - **Driver**: Carries out controller commands against a service
//! - **Render**: Board state to visual cells
//! - **TUI**: Terminal frontend
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use strictly_chess::{ClientConfig, Event, RestChessClient, SequentialDriver, Square};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = RestChessClient::new(&ClientConfig::default())?;
//! let mut driver = SequentialDriver::new(Arc::new(client));
//!
//! driver.settle(Event::Started).await;
//! driver.settle(Event::CellClicked("e2".parse::<Square>()?)).await;
//! driver.settle(Event::CellClicked("e4".parse::<Square>()?)).await;
//! println!("{:?}", driver.controller().history().lines());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod chess;
mod client;
mod config;
mod controller;
mod driver;
mod notice;
mod render;
mod session_log;
mod tui;

// Crate-level exports - Chess types
pub use chess::{
    BOARD_SIZE, BoardSnapshot, GameInfo, GameSnapshot, GameStatus, Kind, Piece, PieceCode, Side,
    SnapshotError, Square, SquareParseError, from_algebraic, to_algebraic,
};

// Crate-level exports - Service client
pub use client::{
    GameService, MOVE_REJECTED_FALLBACK, RestChessClient, ServiceError, ServiceErrorKind,
};

// Crate-level exports - Configuration
pub use config::{ClientConfig, ConfigError, SERVER_URL_ENV};

// Crate-level exports - Controller
pub use controller::{Command, Controller, Event, GameOp, Selection};

// Crate-level exports - Driver
pub use driver::{SequentialDriver, perform, spawn_command};

// Crate-level exports - Notices and history
pub use notice::{Notice, NoticeBoard};
pub use session_log::{MoveHistory, MoveRecord};

// Crate-level exports - Rendering
pub use render::{Occupant, PieceClass, Shade, UNKNOWN_GLYPH, VisualCell, render};

// Crate-level exports - Terminal UI
pub use tui::run_tui;
