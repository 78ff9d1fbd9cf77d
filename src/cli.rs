//! Command-line interface for strictly_chess.

use clap::{Parser, Subcommand};

/// Strictly Chess - Terminal client for a remote chess service
#[derive(Parser, Debug)]
#[command(name = "strictly_chess")]
#[command(about = "Play chess against a remote rules service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the client configuration file
    #[arg(short, long, default_value = "strictly_chess.toml")]
    pub config: std::path::PathBuf,

    /// Chess service base URL, overriding config and environment
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run the interactive terminal board
    Play,

    /// Print the current board and game info
    Board,

    /// Print the moves recorded by the service
    History,

    /// Start a new game and print the resulting board
    New,

    /// Reset the current game and print the resulting board
    Reset,
}
