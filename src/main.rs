//! Strictly Chess - Unified CLI
//!
//! Interactive board plus a few headless commands for scripting.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use strictly_chess::{
    ClientConfig, GameService, GameSnapshot, RestChessClient, Square, run_tui,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config =
        ClientConfig::load(&cli.config)?.with_url_override(cli.server_url.as_deref());

    let command = cli.command.unwrap_or(Command::Play);
    if command == Command::Play {
        return run_tui(config).await;
    }

    let client = headless_client(&config)?;
    match command {
        Command::Board => print_snapshot(&client.sync().await?),
        Command::New => print_snapshot(&client.new_game().await?),
        Command::Reset => print_snapshot(&client.reset_game().await?),
        Command::History => print_history(&client.fetch_history().await?),
        // Handled above.
        Command::Play => {}
    }
    client.save_session(config.session_file())?;
    Ok(())
}

/// Sets up stderr logging so stdout carries only command output, then
/// builds the HTTP client on the saved session.
#[instrument(skip(config), fields(base_url = %config.base_url()))]
fn headless_client(config: &ClientConfig) -> Result<RestChessClient> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,strictly_chess=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Running headless command");
    let client = RestChessClient::new(config)?;
    client.load_session(config.session_file())?;
    Ok(client)
}

fn print_history(moves: &[(Square, Square)]) {
    if moves.is_empty() {
        println!("No moves yet.");
    }
    for (index, (from, to)) in moves.iter().enumerate() {
        println!("{}. {}-{}", index + 1, from, to);
    }
}

fn print_snapshot(game: &GameSnapshot) {
    let info = game.info();
    println!("{}", game.board().to_text());
    println!(
        "{} to move | {} | move {}",
        info.current_player(),
        info.game_state(),
        info.move_count()
    );
    if let Some(last) = info.last_move() {
        println!("Last move: {}", last);
    }
}
