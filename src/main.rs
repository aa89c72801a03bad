//! Lucky Dice - command-line entry point
//!
//! Plays the game in a terminal UI, prints the stored history, or runs
//! headless simulations.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use lucky_dice::{
    AppConfig, HistoryRepository, HistoryStore, HoldAtPolicy, Outcome, PlayerId, run_tui,
    simulate_batch,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

/// Log file used while the terminal UI owns the screen.
const TUI_LOG_FILE: &str = "lucky_dice_tui.log";

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(matches!(cli.command, Command::Play { .. }))?;

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(db_path) = cli.db_path {
        config = config.with_db_path(db_path);
    }

    match cli.command {
        Command::Play { seed } => run_tui(&config, seed),
        Command::History { limit, json } => print_history(&config, limit, json),
        Command::Stats { json } => print_stats(&config, json),
        Command::Simulate {
            games,
            seed,
            hold_at,
            json,
        } => run_simulation(&config, games, seed, hold_at, json),
    }
}

/// Initializes tracing, writing to a file instead of stderr for the TUI.
fn init_tracing(to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lucky_dice=debug"));

    if to_file {
        let log_file = std::fs::File::create(TUI_LOG_FILE)
            .with_context(|| format!("Failed to create log file {}", TUI_LOG_FILE))?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Arc::new(log_file))
            .with_ansi(false)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
    Ok(())
}

/// Prints the most recent games.
#[instrument(skip(config))]
fn print_history(config: &AppConfig, limit: i64, json: bool) -> Result<()> {
    let repo = HistoryRepository::open(config.db_path().clone())?;
    let games = repo.recent_games(limit)?;
    info!(count = games.len(), "Printing history");

    if json {
        println!("{}", serde_json::to_string_pretty(&games)?);
        return Ok(());
    }

    if games.is_empty() {
        println!("No games recorded yet.");
        return Ok(());
    }

    println!(
        "{:>5}  {:<16}  {:>3}  {:>3}  {:<8}  {:>6}  {:>7}",
        "#", "Played", "P1", "P2", "Result", "Rounds", "Time"
    );
    for game in &games {
        let result = match game.outcome() {
            Ok(Outcome::Winner(PlayerId::One)) => "P1 won",
            Ok(Outcome::Winner(PlayerId::Two)) => "P2 won",
            Ok(Outcome::Tie) => "Tie",
            Err(e) => {
                warn!(error = %e, game_id = game.id(), "Unreadable game result");
                "?"
            }
        };
        println!(
            "{:>5}  {:<16}  {:>3}  {:>3}  {:<8}  {:>6}  {:>6.0}s",
            game.id(),
            game.played_at().format("%Y-%m-%d %H:%M"),
            game.player1_score(),
            game.player2_score(),
            result,
            game.total_rounds(),
            game.duration_seconds()
        );
    }
    Ok(())
}

/// Prints aggregate statistics for both seats.
#[instrument(skip(config))]
fn print_stats(config: &AppConfig, json: bool) -> Result<()> {
    let repo = HistoryRepository::open(config.db_path().clone())?;
    let stats = PlayerId::ALL
        .into_iter()
        .map(|player| repo.player_stats(player))
        .collect::<Result<Vec<_>, _>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    for s in &stats {
        println!("{}", s.player());
        println!("  Games:         {}", s.total_games());
        println!(
            "  Record:        {} W / {} L / {} T ({:.1}%)",
            s.wins(),
            s.losses(),
            s.ties(),
            s.win_rate()
        );
        println!("  Average score: {:.1}", s.avg_score());
        println!("  Average game:  {:.1}s", s.avg_duration_seconds());
        println!("  Average move:  {:.2}s", s.avg_decision_seconds());
    }
    Ok(())
}

/// Runs headless bot games with the configured rules.
#[instrument(skip(config))]
fn run_simulation(config: &AppConfig, games: u32, seed: u64, hold_at: u32, json: bool) -> Result<()> {
    let settings = config.game_settings();
    for issue in settings.issues() {
        eprintln!("warning: {}", issue);
    }
    let summary = simulate_batch(
        settings.into_value(),
        HoldAtPolicy::new(hold_at),
        games,
        seed,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} games, both players holding at {} (seed {})",
        summary.games(),
        summary.hold_at(),
        summary.seed()
    );
    println!(
        "  Player 1 wins: {} ({:.1}%)",
        summary.player1_wins(),
        summary.player1_win_rate()
    );
    println!(
        "  Player 2 wins: {} ({:.1}%)",
        summary.player2_wins(),
        summary.player2_win_rate()
    );
    println!("  Ties:          {}", summary.ties());
    println!("  Actions/game:  {:.1}", summary.mean_actions());
    Ok(())
}
