//! Command-line interface for lucky_dice.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lucky Dice - two-player push-your-luck dice game
#[derive(Parser, Debug)]
#[command(name = "lucky_dice")]
#[command(about = "Race to an exact target score without rolling a 1", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML); defaults are used if it does not exist
    #[arg(long, global = true, default_value = "lucky_dice.toml")]
    pub config: PathBuf,

    /// History database path, overriding the settings file
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play {
        /// Seed for reproducible dice
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print recently finished games
    History {
        /// Number of games to show
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print win/loss statistics for both players
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Play bot games headlessly and report the results (not recorded)
    Simulate {
        /// Number of games to play
        #[arg(short, long, default_value = "1000")]
        games: u32,

        /// Seed of the first game; game i uses seed + i
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Score at which both bots stop rolling and pass
        #[arg(long, default_value = "15")]
        hold_at: u32,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
