//! Command-line argument definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "deckring",
    version,
    about = "Concurrent card game: players pass cards around a ring of decks until one holds four of a kind"
)]
pub struct DeckringCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play one game; missing values are asked for on stdin
    Play {
        #[arg(long)]
        players: Option<usize>,
        /// Pack file: one non-negative integer per line (.zst accepted)
        #[arg(long)]
        pack: Option<String>,
        /// Directory for player and deck output files
        #[arg(long)]
        output_dir: Option<String>,
        #[arg(long)]
        seed: Option<u64>,
        /// Pause between turns in milliseconds
        #[arg(long)]
        pace_ms: Option<u64>,
        /// How long players get to exit once the game is over
        #[arg(long)]
        grace_ms: Option<u64>,
        /// Abandon the game after this long without a winner (0 = never)
        #[arg(long)]
        time_limit_ms: Option<u64>,
        /// Print the final report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a pack for a player count without playing
    Check {
        #[arg(long)]
        players: usize,
        #[arg(long)]
        pack: String,
    },
    /// Show resolved configuration and where each value came from
    Cfg,
}
