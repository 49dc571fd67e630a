//! # deckring-engine: concurrent deck-ring card game
//!
//! Players sit in a ring. Each one draws from the deck on its left and discards
//! to the deck on its right, concurrently with everyone else, until some player
//! holds four cards of the same value. The first player to claim the win ends
//! the game; every other player is told who won, and the coordinator drains the
//! ring to a consistent final state.
//!
//! ## Core Modules
//!
//! - [`cards`] - The `Card` value type
//! - [`deck`] - Lock-guarded shared deck
//! - [`hand`] - A player's private hand and discard choice
//! - [`pack`] - Pack parsing and validation
//! - [`player`] - The player worker loop
//! - [`signal`] - Win and stop broadcast signals
//! - [`game`] - The coordinator: dealing, running, shutdown and final report
//! - [`logger`] - Event lines and output sinks
//! - [`errors`] - Error types for game setup and play
//!
//! ## Quick Start
//!
//! ```rust
//! use deckring_engine::pack::Pack;
//!
//! let pack = Pack::parse("1\n1\n1\n1\n2\n3\n4\n5\n").unwrap();
//! assert!(pack.validate(1).is_ok());
//! assert!(pack.validate(2).is_err());
//! ```
//!
//! Running a game needs a multi-threaded `tokio` runtime:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use deckring_engine::game::{Game, GameConfig};
//! use deckring_engine::logger::FileOutput;
//! use deckring_engine::pack::Pack;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), deckring_engine::errors::GameError> {
//!     let pack = Pack::load("four.txt")?;
//!     let game = Game::new(GameConfig::new(4), pack, Arc::new(FileOutput::new("out")))?;
//!     let report = game.play().await?;
//!     println!("winner: {:?}", report.winner());
//!     Ok(())
//! }
//! ```

pub mod cards;
pub mod deck;
pub mod errors;
pub mod game;
pub mod hand;
pub mod logger;
pub mod pack;
pub mod player;
pub mod signal;
