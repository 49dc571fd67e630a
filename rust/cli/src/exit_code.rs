//! Process exit statuses returned by `deckring`.
//!
//! A finished game exits with `SUCCESS` whether or not anyone won. Bad
//! input, unusable packs and output failures exit with `ERROR`.

pub const SUCCESS: i32 = 0;

pub const ERROR: i32 = 2;

/// The game was stopped with Ctrl+C and shut down cleanly.
pub const INTERRUPTED: i32 = 130;
