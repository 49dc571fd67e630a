//! Command handler modules for the deckring CLI.
//!
//! Each command lives in its own file with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) and stdin (`&mut dyn BufRead`) passed as parameters
//! - Errors propagated via the `CliError` enum

mod cfg;
mod check;
mod play;

pub use cfg::handle_cfg_command;
pub use check::handle_check_command;
pub use play::{PACK_PROMPT, PLAYERS_PROMPT, PlayArgs, handle_play_command};
