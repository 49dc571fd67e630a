//! `check` command: validate a pack against a player count without playing.

use crate::error::CliError;
use crate::io_utils::load_pack;
use deckring_engine::pack::CARDS_PER_PLAYER;
use std::io::Write;

pub fn handle_check_command(
    players: usize,
    pack_path: &str,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let pack = load_pack(pack_path)?;
    pack.validate(players)?;
    writeln!(
        out,
        "{}: {} cards, valid for {} players ({} per player)",
        pack_path,
        pack.len(),
        players,
        CARDS_PER_PLAYER
    )?;
    Ok(())
}
