//! Input parsing and validation for interactive setup.
//!
//! Validation functions return `Result` with a message suitable for showing
//! to the user before re-prompting.

/// Parse a positive player count.
///
/// # Example
///
/// ```rust
/// # use deckring_cli::validation::parse_player_count;
/// assert_eq!(parse_player_count(" 4 "), Ok(4));
/// assert!(parse_player_count("0").is_err());
/// assert!(parse_player_count("four").is_err());
/// ```
pub fn parse_player_count(input: &str) -> Result<usize, String> {
    match input.trim().parse::<i64>() {
        Ok(n) if n > 0 => usize::try_from(n).map_err(|_| "Number of players is too large.".into()),
        Ok(_) => Err("Number of players must be positive.".into()),
        Err(_) => Err("Please enter a valid number.".into()),
    }
}
