use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("Invalid player count: {0} (must be >= 1)")]
    InvalidPlayerCount(usize),
    #[error("Invalid pack size. Expected {expected} but got {actual}")]
    InvalidPackSize { expected: usize, actual: usize },
    #[error("Invalid card on line {line}: {content:?} is not a non-negative integer")]
    InvalidCard { line: usize, content: String },
    #[error("Pack can never produce a winning hand: no value appears {required} times")]
    UnwinnablePack { required: usize },
    #[error("Deck {deck} is empty")]
    DeckEmpty { deck: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    /// Whether the error stems from the game setup (players or pack) rather than from play.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GameError::InvalidPlayerCount(_)
                | GameError::InvalidPackSize { .. }
                | GameError::InvalidCard { .. }
                | GameError::UnwinnablePack { .. }
        )
    }
}
