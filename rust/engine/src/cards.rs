use serde::{Deserialize, Serialize};
use std::fmt;

/// A single playing card carrying a non-negative face value.
/// Cards have no identity beyond their value; two cards with the same value are interchangeable.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(u32);

impl Card {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }
}

impl From<u32> for Card {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render cards as their values separated by single spaces, e.g. `1 2 3 4`.
pub fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.value().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cards_compare_by_value() {
        assert_eq!(Card::new(7), Card::from(7));
        assert_ne!(Card::new(7), Card::new(8));
    }

    #[test]
    fn format_cards_joins_with_single_spaces() {
        let cards = [Card::new(1), Card::new(22), Card::new(3)];
        assert_eq!(format_cards(&cards), "1 22 3");
        assert_eq!(format_cards(&[]), "");
    }
}
