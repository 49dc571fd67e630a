use std::collections::HashMap;
use std::path::Path;

use crate::cards::Card;
use crate::errors::GameError;
use crate::hand::WINNING_HAND_SIZE;

/// Cards required per player: four dealt into the hand, four into that player's deck.
pub const CARDS_PER_PLAYER: usize = 8;

/// The ordered set of cards a game is dealt from.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Pack {
    cards: Vec<Card>,
}

impl Pack {
    /// Parse one non-negative integer per line. Blank lines are skipped and
    /// surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Result<Self, GameError> {
        let mut cards = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let value = line.parse::<u32>().map_err(|_| GameError::InvalidCard {
                line: idx + 1,
                content: line.to_string(),
            })?;
            cards.push(Card::new(value));
        }
        Ok(Self { cards })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    /// At least one value occurs often enough to form a winning hand.
    pub fn is_winnable(&self) -> bool {
        let mut counts: HashMap<Card, usize> = HashMap::new();
        self.cards.iter().any(|&card| {
            let n = counts.entry(card).or_default();
            *n += 1;
            *n >= WINNING_HAND_SIZE
        })
    }

    /// Check the pack can be dealt to `players` players.
    pub fn validate(&self, players: usize) -> Result<(), GameError> {
        if players == 0 {
            return Err(GameError::InvalidPlayerCount(players));
        }
        let expected = players
            .checked_mul(CARDS_PER_PLAYER)
            .ok_or(GameError::InvalidPlayerCount(players))?;
        if self.cards.len() != expected {
            return Err(GameError::InvalidPackSize {
                expected,
                actual: self.cards.len(),
            });
        }
        if !self.is_winnable() {
            return Err(GameError::UnwinnablePack {
                required: WINNING_HAND_SIZE,
            });
        }
        Ok(())
    }
}

impl From<Vec<u32>> for Pack {
    fn from(values: Vec<u32>) -> Self {
        values.into_iter().map(Card::new).collect()
    }
}

impl FromIterator<Card> for Pack {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}
