use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::{format_cards, Card};

/// Minimum number of identical cards that makes a winning hand.
pub const WINNING_HAND_SIZE: usize = 4;

/// A player's private hand. Only the owning player ever touches it.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
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

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Four or more cards, all with the same value.
    pub fn is_winning(&self) -> bool {
        match self.cards.first() {
            Some(first) if self.cards.len() >= WINNING_HAND_SIZE => {
                self.cards.iter().all(|c| c == first)
            }
            _ => false,
        }
    }

    /// Take `drawn` into the hand and give one card back.
    ///
    /// The returned card is picked uniformly among cards whose value differs from
    /// `keep`; when every card equals `keep` the first card is returned.
    pub fn exchange<R: Rng + ?Sized>(&mut self, drawn: Card, keep: u32, rng: &mut R) -> Card {
        self.cards.push(drawn);
        let eligible: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.value() != keep)
            .map(|(i, _)| i)
            .collect();
        let index = eligible.choose(rng).copied().unwrap_or(0);
        self.cards.remove(index)
    }
}

impl From<Vec<Card>> for Hand {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_cards(&self.cards))
    }
}
