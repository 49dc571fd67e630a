use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::cards::{format_cards, Card};
use crate::errors::GameError;

/// A numbered pile of cards shared by two neighbouring players.
///
/// Every operation holds the deck lock for its whole duration, so operations on
/// one deck are linearizable. Nothing awaits while the lock is held.
#[derive(Debug)]
pub struct Deck {
    id: usize,
    cards: Mutex<VecDeque<Card>>,
}

impl Deck {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            cards: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_cards(id: usize, cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            id,
            cards: Mutex::new(cards.into_iter().collect()),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Remove and return the front card, or `DeckEmpty` when there is none.
    pub fn draw_front(&self) -> Result<Card, GameError> {
        self.cards()
            .pop_front()
            .ok_or(GameError::DeckEmpty { deck: self.id })
    }

    pub fn push_front(&self, card: Card) {
        self.cards().push_front(card);
    }

    pub fn push_back(&self, card: Card) {
        self.cards().push_back(card);
    }

    /// Copy of the current contents, front to back.
    pub fn snapshot(&self) -> Vec<Card> {
        self.cards().iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.cards().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards().is_empty()
    }

    // A panicking holder cannot leave the queue half-updated, so a poisoned lock is safe to reuse.
    fn cards(&self) -> MutexGuard<'_, VecDeque<Card>> {
        self.cards.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn format_deck_contents(id: usize, cards: &[Card]) -> String {
    format!("deck{} contents: {}", id, format_cards(cards))
        .trim_end()
        .to_string()
}
