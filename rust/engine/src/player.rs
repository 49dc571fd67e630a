use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::Hand;
use crate::logger::{EventLog, PlayerEvent};
use crate::signal::{StopSignal, WinSignal};

/// Lifecycle of a player worker.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    Running,
    /// This player published the winning hand.
    WinDetected,
    /// Someone else won, or the coordinator asked everyone to stop.
    Stopped,
    Draining,
    Exited,
}

/// One draw followed by one discard.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Turn {
    pub drawn: Card,
    pub discarded: Card,
}

/// A seat in the deck ring: draws from one deck, discards to the next.
#[derive(Debug)]
pub struct Player {
    id: usize,
    hand: Hand,
    draw_deck: Arc<Deck>,
    discard_deck: Arc<Deck>,
    rng: ChaCha20Rng,
    state: PlayerState,
}

impl Player {
    pub fn new(id: usize, draw_deck: Arc<Deck>, discard_deck: Arc<Deck>, seed: u64) -> Self {
        Self {
            id,
            hand: Hand::new(),
            draw_deck,
            discard_deck,
            rng: ChaCha20Rng::seed_from_u64(seed),
            state: PlayerState::Running,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn draw_deck(&self) -> &Arc<Deck> {
        &self.draw_deck
    }

    pub fn discard_deck(&self) -> &Arc<Deck> {
        &self.discard_deck
    }

    /// Take a card dealt from the pack.
    pub fn receive(&mut self, card: Card) {
        self.hand.push(card);
    }

    pub fn has_winning_hand(&self) -> bool {
        self.hand.is_winning()
    }

    /// Draw from the draw deck and discard to the discard deck.
    ///
    /// An empty draw deck yields `DeckEmpty` and leaves the hand untouched.
    pub fn take_turn(&mut self) -> Result<Turn, GameError> {
        let drawn = self.draw_deck.draw_front()?;
        let discarded = self.hand.exchange(drawn, self.preferred_value(), &mut self.rng);
        self.discard_deck.push_back(discarded);
        Ok(Turn { drawn, discarded })
    }

    // Players hold on to cards matching their own number.
    fn preferred_value(&self) -> u32 {
        u32::try_from(self.id).unwrap_or(u32::MAX)
    }

    /// Play until the game is won or a stop is requested, then drain.
    ///
    /// Returns once the log's writer has closed the sink. If the worker is
    /// aborted first, dropping the log still lets the writer close it.
    pub async fn run(mut self, ctx: PlayerContext) -> PlayerSummary {
        let PlayerContext {
            win,
            stop,
            mut log,
            pace,
        } = ctx;
        let mut won = win.subscribe();
        let mut halt = stop.subscribe();
        let mut turns = 0u64;
        let mut skipped = 0u64;

        log.record(PlayerEvent::InitialHand {
            player: self.id,
            hand: self.hand.clone(),
        });

        while self.state == PlayerState::Running {
            if win.is_won() || stop.is_stopped() {
                self.state = PlayerState::Stopped;
                break;
            }
            if self.has_winning_hand() {
                self.state = if win.try_claim(self.id) {
                    tracing::info!(player = self.id, hand = %self.hand, "player wins");
                    PlayerState::WinDetected
                } else {
                    PlayerState::Stopped
                };
                break;
            }

            match self.take_turn() {
                Ok(turn) => {
                    turns += 1;
                    log.record(PlayerEvent::Draw {
                        player: self.id,
                        card: turn.drawn,
                        deck: self.draw_deck.id(),
                    });
                    log.record(PlayerEvent::Discard {
                        player: self.id,
                        card: turn.discarded,
                        deck: self.discard_deck.id(),
                    });
                    log.record(PlayerEvent::CurrentHand {
                        player: self.id,
                        hand: self.hand.clone(),
                    });
                }
                Err(e) => {
                    skipped += 1;
                    tracing::debug!(player = self.id, error = %e, "turn skipped");
                }
            }

            tokio::select! {
                biased;
                _ = halt.changed() => {}
                _ = won.changed() => {}
                _ = tokio::time::sleep(pace) => {}
            }
        }

        self.drain(&win, log, turns, skipped).await
    }

    async fn drain(
        mut self,
        win: &WinSignal,
        mut log: EventLog,
        turns: u64,
        skipped: u64,
    ) -> PlayerSummary {
        let won = self.state == PlayerState::WinDetected;
        self.state = PlayerState::Draining;
        if won {
            log.record(PlayerEvent::Wins { player: self.id });
        } else if let Some(winner) = win.winner() {
            log.record(PlayerEvent::Informed {
                player: self.id,
                winner,
            });
        }
        log.record(PlayerEvent::Exits { player: self.id });
        log.record(PlayerEvent::FinalHand {
            player: self.id,
            hand: self.hand.clone(),
        });
        log.finish().await;
        self.state = PlayerState::Exited;
        tracing::debug!(player = self.id, turns, skipped, won, "player exited");

        PlayerSummary {
            id: self.id,
            won,
            hand: self.hand,
            state: self.state,
            turns,
            skipped_turns: skipped,
        }
    }
}

/// Everything a running player needs from the coordinator.
pub struct PlayerContext {
    pub win: WinSignal,
    pub stop: StopSignal,
    pub log: EventLog,
    /// Pause between turns.
    pub pace: Duration,
}

/// What a player hands back once it has exited.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: usize,
    pub won: bool,
    pub hand: Hand,
    pub state: PlayerState,
    pub turns: u64,
    pub skipped_turns: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{MemoryOutput, OutputFactory};

    fn seat(id: usize, draw: &[u32], hand: &[u32]) -> (Player, Arc<Deck>, Arc<Deck>) {
        let draw_deck = Arc::new(Deck::with_cards(1, draw.iter().copied().map(Card::new)));
        let discard_deck = Arc::new(Deck::new(2));
        let mut player = Player::new(id, Arc::clone(&draw_deck), Arc::clone(&discard_deck), 42);
        for &v in hand {
            player.receive(Card::new(v));
        }
        (player, draw_deck, discard_deck)
    }

    fn context(output: &MemoryOutput, id: usize, win: &WinSignal, stop: &StopSignal) -> PlayerContext {
        PlayerContext {
            win: win.clone(),
            stop: stop.clone(),
            log: EventLog::new(format!("player{}", id), output.player_sink(id).unwrap()).unwrap(),
            pace: Duration::from_millis(1),
        }
    }

    #[test]
    fn take_turn_moves_one_card_around_the_ring() {
        let (mut player, draw, discard) = seat(1, &[7], &[1, 2, 3, 4]);
        let turn = player.take_turn().unwrap();
        assert_eq!(turn.drawn, Card::new(7));
        assert_ne!(turn.discarded, Card::new(1));
        assert_eq!(player.hand().len(), 4);
        assert!(draw.is_empty());
        assert_eq!(discard.snapshot(), vec![turn.discarded]);
    }

    #[test]
    fn take_turn_on_empty_deck_keeps_hand() {
        let (mut player, _draw, discard) = seat(1, &[], &[1, 2, 3, 4]);
        assert!(matches!(
            player.take_turn(),
            Err(GameError::DeckEmpty { deck: 1 })
        ));
        assert_eq!(player.hand().len(), 4);
        assert!(discard.is_empty());
    }

    #[tokio::test]
    async fn winning_hand_is_claimed_without_drawing() {
        let output = MemoryOutput::new();
        let (win, stop) = (WinSignal::new(), StopSignal::new());
        let (player, draw, _) = seat(1, &[9, 9], &[5, 5, 5, 5]);

        let summary = player.run(context(&output, 1, &win, &stop)).await;

        assert!(summary.won);
        assert_eq!(summary.turns, 0);
        assert_eq!(summary.state, PlayerState::Exited);
        assert_eq!(win.winner(), Some(1));
        assert_eq!(draw.len(), 2);
        assert_eq!(
            output.player_lines(1),
            vec![
                "player 1 initial hand 5 5 5 5",
                "player 1 wins",
                "player 1 exits",
                "player 1 final hand: 5 5 5 5",
            ]
        );
        assert_eq!(output.closed(), vec!["player1".to_string()]);
    }

    #[tokio::test]
    async fn player_informed_when_someone_else_already_won() {
        let output = MemoryOutput::new();
        let (win, stop) = (WinSignal::new(), StopSignal::new());
        assert!(win.try_claim(3));
        // a winning hand is not enough once another player has claimed the game
        let (player, _, _) = seat(2, &[], &[6, 6, 6, 6]);

        let summary = player.run(context(&output, 2, &win, &stop)).await;

        assert!(!summary.won);
        assert_eq!(win.winner(), Some(3));
        let lines = output.player_lines(2);
        assert_eq!(
            &lines[1..],
            &[
                "player 3 has informed player 2 that player 3 has won",
                "player 2 exits",
                "player 2 final hand: 6 6 6 6",
            ]
        );
    }

    #[tokio::test]
    async fn stop_request_interrupts_pacing() {
        let output = MemoryOutput::new();
        let (win, stop) = (WinSignal::new(), StopSignal::new());
        let (player, _, _) = seat(1, &[], &[1, 2, 3, 4]);
        let mut ctx = context(&output, 1, &win, &stop);
        ctx.pace = Duration::from_secs(3600);

        let worker = tokio::spawn(player.run(ctx));
        tokio::time::sleep(Duration::from_millis(20)).await;
        stop.stop();
        let summary = tokio::time::timeout(Duration::from_secs(5), worker)
            .await
            .expect("player should stop promptly")
            .unwrap();

        assert!(!summary.won);
        assert_eq!(summary.skipped_turns, 1);
        let lines = output.player_lines(1);
        assert_eq!(lines.last().unwrap(), "player 1 final hand: 1 2 3 4");
        assert!(!lines.iter().any(|l| l.contains("informed")));
    }

    #[tokio::test]
    async fn aborted_player_still_closes_its_log() {
        let output = MemoryOutput::new();
        let (win, stop) = (WinSignal::new(), StopSignal::new());
        let (player, _, _) = seat(1, &[], &[1, 2, 3, 4]);
        let mut ctx = context(&output, 1, &win, &stop);
        ctx.pace = Duration::from_secs(3600);

        let worker = tokio::spawn(player.run(ctx));
        tokio::time::sleep(Duration::from_millis(20)).await;
        worker.abort();
        assert!(worker.await.unwrap_err().is_cancelled());

        // the writer closes the sink on its own thread once the log is dropped
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while output.closed().is_empty() && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(output.closed(), vec!["player1".to_string()]);
        assert_eq!(output.player_lines(1), vec!["player 1 initial hand 1 2 3 4"]);
    }
}
