use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::cards::Card;
use crate::deck::{format_deck_contents, Deck};
use crate::errors::GameError;
use crate::hand::Hand;
use crate::logger::{EventLog, OutputFactory};
use crate::pack::Pack;
use crate::player::{Player, PlayerContext, PlayerSummary};
use crate::signal::{StopSignal, WinSignal};

/// Cards dealt into each hand before play starts.
pub const INITIAL_HAND_SIZE: usize = 4;

pub const DEFAULT_PACE: Duration = Duration::from_millis(10);
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(1);

/// Parameters of a single game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub players: usize,
    /// Pause each player takes between turns.
    pub pace: Duration,
    /// How long players get to exit after the stop signal.
    pub grace_period: Duration,
    /// Abandon the game if nobody has won by then.
    pub time_limit: Option<Duration>,
    /// Base seed for the players' discard choices; random when absent.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(players: usize) -> Self {
        Self {
            players,
            pace: DEFAULT_PACE,
            grace_period: DEFAULT_GRACE_PERIOD,
            time_limit: None,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    Won { winner: usize },
    /// Stopped before anyone won (time limit or external stop).
    Abandoned,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    Exited,
    /// Did not exit within the grace period and was aborted.
    TimedOut,
    /// The worker panicked.
    Failed,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerReport {
    pub id: usize,
    pub status: PlayerStatus,
    /// Final hand; unknown when the worker did not exit cleanly.
    pub hand: Option<Hand>,
    pub turns: u64,
    pub skipped_turns: u64,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DeckReport {
    pub id: usize,
    pub cards: Vec<Card>,
}

/// Final state of a game once every worker has been joined or aborted.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameReport {
    pub outcome: Outcome,
    pub players: Vec<PlayerReport>,
    pub decks: Vec<DeckReport>,
}

impl GameReport {
    pub fn winner(&self) -> Option<usize> {
        match self.outcome {
            Outcome::Won { winner } => Some(winner),
            Outcome::Abandoned => None,
        }
    }

    /// Cards held in hands and decks, or `None` if some hand was lost to an aborted worker.
    pub fn total_cards(&self) -> Option<usize> {
        let mut total: usize = self.decks.iter().map(|d| d.cards.len()).sum();
        for player in &self.players {
            total += player.hand.as_ref()?.len();
        }
        Some(total)
    }

    pub fn all_exited(&self) -> bool {
        self.players.iter().all(|p| p.status == PlayerStatus::Exited)
    }
}

/// Owns the deck ring and the players, and runs one game to completion.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use deckring_engine::game::{Game, GameConfig};
/// use deckring_engine::logger::MemoryOutput;
/// use deckring_engine::pack::Pack;
///
/// # async fn demo() -> Result<(), deckring_engine::errors::GameError> {
/// let pack = Pack::from(vec![5; 8]);
/// let game = Game::new(GameConfig::new(1), pack, Arc::new(MemoryOutput::new()))?;
/// let report = game.play().await?;
/// assert_eq!(report.winner(), Some(1));
/// # Ok(())
/// # }
/// ```
pub struct Game {
    config: GameConfig,
    decks: Vec<Arc<Deck>>,
    players: Vec<Player>,
    win: WinSignal,
    stop: StopSignal,
    output: Arc<dyn OutputFactory>,
}

impl Game {
    /// Validate the pack, build the ring and deal. No worker runs yet.
    pub fn new(
        config: GameConfig,
        pack: Pack,
        output: Arc<dyn OutputFactory>,
    ) -> Result<Self, GameError> {
        pack.validate(config.players)?;
        let n = config.players;
        let base_seed = config.seed.unwrap_or_else(rand::random);

        let decks: Vec<Arc<Deck>> = (1..=n).map(|id| Arc::new(Deck::new(id))).collect();
        let mut players: Vec<Player> = (1..=n)
            .map(|id| {
                Player::new(
                    id,
                    Arc::clone(&decks[id - 1]),
                    Arc::clone(&decks[id % n]),
                    base_seed.wrapping_add(id as u64),
                )
            })
            .collect();

        let mut cards = pack.into_cards().into_iter();
        for _ in 0..INITIAL_HAND_SIZE {
            for player in players.iter_mut() {
                if let Some(card) = cards.next() {
                    player.receive(card);
                }
            }
        }
        for (card, deck) in cards.zip(decks.iter().cycle()) {
            deck.push_front(card);
        }

        Ok(Self {
            config,
            decks,
            players,
            win: WinSignal::new(),
            stop: StopSignal::new(),
            output,
        })
    }

    pub fn decks(&self) -> &[Arc<Deck>] {
        &self.decks
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Handle for stopping the game from outside, e.g. on Ctrl+C.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn win_signal(&self) -> WinSignal {
        self.win.clone()
    }

    pub fn total_cards(&self) -> usize {
        self.decks.iter().map(|d| d.len()).sum::<usize>()
            + self.players.iter().map(|p| p.hand().len()).sum::<usize>()
    }

    /// Run every player concurrently until someone wins, then shut down and
    /// write the final deck contents.
    pub async fn play(self) -> Result<GameReport, GameError> {
        let Game {
            config,
            decks,
            players,
            win,
            stop,
            output,
        } = self;

        // open every sink up front so a bad output location fails before play starts
        let mut logs = Vec::with_capacity(players.len());
        for player in &players {
            let sink = output.player_sink(player.id())?;
            logs.push(EventLog::new(format!("player{}", player.id()), sink)?);
        }

        tracing::info!(
            players = players.len(),
            pace_ms = config.pace.as_millis() as u64,
            "game started"
        );

        let workers: Vec<(usize, JoinHandle<PlayerSummary>)> = players
            .into_iter()
            .zip(logs)
            .map(|(player, log)| {
                let id = player.id();
                let ctx = PlayerContext {
                    win: win.clone(),
                    stop: stop.clone(),
                    log,
                    pace: config.pace,
                };
                (id, tokio::spawn(player.run(ctx)))
            })
            .collect();

        wait_for_end(&win, &stop, config.time_limit).await;
        stop.stop();
        let players = join_workers(workers, config.grace_period).await;

        let outcome = match win.winner() {
            Some(winner) => Outcome::Won { winner },
            None => Outcome::Abandoned,
        };
        match outcome {
            Outcome::Won { winner } => tracing::info!(winner, "game finished"),
            Outcome::Abandoned => tracing::info!("game abandoned without a winner"),
        }

        let decks: Vec<DeckReport> = decks
            .iter()
            .map(|deck| DeckReport {
                id: deck.id(),
                cards: deck.snapshot(),
            })
            .collect();
        dump_decks(output.as_ref(), &decks, config.grace_period).await;

        Ok(GameReport {
            outcome,
            players,
            decks,
        })
    }
}

async fn wait_for_end(win: &WinSignal, stop: &StopSignal, limit: Option<Duration>) {
    let deadline = async {
        match limit {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::select! {
        winner = win.wait() => tracing::debug!(winner, "win observed"),
        _ = stop.wait() => tracing::info!("stop requested"),
        _ = deadline => tracing::warn!(?limit, "time limit reached before anyone won"),
    }
}

async fn join_workers(
    workers: Vec<(usize, JoinHandle<PlayerSummary>)>,
    grace: Duration,
) -> Vec<PlayerReport> {
    let deadline = tokio::time::Instant::now() + grace;
    let mut reports = Vec::with_capacity(workers.len());
    for (id, mut handle) in workers {
        let report = match tokio::time::timeout_at(deadline, &mut handle).await {
            Ok(Ok(summary)) => PlayerReport {
                id,
                status: PlayerStatus::Exited,
                hand: Some(summary.hand),
                turns: summary.turns,
                skipped_turns: summary.skipped_turns,
            },
            Ok(Err(e)) => {
                tracing::warn!(player = id, error = %e, "player worker failed");
                PlayerReport::lost(id, PlayerStatus::Failed)
            }
            Err(_) => {
                tracing::warn!(
                    player = id,
                    grace_ms = grace.as_millis() as u64,
                    "player did not exit within the grace period, aborting"
                );
                handle.abort();
                PlayerReport::lost(id, PlayerStatus::TimedOut)
            }
        };
        reports.push(report);
    }
    reports
}

/// Write each deck's final contents, waiting at most `window` for the writers.
async fn dump_decks(output: &dyn OutputFactory, decks: &[DeckReport], window: Duration) {
    let mut logs = Vec::with_capacity(decks.len());
    for deck in decks {
        let log = output
            .deck_sink(deck.id)
            .and_then(|sink| EventLog::new(format!("deck{}", deck.id), sink));
        match log {
            Ok(mut log) => {
                log.record(format_deck_contents(deck.id, &deck.cards));
                logs.push((deck.id, log));
            }
            Err(e) => tracing::warn!(deck = deck.id, error = %e, "failed to open deck output"),
        }
    }

    let deadline = tokio::time::Instant::now() + window;
    for (id, log) in logs {
        if tokio::time::timeout_at(deadline, log.finish()).await.is_err() {
            tracing::warn!(deck = id, "deck output still flushing after the grace period");
        }
    }
}

impl PlayerReport {
    fn lost(id: usize, status: PlayerStatus) -> Self {
        Self {
            id,
            status,
            hand: None,
            turns: 0,
            skipped_turns: 0,
        }
    }
}
