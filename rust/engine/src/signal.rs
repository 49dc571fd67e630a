//! Broadcast signals shared between the coordinator and the player workers.
//!
//! Both signals are `tokio::sync::watch` channels, so every subscriber is woken
//! the moment the value changes and nobody polls on a fixed interval.

use std::sync::Arc;
use tokio::sync::watch;

/// Single-assignment record of the winning player.
///
/// The first successful [`WinSignal::try_claim`] is kept for the lifetime of the
/// game; later claims observe failure and leave the winner untouched.
#[derive(Debug, Clone)]
pub struct WinSignal {
    tx: Arc<watch::Sender<Option<usize>>>,
}

impl Default for WinSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl WinSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Publish `player` as the winner. Returns false if someone else already won.
    pub fn try_claim(&self, player: usize) -> bool {
        self.tx.send_if_modified(|winner| match winner {
            None => {
                *winner = Some(player);
                true
            }
            Some(_) => false,
        })
    }

    pub fn winner(&self) -> Option<usize> {
        *self.tx.borrow()
    }

    pub fn is_won(&self) -> bool {
        self.winner().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<usize>> {
        self.tx.subscribe()
    }

    /// Resolve once a winner has been published.
    pub async fn wait(&self) -> usize {
        let mut rx = self.subscribe();
        loop {
            let current = *rx.borrow_and_update();
            if let Some(winner) = current {
                return winner;
            }
            // the sender lives in `self`, so the channel cannot close under us
            let _ = rx.changed().await;
        }
    }
}

/// Idempotent request for every player to stop.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn stop(&self) {
        self.tx.send_if_modified(|stopped| !std::mem::replace(stopped, true));
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }

    pub async fn wait(&self) {
        let mut rx = self.subscribe();
        loop {
            let stopped = *rx.borrow_and_update();
            if stopped {
                return;
            }
            let _ = rx.changed().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn first_claim_wins() {
        let win = WinSignal::new();
        assert!(!win.is_won());
        assert!(win.try_claim(3));
        assert!(!win.try_claim(1));
        assert_eq!(win.winner(), Some(3));
    }

    #[test]
    fn concurrent_claims_keep_exactly_one_winner() {
        for _ in 0..50 {
            let win = WinSignal::new();
            let successes: Vec<usize> = thread::scope(|s| {
                let handles: Vec<_> = (1..=8)
                    .map(|player| {
                        let win = win.clone();
                        s.spawn(move || win.try_claim(player).then_some(player))
                    })
                    .collect();
                handles
                    .into_iter()
                    .filter_map(|h| h.join().unwrap())
                    .collect()
            });
            assert_eq!(successes.len(), 1);
            assert_eq!(win.winner(), Some(successes[0]));
        }
    }

    #[test]
    fn stop_is_idempotent() {
        let stop = StopSignal::new();
        let rx = stop.subscribe();
        stop.stop();
        stop.stop();
        assert!(stop.is_stopped());
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn wait_resolves_after_claim() {
        let win = WinSignal::new();
        let waiter = {
            let win = win.clone();
            tokio::spawn(async move { win.wait().await })
        };
        tokio::task::yield_now().await;
        assert!(win.try_claim(2));
        assert_eq!(waiter.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn stop_wait_returns_immediately_when_already_stopped() {
        let stop = StopSignal::new();
        stop.stop();
        stop.wait().await;
    }
}
