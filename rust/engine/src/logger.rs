use std::collections::BTreeMap;
use std::fmt;
use std::fs::{create_dir_all, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use tokio::sync::{mpsc, oneshot};

use crate::cards::Card;
use crate::hand::Hand;

/// A single line of a player's event log.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PlayerEvent {
    InitialHand { player: usize, hand: Hand },
    Draw { player: usize, card: Card, deck: usize },
    Discard { player: usize, card: Card, deck: usize },
    CurrentHand { player: usize, hand: Hand },
    Wins { player: usize },
    /// The winner has informed `player` that the game is over.
    Informed { player: usize, winner: usize },
    Exits { player: usize },
    FinalHand { player: usize, hand: Hand },
}

impl fmt::Display for PlayerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerEvent::InitialHand { player, hand } => {
                write!(f, "player {} initial hand {}", player, hand)
            }
            PlayerEvent::Draw { player, card, deck } => {
                write!(f, "player {} draws a {} from deck {}", player, card, deck)
            }
            PlayerEvent::Discard { player, card, deck } => {
                write!(f, "player {} discards a {} to deck {}", player, card, deck)
            }
            PlayerEvent::CurrentHand { player, hand } => {
                write!(f, "player {} current hand is {}", player, hand)
            }
            PlayerEvent::Wins { player } => write!(f, "player {} wins", player),
            PlayerEvent::Informed { player, winner } => write!(
                f,
                "player {} has informed player {} that player {} has won",
                winner, player, winner
            ),
            PlayerEvent::Exits { player } => write!(f, "player {} exits", player),
            PlayerEvent::FinalHand { player, hand } => {
                write!(f, "player {} final hand: {}", player, hand)
            }
        }
    }
}

/// Destination for line-oriented game output.
pub trait EventSink: Send {
    /// Write one line and flush it.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Opens the sinks a game writes to: one per player and one per deck.
pub trait OutputFactory: Send + Sync {
    fn player_sink(&self, player: usize) -> io::Result<Box<dyn EventSink>>;
    fn deck_sink(&self, deck: usize) -> io::Result<Box<dyn EventSink>>;
}

pub struct FileSink {
    writer: Option<BufWriter<File>>,
}

impl FileSink {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
        })
    }
}

impl EventSink for FileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match &mut self.writer {
            Some(w) => {
                w.write_all(line.as_bytes())?;
                w.write_all(b"\n")?;
                w.flush()
            }
            None => Err(io::Error::other("sink already closed")),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        match self.writer.take() {
            Some(mut w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Writes `player{n}_output.txt` and `deck{n}_output.txt` into a directory.
#[derive(Debug, Clone)]
pub struct FileOutput {
    dir: PathBuf,
}

impl FileOutput {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn player_path(&self, player: usize) -> PathBuf {
        self.dir.join(format!("player{}_output.txt", player))
    }

    pub fn deck_path(&self, deck: usize) -> PathBuf {
        self.dir.join(format!("deck{}_output.txt", deck))
    }
}

impl OutputFactory for FileOutput {
    fn player_sink(&self, player: usize) -> io::Result<Box<dyn EventSink>> {
        Ok(Box::new(FileSink::create(self.player_path(player))?))
    }

    fn deck_sink(&self, deck: usize) -> io::Result<Box<dyn EventSink>> {
        Ok(Box::new(FileSink::create(self.deck_path(deck))?))
    }
}

type Transcript = Arc<Mutex<BTreeMap<String, Vec<String>>>>;

/// Keeps every line in memory; handy for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    lines: Transcript,
    closed: Arc<Mutex<Vec<String>>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_lines(&self, player: usize) -> Vec<String> {
        self.lines_for(&format!("player{}", player))
    }

    pub fn deck_lines(&self, deck: usize) -> Vec<String> {
        self.lines_for(&format!("deck{}", deck))
    }

    /// Names of the sinks that have been closed, in closing order.
    pub fn closed(&self) -> Vec<String> {
        self.closed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lines_for(&self, key: &str) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    fn sink(&self, key: String) -> Box<dyn EventSink> {
        Box::new(MemorySink {
            key,
            lines: Arc::clone(&self.lines),
            closed: Arc::clone(&self.closed),
            open: true,
        })
    }
}

impl OutputFactory for MemoryOutput {
    fn player_sink(&self, player: usize) -> io::Result<Box<dyn EventSink>> {
        Ok(self.sink(format!("player{}", player)))
    }

    fn deck_sink(&self, deck: usize) -> io::Result<Box<dyn EventSink>> {
        Ok(self.sink(format!("deck{}", deck)))
    }
}

struct MemorySink {
    key: String,
    lines: Transcript,
    closed: Arc<Mutex<Vec<String>>>,
    open: bool,
}

impl EventSink for MemorySink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        if !self.open {
            return Err(io::Error::other("sink already closed"));
        }
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(self.key.clone())
            .or_default()
            .push(line.to_string());
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        if std::mem::replace(&mut self.open, false) {
            self.closed
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(self.key.clone());
        }
        Ok(())
    }
}

/// Hands lines to a dedicated writer thread that owns one sink.
///
/// `record` never blocks, so slow output cannot hold a runtime worker. The
/// writer flushes every queued line and closes the sink once the log is
/// finished or dropped, including when the owning task is aborted. Write
/// failures are reported through `tracing` and never interrupt the caller.
pub struct EventLog {
    name: String,
    tx: Option<mpsc::UnboundedSender<String>>,
    done: Option<oneshot::Receiver<()>>,
}

impl EventLog {
    pub fn new(name: impl Into<String>, sink: Box<dyn EventSink>) -> io::Result<Self> {
        let name = name.into();
        let (tx, rx) = mpsc::unbounded_channel();
        let (done_tx, done) = oneshot::channel();
        let dispatch = tracing::dispatcher::get_default(|d| d.clone());
        let writer_name = name.clone();
        thread::Builder::new()
            .name(format!("{}-writer", name))
            .spawn(move || {
                tracing::dispatcher::with_default(&dispatch, || {
                    drain_to_sink(&writer_name, sink, rx)
                });
                let _ = done_tx.send(());
            })?;
        Ok(Self {
            name,
            tx: Some(tx),
            done: Some(done),
        })
    }

    pub fn record(&mut self, line: impl fmt::Display) {
        if let Some(tx) = &self.tx {
            // the writer only hangs up after the sender is gone
            let _ = tx.send(line.to_string());
        }
    }

    /// Stop taking lines and wait until the writer has flushed and closed the sink.
    pub async fn finish(mut self) {
        self.tx.take();
        if let Some(done) = self.done.take() {
            if done.await.is_err() {
                tracing::warn!(sink = %self.name, "output writer stopped before closing its sink");
            }
        }
    }
}

fn drain_to_sink(
    name: &str,
    mut sink: Box<dyn EventSink>,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let mut failed = false;
    while let Some(line) = rx.blocking_recv() {
        if let Err(e) = sink.write_line(&line) {
            // one warning per sink is enough
            if !failed {
                tracing::warn!(sink = %name, error = %e, "failed to write game output");
                failed = true;
            }
        }
    }
    if let Err(e) = sink.close() {
        tracing::warn!(sink = %name, error = %e, "failed to close game output");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(values: &[u32]) -> Hand {
        Hand::from(values.iter().copied().map(Card::new).collect::<Vec<_>>())
    }

    #[test]
    fn player_event_lines() {
        let cases = [
            (
                PlayerEvent::Draw {
                    player: 1,
                    card: Card::new(4),
                    deck: 1,
                },
                "player 1 draws a 4 from deck 1",
            ),
            (
                PlayerEvent::Discard {
                    player: 1,
                    card: Card::new(3),
                    deck: 2,
                },
                "player 1 discards a 3 to deck 2",
            ),
            (
                PlayerEvent::CurrentHand {
                    player: 1,
                    hand: hand(&[1, 1, 2, 4]),
                },
                "player 1 current hand is 1 1 2 4",
            ),
            (PlayerEvent::Wins { player: 2 }, "player 2 wins"),
            (
                PlayerEvent::Informed {
                    player: 1,
                    winner: 3,
                },
                "player 3 has informed player 1 that player 3 has won",
            ),
            (PlayerEvent::Exits { player: 1 }, "player 1 exits"),
            (
                PlayerEvent::FinalHand {
                    player: 1,
                    hand: hand(&[2, 2, 2, 2]),
                },
                "player 1 final hand: 2 2 2 2",
            ),
        ];
        for (event, expected) in cases {
            assert_eq!(event.to_string(), expected);
        }
    }

    #[tokio::test]
    async fn finish_flushes_and_closes_the_sink() {
        let output = MemoryOutput::new();
        let mut log = EventLog::new("player1", output.player_sink(1).unwrap()).unwrap();
        log.record("hello");
        log.record(PlayerEvent::Exits { player: 1 });
        log.finish().await;
        assert_eq!(output.player_lines(1), vec!["hello", "player 1 exits"]);
        assert_eq!(output.closed(), vec!["player1".to_string()]);
    }

    #[test]
    fn dropped_log_still_closes_its_sink() {
        let output = MemoryOutput::new();
        {
            let mut log = EventLog::new("deck1", output.deck_sink(1).unwrap()).unwrap();
            log.record("deck1 contents: 1");
        }
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while output.closed().is_empty() && std::time::Instant::now() < deadline {
            thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(output.deck_lines(1), vec!["deck1 contents: 1"]);
        assert_eq!(output.closed(), vec!["deck1".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn record_does_not_wait_for_a_slow_sink() {
        struct Slow;
        impl EventSink for Slow {
            fn write_line(&mut self, _line: &str) -> io::Result<()> {
                thread::sleep(std::time::Duration::from_millis(200));
                Ok(())
            }
        }

        let mut log = EventLog::new("slow", Box::new(Slow)).unwrap();
        let started = std::time::Instant::now();
        for i in 0..10 {
            log.record(i);
        }
        assert!(started.elapsed() < std::time::Duration::from_millis(200));
        drop(log);
    }

    #[test]
    fn file_output_writes_named_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = FileOutput::new(dir.path().join("run"));
        {
            let mut sink = output.player_sink(2).unwrap();
            sink.write_line("player 2 exits").unwrap();
            let mut deck = output.deck_sink(1).unwrap();
            deck.write_line("deck1 contents: 1 2").unwrap();
        }
        let player = std::fs::read_to_string(output.player_path(2)).unwrap();
        assert_eq!(player, "player 2 exits\n");
        let deck = std::fs::read_to_string(dir.path().join("run").join("deck1_output.txt")).unwrap();
        assert_eq!(deck, "deck1 contents: 1 2\n");
    }
}
