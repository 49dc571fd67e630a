//! # Play Command
//!
//! Runs one game on a multi-threaded tokio runtime and writes the per-player
//! and per-deck output files into the configured output directory.
//!
//! Missing values are asked for interactively:
//!
//! - the number of players, re-prompted until it is a positive integer
//! - the pack location, re-prompted until the file can be read and holds a
//!   valid pack for that many players
//!
//! Values given as flags are never re-prompted; a bad flag is an error.
//! Ctrl+C sends the stop signal so every player exits and closes its output.

use crate::config::{self, Config};
use crate::error::CliError;
use crate::io_utils::{load_pack, read_stdin_line};
use crate::ui;
use crate::validation::parse_player_count;
use deckring_engine::errors::GameError;
use deckring_engine::game::{Game, GameReport, Outcome, PlayerStatus};
use deckring_engine::logger::FileOutput;
use deckring_engine::pack::Pack;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const PLAYERS_PROMPT: &str = "Please enter the number of players: ";
pub const PACK_PROMPT: &str = "Please enter the pack file location: ";

/// Flags accepted by `deckring play`.
#[derive(Debug, Clone, Default)]
pub struct PlayArgs {
    pub players: Option<usize>,
    pub pack: Option<String>,
    pub output_dir: Option<String>,
    pub seed: Option<u64>,
    pub pace_ms: Option<u64>,
    pub grace_ms: Option<u64>,
    pub time_limit_ms: Option<u64>,
    pub json: bool,
}

/// Handle the play command.
///
/// # Errors
///
/// * `CliError::Config` for invalid configuration files, variables or flags
/// * `CliError::InvalidInput` when stdin closes before a value was entered
/// * `CliError::Game` for invalid flag values or output that cannot be created
/// * `CliError::Interrupted` when the game was stopped with Ctrl+C
pub fn handle_play_command(
    args: PlayArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let config = resolve_config(&args)?;

    let players = match args.players {
        Some(0) => return Err(GameError::InvalidPlayerCount(0).into()),
        Some(n) => n,
        None => prompt_players(out, err, stdin)?,
    };
    let pack = match args.pack.as_deref() {
        Some(path) => {
            let pack = load_pack(path)?;
            pack.validate(players)?;
            pack
        }
        None => prompt_pack(players, out, err, stdin)?,
    };

    let report = run_game(&config, players, pack)?;
    print_report(&report, args.json, out, err)
}

/// Config from defaults, file and environment, with the command-line flags on top.
fn resolve_config(args: &PlayArgs) -> Result<Config, CliError> {
    let mut cfg = config::load_with_sources()
        .map_err(|e| CliError::Config(e.to_string()))?
        .config;
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(pace) = args.pace_ms {
        cfg.pace_ms = pace;
    }
    if let Some(grace) = args.grace_ms {
        cfg.grace_ms = grace;
    }
    if let Some(limit) = args.time_limit_ms {
        cfg.time_limit_ms = (limit > 0).then_some(limit);
    }
    if let Some(dir) = &args.output_dir {
        cfg.output_dir = dir.clone();
    }
    config::validate(&cfg).map_err(|e| CliError::Config(e.to_string()))?;
    Ok(cfg)
}

fn prompt_players(
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<usize, CliError> {
    loop {
        ui::prompt(out, PLAYERS_PROMPT)?;
        let Some(line) = read_stdin_line(stdin) else {
            return Err(CliError::InvalidInput(
                "no number of players was entered".into(),
            ));
        };
        match parse_player_count(&line) {
            Ok(n) => return Ok(n),
            Err(msg) => ui::write_error(err, &msg)?,
        }
    }
}

fn prompt_pack(
    players: usize,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<Pack, CliError> {
    loop {
        ui::prompt(out, PACK_PROMPT)?;
        let Some(path) = read_stdin_line(stdin) else {
            return Err(CliError::InvalidInput("no pack file was entered".into()));
        };
        let attempt = load_pack(&path).and_then(|pack| {
            pack.validate(players)?;
            Ok(pack)
        });
        match attempt {
            Ok(pack) => return Ok(pack),
            Err(CliError::Io(e)) => {
                ui::write_error(err, &format!("Error reading pack file {}: {}", path, e))?
            }
            Err(e) => ui::write_error(err, &format!("Invalid pack file {}: {}", path, e))?,
        }
    }
}

fn run_game(config: &Config, players: usize, pack: Pack) -> Result<GameReport, CliError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let output = Arc::new(FileOutput::new(&config.output_dir));
    let game = Game::new(config.game_config(players), pack, output)?;

    let stop = game.stop_signal();
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);

    let report = runtime.block_on(async move {
        let ctrl_c = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                flag.store(true, Ordering::SeqCst);
                stop.stop();
            }
        });
        let report = game.play().await;
        ctrl_c.abort();
        report
    })?;

    if interrupted.load(Ordering::SeqCst) {
        return Err(CliError::Interrupted("game stopped by user".into()));
    }
    Ok(report)
}

fn print_report(
    report: &GameReport,
    json: bool,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    for player in &report.players {
        if player.status != PlayerStatus::Exited {
            ui::display_warning(
                err,
                &format!("player {} did not exit cleanly ({:?})", player.id, player.status),
            )?;
        }
    }

    if json {
        let json_str = serde_json::to_string_pretty(report).map_err(std::io::Error::other)?;
        writeln!(out, "{}", json_str)?;
        return Ok(());
    }

    match report.outcome {
        Outcome::Won { winner } => writeln!(out, "player {} wins", winner)?,
        Outcome::Abandoned => {
            ui::display_warning(err, "time limit reached before any player won")?;
            writeln!(out, "no winner")?;
        }
    }
    Ok(())
}
