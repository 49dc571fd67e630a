//! # deckring CLI Library
//!
//! Command-line front-end for the deckring engine: players sit in a ring,
//! each drawing from the deck on their left and discarding to the deck on
//! their right, until one of them holds four cards of the same value.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["deckring", "play", "--players", "4", "--pack", "four.txt"];
//! let code = deckring_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `play`: Play one game, writing `player{n}_output.txt` and `deck{n}_output.txt`
//! - `check`: Validate a pack for a number of players
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::{BufRead, Write};
pub mod cli;
mod commands;
pub mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
pub mod logging;
pub mod ui;
pub mod validation;

use cli::{Commands, DeckringCli};
use commands::{PlayArgs, handle_cfg_command, handle_check_command, handle_play_command};

pub use commands::{PACK_PROMPT, PLAYERS_PROMPT};
pub use error::CliError;

/// Main entry point for the CLI application.
///
/// Reads interactive answers from the process's stdin; see [`run_with_input`].
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors, `130` for interruptions
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdin = std::io::stdin();
    let mut stdin_lock = stdin.lock();
    run_with_input(args, out, err, &mut stdin_lock)
}

/// Parse `args` and dispatch to a subcommand, reading prompts from `stdin`.
///
/// # Example
///
/// ```
/// use std::io;
/// let code = deckring_cli::run_with_input(
///     vec!["deckring", "play", "--players", "0"],
///     &mut Vec::new(),
///     &mut Vec::new(),
///     &mut io::empty(),
/// );
/// assert_eq!(code, 2);
/// ```
pub fn run_with_input<I, S>(
    args: I,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    const COMMANDS: &[&str] = &["play", "check", "cfg"];
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match DeckringCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;

            // Help and version should print to stdout and exit 0
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(out, "{}", e).is_err() {
                        return exit_code::ERROR;
                    }
                    exit_code::SUCCESS
                }
                _ => {
                    let _ = write_usage(err, &e, COMMANDS);
                    exit_code::ERROR
                }
            };
        }
    };

    let result = match cli.cmd {
        Commands::Play {
            players,
            pack,
            output_dir,
            seed,
            pace_ms,
            grace_ms,
            time_limit_ms,
            json,
        } => {
            let args = PlayArgs {
                players,
                pack,
                output_dir,
                seed,
                pace_ms,
                grace_ms,
                time_limit_ms,
                json,
            };
            handle_play_command(args, out, err, stdin)
        }
        Commands::Check { players, pack } => handle_check_command(players, &pack, out),
        Commands::Cfg => handle_cfg_command(out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            match e {
                CliError::Interrupted(_) => exit_code::INTERRUPTED,
                _ => exit_code::ERROR,
            }
        }
    }
}

fn write_usage(err: &mut dyn Write, e: &clap::Error, commands: &[&str]) -> std::io::Result<()> {
    writeln!(err, "{}", e)?;
    writeln!(err)?;
    writeln!(err, "deckring card game CLI")?;
    writeln!(err, "Usage: deckring <command> [options]\n")?;
    writeln!(err, "Commands:")?;
    for c in commands {
        writeln!(err, "  {}", c)?;
    }
    writeln!(err, "\nFor full help, run: deckring --help")
}
