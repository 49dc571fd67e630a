//! Configuration command handler.
//!
//! This module implements the `cfg` command, which displays the resolved
//! deckring settings with their sources (default, environment, or
//! configuration file).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "pace_ms": {
//!     "value": 10,
//!     "source": "default"
//!   },
//!   "seed": {
//!     "value": 42,
//!     "source": "env"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write) -> Result<(), CliError> {
    let resolved =
        config::load_with_sources().map_err(|e| CliError::Config(e.to_string()))?;

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "pace_ms": {
            "value": config.pace_ms,
            "source": sources.pace_ms,
        },
        "grace_ms": {
            "value": config.grace_ms,
            "source": sources.grace_ms,
        },
        "time_limit_ms": {
            "value": config.time_limit_ms,
            "source": sources.time_limit_ms,
        },
        "output_dir": {
            "value": config.output_dir,
            "source": sources.output_dir,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
