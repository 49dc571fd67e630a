#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CliResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run the CLI in-process, feeding `input` to the interactive prompts.
pub fn run_cli(args: &[&str], input: &str) -> CliResult {
    let mut argv = vec!["deckring"];
    argv.extend_from_slice(args);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut stdin = Cursor::new(input.as_bytes().to_vec());
    let exit_code = deckring_cli::run_with_input(argv, &mut out, &mut err, &mut stdin);
    CliResult {
        exit_code,
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
    }
}

/// Write one card value per line.
pub fn write_pack(dir: &Path, name: &str, values: &[u32]) -> PathBuf {
    let path = dir.join(name);
    let text: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    std::fs::write(&path, text.join("\n") + "\n").expect("write pack");
    path
}

/// A winnable pack for `players` in which nobody is dealt a winning hand.
pub fn cycling_values(players: usize) -> Vec<u32> {
    (0..players * 8)
        .map(|i| ((i / 2) % players) as u32 + 1)
        .collect()
}

/// Sets environment variables for the lifetime of the guard.
pub struct EnvGuard {
    restores: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn apply(pairs: &[(&str, &str)]) -> Self {
        let mut restores = Vec::new();
        for (key, value) in pairs {
            restores.push((key.to_string(), std::env::var(key).ok()));
            unsafe { std::env::set_var(key, value) };
        }
        EnvGuard { restores }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, previous) in self.restores.iter().rev() {
            match previous {
                Some(val) => unsafe { std::env::set_var(key, val) },
                None => unsafe { std::env::remove_var(key) },
            }
        }
    }
}
