mod helpers;

use helpers::{cycling_values, write_pack};
use std::io::Write;
use std::process::{Command, Stdio};

#[test]
fn binary_answers_prompts_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let pack = write_pack(dir.path(), "four.txt", &cycling_values(4));

    let mut child = Command::new(env!("CARGO_BIN_EXE_deckring"))
        .args(["play", "--pace-ms", "1", "--seed", "7"])
        .current_dir(dir.path())
        .env_remove("DECKRING_CONFIG")
        .env_remove("DECKRING_OUTPUT_DIR")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn deckring");

    if let Some(mut stdin) = child.stdin.take() {
        write!(stdin, "4\n{}\n", pack.display()).unwrap();
    }
    let output = child.wait_with_output().expect("failed to read output");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {}", stderr);
    assert!(stdout.starts_with(deckring_cli::PLAYERS_PROMPT));
    assert!(stdout.contains(deckring_cli::PACK_PROMPT));
    assert!(stdout.trim_end().ends_with(" wins"));
    for n in 1..=4 {
        assert!(dir.path().join(format!("player{}_output.txt", n)).is_file());
        assert!(dir.path().join(format!("deck{}_output.txt", n)).is_file());
    }
}

#[test]
fn binary_exit_code_for_bad_pack() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_deckring"))
        .args(["play", "--players", "2", "--pack", "missing.txt"])
        .current_dir(dir.path())
        .stdin(Stdio::null())
        .output()
        .expect("failed to run deckring");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("I/O error"));
}
