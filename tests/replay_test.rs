//! The `crafty` binary: replay from files and stdin, version and usage.

mod common;

use common::*;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

fn crafty() -> Command {
    Command::new(env!("CARGO_BIN_EXE_crafty"))
}

fn capture_file(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(body.as_bytes()).expect("write capture");
    file
}

#[test]
fn test_replay_file_prints_events_and_summary() {
    let file = capture_file(FULL_RUN);

    let output = crafty()
        .arg("replay")
        .arg(file.path())
        .args(["--chunk-size", "3"])
        .output()
        .expect("run crafty");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();

    assert!(lines[0].starts_with(r#"{"event":"RunStarted""#));
    assert!(stdout.contains(&format!("# {} events, 0 malformed,", FULL_RUN_EVENTS)));
    assert!(stdout.contains("clean"));
    assert!(stdout.contains("# message: Rust streams"));
}

#[test]
fn test_replay_stdin_truncated() {
    let mut child = crafty()
        .args(["replay", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn crafty");

    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(br#"{"event":"RunStarted"}{"event":"RunRes"#)
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait for crafty");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# 1 events, 0 malformed, 1 chunks, truncated, 16 bytes unparsed"));
}

#[test]
fn test_replay_missing_file_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let output = crafty()
        .arg("replay")
        .arg(dir.path().join("nope.jsonl"))
        .output()
        .expect("run crafty");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("File error"), "stderr: {}", stderr);
    assert!(stderr.contains("Check file paths and permissions"), "stderr: {}", stderr);
}

#[test]
fn test_replay_trailing_garbage_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("garbage.jsonl");
    std::fs::write(&path, r#"{"event":"RunStarted"} oops"#).expect("write capture");

    let output = crafty().arg("replay").arg(&path).output().expect("run crafty");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# 1 events, 0 malformed, 1 chunks, truncated, 4 bytes unparsed"));
}

#[test]
fn test_version_flag() {
    let output = crafty().arg("--version").output().expect("run crafty");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("crafty {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_bad_arguments_show_usage() {
    let output = crafty()
        .args(["replay", "f", "--chunk-size", "zero"])
        .output()
        .expect("run crafty");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid chunk size 'zero'"));
    assert!(stderr.contains("Usage:"));
}
