//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Run the blitz binary in `dir` with colors off and no inherited blitz
/// environment overrides.
pub fn run_blitz_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_blitz"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("BLITZ_ISSUES_DIR")
        .env_remove("BLITZ_DATABASE")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute blitz binary")
}

/// Write an issue file into `issues_dir` and return its path.
pub fn write_issue(issues_dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = issues_dir.join(name);
    fs::write(&path, content).expect("should write issue file");
    path
}

/// First line of a file.
pub fn first_line(path: &Path) -> String {
    fs::read_to_string(path)
        .expect("should read issue file")
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
