//! # Helpdesk CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Every command
//! runs inside a temporary directory with the user config directory pointed
//! into it, so a developer's own `.env`, `.helpdesk.toml` or
//! `~/.config/helpdesk/config.toml` never leaks into a test run.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use tempfile::TempDir;

/// Key used by tests that need startup to succeed. Never sent anywhere real.
pub const TEST_API_KEY: &str = "test-key-not-real";

/// Greeting reply, as printed by `ask hello`.
pub const GREETING_REPLY: &str =
    "Hi there! Welcome to CloudMasa's DevOps support. How can I help you today?";

/// # Get Helpdesk Command (`helpdesk_cmd`)
///
/// An `assert_cmd::Command` for the compiled `helpdesk` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn helpdesk_cmd() -> Command {
    Command::cargo_bin("helpdesk").expect("Failed to find helpdesk binary for testing")
}

/// # Isolated Command (`isolated_cmd`)
///
/// `helpdesk_cmd()` running in `sandbox`, with no API key, no `RUST_LOG`
/// and the config/home directories redirected into `sandbox`.
pub fn isolated_cmd(sandbox: &TempDir) -> Command {
    let mut cmd = helpdesk_cmd();
    cmd.current_dir(sandbox.path())
        .env_remove("GEMINI_API_KEY")
        .env_remove("RUST_LOG")
        .env_remove("HELPDESK_PORT")
        .env_remove("HELPDESK_HOST")
        .env("HOME", sandbox.path())
        .env("XDG_CONFIG_HOME", sandbox.path().join(".config"));
    cmd
}

/// `isolated_cmd` with a test API key set.
pub fn keyed_cmd(sandbox: &TempDir) -> Command {
    let mut cmd = isolated_cmd(sandbox);
    cmd.env("GEMINI_API_KEY", TEST_API_KEY);
    cmd
}
