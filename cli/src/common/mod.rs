//! # Helpdesk Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers used by more than one command, kept apart from the
//! command-specific logic (`commands::`) and the core infrastructure
//! (`core::`).
//!
//! - **`fs`**: filesystem helpers, currently the app context loader.
//! - **`ui`**: plain-text rendering of transcript messages and the tool table.
//!

/// Filesystem helpers (app context loading).
pub mod fs;
/// Terminal rendering.
pub mod ui;
