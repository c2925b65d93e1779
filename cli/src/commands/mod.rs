//! # Helpdesk Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Aggregates the top-level commands of the `helpdesk` CLI. Each command
//! defines its own clap arguments struct and an async `handle_*` function
//! called from `main.rs`.
//!
//! ## Commands
//!
//! - `ask`: one question, one reply, then exit
//! - `chat`: interactive terminal conversation
//! - `serve`: HTTP session API
//! - `tools`: list the tool vocabulary
//!
//! Commands that talk to the model share `build_pipeline`, which performs the
//! startup checks: configuration must load and validate, and the API key must
//! be present. Either failure ends the process before any input is read.
//!
use crate::assistant::MessagePipeline;
use crate::core::config::{self, ConfigArgs};
use crate::core::error::Result;
use tracing::debug;

/// One-shot question.
pub mod ask;
/// Interactive terminal session.
pub mod chat;
/// HTTP session API.
pub mod serve;
/// Tool vocabulary listing.
pub mod tools;

/// Loads configuration, checks the API key and builds the message pipeline.
pub fn build_pipeline(args: &ConfigArgs) -> Result<MessagePipeline> {
    let api_key = config::require_api_key(args.api_key.as_deref())?;
    let config = config::load_config(args)?;
    debug!("Building pipeline with config: {:?}", config);
    MessagePipeline::from_config(&config, api_key)
}
