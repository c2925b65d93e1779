//! # Helpdesk Assistant
//!
//! File: cli/src/assistant/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The message-processing core: everything between "the user typed a
//! question" and "here is the assistant's reply". Surfaces (`ask`, `chat`,
//! `serve`) only create sessions and call `MessagePipeline::submit`.
//!
//! ## Architecture
//!
//! Leaf-first:
//! - `tools`: tool vocabulary and keyword detection
//! - `sanitizer`: code-content filter for model replies
//! - `followup`: canned follow-up question selection
//! - `cache`: bounded per-session reply cache
//! - `transcript`: append-only messages and the context snapshot
//! - `session`: one conversation's transcript + cache
//! - `generator`: the model boundary (`Generator` trait, `GeminiClient`)
//! - `pipeline`: the orchestrator
//!
pub mod cache;
pub mod followup;
pub mod generator;
pub mod pipeline;
pub mod sanitizer;
pub mod session;
pub mod tools;
pub mod transcript;

pub use pipeline::MessagePipeline;
pub use session::Session;
pub use transcript::{Message, Role};
