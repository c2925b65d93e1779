//! # Helpdesk Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Foundational pieces shared by every command:
//! - `config`: configuration loading, merging, validation and the API key
//! - `error`: error types and the crate-wide `Result` alias
//! - `templating`: the Tera prompt template
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{HelpdeskError, Result}; // For error handling
//! use crate::core::templating::PromptTemplate; // For prompt rendering
//! ```
//!
pub mod config;
pub mod error;
pub mod templating;
