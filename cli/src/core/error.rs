//! # Helpdesk Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout the Helpdesk
//! application. There are two layers:
//!
//! - `HelpdeskError`: application errors raised while starting up or while
//!   serving a session (configuration, missing credentials, context loading,
//!   prompt rendering, unknown sessions).
//! - `ApiError`: failures at the external model boundary. These never abort a
//!   conversation turn; the pipeline turns them into a visible reply.
//!
//! `Result<T>` is an alias for `anyhow::Result<T>` so callers can attach
//! context with `.context(...)` the same way everywhere.
//!
//! ## Examples
//!
//! ```rust
//! // Fatal at startup
//! let key = std::env::var(API_KEY_ENV)
//!     .map_err(|_| HelpdeskError::MissingApiKey { var: API_KEY_ENV.into() })?;
//!
//! // Recovered inside a turn
//! match generator.generate(&prompt).await {
//!     Ok(text) => sanitize_reply(&text),
//!     Err(e) => format!("{}{}", ERROR_REPLY_PREFIX, e),
//! };
//! ```
//!
use thiserror::Error;

/// Custom error type for the Helpdesk application.
#[derive(Error, Debug)]
pub enum HelpdeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{var} not found in environment variables! Set it or add it to a .env file.")]
    MissingApiKey { var: String },

    #[error("Context loading error: {0}")]
    Context(String),

    #[error("Prompt rendering error: {source}")]
    Template {
        #[from]
        source: tera::Error,
    },

    #[error("Session '{id}' not found.")]
    SessionNotFound { id: String },
}

/// Failures reported by a `Generator` implementation.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Holds the error with its request URL removed.
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("Authentication failed: {details}")]
    AuthenticationFailed { details: String },

    #[error("Rate limited: {details}")]
    RateLimited { details: String },

    #[error("Invalid request: {details}")]
    InvalidRequest { details: String },

    #[error("Server error (Status: {status_code}): {details}")]
    ServerError { status_code: u16, details: String },

    #[error("Failed to parse response: {details}")]
    ResponseParsing { details: String },

    #[error("API returned no candidates")]
    NoCandidates,

    #[error("Unknown API error (Status: {status_code}): {details}")]
    Unknown { status_code: u16, details: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.without_url())
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
