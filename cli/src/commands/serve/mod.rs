//! # Helpdesk HTTP Session API
//!
//! File: cli/src/commands/serve/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `helpdesk serve` exposes the message pipeline over HTTP for the web chat
//! widget. Each widget opens its own session; transcripts and caches are
//! never shared between sessions.
//!
//! ## Architecture
//!
//! - `config.rs`: command-line arguments and `ServerConfig`
//! - `sessions.rs`: in-memory session registry
//! - `handlers.rs`: routes, handlers and the JSON error type
//! - `server_logic.rs`: port selection, middleware, graceful shutdown
//!
//! ```bash
//! helpdesk serve --port 8080
//! curl -X POST localhost:8080/api/sessions
//! curl -X POST localhost:8080/api/sessions/<id>/messages \
//!      -H 'content-type: application/json' -d '{"text":"How do I deploy ArgoCD?"}'
//! ```
//!
use crate::core::error::Result;
use tracing::{debug, info};

pub use config::ServeArgs;

/// Arguments and effective server settings.
pub mod config;
/// Route table and request handlers.
pub mod handlers;
/// Axum server lifecycle.
pub mod server_logic;
/// Session ID to session map.
pub mod sessions;

/// # Handle Serve Command (`handle_serve`)
///
/// Performs the startup checks (API key, configuration, context loading)
/// and then runs the server until shutdown.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command...");
    debug!("Serve args: {:?}", args);

    let pipeline = super::build_pipeline(&args.config)?;
    let config = config::ServerConfig::from_args(&args);
    debug!("Effective server config: {:?}", config);

    server_logic::run_server(config, pipeline).await
}
