//! # Helpdesk HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Runs the session API for `helpdesk serve`:
//! - Port availability checking with automatic fallback
//! - Request tracing and optional permissive CORS
//! - Graceful shutdown on Ctrl+C or SIGTERM
//!
//! ## Architecture
//!
//! 1. Find an available port, starting at the requested one
//! 2. Build the router (`handlers::routes`) and wrap it in middleware
//! 3. Start the idle-session sweeper
//! 4. Print connection information
//! 5. Serve until a shutdown signal arrives
//!
//! Sessions live only in memory; stopping the server drops them all.
//!
use super::config::{ServerConfig, MAX_PORT_ATTEMPTS};
use super::handlers::{self, AppState};
use super::sessions::SessionRegistry;
use crate::assistant::MessagePipeline;
use crate::core::error::Result;
use anyhow::Context;
use axum::Router;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// # Run HTTP Server (`run_server`)
///
/// Binds the first free port at or above `config.port` and serves the
/// session API backed by `pipeline` until shutdown.
///
/// ## Errors
///
/// - No free port within `MAX_PORT_ATTEMPTS` tries
/// - Binding the listener fails
/// - The server itself fails while running
pub async fn run_server(config: ServerConfig, pipeline: MessagePipeline) -> Result<()> {
    let addr = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;
    let state = AppState::with_limits(pipeline, config.session_limits);
    let sweeper = spawn_idle_sweeper(state.sessions.clone());
    let app = create_app(state, config.enable_cors);

    println!("\n=================================================================");
    println!("🤖 CloudMasa helpdesk API");
    println!("🌐 Local URL:         http://localhost:{}", addr.port());
    println!("⚙️  Binding to address: {}", addr);
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!(
        "⏳ Session idle limit: {} min",
        config.session_limits.idle_timeout.as_secs() / 60
    );
    println!("=================================================================\n");

    info!("Starting helpdesk server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    let served = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed");
    sweeper.abort();
    served?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// How often idle sessions are looked for: a tenth of the idle timeout,
/// between one second and one minute.
fn sweep_interval(idle_timeout: Duration) -> Duration {
    (idle_timeout / 10).clamp(Duration::from_secs(1), Duration::from_secs(60))
}

/// Periodically drops sessions idle past the registry's timeout.
fn spawn_idle_sweeper(sessions: SessionRegistry) -> JoinHandle<()> {
    let every = sweep_interval(sessions.limits().idle_timeout);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let expired = sessions.sweep_idle().await;
            if expired > 0 {
                info!(
                    "Expired {} idle session(s), {} still open",
                    expired,
                    sessions.len().await
                );
            }
        }
    })
}

/// Resolves on Ctrl+C, or SIGTERM on Unix. If a handler cannot be
/// installed, that signal is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port`, then each following port, up to `max_attempts`
/// ports in total. Returns the first address that can be bound.
async fn find_available_port(
    req_host: IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);
        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, successfully bound to available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = current_port
                    .checked_add(1)
                    .context("Ran out of port numbers while searching for a free port")?;
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// # Create Axum Application (`create_app`)
///
/// The session API routes wrapped in request tracing and, when enabled,
/// permissive CORS.
fn create_app(state: AppState, enable_cors: bool) -> Router {
    let cors_layer = if enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    handlers::routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer)
            .layer(cors_layer),
    )
}
