//! # Helpdesk Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Entry point for the CloudMasa helpdesk CLI. It handles:
//! - Loading a local `.env` file into the environment
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - `assistant`: the message pipeline (tool detection, caching, prompt,
//!   generation, sanitizing, follow-ups) and per-session state
//! - `commands`: one module per top-level command
//! - `common`: context loading and terminal rendering
//! - `core`: errors, configuration, prompt templating
//!
//! ## Examples
//!
//! ```bash
//! # One question
//! helpdesk ask how do I roll back an ArgoCD app
//!
//! # Interactive session with debug logging
//! helpdesk -vv chat
//!
//! # HTTP API for the web widget
//! helpdesk serve --port 8080
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod assistant;
mod commands;
mod common;
mod core;

#[derive(Parser, Debug)]
#[command(
    name = "helpdesk",
    about = "🤖 CloudMasa Helpdesk: DevOps support assistant",
    long_about = "Answers DevOps questions about ArgoCD, Jenkins, Vault, Prometheus, Grafana,\n\
                  Kubernetes and Docker using Google Gemini, in the terminal or over HTTP.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    Tools(commands::tools::ToolsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Must run before parsing so `env = ...` arguments see `.env` values.
    let dotenv_result = dotenvy::dotenv();
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    match dotenv_result {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env file: {}", e),
    }
    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
        Commands::Chat(args) => commands::chat::handle_chat(args).await,
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
        Commands::Tools(args) => commands::tools::handle_tools(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
