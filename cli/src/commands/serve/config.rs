//! # Helpdesk HTTP Server Configuration
//!
//! File: cli/src/commands/serve/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Command-line arguments for `helpdesk serve` and the `ServerConfig` the
//! server logic consumes. Network settings come from flags (with
//! `HELPDESK_HOST` / `HELPDESK_PORT` environment fallbacks); model and
//! context settings come from the shared `ConfigArgs` and the config files.
//!
//! ```bash
//! # Local only, default port 8000
//! helpdesk serve
//!
//! # All interfaces, custom port, no CORS headers
//! helpdesk serve --host 0.0.0.0 --port 9000 --no-cors
//! ```
//!
use super::sessions::{SessionLimits, DEFAULT_MAX_SESSIONS};
use crate::core::config::ConfigArgs;
use clap::Parser;
use std::net::IpAddr;
use std::time::Duration;

/// How many consecutive ports to try when the requested one is taken.
pub const MAX_PORT_ATTEMPTS: u8 = 10;

/// # Serve Command Arguments (`ServeArgs`)
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on. The next free port is used if it is taken.
    #[arg(long, short, env = "HELPDESK_PORT", default_value_t = 8000)]
    pub port: u16,

    /// Address to bind. Use `0.0.0.0` to accept connections from other hosts.
    #[arg(long, env = "HELPDESK_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Do not send CORS headers. By default any origin may call the API,
    /// so a chat widget hosted elsewhere can reach it.
    #[arg(long)]
    pub no_cors: bool,

    /// Maximum open sessions. At the limit, the least recently active
    /// session is closed to make room. `0` means unlimited.
    #[arg(long, default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,

    /// Minutes without activity after which a session is closed.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub idle_timeout: u64,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// # Effective Server Configuration (`ServerConfig`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Requested port; the bound port may be higher.
    pub port: u16,
    /// Address to bind.
    pub host: IpAddr,
    /// Whether permissive CORS headers are sent.
    pub enable_cors: bool,
    /// Session cap and idle expiry.
    pub session_limits: SessionLimits,
}

impl ServerConfig {
    pub fn from_args(args: &ServeArgs) -> Self {
        Self {
            port: args.port,
            host: args.host,
            enable_cors: !args.no_cors,
            session_limits: SessionLimits {
                max_sessions: args.max_sessions,
                idle_timeout: Duration::from_secs(args.idle_timeout * 60),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_defaults() {
        let args = ServeArgs::parse_from(["serve"]);
        let config = ServerConfig::from_args(&args);
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(config.enable_cors);
        assert_eq!(config.session_limits, SessionLimits::default());
    }

    #[test]
    fn test_flags() {
        let args = ServeArgs::parse_from([
            "serve",
            "--port",
            "9100",
            "--host",
            "0.0.0.0",
            "--no-cors",
            "--model",
            "gemini-1.5-pro",
            "--max-sessions",
            "50",
            "--idle-timeout",
            "5",
        ]);
        let config = ServerConfig::from_args(&args);
        assert_eq!(config.port, 9100);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert!(!config.enable_cors);
        assert_eq!(args.config.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.session_limits.max_sessions, 50);
        assert_eq!(config.session_limits.idle_timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_idle_timeout_must_be_positive() {
        assert!(ServeArgs::try_parse_from(["serve", "--idle-timeout", "0"]).is_err());
    }
}
