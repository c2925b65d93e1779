//! # Helpdesk Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads, merges and validates the Helpdesk configuration and
//! resolves the one required secret, the Gemini API key.
//!
//! ## Architecture
//!
//! Configuration sources (lowest to highest precedence):
//! 1. Default values defined in the code
//! 2. User-specific `config.toml` in the platform config directory
//!    (e.g. `~/.config/helpdesk/config.toml`)
//! 3. Project-specific `.helpdesk.toml` in the current directory or an
//!    ancestor (the search stops at a `.git` directory), or the file named
//!    by `--config`
//! 4. Command-line flags
//!
//! Files are deserialized into `FileConfig`, whose fields are all optional,
//! so a file only overrides what it actually sets. Relative context
//! directories in a file are resolved against that file's directory.
//!
//! The API key never lives in a config file. It is read from the
//! `GEMINI_API_KEY` environment variable (a local `.env` is loaded into the
//! environment first) or `--api-key`. Its absence is fatal at startup.
//!
//! ## Examples
//!
//! ```toml
//! [model]
//! name = "gemini-1.5-flash"
//!
//! [context]
//! directory = "app_context"
//! max_chars = 3000
//!
//! [cache]
//! capacity = 256
//! ```
//!
//! ```rust
//! let cfg = config::load_config(&args.config)?;
//! let api_key = config::require_api_key(args.config.api_key.as_deref())?;
//! ```
//!
use crate::core::error::{HelpdeskError, Result};
use anyhow::{anyhow, Context};
use clap::Args;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

const PROJECT_CONFIG_FILENAME: &str = ".helpdesk.toml";

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_CONTEXT_CHARS: usize = 3000;
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// # Configuration Flags (`ConfigArgs`)
///
/// Flags shared by every command that runs the message pipeline. They are
/// flattened into the `ask`, `chat` and `serve` argument structs.
#[derive(Args, Clone, Default)]
pub struct ConfigArgs {
    /// Gemini API key. Falls back to the GEMINI_API_KEY environment variable.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name, e.g. `gemini-1.5-flash`.
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the Gemini REST API.
    #[arg(long)]
    pub api_base: Option<String>,

    /// Directory of application files used as background context.
    #[arg(long)]
    pub context_dir: Option<PathBuf>,

    /// Explicit config file, replacing the `.helpdesk.toml` search.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl std::fmt::Debug for ConfigArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigArgs")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("context_dir", &self.context_dir)
            .field("config", &self.config)
            .finish()
    }
}

/// Represents the effective configuration after all sources are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub model: ModelConfig,
    pub context: ContextConfig,
    pub cache: CacheConfig,
}

/// Which model to call and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub name: String,
    pub api_base: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Background context budgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextConfig {
    /// Directory scanned by the app context loader. `None` disables it.
    pub directory: Option<PathBuf>,
    /// Character budget for the app context blob.
    pub max_chars: usize,
    /// Character budget for the conversation snapshot sent with each prompt.
    pub transcript_max_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            directory: None,
            max_chars: DEFAULT_CONTEXT_CHARS,
            transcript_max_chars: DEFAULT_CONTEXT_CHARS,
        }
    }
}

/// Response cache sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of cached replies per session. `0` disables caching.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// On-disk shape of a config file. Every field is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    model: FileModelConfig,
    #[serde(default)]
    context: FileContextConfig,
    #[serde(default)]
    cache: FileCacheConfig,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileModelConfig {
    name: Option<String>,
    api_base: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileContextConfig {
    directory: Option<String>,
    max_chars: Option<usize>,
    transcript_max_chars: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileCacheConfig {
    capacity: Option<usize>,
}

impl Config {
    /// Overlays the settings present in `file`. Relative directories are
    /// resolved against `base_dir`, the directory containing the file.
    fn apply_file(&mut self, file: FileConfig, base_dir: &Path) {
        if let Some(name) = file.model.name {
            self.model.name = name;
        }
        if let Some(api_base) = file.model.api_base {
            self.model.api_base = api_base;
        }
        if let Some(dir) = file.context.directory {
            let expanded = PathBuf::from(shellexpand::tilde(&dir).into_owned());
            self.context.directory = Some(if expanded.is_absolute() {
                expanded
            } else {
                base_dir.join(expanded)
            });
        }
        if let Some(max_chars) = file.context.max_chars {
            self.context.max_chars = max_chars;
        }
        if let Some(max_chars) = file.context.transcript_max_chars {
            self.context.transcript_max_chars = max_chars;
        }
        if let Some(capacity) = file.cache.capacity {
            self.cache.capacity = capacity;
        }
    }

    /// Command-line flags win over every file.
    fn apply_args(&mut self, args: &ConfigArgs) {
        if let Some(model) = &args.model {
            self.model.name = model.clone();
        }
        if let Some(api_base) = &args.api_base {
            self.model.api_base = api_base.clone();
        }
        if let Some(dir) = &args.context_dir {
            self.context.directory = Some(dir.clone());
        }
    }
}

/// # Load Configuration (`load_config`)
///
/// Builds the effective `Config` from defaults, the user config file, the
/// project (or explicit) config file and the command-line flags, then
/// expands and validates it.
///
/// ## Errors
///
/// Returns an error if a config file exists but cannot be read or parsed,
/// or if the merged configuration fails validation.
pub fn load_config(args: &ConfigArgs) -> Result<Config> {
    let mut config = Config::default();

    if let Some((path, file)) = load_user_config()? {
        config.apply_file(file, parent_dir(&path));
    }

    let project = match &args.config {
        Some(explicit) => {
            info!("Loading configuration from: {}", explicit.display());
            Some((explicit.clone(), load_config_from_path(explicit)?))
        }
        None => load_project_config()?,
    };
    if let Some((path, file)) = project {
        config.apply_file(file, parent_dir(&path));
    }

    config.apply_args(args);
    expand_config_paths(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

/// # Require API Key (`require_api_key`)
///
/// Returns the API key passed on the command line (clap already falls back to
/// `GEMINI_API_KEY`). A missing or blank key is a fatal startup condition.
pub fn require_api_key(explicit: Option<&str>) -> Result<String> {
    match explicit.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(anyhow!(HelpdeskError::MissingApiKey {
            var: API_KEY_ENV.to_string(),
        })),
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn load_user_config() -> Result<Option<(PathBuf, FileConfig)>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "CloudMasa", "helpdesk") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            let file = load_config_from_path(&config_path)?;
            Ok(Some((config_path, file)))
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<(PathBuf, FileConfig)>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(path) = find_project_config_path(&current_dir) {
        info!("Loading project configuration from: {}", path.display());
        let file = load_config_from_path(&path)?;
        Ok(Some((path, file)))
    } else {
        debug!(
            "No project configuration file ({}) found in current directory or ancestors.",
            PROJECT_CONFIG_FILENAME
        );
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn expand_config_paths(config: &mut Config) {
    if let Some(dir) = &config.context.directory {
        let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
        debug!("Expanded context directory: {}", expanded);
        config.context.directory = Some(PathBuf::from(expanded));
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if config.model.name.trim().is_empty() {
        return Err(anyhow!(HelpdeskError::Config(
            "Model name cannot be empty.".to_string()
        )));
    }
    let api_base = config.model.api_base.trim();
    if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
        return Err(anyhow!(HelpdeskError::Config(format!(
            "Invalid API base URL: '{}'. Expected an http:// or https:// URL.",
            config.model.api_base
        ))));
    }
    // A missing directory is reported by the context loader.
    if let Some(dir) = &config.context.directory {
        if dir.exists() && !dir.is_dir() {
            return Err(anyhow!(HelpdeskError::Config(format!(
                "Configured context path '{}' exists but is not a directory.",
                dir.display()
            ))));
        }
    }
    Ok(())
}
