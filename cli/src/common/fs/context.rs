//! # Helpdesk App Context Loader
//!
//! File: cli/src/common/fs/context.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Builds the "background context" blob handed to the model: a directory of
//! application sources and docs, concatenated into one string of at most
//! `max_chars` characters.
//!
//! ## Behaviour
//!
//! - The directory is walked recursively in file-name order.
//! - Hidden files and directories (leading `.`) are skipped.
//! - Only files with a known text extension are read (see `CONTEXT_EXTENSIONS`).
//! - Each file contributes `\n--- {file name} ---\n{content}\n`.
//! - Once the budget is reached the blob is cut at exactly `max_chars`
//!   characters and the walk stops.
//! - Unreadable files (permissions, invalid UTF-8) are skipped with a warning.
//! - A missing directory yields an empty context.
//!
//! ```rust
//! let context = load_app_context(Path::new("app_context"), 3000)?;
//! ```
//!
use crate::core::error::{HelpdeskError, Result};
use anyhow::anyhow;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// File extensions treated as context sources.
pub const CONTEXT_EXTENSIONS: [&str; 7] = ["js", "jsx", "py", "md", "txt", "yaml", "yml"];

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn has_context_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CONTEXT_EXTENSIONS.contains(&ext))
}

/// # Load App Context (`load_app_context`)
///
/// Concatenates the context sources under `dir`, capped at `max_chars`
/// characters.
///
/// ## Errors
///
/// Returns `HelpdeskError::Context` if `dir` exists but is not a directory.
pub fn load_app_context(dir: &Path, max_chars: usize) -> Result<String> {
    if !dir.exists() {
        warn!(
            "Context directory '{}' not found; continuing without app context.",
            dir.display()
        );
        return Ok(String::new());
    }
    if !dir.is_dir() {
        return Err(anyhow!(HelpdeskError::Context(format!(
            "'{}' is not a directory",
            dir.display()
        ))));
    }

    let mut context = String::new();
    let mut used_chars = 0usize;
    let mut files_read = 0usize;

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry_result in walker {
        if used_chars >= max_chars {
            break;
        }
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to access entry in '{}': {}", dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() || !has_context_extension(entry.path()) {
            continue;
        }

        let content = match fs::read_to_string(entry.path()) {
            Ok(c) => c,
            Err(e) => {
                warn!("Skipping unreadable context file {}: {}", entry.path().display(), e);
                continue;
            }
        };

        let section = format!(
            "\n--- {} ---\n{}\n",
            entry.file_name().to_string_lossy(),
            content
        );
        let remaining = max_chars - used_chars;
        let section_chars = section.chars().count();
        if section_chars > remaining {
            context.extend(section.chars().take(remaining));
            used_chars = max_chars;
        } else {
            context.push_str(&section);
            used_chars += section_chars;
        }
        files_read += 1;
        debug!("Added context file {}", entry.path().display());
    }

    info!(
        "Loaded {} chars of app context from {} file(s) in {}",
        used_chars,
        files_read,
        dir.display()
    );
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_concatenates_supported_files_in_name_order() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("b.md"), "beta")?;
        fs::write(dir.path().join("a.js"), "alpha")?;
        fs::write(dir.path().join("image.png"), "binary-ish")?;

        let context = load_app_context(dir.path(), 3000)?;
        assert_eq!(context, "\n--- a.js ---\nalpha\n\n--- b.md ---\nbeta\n");
        Ok(())
    }

    #[test]
    fn test_recurses_and_skips_hidden() -> Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("server/routes"))?;
        fs::create_dir_all(dir.path().join(".git"))?;
        fs::write(dir.path().join("server/routes/authRoutes.js"), "router")?;
        fs::write(dir.path().join(".git/notes.txt"), "secret")?;
        fs::write(dir.path().join(".env.txt"), "secret")?;

        let context = load_app_context(dir.path(), 3000)?;
        assert!(context.contains("--- authRoutes.js ---\nrouter"));
        assert!(!context.contains("secret"));
        Ok(())
    }

    #[test]
    fn test_caps_at_budget() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("a.txt"), "x".repeat(50))?;
        fs::write(dir.path().join("b.txt"), "never read")?;

        let context = load_app_context(dir.path(), 20)?;
        assert_eq!(context.chars().count(), 20);
        assert!(context.starts_with("\n--- a.txt ---\n"));
        assert!(!context.contains("b.txt"));
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let context = load_app_context(&dir.path().join("nope"), 100)?;
        assert!(context.is_empty());
        Ok(())
    }

    #[test]
    fn test_file_instead_of_directory_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("context.txt");
        fs::write(&file, "x")?;
        assert!(load_app_context(&file, 100).is_err());
        Ok(())
    }
}
