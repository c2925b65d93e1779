//! # Reply Sanitizer
//!
//! File: cli/src/assistant/sanitizer.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Keeps raw code out of helpdesk replies. If the model's text contains any
//! code indicator (a fence or a `import `/`def `/`class `/`function `
//! keyword) the text is replaced by a short bullet summary of its first
//! lines. Everything else passes through untouched.
//!
//! This is a substring heuristic, not a parser. Prose such as "a class of
//! problems" trips it too; that is accepted.
//!
use tracing::debug;

/// Reply used when the model returned nothing.
pub const EMPTY_REPLY_FALLBACK: &str =
    "⚠️ I wasn’t able to generate a response. Please try rephrasing your question.";

/// Header placed above the bullet summary of a code-like reply.
pub const CODE_SUMMARY_HEADER: &str =
    "ℹ️ I won’t show raw code directly.\nHere’s the process in simple steps instead:\n";

/// Summary used when a code-like reply has no usable lines.
pub const TOO_TECHNICAL_FALLBACK: &str = "This part looked too technical, so I simplified it.";

const CODE_FENCE: &str = "```";
const CODE_INDICATORS: [&str; 5] = [CODE_FENCE, "import ", "def ", "class ", "function "];
const MAX_BULLETS: usize = 3;
const MAX_BULLET_CHARS: usize = 100;

/// Returns `true` if `reply` contains any code indicator.
pub fn looks_like_code(reply: &str) -> bool {
    CODE_INDICATORS.iter().any(|pattern| reply.contains(pattern))
}

/// Applies the content filter to a raw model reply.
pub fn sanitize_reply(reply: Option<&str>) -> String {
    let reply = match reply.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return EMPTY_REPLY_FALLBACK.to_string(),
    };

    if looks_like_code(reply) {
        debug!("Reply contains code indicators, replacing with summary");
        return format!("{}{}", CODE_SUMMARY_HEADER, summarize_reply(reply));
    }
    reply.to_string()
}

/// Bullets the first non-blank lines of `reply`.
///
/// Fence lines are skipped and stray fences inside a line are removed, so
/// the summary itself never contains a fence.
pub fn summarize_reply(reply: &str) -> String {
    let steps: Vec<String> = reply
        .lines()
        .map(|line| line.replace(CODE_FENCE, ""))
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_BULLETS)
        .map(|line| format!("- {}", truncate_chars(&line, MAX_BULLET_CHARS)))
        .collect();

    if steps.is_empty() {
        TOO_TECHNICAL_FALLBACK.to_string()
    } else {
        steps.join("\n")
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
