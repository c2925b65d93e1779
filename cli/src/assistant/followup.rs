//! # Follow-up Selection
//!
//! File: cli/src/assistant/followup.rs
//! Author: Christi Mahu
//!
//! Picks the single follow-up question appended to every generated reply.
//! Buckets are checked in priority order and the first hit wins; there is no
//! merging when several match.
//!
//! The detected tools are accepted but deliberately not consulted: selection
//! looks only at keywords in the raw question.
use super::tools::ToolTag;

pub const DEPLOYMENT_FOLLOWUP: &str =
    "Do you want me to show the step-by-step deployment using the CloudMasa interface?";
pub const TOOLS_FOLLOWUP: &str =
    "Do you want me to see how to use one of these tools in CloudMasa?";
pub const MONITORING_FOLLOWUP: &str =
    "Do you want to learn how to monitor your app in real-time using CloudMasa?";
pub const DEFAULT_FOLLOWUP: &str = "What would you like to do next in CloudMasa?";

/// Marker glyph placed before the follow-up line.
pub const FOLLOWUP_MARKER: &str = "💡";

/// Chooses a follow-up question for `input`.
pub fn select_followup(input: &str, _tools: &[ToolTag]) -> &'static str {
    let lower = input.to_lowercase();
    if lower.contains("deploy") {
        DEPLOYMENT_FOLLOWUP
    } else if lower.contains("tool") {
        TOOLS_FOLLOWUP
    } else if lower.contains("monitor") || lower.contains("metric") {
        MONITORING_FOLLOWUP
    } else {
        DEFAULT_FOLLOWUP
    }
}

/// Appends the follow-up line to a sanitized reply.
pub fn append_followup(reply: &str, followup: &str) -> String {
    format!("{}\n\n{} {}", reply, FOLLOWUP_MARKER, followup)
}
