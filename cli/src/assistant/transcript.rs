//! # Transcript
//!
//! File: cli/src/assistant/transcript.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The ordered record of everything said in one session. Messages are only
//! ever appended; nothing is edited or removed, so a message's index is
//! stable for the life of the session.
//!
//! The transcript also produces the *context snapshot* sent with each prompt:
//! all message contents joined with newlines, capped at a character budget.
//! When the transcript is over budget the oldest text is dropped, so the
//! snapshot always ends with the latest message.
//!
use super::tools::ToolTag;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Tools the reply concerns. Always empty for user messages.
    pub tools: Vec<ToolTag>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tools: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, tools: Vec<ToolTag>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tools,
            created_at: Utc::now(),
        }
    }
}

/// Append-only message list for one session.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Newline-joined message contents, keeping at most the last
    /// `max_chars` characters.
    pub fn context_snapshot(&self, max_chars: usize) -> String {
        let joined = self
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        tail_chars(&joined, max_chars).to_string()
    }
}

/// Returns the last `max` characters of `text`.
fn tail_chars(text: &str, max: usize) -> &str {
    let total = text.chars().count();
    if total <= max {
        return text;
    }
    match text.char_indices().nth(total - max) {
        Some((idx, _)) => &text[idx..],
        None => "",
    }
}
