//! # Session State
//!
//! File: cli/src/assistant/session.rs
//! Author: Christi Mahu
//!
//! A `Session` owns everything that belongs to one conversation: its
//! transcript and its response cache. The caller creates it when a
//! conversation starts, passes it by `&mut` into each pipeline turn, and
//! drops it when the conversation ends. Nothing in a session is shared with
//! any other session.
use super::cache::ResponseCache;
use super::transcript::{Message, Transcript};

#[derive(Debug)]
pub struct Session {
    transcript: Transcript,
    cache: ResponseCache,
}

impl Session {
    /// Starts an empty session whose cache holds up to `cache_capacity` replies.
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            transcript: Transcript::new(),
            cache: ResponseCache::new(cache_capacity),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub(crate) fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub(crate) fn cache_mut(&mut self) -> &mut ResponseCache {
        &mut self.cache
    }
}
