//! # Message Pipeline
//!
//! File: cli/src/assistant/pipeline.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Turns one raw user utterance into one finished assistant message. This is
//! the only place the pieces of the `assistant` module are composed.
//!
//! ## Turn flow
//!
//! 1. Blank input is ignored: nothing is recorded and `None` is returned.
//! 2. The trimmed question is appended to the transcript.
//! 3. Greetings ("hi", "hello", ...) get a canned welcome straight away. No
//!    model call, no cache read or write, no sanitizing.
//! 4. Otherwise tools are detected and the context snapshot is taken from the
//!    transcript, which already includes the new question.
//! 5. A cache hit on the normalized question reuses the stored reply.
//! 6. On a miss the prompt is rendered and the generator is called once.
//! 7. The raw reply is sanitized and a follow-up line is appended. If
//!    generation failed, the error text becomes the reply instead. Either way
//!    the result is cached and appended to the transcript with the detected
//!    tools.
//!
//! Failed generations are cached like successes, so repeating the exact
//! question in the same session returns the same error without calling the
//! model again. Each failure is logged at WARN.
//!
//! ## Examples
//!
//! ```rust
//! let pipeline = MessagePipeline::from_config(&config, api_key)?;
//! let mut session = pipeline.new_session();
//! if let Some(reply) = pipeline.submit(&mut session, "How do I deploy Vault?").await {
//!     println!("{}", reply.content);
//! }
//! ```
//!
use super::cache::normalize_input;
use super::followup::{append_followup, select_followup};
use super::generator::{GeminiClient, Generator};
use super::sanitizer::sanitize_reply;
use super::session::Session;
use super::tools::{detect_tools, tool_names, ToolTag, GENERAL_TAG};
use super::transcript::Message;
use crate::common::fs::context::load_app_context;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::templating::{PromptTemplate, PromptVars};
use anyhow::anyhow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Inputs answered with `GREETING_REPLY`, compared after trim + lowercase.
pub const GREETINGS: [&str; 6] = [
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

pub const GREETING_REPLY: &str =
    "Hi there! Welcome to CloudMasa's DevOps support. How can I help you today?";

/// Prefix of the reply shown when generation fails.
pub const ERROR_REPLY_PREFIX: &str = "⚠️ AI error: ";

/// Returns `true` if `input` is exactly one of the greeting phrases.
pub fn is_greeting(input: &str) -> bool {
    GREETINGS.contains(&normalize_input(input).as_str())
}

/// Per-pipeline limits applied to every session it serves.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub transcript_max_chars: usize,
    pub cache_capacity: usize,
}

pub struct MessagePipeline {
    generator: Arc<dyn Generator>,
    template: PromptTemplate,
    app_context: String,
    settings: PipelineSettings,
}

impl MessagePipeline {
    pub fn new(
        generator: Arc<dyn Generator>,
        app_context: String,
        settings: PipelineSettings,
    ) -> Result<Self> {
        Ok(Self {
            generator,
            template: PromptTemplate::new()?,
            app_context,
            settings,
        })
    }

    /// Builds the production pipeline: Gemini client plus app context loaded
    /// from the configured directory.
    pub fn from_config(config: &Config, api_key: String) -> Result<Self> {
        let generator = GeminiClient::new(api_key, &config.model.api_base, &config.model.name);
        info!(
            "Using {} model '{}' at {}",
            generator.name(),
            config.model.name,
            config.model.api_base
        );

        let app_context = match &config.context.directory {
            Some(dir) => load_app_context(dir, config.context.max_chars)?,
            None => String::new(),
        };

        Self::new(
            Arc::new(generator),
            app_context,
            PipelineSettings {
                transcript_max_chars: config.context.transcript_max_chars,
                cache_capacity: config.cache.capacity,
            },
        )
    }

    /// Starts a fresh session sized for this pipeline.
    pub fn new_session(&self) -> Session {
        Session::new(self.settings.cache_capacity)
    }

    /// Runs one turn. Returns the assistant message appended to the
    /// transcript, or `None` when the input was blank.
    pub async fn submit(&self, session: &mut Session, input: &str) -> Option<Message> {
        let question = input.trim();
        if question.is_empty() {
            debug!("Ignoring blank input");
            return None;
        }

        session.transcript_mut().push(Message::user(question));

        let (content, tools) = if is_greeting(question) {
            debug!("Greeting detected, skipping generation");
            (GREETING_REPLY.to_string(), vec![GENERAL_TAG])
        } else {
            let tools = detect_tools(question);
            let snapshot = session
                .transcript()
                .context_snapshot(self.settings.transcript_max_chars);

            let cached = session.cache_mut().get(question);
            let reply = match cached {
                Some(reply) => reply,
                None => {
                    let reply = match self.generate_reply(question, &tools, &snapshot).await {
                        Ok(reply) => reply,
                        Err(e) => {
                            warn!("Generation failed for '{}': {:#}", question, e);
                            format!("{}{}", ERROR_REPLY_PREFIX, e)
                        }
                    };
                    session.cache_mut().insert(question, reply.clone());
                    reply
                }
            };
            (reply, tools)
        };

        let message = Message::assistant(content, tools);
        session.transcript_mut().push(message.clone());
        Some(message)
    }

    fn background_context(&self, snapshot: &str) -> String {
        if self.app_context.is_empty() {
            snapshot.to_string()
        } else {
            format!("{}\n{}", self.app_context, snapshot)
        }
    }

    async fn generate_reply(
        &self,
        question: &str,
        tools: &[ToolTag],
        snapshot: &str,
    ) -> Result<String> {
        let context = self.background_context(snapshot);
        let prompt = self.template.render(&PromptVars {
            tools: tool_names(tools),
            context: &context,
            question,
        })?;

        let raw = self
            .generator
            .generate(&prompt)
            .await
            .map_err(|e| anyhow!(e))?;
        let reply = sanitize_reply(Some(&raw));
        Ok(append_followup(&reply, select_followup(question, tools)))
    }
}
