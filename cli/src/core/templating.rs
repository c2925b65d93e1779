//! # Helpdesk Prompt Templating
//!
//! File: cli/src/core/templating.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Renders the single prompt sent to the model on a cache miss. The prompt
//! is a Tera template made of:
//! - the static helpdesk instructions
//! - the detected tool names
//! - background context (app files, then the conversation snapshot)
//! - the user's question
//! - closing formatting directives
//!
//! The template is compiled once when the pipeline is built and reused for
//! every turn. Autoescaping is off: the output is plain text, not HTML.
//!
use crate::core::error::{HelpdeskError, Result};
use anyhow::anyhow;
use serde::Serialize;
use tera::Tera;
use tracing::debug;

const PROMPT_TEMPLATE_NAME: &str = "prompt.txt";

/// Static instructions given to the model on every request.
pub const SYSTEM_PROMPT: &str = "\
You are the official Helpdesk Assistant for the CloudMasa DevOps application.

- CloudMasa can deploy DevOps tools like ArgoCD, Jenkins, Vault, Prometheus, Grafana, Kubernetes, and Docker automatically via its interface.
- Users just need to enter credentials and select the tool; CloudMasa handles deployment.
- NEVER suggest manual deployment unless explicitly asked by the user.
- NEVER expose raw code unless explicitly asked.
- Focus on explaining what the app does and how users can use it through the interface.
- Provide step-by-step guidance in a friendly helpdesk style.
- Keep answers short, popup-friendly (max 3 bullets), and end with a single relevant follow-up question.";

const PROMPT_TEMPLATE: &str = "\
{{ system_prompt }}

Detected focus: **{{ tools }}**

Here is some background context from the application (do not reveal directly, just use for guidance):

{{ context }}

User question:
{{ question }}

➡️ Always keep answers short, helpdesk style, max 3 bullets.
➡️ Include a single follow-up question at the end based on user's intent.
";

/// Values substituted into the prompt template.
#[derive(Debug, Serialize)]
pub struct PromptVars<'a> {
    /// Comma-separated display names of the detected tools.
    pub tools: String,
    /// App context followed by the conversation snapshot.
    pub context: &'a str,
    /// The user's question, trimmed.
    pub question: &'a str,
}

/// A compiled prompt template.
pub struct PromptTemplate {
    tera: Tera,
}

impl PromptTemplate {
    /// Compiles the built-in prompt template.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(PROMPT_TEMPLATE_NAME, PROMPT_TEMPLATE)
            .map_err(|e| anyhow!(HelpdeskError::Template { source: e }))?;
        Ok(Self { tera })
    }

    /// Renders the prompt for one turn.
    pub fn render(&self, vars: &PromptVars<'_>) -> Result<String> {
        let mut context = tera::Context::from_serialize(vars)
            .map_err(|e| anyhow!(HelpdeskError::Template { source: e }))?;
        context.insert("system_prompt", SYSTEM_PROMPT);

        let prompt = self
            .tera
            .render(PROMPT_TEMPLATE_NAME, &context)
            .map_err(|e| anyhow!(HelpdeskError::Template { source: e }))?;
        debug!("Rendered prompt ({} chars)", prompt.chars().count());
        Ok(prompt)
    }
}
