//! # Helpdesk Ask Command
//!
//! File: cli/src/commands/ask.rs
//! Author: Christi Mahu
//!
//! `helpdesk ask <QUESTION>...` runs exactly one pipeline turn in a fresh
//! session and prints the assistant's reply to stdout. Words are joined with
//! spaces, so quoting the question is optional.
//!
//! ```bash
//! helpdesk ask how do I deploy ArgoCD
//! helpdesk ask --model gemini-1.5-pro "What does Vault do here?"
//! ```
use crate::core::config::ConfigArgs;
use crate::core::error::Result;
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The question to send to the helpdesk.
    #[arg(required = true, num_args = 1..)]
    pub question: Vec<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

pub async fn handle_ask(args: AskArgs) -> Result<()> {
    let pipeline = super::build_pipeline(&args.config)?;
    let mut session = pipeline.new_session();

    let question = args.question.join(" ");
    info!("Asking: {}", question);
    match pipeline.submit(&mut session, &question).await {
        Some(reply) => println!("{}", reply.content),
        None => warn!("Question was blank; nothing to ask."),
    }
    Ok(())
}
