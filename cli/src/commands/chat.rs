//! # Helpdesk Chat Command
//!
//! File: cli/src/commands/chat.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `helpdesk chat` is the terminal version of the chat widget. One session
//! lives for the whole process: it is created before the first prompt and
//! dropped when the loop ends, taking the transcript and cache with it.
//!
//! Each line read from stdin is one submission. A submission runs to
//! completion, reply printed, before the next line is read.
//!
//! Special inputs:
//! - `/history`: reprint the transcript so far
//! - `/quit` or `/exit` (or end of input): leave
//!
use crate::common::ui;
use crate::core::config::ConfigArgs;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

fn print_prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("Failed to flush stdout")
}

pub async fn handle_chat(args: ChatArgs) -> Result<()> {
    let pipeline = super::build_pipeline(&args.config)?;
    let mut session = pipeline.new_session();
    info!("Chat session started");

    println!("🤖 CloudMasa Bot");
    println!("Ask me a question... (/history to review, /quit to leave)\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_prompt()?;
    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/history" => {
                if session.transcript().is_empty() {
                    println!("(no messages yet)\n");
                }
                for message in session.messages() {
                    println!("{}\n", ui::render_message(message));
                }
            }
            input => {
                if let Some(reply) = pipeline.submit(&mut session, input).await {
                    println!("\n{}\n", ui::render_message(&reply));
                } else {
                    debug!("Blank line ignored");
                }
            }
        }
        print_prompt()?;
    }

    info!(
        "Chat session ended after {} message(s), {} cached repl(ies)",
        session.transcript().len(),
        session.cache().len()
    );
    println!("\nGoodbye!");
    Ok(())
}
