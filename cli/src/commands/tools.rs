//! # Helpdesk Tools Command
//!
//! File: cli/src/commands/tools.rs
//! Author: Christi Mahu
//!
//! `helpdesk tools` prints the tools the assistant recognizes in questions.
//! Needs no API key.
use crate::assistant::tools::TOOL_VOCABULARY;
use crate::common::ui;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;

#[derive(Parser, Debug)]
pub struct ToolsArgs {
    /// Print the vocabulary as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_tools(args: ToolsArgs) -> Result<()> {
    if args.json {
        let json = serde_json::to_string_pretty(&TOOL_VOCABULARY)
            .context("Failed to serialize tool vocabulary")?;
        println!("{}", json);
    } else {
        println!("{}", ui::render_tool_table());
    }
    Ok(())
}
