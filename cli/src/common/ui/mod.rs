//! # Helpdesk Terminal Rendering (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//! Author: Christi Mahu
//!
//! Formats transcript messages for the terminal. The terminal stands in for
//! the chat widget: user lines are labelled `You:`, assistant lines carry the
//! icons of the tools they concern.
use crate::assistant::tools::{ToolTag, TOOL_VOCABULARY};
use crate::assistant::{Message, Role};

/// Renders one message as the chat widget would show it.
pub fn render_message(message: &Message) -> String {
    match message.role {
        Role::User => format!("You:\n{}", message.content),
        Role::Assistant => {
            let icons = message
                .tools
                .iter()
                .map(|tag| tag.icon)
                .collect::<Vec<_>>()
                .join(" ");
            format!("{} Assistant:\n{}", icons, message.content)
        }
    }
}

/// One line per known tool: icon, name and the keyword that triggers it.
pub fn render_tool_table() -> String {
    TOOL_VOCABULARY
        .iter()
        .map(render_tool_row)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_tool_row(tag: &ToolTag) -> String {
    format!("{}  {:<12} (keyword: {})", tag.icon, tag.name, tag.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::tools::{detect_tools, GENERAL_TAG};

    #[test]
    fn renders_user_message() {
        assert_eq!(render_message(&Message::user("hi")), "You:\nhi");
    }

    #[test]
    fn renders_assistant_icons() {
        let message = Message::assistant("ok", detect_tools("vault on docker"));
        assert_eq!(render_message(&message), "🔒 🐳 Assistant:\nok");

        let message = Message::assistant("ok", vec![GENERAL_TAG]);
        assert_eq!(render_message(&message), "🤖 Assistant:\nok");
    }

    #[test]
    fn tool_table_lists_every_tool() {
        let table = render_tool_table();
        assert_eq!(table.lines().count(), TOOL_VOCABULARY.len());
        assert!(table.lines().next().unwrap().contains("ArgoCD"));
        assert!(table.contains("(keyword: docker)"));
    }
}
