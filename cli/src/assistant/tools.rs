//! # Tool Detection
//!
//! File: cli/src/assistant/tools.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Maps a user question to the DevOps tools it mentions. Matching is a
//! case-insensitive substring search for each tag key, so "ArgoCD" and
//! "argocd-server" both hit `argocd`. Results keep vocabulary order, not the
//! order the words appear in the question. When nothing matches, the single
//! `GENERAL_TAG` is returned so every assistant message carries an icon.
//!
use serde::Serialize;

/// A product or technology the helpdesk knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolTag {
    /// Lowercase substring searched for in the user's text.
    pub key: &'static str,
    /// Human-readable name, used in prompts.
    pub name: &'static str,
    /// Icon shown next to assistant replies.
    pub icon: &'static str,
}

/// Known tools, in detection order.
pub const TOOL_VOCABULARY: [ToolTag; 7] = [
    ToolTag {
        key: "argocd",
        name: "ArgoCD",
        icon: "📦",
    },
    ToolTag {
        key: "jenkins",
        name: "Jenkins",
        icon: "🤖",
    },
    ToolTag {
        key: "vault",
        name: "Vault",
        icon: "🔒",
    },
    ToolTag {
        key: "prometheus",
        name: "Prometheus",
        icon: "📊",
    },
    ToolTag {
        key: "grafana",
        name: "Grafana",
        icon: "📈",
    },
    ToolTag {
        key: "kubernetes",
        name: "Kubernetes",
        icon: "☸️",
    },
    ToolTag {
        key: "docker",
        name: "Docker",
        icon: "🐳",
    },
];

/// Fallback tag when no known tool is mentioned.
pub const GENERAL_TAG: ToolTag = ToolTag {
    key: "general",
    name: "General DevOps",
    icon: "🤖",
};

/// Returns the tools mentioned in `input`, or `[GENERAL_TAG]`.
pub fn detect_tools(input: &str) -> Vec<ToolTag> {
    let lower = input.to_lowercase();
    let matched: Vec<ToolTag> = TOOL_VOCABULARY
        .iter()
        .filter(|tag| lower.contains(tag.key))
        .copied()
        .collect();

    if matched.is_empty() {
        vec![GENERAL_TAG]
    } else {
        matched
    }
}

/// Comma-separated display names, as injected into the prompt.
pub fn tool_names(tools: &[ToolTag]) -> String {
    tools
        .iter()
        .map(|tag| tag.name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tools: &[ToolTag]) -> Vec<&'static str> {
        tools.iter().map(|t| t.name).collect()
    }

    #[test]
    fn detects_tools_in_vocabulary_order() {
        let tools = detect_tools("please deploy jenkins and vault");
        assert_eq!(names(&tools), vec!["Jenkins", "Vault"]);

        // Word order in the question does not matter.
        let tools = detect_tools("Docker first, then ArgoCD");
        assert_eq!(names(&tools), vec!["ArgoCD", "Docker"]);
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let tools = detect_tools("Is my KUBERNETES-cluster healthy?");
        assert_eq!(names(&tools), vec!["Kubernetes"]);
    }

    #[test]
    fn falls_back_to_general() {
        assert_eq!(detect_tools("how do I reset my password"), vec![GENERAL_TAG]);
        assert_eq!(detect_tools(""), vec![GENERAL_TAG]);
    }

    #[test]
    fn joins_tool_names() {
        let tools = detect_tools("grafana with prometheus");
        assert_eq!(tool_names(&tools), "Prometheus, Grafana");
        assert_eq!(tool_names(&[GENERAL_TAG]), "General DevOps");
    }
}
