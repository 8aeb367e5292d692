use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Event source tool. Each variant carries its own alias table, category set,
/// and resolver (see `adapters`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Codex,
    Claude,
}

impl Tool {
    /// Directory name under the sound root, and the `<tool>:` prefix of
    /// last-played state keys.
    pub fn name(self) -> &'static str {
        match self {
            Tool::Codex => "codex",
            Tool::Claude => "claude",
        }
    }

    /// The canonical categories sounds can be filed under for this tool.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            Tool::Codex => CODEX_CATEGORIES,
            Tool::Claude => CLAUDE_CATEGORIES,
        }
    }

    /// Category descriptions shown by `events` and written into scaffolded
    /// READMEs.
    pub fn event_docs(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Tool::Codex => CODEX_EVENT_DOCS,
            Tool::Claude => CLAUDE_EVENT_DOCS,
        }
    }
}

pub const TASK_COMPLETE: &str = "task-complete";
pub const PERMISSION_NEEDED: &str = "permission-needed";
pub const TASK_ERROR: &str = "task-error";
pub const RESOURCE_LIMIT: &str = "resource-limit";
pub const CONTEXT_COMPACT: &str = "context-compact";
pub const SESSION_START: &str = "session-start";
pub const SESSION_END: &str = "session-end";

pub const CODEX_CATEGORIES: &[&str] = &[
    TASK_COMPLETE,
    PERMISSION_NEEDED,
    TASK_ERROR,
    RESOURCE_LIMIT,
    CONTEXT_COMPACT,
    SESSION_START,
];

pub const CLAUDE_CATEGORIES: &[&str] = &[
    TASK_COMPLETE,
    PERMISSION_NEEDED,
    TASK_ERROR,
    RESOURCE_LIMIT,
    CONTEXT_COMPACT,
    SESSION_START,
    SESSION_END,
];

const CODEX_EVENT_DOCS: &[(&str, &str)] = &[
    (
        TASK_COMPLETE,
        "Assistant turn finished with no error, permission, or resource hint in the message.",
    ),
    (
        PERMISSION_NEEDED,
        "Approval-style event, or inferred from the turn message when text inference is enabled.",
    ),
    (
        TASK_ERROR,
        "Error-style event, or inferred from error keywords in the turn message.",
    ),
    (
        RESOURCE_LIMIT,
        "Inferred from quota/rate-limit keywords in the turn message.",
    ),
    (
        CONTEXT_COMPACT,
        "Inferred from context-compaction keywords in the turn message.",
    ),
    (SESSION_START, "Session start event from custom wiring."),
];

const CLAUDE_EVENT_DOCS: &[(&str, &str)] = &[
    (TASK_COMPLETE, "Stop or SubagentStop hook: the task finished and Claude is waiting."),
    (
        PERMISSION_NEEDED,
        "PermissionRequest hook, or a Notification with a permission-style subtype.",
    ),
    (TASK_ERROR, "PostToolUseFailure hook: a tool execution failed."),
    (RESOURCE_LIMIT, "Fallback category when no compaction-specific sound exists."),
    (CONTEXT_COMPACT, "PreCompact hook: context compaction is about to start."),
    (SESSION_START, "SessionStart hook."),
    (SESSION_END, "SessionEnd hook."),
];

/// Lowercase a raw identifier and collapse non-alphanumeric runs to single
/// hyphens. Used both as the generic fallback for unknown event names and to
/// slugify payload subtypes.
pub fn slug(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut gap = false;
    for ch in value.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !out.is_empty() {
                out.push('-');
            }
            gap = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    out
}

/// Alias-table lookup key: every non-alphanumeric character stripped, rest
/// lowercased, so `SessionStart`, `session-start`, and `session_start` all
/// collapse to one key.
pub fn alias_key(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_runs_and_trims() {
        assert_eq!(slug("  Agent Turn -- Complete! "), "agent-turn-complete");
        assert_eq!(slug("SomeFutureEvent"), "somefutureevent");
        assert_eq!(slug("---"), "");
        assert_eq!(slug(""), "");
    }

    #[test]
    fn alias_key_strips_separators() {
        assert_eq!(alias_key("SessionStart"), "sessionstart");
        assert_eq!(alias_key("session-start"), "sessionstart");
        assert_eq!(alias_key("agent_turn_complete"), "agentturncomplete");
    }

    #[test]
    fn category_sets_cover_their_docs() {
        for tool in [Tool::Codex, Tool::Claude] {
            for (category, _) in tool.event_docs() {
                assert!(tool.categories().contains(category), "{category} missing");
            }
        }
    }
}
