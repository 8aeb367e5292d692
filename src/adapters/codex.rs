use serde_json::Value;

use super::{str_field, with_fallback};
use crate::config::Config;
use crate::events::{self, alias_key, slug};

/// Raw Codex notify event fired after every assistant turn. Too coarse to
/// file sounds under directly, so it routes through the message inferrer.
pub const TURN_COMPLETE: &str = "agent-turn-complete";

/// Known raw identifiers and synonyms, keyed by their stripped alias form.
const ALIASES: &[(&str, &str)] = &[
    ("agentturncomplete", TURN_COMPLETE),
    ("turncomplete", TURN_COMPLETE),
    ("complete", events::TASK_COMPLETE),
    ("done", events::TASK_COMPLETE),
    ("taskcomplete", events::TASK_COMPLETE),
    ("permission", events::PERMISSION_NEEDED),
    ("permissionneeded", events::PERMISSION_NEEDED),
    ("approve", events::PERMISSION_NEEDED),
    ("approval", events::PERMISSION_NEEDED),
    ("approvalrequested", events::PERMISSION_NEEDED),
    ("error", events::TASK_ERROR),
    ("taskerror", events::TASK_ERROR),
    ("fail", events::TASK_ERROR),
    ("failed", events::TASK_ERROR),
    ("resourcelimit", events::RESOURCE_LIMIT),
    ("ratelimit", events::RESOURCE_LIMIT),
    ("quota", events::RESOURCE_LIMIT),
    ("contextcompact", events::CONTEXT_COMPACT),
    ("compact", events::CONTEXT_COMPACT),
    ("compaction", events::CONTEXT_COMPACT),
    ("sessionstart", events::SESSION_START),
    ("start", events::SESSION_START),
];

/// Map a raw event identifier to its canonical category, falling back to a
/// generic slug for unknown identifiers. Empty input stays empty.
pub fn normalize(raw_event: &str) -> String {
    if raw_event.trim().is_empty() {
        return String::new();
    }
    let key = alias_key(raw_event);
    for (alias, category) in ALIASES {
        if *alias == key {
            return (*category).to_string();
        }
    }
    slug(raw_event)
}

/// Classify an ambiguous turn-complete message by keyword match. Groups are
/// tried in a fixed priority order so a message hitting several groups
/// classifies deterministically: compaction terms first, then resource
/// limits, then (when enabled) permission prompts, then errors.
pub fn infer_from_message(message: &str, config: &Config) -> String {
    let lowered = message.to_lowercase();

    let mut groups = vec![events::CONTEXT_COMPACT, events::RESOURCE_LIMIT];
    if config.codex_infer_permission_from_text {
        groups.push(events::PERMISSION_NEEDED);
    }
    groups.push(events::TASK_ERROR);

    for group in groups {
        let Some(terms) = config.codex_keywords.get(group) else {
            continue;
        };
        if terms.iter().any(|term| !term.is_empty() && lowered.contains(term.as_str())) {
            return group.to_string();
        }
    }
    events::TASK_COMPLETE.to_string()
}

pub fn resolve(payload: &Value, event_override: &str, config: &Config) -> (String, Vec<String>) {
    let payload_event = str_field(payload, &["type", "event"]);
    let message = str_field(payload, &["last-assistant-message", "message"]);

    let raw_event = if event_override.is_empty() {
        payload_event
    } else {
        event_override.to_string()
    };
    let normalized = normalize(&raw_event);
    let payload_is_turn_complete =
        payload.get("type").and_then(Value::as_str) == Some(TURN_COMPLETE);

    let candidates = if events::CODEX_CATEGORIES.contains(&normalized.as_str()) {
        with_fallback(&normalized)
    } else if normalized == TURN_COMPLETE || payload_is_turn_complete {
        with_fallback(&infer_from_message(&message, config))
    } else {
        vec![events::TASK_COMPLETE.to_string()]
    };

    (normalized, candidates)
}
