use serde_json::Value;

use super::{str_field, with_fallback};
use crate::events::{self, alias_key, slug};

/// Generic Claude notification hook; resolved further via the payload's
/// `notification_type` field.
pub const NOTIFICATION: &str = "notification";

/// Hook names and category synonyms, keyed by their stripped alias form.
const ALIASES: &[(&str, &str)] = &[
    ("stop", events::TASK_COMPLETE),
    ("subagentstop", events::TASK_COMPLETE),
    ("taskcomplete", events::TASK_COMPLETE),
    ("permissionrequest", events::PERMISSION_NEEDED),
    ("permissionneeded", events::PERMISSION_NEEDED),
    ("posttoolusefailure", events::TASK_ERROR),
    ("taskerror", events::TASK_ERROR),
    ("resourcelimit", events::RESOURCE_LIMIT),
    ("precompact", events::CONTEXT_COMPACT),
    ("contextcompact", events::CONTEXT_COMPACT),
    ("sessionstart", events::SESSION_START),
    ("sessionend", events::SESSION_END),
    ("notification", NOTIFICATION),
];

/// Map a raw hook name to its canonical category, falling back to a generic
/// slug for unknown identifiers. Empty input stays empty.
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

pub fn resolve(payload: &Value, event_override: &str) -> (String, Vec<String>) {
    let payload_event = str_field(payload, &["hook_event_name", "event"]);
    let notification_type = str_field(payload, &["notification_type"]);

    let raw_event = if event_override.is_empty() {
        payload_event
    } else {
        event_override.to_string()
    };
    let normalized = normalize(&raw_event);

    let candidates = if normalized == NOTIFICATION {
        resolve_notification(&notification_type)
    } else if events::CLAUDE_CATEGORIES.contains(&normalized.as_str()) {
        with_fallback(&normalized)
    } else {
        // Unrecognized hooks no-op; the caller reports them as unmapped.
        Vec::new()
    };

    (normalized, candidates)
}

fn resolve_notification(notification_type: &str) -> Vec<String> {
    match slug(notification_type).as_str() {
        "permission-prompt" | "elicitation-dialog" => with_fallback(events::PERMISSION_NEEDED),
        "idle-prompt" => with_fallback(events::TASK_COMPLETE),
        _ => Vec::new(),
    }
}
