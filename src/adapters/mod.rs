//! Per-tool event adapters: normalize raw hook payloads into canonical
//! categories and build the ordered candidate list to try against the sound
//! library.

use serde_json::Value;

use crate::config::Config;
use crate::events::{self, Tool};

pub mod claude;
pub mod codex;

/// Resolve one hook invocation: returns the normalized event name (or
/// `"unknown"`) plus the ordered, deduplicated category candidates.
pub fn resolve_events(
    tool: Tool,
    raw_payload_text: &str,
    event_override: &str,
    config: &Config,
) -> (String, Vec<String>) {
    let payload = parse_payload(raw_payload_text);
    let (normalized, candidates) = match tool {
        Tool::Codex => codex::resolve(&payload, event_override, config),
        Tool::Claude => claude::resolve(&payload, event_override),
    };

    let normalized = if normalized.is_empty() {
        "unknown".to_string()
    } else {
        normalized
    };
    (normalized, dedupe_keep_order(candidates))
}

/// Parse the raw payload text. Unparseable input is treated as a bare event
/// name rather than an error.
fn parse_payload(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::json!({ "event": raw }))
}

/// First non-empty string among the given payload fields.
fn str_field(payload: &Value, keys: &[&str]) -> String {
    for key in keys {
        if let Some(text) = payload.get(key).and_then(Value::as_str) {
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }
    String::new()
}

/// Library authors may not provide compaction-specific sounds, so a resolved
/// `context-compact` always carries `resource-limit` as a secondary
/// candidate.
fn with_fallback(category: &str) -> Vec<String> {
    let mut out = vec![category.to_string()];
    if category == events::CONTEXT_COMPACT {
        out.push(events::RESOURCE_LIMIT.to_string());
    }
    out
}

fn dedupe_keep_order(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if item.is_empty() || out.contains(&item) {
            continue;
        }
        out.push(item);
    }
    out
}
