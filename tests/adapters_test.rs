use c_notify::adapters::resolve_events;
use c_notify::config::Config;
use c_notify::events::Tool;
use c_notify::paths::AppPaths;

fn default_config() -> Config {
    let paths = AppPaths {
        root: std::path::PathBuf::from("/nonexistent"),
    };
    Config::defaults(&paths)
}

#[test]
fn codex_ambiguous_completion_classifies_as_resource_limit() {
    let config = default_config();
    let payload =
        r#"{"type":"agent-turn-complete","last-assistant-message":"Error: rate limit exceeded, quota 429"}"#;

    let (normalized, candidates) = resolve_events(Tool::Codex, payload, "", &config);
    assert_eq!(normalized, "agent-turn-complete");
    assert_eq!(candidates, vec!["resource-limit"]);
}

#[test]
fn codex_clean_completion_maps_to_task_complete() {
    let config = default_config();
    let payload = r#"{"type":"agent-turn-complete","last-assistant-message":"All tests pass."}"#;

    let (_, candidates) = resolve_events(Tool::Codex, payload, "", &config);
    assert_eq!(candidates, vec!["task-complete"]);
}

#[test]
fn codex_bare_string_payload_is_treated_as_event_name() {
    let config = default_config();
    let (normalized, candidates) = resolve_events(Tool::Codex, "quota", "", &config);
    assert_eq!(normalized, "resource-limit");
    assert_eq!(candidates, vec!["resource-limit"]);
}

#[test]
fn codex_compaction_event_carries_resource_limit_fallback() {
    let config = default_config();
    let (_, candidates) = resolve_events(Tool::Codex, "", "compact", &config);
    assert_eq!(candidates, vec!["context-compact", "resource-limit"]);
}

#[test]
fn claude_stop_maps_to_task_complete() {
    let config = default_config();
    let payload = r#"{"hook_event_name":"Stop"}"#;

    let (normalized, candidates) = resolve_events(Tool::Claude, payload, "", &config);
    assert_eq!(normalized, "task-complete");
    assert_eq!(candidates, vec!["task-complete"]);
}

#[test]
fn claude_notification_permission_prompt_maps_to_permission_needed() {
    let config = default_config();
    let payload = r#"{"hook_event_name":"Notification","notification_type":"permission_prompt"}"#;

    let (_, candidates) = resolve_events(Tool::Claude, payload, "", &config);
    assert_eq!(candidates, vec!["permission-needed"]);
}

#[test]
fn claude_precompact_injects_fallback_without_duplicates() {
    let config = default_config();
    let payload = r#"{"hook_event_name":"PreCompact"}"#;

    let (_, candidates) = resolve_events(Tool::Claude, payload, "", &config);
    assert_eq!(candidates, vec!["context-compact", "resource-limit"]);
    let mut deduped = candidates.clone();
    deduped.dedup();
    assert_eq!(deduped, candidates);
}

#[test]
fn claude_unmapped_event_yields_no_candidates() {
    let config = default_config();
    let payload = r#"{"hook_event_name":"SomeFutureEvent"}"#;

    let (normalized, candidates) = resolve_events(Tool::Claude, payload, "", &config);
    assert_eq!(normalized, "somefutureevent");
    assert!(candidates.is_empty());
}

#[test]
fn empty_payload_normalizes_to_unknown() {
    let config = default_config();

    let (normalized, candidates) = resolve_events(Tool::Claude, "", "", &config);
    assert_eq!(normalized, "unknown");
    assert!(candidates.is_empty());

    let (normalized, candidates) = resolve_events(Tool::Codex, "", "", &config);
    assert_eq!(normalized, "unknown");
    assert_eq!(candidates, vec!["task-complete"]);
}
