use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::events;
use crate::paths::AppPaths;
use crate::store;

pub const DEFAULT_EXTENSIONS: &[&str] = &[".wav", ".mp3", ".ogg", ".m4a", ".aac", ".aiff", ".flac"];

/// User configuration, loaded once per invocation. Every field has a
/// built-in default; absent or malformed fields in the stored document fall
/// back to it rather than failing the whole load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub enabled: bool,
    pub volume: f32,
    pub sound_root: PathBuf,
    pub extensions: Vec<String>,
    pub prevent_overlap: bool,
    pub cooldown_seconds: f64,
    pub cooldown_by_event: BTreeMap<String, f64>,
    pub hook_strict_exit: bool,
    pub codex_infer_permission_from_text: bool,
    pub codex_keywords: BTreeMap<String, Vec<String>>,
}

impl Config {
    /// Load the stored document merged over the defaults, then persist the
    /// merged result back so the file always reflects the full schema.
    /// Idempotent after the first run.
    pub fn load(paths: &AppPaths) -> anyhow::Result<Self> {
        let config = Self::from_document(store::read(&paths.config_path()), paths);
        config.save(paths)?;
        Ok(config)
    }

    pub fn save(&self, paths: &AppPaths) -> anyhow::Result<()> {
        store::write(&paths.config_path(), self)
    }

    pub fn defaults(paths: &AppPaths) -> Self {
        Self {
            enabled: true,
            volume: 1.0,
            sound_root: paths.default_sound_root(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            prevent_overlap: false,
            cooldown_seconds: 0.0,
            cooldown_by_event: BTreeMap::new(),
            hook_strict_exit: false,
            codex_infer_permission_from_text: false,
            codex_keywords: default_keywords(),
        }
    }

    /// Field-by-field merge of a raw document over the defaults.
    fn from_document(doc: Value, paths: &AppPaths) -> Self {
        let mut config = Self::defaults(paths);
        let Value::Object(map) = doc else {
            return config;
        };

        if let Some(enabled) = store::field(&map, "enabled") {
            config.enabled = enabled;
        }
        if let Some(volume) = store::field::<f32>(&map, "volume") {
            if volume.is_finite() {
                config.volume = volume.max(0.0);
            }
        }
        if let Some(root) = store::field::<String>(&map, "sound_root") {
            if !root.trim().is_empty() {
                config.sound_root = expand_home(&root);
            }
        }
        if let Some(extensions) = store::field::<Vec<String>>(&map, "extensions") {
            let normalized = normalize_extensions(&extensions);
            if !normalized.is_empty() {
                config.extensions = normalized;
            }
        }
        if let Some(prevent) = store::field(&map, "prevent_overlap") {
            config.prevent_overlap = prevent;
        }
        if let Some(seconds) = store::field::<f64>(&map, "cooldown_seconds") {
            if seconds.is_finite() {
                config.cooldown_seconds = seconds.max(0.0);
            }
        }
        if let Some(by_event) = store::field::<BTreeMap<String, f64>>(&map, "cooldown_by_event") {
            config.cooldown_by_event = by_event
                .into_iter()
                .filter(|(_, v)| v.is_finite())
                .map(|(k, v)| (k, v.max(0.0)))
                .collect();
        }
        if let Some(strict) = store::field(&map, "hook_strict_exit") {
            config.hook_strict_exit = strict;
        }
        if let Some(infer) = store::field(&map, "codex_infer_permission_from_text") {
            config.codex_infer_permission_from_text = infer;
        }
        if let Some(keywords) = store::field::<BTreeMap<String, Vec<String>>>(&map, "codex_keywords")
        {
            config.codex_keywords = keywords
                .into_iter()
                .map(|(category, terms)| {
                    let terms: Vec<String> = terms
                        .into_iter()
                        .map(|t| t.to_lowercase())
                        .filter(|t| !t.is_empty())
                        .collect();
                    (category, terms)
                })
                .collect();
        }

        config
    }

    /// Per-category cooldown override, else the global default. Never
    /// negative.
    pub fn cooldown_for(&self, category: &str) -> f64 {
        self.cooldown_by_event
            .get(category)
            .copied()
            .unwrap_or(self.cooldown_seconds)
            .max(0.0)
    }
}

fn default_keywords() -> BTreeMap<String, Vec<String>> {
    let groups: &[(&str, &[&str])] = &[
        (
            events::CONTEXT_COMPACT,
            &["compact", "compaction", "context compressed"],
        ),
        (
            events::RESOURCE_LIMIT,
            &["rate limit", "quota", "429", "token limit", "context length", "context window"],
        ),
        (
            events::PERMISSION_NEEDED,
            &[
                "needs your approval",
                "need your approval",
                "approval requested",
                "approve this",
                "approve the command",
                "allow this command",
                "permission prompt",
            ],
        ),
        (
            events::TASK_ERROR,
            &[
                "error",
                "failed",
                "unable",
                "cannot",
                "can't",
                "denied",
                "permission denied",
                "not found",
                "timed out",
                "exception",
            ],
        ),
    ];

    groups
        .iter()
        .map(|(category, terms)| {
            (
                category.to_string(),
                terms.iter().map(|t| t.to_string()).collect(),
            )
        })
        .collect()
}

/// Normalize the extension list: trimmed, lowercased, dot-prefixed, with
/// empty entries and duplicates dropped. Order is preserved so the persisted
/// document stays stable.
fn normalize_extensions(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in raw {
        let ext = item.trim().to_lowercase();
        if ext.is_empty() || ext == "." {
            continue;
        }
        let ext = if ext.starts_with('.') { ext } else { format!(".{ext}") };
        if !out.contains(&ext) {
            out.push(ext);
        }
    }
    out
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') {
            if let Some(base) = BaseDirs::new() {
                return base.home_dir().join(rest.trim_start_matches('/'));
            }
        }
    }
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_paths() -> (tempfile::TempDir, AppPaths) {
        let dir = tempfile::tempdir().unwrap();
        let paths = AppPaths {
            root: dir.path().to_path_buf(),
        };
        (dir, paths)
    }

    #[test]
    fn malformed_fields_fall_back_to_defaults() {
        let (_dir, paths) = temp_paths();
        let doc = json!({
            "enabled": "definitely",
            "volume": "loud",
            "cooldown_seconds": -5.0,
            "extensions": [" WAV ", "", "mp3", ".mp3"],
        });
        let config = Config::from_document(doc, &paths);
        assert!(config.enabled);
        assert_eq!(config.volume, 1.0);
        assert_eq!(config.cooldown_seconds, 0.0);
        assert_eq!(config.extensions, vec![".wav", ".mp3"]);
    }

    #[test]
    fn negative_volume_clamps_to_zero() {
        let (_dir, paths) = temp_paths();
        let config = Config::from_document(json!({ "volume": -2.5 }), &paths);
        assert_eq!(config.volume, 0.0);
    }

    #[test]
    fn cooldown_override_beats_global() {
        let (_dir, paths) = temp_paths();
        let config = Config::from_document(
            json!({
                "cooldown_seconds": 2.0,
                "cooldown_by_event": { "task-complete": 10.0 },
            }),
            &paths,
        );
        assert_eq!(config.cooldown_for("task-complete"), 10.0);
        assert_eq!(config.cooldown_for("task-error"), 2.0);
    }

    #[test]
    fn keyword_terms_are_lowercased() {
        let (_dir, paths) = temp_paths();
        let config = Config::from_document(
            json!({ "codex_keywords": { "task-error": ["FATAL", ""] } }),
            &paths,
        );
        assert_eq!(config.codex_keywords["task-error"], vec!["fatal"]);
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let (_dir, paths) = temp_paths();
        Config::load(&paths).unwrap();
        let first = std::fs::read_to_string(paths.config_path()).unwrap();
        Config::load(&paths).unwrap();
        let second = std::fs::read_to_string(paths.config_path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn non_object_document_uses_defaults() {
        let (_dir, paths) = temp_paths();
        let config = Config::from_document(json!([1, 2, 3]), &paths);
        assert_eq!(config, Config::defaults(&paths));
    }
}
