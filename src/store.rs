//! Flat JSON document helpers shared by the config and state stores.

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Read a JSON document, yielding `Value::Null` for missing or unparseable
/// files. Callers fall back to their built-in defaults.
pub(crate) fn read(path: &Path) -> Value {
    match fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap_or(Value::Null),
        Err(_) => Value::Null,
    }
}

/// Rewrite a document in full. Documents are never partially patched, so a
/// write interrupted mid-cycle cannot leave a mix of old and new fields.
pub(crate) fn write(path: &Path, value: &impl Serialize) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let mut raw = serde_json::to_string_pretty(value).context("serialize document")?;
    raw.push('\n');
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))
}

/// Pull one field out of a document, ignoring it when absent or malformed.
pub(crate) fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    map.get(key)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}
