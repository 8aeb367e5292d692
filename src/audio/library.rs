//! Sound library access: list the eligible files in a category directory and
//! pick one without immediately repeating the last choice.

use rand::seq::SliceRandom;
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::State;

/// Sorted audio files directly under `dir`, filtered by the configured
/// extension set (case-insensitive). Missing or non-directory paths yield an
/// empty list.
pub fn list_audio_files(dir: &Path, extensions: &[String]) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_extension(path, extensions))
        .collect();
    files.sort();
    files
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };
    let dotted = format!(".{}", ext.to_lowercase());
    extensions.iter().any(|allowed| *allowed == dotted)
}

/// Pick a file for `state_key`, excluding the previously played file when the
/// pool allows it. Falls back to the full pool when the exclusion would leave
/// nothing. Records the choice in `state`.
pub fn pick_sound(state: &mut State, state_key: &str, files: &[PathBuf]) -> Option<PathBuf> {
    if files.is_empty() {
        return None;
    }

    let last = state
        .last_played
        .get(state_key)
        .map(String::as_str)
        .unwrap_or("");

    let fresh: Vec<&PathBuf> = if files.len() <= 1 {
        files.iter().collect()
    } else {
        files
            .iter()
            .filter(|file| file.to_string_lossy() != last)
            .collect()
    };
    let pool = if fresh.is_empty() {
        files.iter().collect::<Vec<_>>()
    } else {
        fresh
    };

    let chosen = (*pool.choose(&mut rand::thread_rng())?).clone();
    state
        .last_played
        .insert(state_key.to_string(), chosen.to_string_lossy().into_owned());
    Some(chosen)
}
