use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};

use anyhow::Context;

use crate::paths::AppPaths;
use crate::store;

/// Small mutable runtime state, rewritten in full after every playback
/// attempt. Keys in `last_played` are `"<tool>:<category>"`; keys in
/// `last_event_ts` are bare categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct State {
    pub last_played: BTreeMap<String, String>,
    pub last_event_ts: BTreeMap<String, f64>,
    pub playback_pid: Option<i32>,
}

impl State {
    pub fn load(paths: &AppPaths) -> Self {
        let mut state = State::default();
        let Value::Object(map) = store::read(&paths.state_path()) else {
            return state;
        };
        if let Some(last_played) = store::field(&map, "last_played") {
            state.last_played = last_played;
        }
        if let Some(last_event_ts) = store::field(&map, "last_event_ts") {
            state.last_event_ts = last_event_ts;
        }
        if let Some(pid) = store::field(&map, "playback_pid") {
            state.playback_pid = pid;
        }
        state
    }

    pub fn save(&self, paths: &AppPaths) -> anyhow::Result<()> {
        store::write(&paths.state_path(), self)
    }
}

/// Exclusive advisory lock serializing the state read-modify-write cycle
/// across concurrent hook invocations. Held until dropped; closing the file
/// releases it. On platforms without `flock` this degrades to a no-op.
pub struct StateLock {
    _file: File,
}

impl StateLock {
    pub fn acquire(paths: &AppPaths) -> anyhow::Result<Self> {
        fs::create_dir_all(&paths.root)
            .with_context(|| format!("create {}", paths.root.display()))?;
        let path = paths.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open {}", path.display()))?;
        lock_exclusive(&file)?;
        Ok(Self { _file: file })
    }
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> anyhow::Result<()> {
    use std::os::unix::io::AsRawFd;

    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error()).context("lock state file");
    }
    Ok(())
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> anyhow::Result<()> {
    Ok(())
}
