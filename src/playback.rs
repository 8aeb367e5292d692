//! Stateful playback selection: cooldown suppression, overlap prevention,
//! and the per-invocation candidate loop.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::audio::{library, player};
use crate::config::Config;
use crate::events::Tool;
use crate::state::State;

/// Host capabilities the orchestrator needs: a wall clock, a process
/// liveness probe, and audio playback. Injected so tests can substitute
/// fakes without spawning real processes.
pub trait Dispatcher {
    fn now(&self) -> f64;
    fn pid_alive(&self, pid: i32) -> bool;
    fn play(&self, file: &Path, volume: f32) -> Option<i32>;
}

/// Real clock, signal-0 probe, and detached OS player.
pub struct SystemDispatcher;

impl Dispatcher for SystemDispatcher {
    fn now(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    #[cfg(unix)]
    fn pid_alive(&self, pid: i32) -> bool {
        if pid <= 0 {
            return false;
        }
        // Signal 0 probes for existence without delivering anything.
        unsafe { libc::kill(pid, 0) == 0 }
    }

    #[cfg(not(unix))]
    fn pid_alive(&self, _pid: i32) -> bool {
        false
    }

    fn play(&self, file: &Path, volume: f32) -> Option<i32> {
        player::play_detached(file, volume).map(|pid| pid as i32)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackResult {
    pub file: Option<PathBuf>,
    pub category: Option<String>,
    /// True when the overlap guard aborted the invocation before any
    /// candidate was attempted.
    pub suppressed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Played,
    NoSound,
    Unmapped,
    Suppressed,
}

impl HookOutcome {
    pub fn classify(candidates: &[String], result: &PlaybackResult) -> Self {
        if result.suppressed {
            HookOutcome::Suppressed
        } else if result.file.is_some() {
            HookOutcome::Played
        } else if candidates.is_empty() {
            HookOutcome::Unmapped
        } else {
            HookOutcome::NoSound
        }
    }

    /// Exit codes are a compatibility contract for shell integrations that
    /// branch on them; do not renumber.
    pub fn exit_code(self, strict: bool) -> i32 {
        if !strict {
            return 0;
        }
        match self {
            HookOutcome::Played | HookOutcome::Suppressed => 0,
            HookOutcome::Unmapped => 2,
            HookOutcome::NoSound => 3,
        }
    }
}

/// Whether `category` fired within its cooldown window. A non-positive
/// threshold disables the cooldown; an absent or non-positive last timestamp
/// counts as "never fired".
pub fn on_cooldown(config: &Config, state: &State, category: &str, now: f64) -> bool {
    let threshold = config.cooldown_for(category);
    if threshold <= 0.0 {
        return false;
    }
    let last = state
        .last_event_ts
        .get(category)
        .copied()
        .unwrap_or(0.0);
    if last <= 0.0 {
        return false;
    }
    now - last < threshold
}

/// Try each candidate in order and play the first that is off cooldown and
/// has a non-empty sound directory. Mutates `state` (last-played file, last
/// event timestamp, playback pid) on success.
pub fn attempt_playback(
    tool: Tool,
    candidates: &[String],
    config: &Config,
    state: &mut State,
    dispatcher: &dyn Dispatcher,
) -> PlaybackResult {
    let now = dispatcher.now();

    if config.prevent_overlap {
        if let Some(pid) = state.playback_pid {
            if dispatcher.pid_alive(pid) {
                tracing::debug!(pid, "previous playback still running; suppressing");
                return PlaybackResult {
                    suppressed: true,
                    ..PlaybackResult::default()
                };
            }
        }
        state.playback_pid = None;
    }

    for category in candidates {
        if on_cooldown(config, state, category, now) {
            tracing::debug!(category = %category, "on cooldown; skipping");
            continue;
        }

        let dir = config.sound_root.join(tool.name()).join(category);
        let files = library::list_audio_files(&dir, &config.extensions);
        if files.is_empty() {
            continue;
        }

        let state_key = format!("{}:{}", tool.name(), category);
        let Some(chosen) = library::pick_sound(state, &state_key, &files) else {
            continue;
        };

        let pid = dispatcher.play(&chosen, config.volume.max(0.0));
        state.last_event_ts.insert(category.clone(), now);
        state.playback_pid = pid;

        tracing::debug!(category = %category, file = %chosen.display(), "played");
        return PlaybackResult {
            file: Some(chosen),
            category: Some(category.clone()),
            suppressed: false,
        };
    }

    PlaybackResult::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::AppPaths;
    use std::cell::RefCell;
    use std::fs;

    struct FakeDispatcher {
        now: f64,
        alive: bool,
        pid: Option<i32>,
        played: RefCell<Vec<PathBuf>>,
    }

    impl FakeDispatcher {
        fn new(now: f64) -> Self {
            Self {
                now,
                alive: false,
                pid: Some(4242),
                played: RefCell::new(Vec::new()),
            }
        }
    }

    impl Dispatcher for FakeDispatcher {
        fn now(&self) -> f64 {
            self.now
        }

        fn pid_alive(&self, _pid: i32) -> bool {
            self.alive
        }

        fn play(&self, file: &Path, _volume: f32) -> Option<i32> {
            self.played.borrow_mut().push(file.to_path_buf());
            self.pid
        }
    }

    fn setup(root: &Path) -> Config {
        let paths = AppPaths {
            root: root.to_path_buf(),
        };
        Config::defaults(&paths)
    }

    fn seed_sound(config: &Config, tool: Tool, category: &str, name: &str) -> PathBuf {
        let dir = config.sound_root.join(tool.name()).join(category);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, b"riff").unwrap();
        path
    }

    #[test]
    fn cooldown_window_is_strict() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = setup(dir.path());
        config
            .cooldown_by_event
            .insert("task-complete".into(), 10.0);

        let mut state = State::default();
        state.last_event_ts.insert("task-complete".into(), 100.0);

        assert!(on_cooldown(&config, &state, "task-complete", 109.0));
        assert!(!on_cooldown(&config, &state, "task-complete", 110.001));
    }

    #[test]
    fn cooldown_disabled_when_threshold_nonpositive() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path());
        let mut state = State::default();
        state.last_event_ts.insert("task-complete".into(), 100.0);
        assert!(!on_cooldown(&config, &state, "task-complete", 100.1));
    }

    #[test]
    fn cooldown_never_fired_is_false() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = setup(dir.path());
        config.cooldown_seconds = 10.0;
        let state = State::default();
        assert!(!on_cooldown(&config, &state, "task-complete", 5.0));
    }

    #[test]
    fn first_candidate_with_sounds_wins() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path());
        let file = seed_sound(&config, Tool::Codex, "resource-limit", "beep.wav");

        let dispatcher = FakeDispatcher::new(50.0);
        let mut state = State::default();
        let candidates = vec!["context-compact".to_string(), "resource-limit".to_string()];
        let result = attempt_playback(Tool::Codex, &candidates, &config, &mut state, &dispatcher);

        assert_eq!(result.file, Some(file));
        assert_eq!(result.category.as_deref(), Some("resource-limit"));
        assert_eq!(state.playback_pid, Some(4242));
        assert_eq!(state.last_event_ts["resource-limit"], 50.0);
        assert_eq!(dispatcher.played.borrow().len(), 1);
    }

    #[test]
    fn cooldown_skips_to_next_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = setup(dir.path());
        config.cooldown_by_event.insert("task-error".into(), 60.0);
        seed_sound(&config, Tool::Codex, "task-error", "err.wav");
        let fallback = seed_sound(&config, Tool::Codex, "task-complete", "ok.wav");

        let dispatcher = FakeDispatcher::new(100.0);
        let mut state = State::default();
        state.last_event_ts.insert("task-error".into(), 90.0);

        let candidates = vec!["task-error".to_string(), "task-complete".to_string()];
        let result = attempt_playback(Tool::Codex, &candidates, &config, &mut state, &dispatcher);
        assert_eq!(result.file, Some(fallback));
    }

    #[test]
    fn exhausted_candidates_play_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = setup(dir.path());
        let dispatcher = FakeDispatcher::new(1.0);
        let mut state = State::default();

        let candidates = vec!["task-complete".to_string()];
        let result = attempt_playback(Tool::Claude, &candidates, &config, &mut state, &dispatcher);
        assert_eq!(result, PlaybackResult::default());
        assert!(dispatcher.played.borrow().is_empty());
    }

    #[test]
    fn overlap_guard_suppresses_when_pid_alive() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = setup(dir.path());
        config.prevent_overlap = true;
        seed_sound(&config, Tool::Codex, "task-complete", "ok.wav");

        let mut dispatcher = FakeDispatcher::new(1.0);
        dispatcher.alive = true;

        let mut state = State::default();
        state.playback_pid = Some(999);
        let before = state.clone();

        let candidates = vec!["task-complete".to_string()];
        let result = attempt_playback(Tool::Codex, &candidates, &config, &mut state, &dispatcher);
        assert!(result.suppressed);
        assert_eq!(state, before);
        assert!(dispatcher.played.borrow().is_empty());
    }

    #[test]
    fn overlap_guard_clears_dead_pid_and_proceeds() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = setup(dir.path());
        config.prevent_overlap = true;
        seed_sound(&config, Tool::Codex, "task-complete", "ok.wav");

        let dispatcher = FakeDispatcher::new(1.0);
        let mut state = State::default();
        state.playback_pid = Some(999);

        let candidates = vec!["task-complete".to_string()];
        let result = attempt_playback(Tool::Codex, &candidates, &config, &mut state, &dispatcher);
        assert!(result.file.is_some());
        assert_eq!(state.playback_pid, Some(4242));
    }

    #[test]
    fn outcome_classification_and_exit_codes() {
        let played = PlaybackResult {
            file: Some(PathBuf::from("a.wav")),
            category: Some("task-complete".into()),
            suppressed: false,
        };
        let none = PlaybackResult::default();
        let suppressed = PlaybackResult {
            suppressed: true,
            ..PlaybackResult::default()
        };
        let some_candidates = vec!["task-complete".to_string()];

        assert_eq!(
            HookOutcome::classify(&some_candidates, &played),
            HookOutcome::Played
        );
        assert_eq!(
            HookOutcome::classify(&some_candidates, &none),
            HookOutcome::NoSound
        );
        assert_eq!(HookOutcome::classify(&[], &none), HookOutcome::Unmapped);
        assert_eq!(
            HookOutcome::classify(&some_candidates, &suppressed),
            HookOutcome::Suppressed
        );

        assert_eq!(HookOutcome::Played.exit_code(true), 0);
        assert_eq!(HookOutcome::Unmapped.exit_code(true), 2);
        assert_eq!(HookOutcome::NoSound.exit_code(true), 3);
        assert_eq!(HookOutcome::Unmapped.exit_code(false), 0);
    }
}
