use anyhow::Context;
use directories::BaseDirs;
use std::path::PathBuf;

/// Environment override for the application directory, mainly for tests and
/// sandboxed installs.
pub const HOME_ENV: &str = "C_NOTIFY_HOME";

/// Filesystem context for one invocation: where the config, state, and lock
/// documents live. Built once at startup and threaded explicitly through
/// every command.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
}

impl AppPaths {
    pub fn discover() -> anyhow::Result<Self> {
        if let Ok(root) = std::env::var(HOME_ENV) {
            if !root.trim().is_empty() {
                return Ok(Self { root: PathBuf::from(root) });
            }
        }
        let base = BaseDirs::new().context("unable to resolve home directory")?;
        Ok(Self {
            root: base.home_dir().join(".c-notify"),
        })
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join("state.json")
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".state.lock")
    }

    pub fn default_sound_root(&self) -> PathBuf {
        self.root.join("sounds")
    }
}
