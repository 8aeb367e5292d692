//! Detached OS playback. The player process is fire-and-forget: streams are
//! discarded and its lifetime is never awaited; only the pid is recorded so
//! a later invocation can probe for overlap.

use std::path::Path;
use std::process::{Command, Stdio};

/// Spawn the platform audio player detached and return its pid, or `None`
/// when no player binary is available on the host. In that case a terminal
/// bell is emitted so the notification is never fully silent.
pub fn play_detached(file: &Path, volume: f32) -> Option<u32> {
    let pid = spawn_player(file, volume);
    if pid.is_none() {
        print!("\x07");
        let _ = std::io::Write::flush(&mut std::io::stdout());
    }
    pid
}

#[cfg(target_os = "macos")]
fn spawn_player(file: &Path, volume: f32) -> Option<u32> {
    if which::which("afplay").is_err() {
        return None;
    }
    spawn(
        Command::new("afplay")
            .arg("-v")
            .arg(volume.to_string())
            .arg(file),
    )
}

#[cfg(not(target_os = "macos"))]
fn spawn_player(file: &Path, volume: f32) -> Option<u32> {
    let volume = volume.clamp(0.0, 4.0);

    if which::which("pw-play").is_ok() {
        return spawn(
            Command::new("pw-play")
                .arg("--volume")
                .arg(volume.to_string())
                .arg(file),
        );
    }
    if which::which("paplay").is_ok() {
        // paplay takes volume in 1/65536ths of full scale.
        let scaled = (volume * 65536.0) as u32;
        return spawn(
            Command::new("paplay")
                .arg("--volume")
                .arg(scaled.to_string())
                .arg(file),
        );
    }
    if which::which("ffplay").is_ok() {
        let percent = (volume * 100.0) as u32;
        return spawn(
            Command::new("ffplay")
                .args(["-nodisp", "-autoexit", "-loglevel", "quiet", "-volume"])
                .arg(percent.to_string())
                .arg(file),
        );
    }
    if which::which("aplay").is_ok() {
        return spawn(Command::new("aplay").arg(file));
    }

    None
}

fn spawn(command: &mut Command) -> Option<u32> {
    match command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => Some(child.id()),
        Err(err) => {
            tracing::warn!(error = ?err, "failed to spawn audio player");
            None
        }
    }
}
