use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use super::{Player, PlayerError, PlayerExit};
use crate::config::PlayerConfig;

/// Key bindings written next to the config on first run.
/// `quit 11` is what tells us the user wants playback to stop.
pub const DEFAULT_INPUT_CONF: &str = "\
SPACE cycle pause
q quit 11
n quit
9 add volume -2
0 add volume 2
LEFT seek -5
RIGHT seek 5
";

/// mpv's exit code when it quits because of SIGINT or SIGTERM.
pub const SIGNAL_EXIT_CODE: i32 = 4;

/// Runs `mpv` once per song and waits for it.
#[derive(Debug, Clone)]
pub struct MpvPlayer {
    binary: String,
    input_conf: PathBuf,
    extra_args: Vec<String>,
}

impl MpvPlayer {
    pub fn new(binary: impl Into<String>, input_conf: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            input_conf: input_conf.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(config.binary.clone(), config.input_conf.clone()).with_extra_args(config.extra_args.clone())
    }

    /// Extra arguments go before the fixed ones.
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn input_conf(&self) -> &Path {
        &self.input_conf
    }

    fn args(&self, target: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.extra_args.iter().map(OsString::from).collect();
        args.push("--really-quiet".into());
        args.push("--no-video".into());
        args.push("--input-conf".into());
        args.push(self.input_conf.clone().into_os_string());
        args.push(target.into());
        args
    }
}

impl Player for MpvPlayer {
    async fn play(&mut self, target: &str) -> Result<PlayerExit, PlayerError> {
        if !self.input_conf.is_file() {
            return Err(PlayerError::MissingInputConfig(self.input_conf.clone()));
        }

        debug!(binary = %self.binary, target, "Launching player");
        let mut child = Command::new(&self.binary)
            .args(self.args(target))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PlayerError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        // Ctrl-C goes to the whole process group; it means stop, not skip
        let status = tokio::select! {
            status = child.wait() => status.map_err(|source| PlayerError::Spawn {
                binary: self.binary.clone(),
                source,
            })?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted during playback");
                if let Err(e) = child.kill().await {
                    debug!("Player already gone: {}", e);
                }
                return Ok(PlayerExit::Stopped);
            }
        };

        match status.code() {
            Some(SIGNAL_EXIT_CODE) => {
                info!("Player quit on a signal");
                Ok(PlayerExit::Stopped)
            }
            Some(code) => {
                debug!(code, "Player exited");
                Ok(PlayerExit::from_code(code))
            }
            None => Err(PlayerError::Signaled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn input_conf(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("mpv_input.conf");
        std::fs::write(&path, DEFAULT_INPUT_CONF).unwrap();
        path
    }

    #[test]
    fn test_argument_order() {
        let player = MpvPlayer::new("mpv", "/tmp/input.conf").with_extra_args(vec!["--volume=50".to_string()]);
        let args: Vec<String> = player
            .args("https://example.com/stream")
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(
            args,
            vec![
                "--volume=50",
                "--really-quiet",
                "--no-video",
                "--input-conf",
                "/tmp/input.conf",
                "https://example.com/stream",
            ]
        );
    }

    #[test]
    fn test_default_bindings_stop_with_reserved_code() {
        assert!(DEFAULT_INPUT_CONF.lines().any(|line| line == "q quit 11"));
    }

    #[tokio::test]
    async fn test_missing_input_conf() {
        let mut player = MpvPlayer::new("mpv", "/definitely/not/here/input.conf");
        let result = player.play("song.mp3").await;
        assert!(matches!(result, Err(PlayerError::MissingInputConfig(_))));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let dir = TempDir::new().unwrap();
        let mut player = MpvPlayer::new("tunepipe-no-such-player", input_conf(&dir));
        let result = player.play("song.mp3").await;
        assert!(matches!(result, Err(PlayerError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_exit_codes_from_real_process() {
        let dir = TempDir::new().unwrap();
        let conf = input_conf(&dir);

        let mut finished = MpvPlayer::new("sh", conf.clone()).with_extra_args(vec!["-c".into(), "exit 0".into()]);
        assert_eq!(finished.play("song.mp3").await.unwrap(), PlayerExit::Finished);

        let mut errored = MpvPlayer::new("sh", conf.clone()).with_extra_args(vec!["-c".into(), "exit 2".into()]);
        assert_eq!(errored.play("song.mp3").await.unwrap(), PlayerExit::Finished);

        let mut stopped = MpvPlayer::new("sh", conf).with_extra_args(vec!["-c".into(), "exit 11".into()]);
        assert_eq!(stopped.play("song.mp3").await.unwrap(), PlayerExit::Stopped);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_player_killed_by_interrupt_counts_as_stop() {
        let dir = TempDir::new().unwrap();
        let script = "trap 'exit 4' INT; kill -INT $$";
        let mut player =
            MpvPlayer::new("sh", input_conf(&dir)).with_extra_args(vec!["-c".into(), script.into()]);
        assert_eq!(player.play("song.mp3").await.unwrap(), PlayerExit::Stopped);
    }
}
