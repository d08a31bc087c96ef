// Configuration management for tunepipe
// Handles loading/saving settings, with sensible defaults when config is missing

use anyhow::{Context, Result};
use dirs::{config_dir, data_local_dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::playback::mpv::DEFAULT_INPUT_CONF;

const APP_DIR: &str = "tunepipe";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Playlists, library index and logs live here
    pub data_dir: PathBuf,
    pub music_directories: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now_playing_file: Option<PathBuf>,
    pub player: PlayerConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub binary: String,
    pub input_conf: PathBuf,
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub colour: bool,
    /// Upper bound on items per category, on top of what fits on screen
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
}

fn app_config_dir() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR);

        Self {
            data_dir,
            music_directories: vec![dirs::audio_dir().unwrap_or_else(|| PathBuf::from("~/Music"))],
            now_playing_file: None,
            player: PlayerConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            binary: "mpv".to_string(),
            input_conf: app_config_dir().join("mpv_input.conf"),
            extra_args: Vec::new(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            colour: true,
            max_results: None,
        }
    }
}

impl Config {
    /// Loads `path` if given (it must exist), otherwise the default location,
    /// writing defaults there on first run.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let config_path = Self::config_path();
                if config_path.exists() {
                    Self::load_from(&config_path)
                } else {
                    let config = Config::default();
                    config.save(&config_path)?;
                    info!("Wrote default config to {}", config_path.display());
                    Ok(config)
                }
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;

        Ok(())
    }

    pub fn config_path() -> PathBuf {
        app_config_dir().join("config.toml")
    }

    pub fn playlists_dir(&self) -> PathBuf {
        self.data_dir.join("playlists")
    }

    pub fn library_path(&self) -> PathBuf {
        self.data_dir.join("library.json")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    /// Creates the data directory and the player key bindings if missing.
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Could not create {}", self.data_dir.display()))?;

        let input_conf = &self.player.input_conf;
        if !input_conf.exists() {
            if let Some(parent) = input_conf.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(input_conf, DEFAULT_INPUT_CONF)
                .with_context(|| format!("Could not write {}", input_conf.display()))?;
            info!("Wrote default player bindings to {}", input_conf.display());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
data_dir = "/tmp/tunepipe-test"

[ui]
max_results = 5
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tunepipe-test"));
        assert_eq!(config.ui.max_results, Some(5));
        assert!(config.ui.colour);
        assert_eq!(config.player.binary, "mpv");
        assert_eq!(config.playlists_dir(), PathBuf::from("/tmp/tunepipe-test/playlists"));
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "data_dir = [not toml").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.now_playing_file = Some(dir.path().join("np"));
        config.player.extra_args = vec!["--volume=40".to_string()];

        config.save(&path).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_prepare_writes_player_bindings() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data_dir = dir.path().join("data");
        config.player.input_conf = dir.path().join("conf").join("mpv_input.conf");

        config.prepare().unwrap();
        assert!(config.data_dir.is_dir());
        assert_eq!(fs::read_to_string(&config.player.input_conf).unwrap(), DEFAULT_INPUT_CONF);
    }
}
