use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Mirrors the now-playing line into a file so status bars can pick it up.
/// Write failures are logged and otherwise ignored.
#[derive(Debug, Clone, Default)]
pub struct NowPlaying {
    path: Option<PathBuf>,
}

impl NowPlaying {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn update(&self, line: &str) {
        self.write(line);
    }

    /// Nothing playing - leave an empty file behind.
    pub fn clear(&self) {
        self.write("");
    }

    fn write(&self, content: &str) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = fs::write(path, content) {
            warn!("Failed to write now-playing file {}: {}", path.display(), e);
        }
    }
}
