use anyhow::Result;
use id3::TagLike;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::LibraryEntry;

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";
const MAX_FILE_SIZE: u64 = 1_000_000_000;

/// Walks music directories and turns tagged audio files into library entries.
#[derive(Clone)]
pub struct LibraryScanner {
    supported_extensions: Vec<String>,
}

#[derive(Debug, Default)]
struct Tags {
    title: Option<String>,
    artist: Option<String>,
    album: Option<String>,
    duration_seconds: Option<u64>,
}

impl LibraryScanner {
    pub fn new() -> Self {
        Self {
            supported_extensions: ["mp3", "flac", "ogg", "oga", "opus", "mp4", "m4a", "aac", "wav"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }

    pub fn scan_directory(&self, path: &Path) -> Vec<LibraryEntry> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(path).follow_links(true).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || is_hidden(path) {
                continue;
            }

            // Skip empty files and anything absurdly large
            if let Ok(metadata) = fs::metadata(path) {
                if metadata.len() == 0 || metadata.len() > MAX_FILE_SIZE {
                    continue;
                }
            }

            if self.is_supported_file(path) {
                entries.push(self.entry_from_file(path));
            }
        }

        entries
    }

    /// Missing directories are skipped with a warning.
    pub fn scan_directories(&self, paths: &[PathBuf]) -> Result<Vec<LibraryEntry>> {
        let mut all_entries = Vec::new();

        for path in paths {
            if !path.is_dir() {
                warn!("Music directory {} does not exist, skipping", path.display());
                continue;
            }
            let mut entries = self.scan_directory(path);
            info!("Found {} songs in {}", entries.len(), path.display());
            all_entries.append(&mut entries);
        }

        Ok(all_entries)
    }

    fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.supported_extensions.contains(&ext.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    fn entry_from_file(&self, path: &Path) -> LibraryEntry {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let tags = match extension.as_str() {
            "mp3" => read_id3(path),
            "mp4" | "m4a" | "aac" => read_mp4(path),
            _ => Ok(Tags::default()),
        }
        .unwrap_or_else(|e| {
            debug!("No usable tags in {}: {}", path.display(), e);
            Tags::default()
        });

        let title = tags.title.filter(|t| !t.trim().is_empty()).unwrap_or_else(|| {
            path.file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or("Unknown")
                .to_string()
        });

        LibraryEntry {
            path: path.to_path_buf(),
            title,
            artist: non_empty_or(tags.artist, UNKNOWN_ARTIST),
            album: non_empty_or(tags.album, UNKNOWN_ALBUM),
            duration_seconds: tags.duration_seconds.unwrap_or(0),
        }
    }
}

impl Default for LibraryScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map_or(false, |n| n.starts_with('.'))
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn read_id3(path: &Path) -> Result<Tags> {
    let tag = id3::Tag::read_from_path(path)?;
    Ok(Tags {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.album_artist().or(tag.artist()).map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        // TLEN is in milliseconds
        duration_seconds: tag.duration().map(|ms| u64::from(ms) / 1000),
    })
}

fn read_mp4(path: &Path) -> Result<Tags> {
    let tag = mp4ameta::Tag::read_from_path(path)?;
    Ok(Tags {
        title: tag.title().map(|s| s.to_string()),
        artist: tag.album_artist().or(tag.artist()).map(|s| s.to_string()),
        album: tag.album().map(|s| s.to_string()),
        duration_seconds: None,
    })
}
