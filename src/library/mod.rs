// Local library - the offline catalog
// Songs found on disk, grouped into artists and albums on the fly.
// Answers the same calls as a remote catalog, so the session can't tell.

#[cfg(feature = "scan")]
pub mod scanner;

#[cfg(feature = "scan")]
pub use scanner::LibraryScanner;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use xxhash_rust::xxh64::xxh64;

use crate::catalog::{Album, Artist, CatalogClient, CatalogError, ItemKind, SearchHits, Song};

/// One file in the library index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    #[serde(default)]
    pub duration_seconds: u64,
}

/// On-disk shape of `library.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct LibraryFile {
    songs: Vec<LibraryEntry>,
}

fn hash_id(key: &str) -> String {
    format!("{:016x}", xxh64(key.as_bytes(), 0))
}

/// Names are matched case-insensitively, paths are not.
fn name_key(parts: &[&str]) -> String {
    parts.join("\u{1f}").to_lowercase()
}

impl LibraryEntry {
    pub fn song_id(&self) -> String {
        hash_id(&self.path.to_string_lossy())
    }

    pub fn artist_id(&self) -> String {
        hash_id(&name_key(&[&self.artist]))
    }

    pub fn album_id(&self) -> String {
        hash_id(&name_key(&[&self.artist, &self.album]))
    }

    pub fn song(&self) -> Song {
        Song {
            id: self.song_id(),
            title: self.title.clone(),
            artist_name: self.artist.clone(),
            artist_id: self.artist_id(),
            album_name: self.album.clone(),
            album_id: self.album_id(),
            duration_seconds: self.duration_seconds,
        }
    }

    fn matches(&self, query: &str) -> bool {
        [&self.title, &self.artist, &self.album]
            .iter()
            .any(|field| field.to_lowercase().contains(query))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocalLibrary {
    entries: Vec<LibraryEntry>,
}

impl LocalLibrary {
    /// Duplicate paths are kept once, first one wins.
    pub fn new(entries: Vec<LibraryEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.path.clone()))
            .collect();
        Self { entries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read library file {}", path.display()))?;
        let file: LibraryFile = serde_json::from_str(&content)
            .with_context(|| format!("Library file {} is corrupt", path.display()))?;
        let library = Self::new(file.songs);
        info!("Loaded {} songs from {}", library.len(), path.display());
        Ok(library)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = LibraryFile {
            songs: self.entries.clone(),
        };
        fs::write(path, serde_json::to_string(&file)?)
            .with_context(|| format!("Could not write library file {}", path.display()))?;
        info!("Saved {} songs to {}", self.len(), path.display());
        Ok(())
    }

    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn find_song(&self, id: &str) -> Option<&LibraryEntry> {
        self.entries.iter().find(|entry| entry.song_id() == id)
    }

    /// Distinct albums among `entries`, in first-seen order.
    fn albums_of<'a>(entries: impl Iterator<Item = &'a LibraryEntry>) -> Vec<Album> {
        let mut seen = HashSet::new();
        entries
            .filter(|entry| seen.insert(entry.album_id()))
            .map(|entry| Album::summary(&entry.album_id(), &entry.album, &entry.artist_id(), &entry.artist))
            .collect()
    }
}

impl CatalogClient for LocalLibrary {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchHits, CatalogError> {
        let query = query.trim().to_lowercase();
        debug!(query = %query, limit, "Searching local library");

        let songs = self
            .entries
            .iter()
            .filter(|entry| entry.matches(&query))
            .take(limit)
            .map(LibraryEntry::song)
            .collect();

        let mut seen_artists = HashSet::new();
        let artists = self
            .entries
            .iter()
            .filter(|entry| entry.artist.to_lowercase().contains(&query))
            .filter(|entry| seen_artists.insert(entry.artist_id()))
            .take(limit)
            .map(|entry| Artist::summary(&entry.artist_id(), &entry.artist))
            .collect();

        let mut albums = Self::albums_of(
            self.entries
                .iter()
                .filter(|entry| entry.album.to_lowercase().contains(&query)),
        );
        albums.truncate(limit);

        Ok(SearchHits { songs, artists, albums })
    }

    async fn lookup_artist(&self, id: &str, max_tracks: usize) -> Result<Artist, CatalogError> {
        let entries: Vec<&LibraryEntry> = self.entries.iter().filter(|entry| entry.artist_id() == id).collect();
        let first = entries.first().ok_or_else(|| CatalogError::NotFound {
            kind: ItemKind::Artist,
            id: id.to_string(),
        })?;

        Ok(Artist {
            id: id.to_string(),
            name: first.artist.clone(),
            songs: entries.iter().take(max_tracks).map(|entry| entry.song()).collect(),
            albums: Self::albums_of(entries.iter().copied()),
            full: true,
        })
    }

    async fn lookup_album(&self, id: &str) -> Result<Album, CatalogError> {
        let entries: Vec<&LibraryEntry> = self.entries.iter().filter(|entry| entry.album_id() == id).collect();
        let first = entries.first().ok_or_else(|| CatalogError::NotFound {
            kind: ItemKind::Album,
            id: id.to_string(),
        })?;

        Ok(Album {
            id: id.to_string(),
            name: first.album.clone(),
            artist_name: first.artist.clone(),
            artist_id: first.artist_id(),
            songs: entries.iter().map(|entry| entry.song()).collect(),
            full: true,
        })
    }

    async fn lookup_song(&self, id: &str) -> Result<Song, CatalogError> {
        self.find_song(id).map(LibraryEntry::song).ok_or_else(|| CatalogError::NotFound {
            kind: ItemKind::Song,
            id: id.to_string(),
        })
    }

    async fn stream_url(&self, id: &str) -> Result<String, CatalogError> {
        let entry = self.find_song(id).ok_or_else(|| CatalogError::NotFound {
            kind: ItemKind::Song,
            id: id.to_string(),
        })?;

        if !entry.path.is_file() {
            return Err(CatalogError::NoStream(entry.path.display().to_string()));
        }
        Ok(entry.path.to_string_lossy().into_owned())
    }
}
