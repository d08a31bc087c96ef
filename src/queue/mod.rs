// Queue - songs waiting to be played, in playback order
// Every song appears once. Albums expand into their tracks, artists are
// refused. Saved to disk only when the user asks.

pub mod store;

pub use store::{PlaylistStore, StoreError};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::{parse_time, CatalogClient, CatalogItem, Song};
use crate::playback::{PlaybackCoordinator, Player};
use crate::ui::Renderer;
use crate::view::View;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("Can only add songs or albums to the queue.")]
    NotQueueable,
}

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("not a list of songs: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("only {valid} of {total} records are valid")]
    InvalidRecords { valid: usize, total: usize },
}

/// One saved song. Flat on purpose: enough to play without asking the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub time: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub artist_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub album_id: String,
}

impl From<&Song> for SongRecord {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id.clone(),
            name: song.title.clone(),
            artist: song.artist_name.clone(),
            album: song.album_name.clone(),
            time: song.time(),
            artist_id: song.artist_id.clone(),
            album_id: song.album_id.clone(),
        }
    }
}

impl SongRecord {
    /// `None` when the record can't describe a playable song.
    pub fn into_song(self) -> Option<Song> {
        if self.id.trim().is_empty() {
            return None;
        }
        let duration_seconds = parse_time(&self.time)?;
        Some(Song {
            id: self.id,
            title: self.name,
            artist_name: self.artist,
            artist_id: self.artist_id,
            album_name: self.album,
            album_id: self.album_id,
            duration_seconds,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Queue {
    songs: Vec<Song>,
    ids: HashSet<String>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Adds a song unless its id is already queued.
    pub fn push_song(&mut self, song: Song) -> bool {
        if !self.ids.insert(song.id.clone()) {
            debug!(song_id = %song.id, "Skipping duplicate");
            return false;
        }
        self.songs.push(song);
        true
    }

    /// Returns how many songs were actually added.
    pub fn append(&mut self, item: &CatalogItem) -> Result<usize, QueueError> {
        match item {
            CatalogItem::Song(song) => Ok(usize::from(self.push_song(song.clone()))),
            CatalogItem::Album(album) => Ok(self.extend_songs(album.songs.iter().cloned())),
            CatalogItem::Artist(_) => Err(QueueError::NotQueueable),
        }
    }

    /// All-or-nothing: if any item can't be queued, nothing is added.
    pub fn extend(&mut self, items: &[CatalogItem]) -> Result<usize, QueueError> {
        if items.iter().any(|item| matches!(item, CatalogItem::Artist(_))) {
            return Err(QueueError::NotQueueable);
        }

        let mut added = 0;
        for item in items {
            added += self.append(item)?;
        }
        Ok(added)
    }

    pub fn extend_songs(&mut self, songs: impl IntoIterator<Item = Song>) -> usize {
        songs.into_iter().filter(|song| self.push_song(song.clone())).count()
    }

    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::thread_rng());
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.songs.shuffle(rng);
    }

    /// Songs and ids always go together, a stale id would reject a fresh append.
    pub fn clear(&mut self) {
        self.songs.clear();
        self.ids.clear();
    }

    /// The queue as a songs-only view, at most `limit` entries.
    pub fn collect(&self, limit: usize) -> View {
        View::from_songs(self.songs.iter().take(limit).cloned().collect())
    }

    pub fn serialize(&self) -> Result<Vec<u8>, serde_json::Error> {
        let records: Vec<SongRecord> = self.songs.iter().map(SongRecord::from).collect();
        serde_json::to_vec_pretty(&records)
    }

    /// Rejects the whole file if any record is unusable.
    pub fn deserialize(bytes: &[u8]) -> Result<Queue, RestoreError> {
        let values: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
        let total = values.len();

        let songs: Vec<Song> = values
            .into_iter()
            .filter_map(|value| serde_json::from_value::<SongRecord>(value).ok())
            .filter_map(SongRecord::into_song)
            .collect();

        if songs.len() != total {
            return Err(RestoreError::InvalidRecords {
                valid: songs.len(),
                total,
            });
        }

        let mut queue = Queue::new();
        queue.extend_songs(songs);
        Ok(queue)
    }

    /// Replaces the queue's contents with `other`'s.
    pub fn restore(&mut self, other: Queue) {
        *self = other;
    }

    /// Plays a snapshot of the queue. The live queue is empty while the
    /// player runs; whatever wasn't played comes back afterwards.
    pub async fn play<C, P, R>(&mut self, coordinator: &mut PlaybackCoordinator<'_, C, P, R>) -> Option<usize>
    where
        C: CatalogClient,
        P: Player,
        R: Renderer,
    {
        let snapshot = std::mem::take(&mut self.songs);
        self.ids.clear();

        let remainder = coordinator.play(&snapshot).await;
        if let Some(index) = remainder {
            let restored = self.extend_songs(snapshot.into_iter().skip(index));
            info!(restored, "Put unplayed songs back in the queue");
        }
        remainder
    }
}
