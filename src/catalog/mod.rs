// Catalog - what the user searches, expands, queues and plays
// The client itself is a collaborator: anything id-keyed, limit-bounded
// and failure-reporting can sit behind `CatalogClient`.

pub mod item;

pub use item::{format_time, parse_time, Album, Artist, CatalogItem, ItemKind, ItemRef, Song};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{kind} {id} not found")]
    NotFound { kind: ItemKind, id: String },

    #[error("catalog request failed: {0}")]
    Request(String),

    #[error("no stream available for {0}")]
    NoStream(String),
}

/// Raw search results, already mapped into catalog items.
/// Artist and album hits are expected to be partial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHits {
    pub songs: Vec<Song>,
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
}

impl SearchHits {
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty() && self.artists.is_empty() && self.albums.is_empty()
    }

    pub fn len(&self) -> usize {
        self.songs.len() + self.artists.len() + self.albums.len()
    }
}

/// Everything the session needs from a music catalog.
#[allow(async_fn_in_trait)] // futures are not Send, the session is single-threaded
pub trait CatalogClient {
    async fn search(&self, query: &str, limit: usize) -> Result<SearchHits, CatalogError>;

    /// Full artist with at most `max_tracks` top songs.
    async fn lookup_artist(&self, id: &str, max_tracks: usize) -> Result<Artist, CatalogError>;

    /// Full album with every track.
    async fn lookup_album(&self, id: &str) -> Result<Album, CatalogError>;

    async fn lookup_song(&self, id: &str) -> Result<Song, CatalogError>;

    /// Something the player can open: a URL or a local file path.
    async fn stream_url(&self, id: &str) -> Result<String, CatalogError>;
}
