use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{CatalogClient, CatalogError};
use crate::view::View;

/// A single track. Songs are always complete - nothing to enrich.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist_name: String,
    pub artist_id: String,
    pub album_name: String,
    pub album_id: String,
    pub duration_seconds: u64,
}

/// An artist. Search hits carry little or nothing in `songs`/`albums`;
/// a lookup by id fills them in and flips `full`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub songs: Vec<Song>,   // top tracks
    pub albums: Vec<Album>, // always partial albums
    pub full: bool,
}

/// An album, same partial/full split as `Artist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub artist_name: String,
    pub artist_id: String,
    pub songs: Vec<Song>,
    pub full: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Song,
    Artist,
    Album,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Song => "song",
            ItemKind::Artist => "artist",
            ItemKind::Album => "album",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogItem {
    Song(Song),
    Artist(Artist),
    Album(Album),
}

/// Borrowed counterpart of `CatalogItem`, handy for rendering a `View`
/// without cloning every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRef<'a> {
    Song(&'a Song),
    Artist(&'a Artist),
    Album(&'a Album),
}

/// Formats a duration as `mm:ss`. Minutes are not wrapped into hours.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Inverse of `format_time`. Accepts `m:ss` with any number of minute digits.
pub fn parse_time(text: &str) -> Option<u64> {
    let (minutes, seconds) = text.trim().split_once(':')?;
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: u64 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    minutes.checked_mul(60)?.checked_add(seconds)
}

impl Song {
    pub fn time(&self) -> String {
        format_time(self.duration_seconds)
    }

    /// Summary artist built from the fields every song carries.
    pub fn artist(&self) -> Artist {
        Artist::summary(&self.artist_id, &self.artist_name)
    }

    /// Summary album built from the fields every song carries.
    pub fn album(&self) -> Album {
        Album::summary(&self.album_id, &self.album_name, &self.artist_id, &self.artist_name)
    }

    pub fn collect(&self) -> View {
        View::new(vec![self.clone()], vec![self.artist()], vec![self.album()])
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.title, self.artist_name, self.album_name)
    }
}

impl Artist {
    pub fn summary(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            songs: Vec::new(),
            albums: Vec::new(),
            full: false,
        }
    }

    /// Returns a full copy of this artist. A full artist is cloned as-is,
    /// a partial one costs exactly one lookup.
    pub async fn fill<C: CatalogClient>(&self, catalog: &C, limit: usize) -> Result<Artist, CatalogError> {
        if self.full {
            return Ok(self.clone());
        }

        debug!(artist_id = %self.id, limit, "Looking up artist");
        let found = catalog.lookup_artist(&self.id, limit).await?;
        Ok(Artist {
            id: self.id.clone(),
            name: self.name.clone(),
            songs: found.songs,
            albums: found.albums,
            full: true,
        })
    }

    pub fn collect(&self, limit: usize) -> View {
        View::new(
            self.songs.iter().take(limit).cloned().collect(),
            vec![self.clone()],
            self.albums.iter().take(limit).cloned().collect(),
        )
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Album {
    pub fn summary(id: &str, name: &str, artist_id: &str, artist_name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            artist_name: artist_name.to_string(),
            artist_id: artist_id.to_string(),
            songs: Vec::new(),
            full: false,
        }
    }

    pub fn artist(&self) -> Artist {
        Artist::summary(&self.artist_id, &self.artist_name)
    }

    /// Albums always come back with every track, the limit only applies
    /// when the album is collected into a `View`.
    pub async fn fill<C: CatalogClient>(&self, catalog: &C) -> Result<Album, CatalogError> {
        if self.full {
            return Ok(self.clone());
        }

        debug!(album_id = %self.id, "Looking up album");
        let found = catalog.lookup_album(&self.id).await?;
        Ok(Album {
            id: self.id.clone(),
            name: self.name.clone(),
            artist_name: self.artist_name.clone(),
            artist_id: self.artist_id.clone(),
            songs: found.songs,
            full: true,
        })
    }

    pub fn collect(&self, limit: usize) -> View {
        View::new(
            self.songs.iter().take(limit).cloned().collect(),
            vec![self.artist()],
            vec![self.clone()],
        )
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.artist_name)
    }
}

impl CatalogItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            CatalogItem::Song(_) => ItemKind::Song,
            CatalogItem::Artist(_) => ItemKind::Artist,
            CatalogItem::Album(_) => ItemKind::Album,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            CatalogItem::Song(song) => &song.id,
            CatalogItem::Artist(artist) => &artist.id,
            CatalogItem::Album(album) => &album.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CatalogItem::Song(song) => &song.title,
            CatalogItem::Artist(artist) => &artist.name,
            CatalogItem::Album(album) => &album.name,
        }
    }

    pub fn is_full(&self) -> bool {
        match self {
            CatalogItem::Song(_) => true,
            CatalogItem::Artist(artist) => artist.full,
            CatalogItem::Album(album) => album.full,
        }
    }

    /// Copy-on-enrich: the receiver is never touched, so the same partial
    /// item can sit in several views safely. On failure the caller still
    /// holds the partial item.
    pub async fn fill<C: CatalogClient>(&self, catalog: &C, limit: usize) -> Result<CatalogItem, CatalogError> {
        match self {
            CatalogItem::Song(song) => Ok(CatalogItem::Song(song.clone())),
            CatalogItem::Artist(artist) => artist.fill(catalog, limit).await.map(CatalogItem::Artist),
            CatalogItem::Album(album) => album.fill(catalog).await.map(CatalogItem::Album),
        }
    }

    /// The drill-down view for this item. The item itself stays
    /// addressable in its own category.
    pub fn collect(&self, limit: usize) -> View {
        match self {
            CatalogItem::Song(song) => song.collect(),
            CatalogItem::Artist(artist) => artist.collect(limit),
            CatalogItem::Album(album) => album.collect(limit),
        }
    }

    /// Songs this item plays: itself, an album's tracks, an artist's top tracks.
    pub fn songs(&self) -> Vec<Song> {
        match self {
            CatalogItem::Song(song) => vec![song.clone()],
            CatalogItem::Artist(artist) => artist.songs.clone(),
            CatalogItem::Album(album) => album.songs.clone(),
        }
    }
}

impl fmt::Display for CatalogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogItem::Song(song) => song.fmt(f),
            CatalogItem::Artist(artist) => artist.fmt(f),
            CatalogItem::Album(album) => album.fmt(f),
        }
    }
}

impl<'a> ItemRef<'a> {
    pub fn to_owned_item(self) -> CatalogItem {
        match self {
            ItemRef::Song(song) => CatalogItem::Song(song.clone()),
            ItemRef::Artist(artist) => CatalogItem::Artist(artist.clone()),
            ItemRef::Album(album) => CatalogItem::Album(album.clone()),
        }
    }

    pub fn kind(self) -> ItemKind {
        match self {
            ItemRef::Song(_) => ItemKind::Song,
            ItemRef::Artist(_) => ItemKind::Artist,
            ItemRef::Album(_) => ItemKind::Album,
        }
    }
}

impl From<Song> for CatalogItem {
    fn from(song: Song) -> Self {
        CatalogItem::Song(song)
    }
}

impl From<Artist> for CatalogItem {
    fn from(artist: Artist) -> Self {
        CatalogItem::Artist(artist)
    }
}

impl From<Album> for CatalogItem {
    fn from(album: Album) -> Self {
        CatalogItem::Album(album)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{album, artist, song, MockCatalog};

    #[test]
    fn test_time_formatting() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(225), "03:45");
        assert_eq!(format_time(3725), "62:05");

        assert_eq!(parse_time("03:45"), Some(225));
        assert_eq!(parse_time("62:05"), Some(3725));
        assert_eq!(parse_time("3:75"), None);
        assert_eq!(parse_time("three"), None);
        assert_eq!(parse_time(""), None);
    }

    #[tokio::test]
    async fn test_fill_full_item_skips_lookup() {
        let catalog = MockCatalog::new();
        let mut full = artist("ar1", "Full Artist");
        full.full = true;

        let filled = CatalogItem::Artist(full.clone()).fill(&catalog, 10).await.unwrap();
        assert_eq!(filled, CatalogItem::Artist(full));
        assert_eq!(catalog.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_fill_is_idempotent() {
        let mut catalog = MockCatalog::new();
        let mut full_album = album("al1", "Album One", "ar1", "Artist");
        full_album.songs = vec![song("s1", "One"), song("s2", "Two")];
        full_album.full = true;
        catalog.add_album(full_album);

        let partial = CatalogItem::Album(album("al1", "Album One", "ar1", "Artist"));
        let once = partial.fill(&catalog, 10).await.unwrap();
        assert_eq!(catalog.lookup_count(), 1);

        let twice = once.fill(&catalog, 10).await.unwrap();
        assert_eq!(once, twice);
        assert_eq!(catalog.lookup_count(), 1);

        // receiver untouched
        assert!(!partial.is_full());
        assert_eq!(once.id(), partial.id());
        assert_eq!(once.name(), partial.name());
        assert_eq!(once.songs().len(), 2);
    }

    #[tokio::test]
    async fn test_fill_artist_keeps_identity() {
        let mut catalog = MockCatalog::new();
        let mut looked_up = artist("ar9", "Name From Lookup");
        looked_up.songs = vec![song("s1", "Hit")];
        looked_up.albums = vec![album("al1", "Debut", "ar9", "Name From Lookup")];
        looked_up.full = true;
        catalog.add_artist(looked_up);

        let partial = artist("ar9", "Name From Search");
        let filled = partial.fill(&catalog, 5).await.unwrap();
        assert!(filled.full);
        assert_eq!(filled.id, "ar9");
        assert_eq!(filled.name, "Name From Search");
        assert_eq!(filled.songs.len(), 1);
        assert_eq!(filled.albums.len(), 1);
    }

    #[tokio::test]
    async fn test_fill_failure_leaves_partial_usable() {
        let catalog = MockCatalog::new();
        let partial = CatalogItem::Artist(artist("missing", "Nobody"));

        let result = partial.fill(&catalog, 5).await;
        assert!(matches!(result, Err(CatalogError::NotFound { .. })));
        assert!(!partial.is_full());
        assert_eq!(partial.name(), "Nobody");
    }

    #[tokio::test]
    async fn test_song_fill_is_noop() {
        let catalog = MockCatalog::new();
        let item = CatalogItem::Song(song("s1", "Only"));
        assert_eq!(item.fill(&catalog, 3).await.unwrap(), item);
        assert_eq!(catalog.lookup_count(), 0);
    }

    #[test]
    fn test_collect_song() {
        let s = song("s1", "Track");
        let view = CatalogItem::Song(s.clone()).collect(10);
        assert_eq!(view.songs(), &[s.clone()]);
        assert_eq!(view.artists().len(), 1);
        assert_eq!(view.artists()[0].id, s.artist_id);
        assert_eq!(view.albums().len(), 1);
        assert_eq!(view.albums()[0].id, s.album_id);
    }

    #[test]
    fn test_collect_album_and_artist_respect_limit() {
        let mut al = album("al1", "Long Album", "ar1", "Artist");
        al.songs = (0..5).map(|i| song(&format!("s{}", i), "Track")).collect();
        al.full = true;

        let view = CatalogItem::Album(al.clone()).collect(3);
        assert_eq!(view.songs().len(), 3);
        assert_eq!(view.artists()[0].id, "ar1");
        assert_eq!(view.albums(), &[al.clone()]);

        let mut ar = artist("ar1", "Artist");
        ar.songs = al.songs.clone();
        ar.albums = vec![al.clone(), album("al2", "Second", "ar1", "Artist")];
        ar.full = true;

        let view = CatalogItem::Artist(ar.clone()).collect(1);
        assert_eq!(view.songs().len(), 1);
        assert_eq!(view.artists(), &[ar]);
        assert_eq!(view.albums().len(), 1);
    }

    #[test]
    fn test_display_strings() {
        let s = song("s1", "Title");
        assert_eq!(s.to_string(), "Title - Artist - Album");
        let al = album("al1", "Record", "ar1", "Band");
        assert_eq!(al.to_string(), "Record - Band");
    }
}
