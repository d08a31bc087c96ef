// Test doubles shared by the unit tests: an in-memory catalog, a player
// that follows a script, and a renderer that remembers everything.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use crate::catalog::{Album, Artist, CatalogClient, CatalogError, ItemKind, SearchHits, Song};
use crate::playback::{Player, PlayerError, PlayerExit};
use crate::ui::{Limits, Renderer};
use crate::view::View;

pub fn song(id: &str, title: &str) -> Song {
    Song {
        id: id.to_string(),
        title: title.to_string(),
        artist_name: "Artist".to_string(),
        artist_id: "ar1".to_string(),
        album_name: "Album".to_string(),
        album_id: "al1".to_string(),
        duration_seconds: 200,
    }
}

pub fn artist(id: &str, name: &str) -> Artist {
    Artist::summary(id, name)
}

pub fn album(id: &str, name: &str, artist_id: &str, artist_name: &str) -> Album {
    Album::summary(id, name, artist_id, artist_name)
}

#[derive(Debug, Default)]
pub struct MockCatalog {
    hits: SearchHits,
    search_fails: bool,
    artists: HashMap<String, Artist>,
    albums: HashMap<String, Album>,
    no_stream: HashSet<String>,
    lookups: Cell<usize>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hits(mut self, hits: SearchHits) -> Self {
        self.hits = hits;
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.search_fails = true;
        self
    }

    pub fn without_stream(mut self, id: &str) -> Self {
        self.no_stream.insert(id.to_string());
        self
    }

    pub fn add_artist(&mut self, artist: Artist) {
        self.artists.insert(artist.id.clone(), artist);
    }

    pub fn add_album(&mut self, album: Album) {
        self.albums.insert(album.id.clone(), album);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.get()
    }

    /// Every song reachable from the search hits or a registered artist or album.
    fn known_songs(&self) -> impl Iterator<Item = &Song> {
        self.hits
            .songs
            .iter()
            .chain(self.artists.values().flat_map(|artist| artist.songs.iter()))
            .chain(self.albums.values().flat_map(|album| album.songs.iter()))
    }

    fn count_lookup(&self) {
        self.lookups.set(self.lookups.get() + 1);
    }
}

fn not_found(kind: ItemKind, id: &str) -> CatalogError {
    CatalogError::NotFound {
        kind,
        id: id.to_string(),
    }
}

impl CatalogClient for MockCatalog {
    async fn search(&self, _query: &str, limit: usize) -> Result<SearchHits, CatalogError> {
        if self.search_fails {
            return Err(CatalogError::Request("service unavailable".to_string()));
        }
        let mut hits = self.hits.clone();
        hits.songs.truncate(limit);
        hits.artists.truncate(limit);
        hits.albums.truncate(limit);
        Ok(hits)
    }

    async fn lookup_artist(&self, id: &str, max_tracks: usize) -> Result<Artist, CatalogError> {
        self.count_lookup();
        let mut artist = self.artists.get(id).cloned().ok_or_else(|| not_found(ItemKind::Artist, id))?;
        artist.songs.truncate(max_tracks);
        artist.full = true;
        Ok(artist)
    }

    async fn lookup_album(&self, id: &str) -> Result<Album, CatalogError> {
        self.count_lookup();
        let mut album = self.albums.get(id).cloned().ok_or_else(|| not_found(ItemKind::Album, id))?;
        album.full = true;
        Ok(album)
    }

    async fn lookup_song(&self, id: &str) -> Result<Song, CatalogError> {
        self.count_lookup();
        self.known_songs()
            .find(|song| song.id == id)
            .cloned()
            .ok_or_else(|| not_found(ItemKind::Song, id))
    }

    async fn stream_url(&self, id: &str) -> Result<String, CatalogError> {
        if self.no_stream.contains(id) {
            return Err(CatalogError::NoStream(id.to_string()));
        }
        Ok(format!("stream://{}", id))
    }
}

/// Finishes every track unless told otherwise.
#[derive(Debug, Default)]
pub struct ScriptedPlayer {
    stop_on: HashSet<String>,
    fail_on: HashSet<String>,
    played: Vec<String>,
}

impl ScriptedPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates the user pressing stop while `target` plays.
    pub fn stop_on(mut self, target: &str) -> Self {
        self.stop_on.insert(target.to_string());
        self
    }

    pub fn fail_on(mut self, target: &str) -> Self {
        self.fail_on.insert(target.to_string());
        self
    }

    pub fn played(&self) -> Vec<String> {
        self.played.clone()
    }
}

impl Player for ScriptedPlayer {
    async fn play(&mut self, target: &str) -> Result<PlayerExit, PlayerError> {
        self.played.push(target.to_string());
        if self.fail_on.contains(target) {
            return Err(PlayerError::Signaled);
        }
        if self.stop_on.contains(target) {
            return Ok(PlayerExit::Stopped);
        }
        Ok(PlayerExit::Finished)
    }
}

#[derive(Debug)]
pub struct RecordingRenderer {
    pub displayed: Vec<Option<View>>,
    pub now_playing: Vec<Option<String>>,
    pub messages: Vec<String>,
    pub errors: Vec<String>,
    pub helps: usize,
    pub hints: usize,
    pub limits: Limits,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self {
            displayed: Vec::new(),
            now_playing: Vec::new(),
            messages: Vec::new(),
            errors: Vec::new(),
            helps: 0,
            hints: 0,
            limits: Limits {
                search: 10,
                expand: 10,
                queue: 10,
            },
        }
    }

    pub fn last_view(&self) -> Option<&View> {
        self.displayed.last().and_then(Option::as_ref)
    }

    pub fn last_message(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.errors.last().map(String::as_str)
    }
}

impl Renderer for RecordingRenderer {
    fn display(&mut self, view: Option<&View>) {
        self.displayed.push(view.cloned());
    }

    fn now_playing(&mut self, line: Option<&str>) {
        self.now_playing.push(line.map(str::to_string));
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn help(&mut self) {
        self.helps += 1;
    }

    fn hint(&mut self) {
        self.hints += 1;
    }

    fn limits(&self) -> Limits {
        self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_finds_songs_it_was_given() {
        let mut catalog = MockCatalog::new().with_hits(SearchHits {
            songs: vec![song("s1", "One")],
            ..Default::default()
        });
        let mut full = album("al1", "Album", "ar1", "Artist");
        full.songs = vec![song("s2", "Two")];
        catalog.add_album(full);

        assert_eq!(catalog.lookup_song("s1").await.unwrap().title, "One");
        assert_eq!(catalog.lookup_song("s2").await.unwrap().title, "Two");
        assert!(matches!(
            catalog.lookup_song("s3").await,
            Err(CatalogError::NotFound { kind: ItemKind::Song, .. })
        ));
        assert_eq!(catalog.lookup_count(), 3);
    }
}
