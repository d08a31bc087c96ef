// View - the numbered result set currently on screen
// Numbers run songs first, then artists, then albums. That order is what
// the user typed against, so it never changes between render and command.

use crate::catalog::{Album, Artist, CatalogItem, ItemKind, ItemRef, SearchHits, Song};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    songs: Vec<Song>,
    artists: Vec<Artist>,
    albums: Vec<Album>,
}

impl View {
    pub fn new(songs: Vec<Song>, artists: Vec<Artist>, albums: Vec<Album>) -> Self {
        Self { songs, artists, albums }
    }

    pub fn from_songs(songs: Vec<Song>) -> Self {
        Self::new(songs, Vec::new(), Vec::new())
    }

    /// Builds a view from search hits, keeping at most `limit` per category.
    pub fn from_hits(hits: SearchHits, limit: usize) -> Self {
        let SearchHits { mut songs, mut artists, mut albums } = hits;
        songs.truncate(limit);
        artists.truncate(limit);
        albums.truncate(limit);
        Self::new(songs, artists, albums)
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn total(&self) -> usize {
        self.songs.len() + self.artists.len() + self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Borrow the item shown as `number` (1-based). `None` for 0 or past the end.
    pub fn get(&self, number: usize) -> Option<ItemRef<'_>> {
        let mut index = number.checked_sub(1)?;

        if let Some(song) = self.songs.get(index) {
            return Some(ItemRef::Song(song));
        }
        index -= self.songs.len();

        if let Some(artist) = self.artists.get(index) {
            return Some(ItemRef::Artist(artist));
        }
        index -= self.artists.len();

        self.albums.get(index).map(ItemRef::Album)
    }

    /// Owned copy of the item shown as `number`.
    pub fn resolve(&self, number: usize) -> Option<CatalogItem> {
        self.get(number).map(ItemRef::to_owned_item)
    }

    /// Which category `number` falls into, without cloning anything.
    pub fn kind_of(&self, number: usize) -> Option<ItemKind> {
        self.get(number).map(ItemRef::kind)
    }

    /// Every item with its display number, in flatten order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, ItemRef<'_>)> {
        self.songs
            .iter()
            .map(ItemRef::Song)
            .chain(self.artists.iter().map(ItemRef::Artist))
            .chain(self.albums.iter().map(ItemRef::Album))
            .enumerate()
            .map(|(index, item)| (index + 1, item))
    }

    /// Swaps all three categories at once.
    pub fn replace(&mut self, other: View) {
        *self = other;
    }

    /// Empties every category but keeps the view around.
    pub fn clear(&mut self) {
        self.songs.clear();
        self.artists.clear();
        self.albums.clear();
    }
}
