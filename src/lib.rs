// tunepipe - search, queue and play music from the terminal
// The session core is generic over catalog, player and renderer, so the
// same code drives the real terminal and the tests.

pub mod catalog;   // songs, artists, albums and where they come from
pub mod config;    // settings and paths
pub mod library;   // offline catalog built from local files
pub mod playback;  // external player and the play loop
pub mod queue;     // pending songs and saved playlists
pub mod session;   // command dispatch
pub mod ui;        // terminal output
pub mod view;      // numbered results on screen

#[cfg(test)]
mod testing;

pub use catalog::{Album, Artist, CatalogClient, CatalogError, CatalogItem, Song};
pub use config::Config;
pub use library::LocalLibrary;
pub use playback::{MpvPlayer, NowPlaying, PlaybackCoordinator, Player};
pub use queue::{PlaylistStore, Queue};
pub use session::Session;
pub use ui::{Renderer, TerminalRenderer};
pub use view::View;
