// Playback - walks a list of songs through the external player
// Knows nothing about the queue: it gets a plain slice and reports where
// it stopped, the caller decides what to put back.

pub mod mpv;
pub mod now_playing;

pub use mpv::MpvPlayer;
pub use now_playing::NowPlaying;

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::catalog::{CatalogClient, Song};
use crate::ui::Renderer;
use crate::view::View;

/// Exit code the player uses when the user asks to stop (`q quit 11` in mpv's input.conf).
pub const STOP_EXIT_CODE: i32 = 11;

pub const KEY_HELP: &str = "[spc] pause [q] stop [n] next [9-0] volume [arrows] seek";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerExit {
    /// Track ended or the user skipped ahead
    Finished,
    /// User asked to stop everything
    Stopped,
}

impl PlayerExit {
    pub fn from_code(code: i32) -> Self {
        if code == STOP_EXIT_CODE {
            PlayerExit::Stopped
        } else {
            PlayerExit::Finished
        }
    }
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to launch {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: io::Error,
    },

    #[error("player was interrupted by a signal")]
    Signaled,

    #[error("no player input config found at {}", .0.display())]
    MissingInputConfig(PathBuf),
}

/// Plays one stream or file to completion, blocking until the player exits.
#[allow(async_fn_in_trait)] // futures are not Send, the session is single-threaded
pub trait Player {
    async fn play(&mut self, target: &str) -> Result<PlayerExit, PlayerError>;
}

pub struct PlaybackCoordinator<'a, C, P, R> {
    catalog: &'a C,
    player: &'a mut P,
    renderer: &'a mut R,
    now_playing: &'a NowPlaying,
}

impl<'a, C, P, R> PlaybackCoordinator<'a, C, P, R>
where
    C: CatalogClient,
    P: Player,
    R: Renderer,
{
    pub fn new(catalog: &'a C, player: &'a mut P, renderer: &'a mut R, now_playing: &'a NowPlaying) -> Self {
        Self {
            catalog,
            player,
            renderer,
            now_playing,
        }
    }

    /// Plays `songs` in order.
    ///
    /// Returns `None` when every song finished, otherwise the index of the
    /// song that was interrupted. That song counts as unplayed, so
    /// `songs[index..]` is exactly what is left. A stream lookup failure or
    /// a player failure ends playback the same way a user stop does.
    pub async fn play(&mut self, songs: &[Song]) -> Option<usize> {
        let total = songs.len();
        if total == 0 {
            return None;
        }

        info!(total, "Starting playback");
        self.renderer.message(KEY_HELP);

        for (index, song) in songs.iter().enumerate() {
            // Played songs drop off the list as we go
            self.renderer.display(Some(&View::from_songs(songs[index..].to_vec())));

            let target = match self.catalog.stream_url(&song.id).await {
                Ok(target) => target,
                Err(e) => {
                    warn!(song_id = %song.id, error = %e, "Could not resolve stream");
                    self.renderer.error(&format!("Could not play {}: {}", song.title, e));
                    return self.stop_at(index);
                }
            };

            let line = format!("({}/{}) {} ({})", index + 1, total, song, song.time());
            self.renderer.now_playing(Some(&line));
            self.now_playing.update(&line);

            match self.player.play(&target).await {
                Ok(PlayerExit::Finished) => {
                    debug!(song_id = %song.id, "Track finished");
                }
                Ok(PlayerExit::Stopped) => {
                    info!(song_id = %song.id, index, "Playback stopped by user");
                    return self.stop_at(index);
                }
                Err(e) => {
                    error!(song_id = %song.id, error = %e, "Player failed");
                    self.renderer.error(&format!("Playback aborted: {}", e));
                    return self.stop_at(index);
                }
            }
        }

        info!(total, "Playback finished");
        self.finish();
        None
    }

    fn stop_at(&mut self, index: usize) -> Option<usize> {
        self.finish();
        Some(index)
    }

    fn finish(&mut self) {
        self.renderer.now_playing(None);
        self.now_playing.clear();
    }
}
