use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::{Queue, RestoreError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid playlist name: {0}")]
    InvalidName(String),

    #[error("Playlist {0} already exists")]
    AlreadyExists(String),

    #[error("Playlist {0} does not exist")]
    NotFound(String),

    #[error("{name} is not a valid playlist file: {source}")]
    Corrupt {
        name: String,
        #[source]
        source: RestoreError,
    },

    #[error("Playlist {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Named queue snapshots, one JSON file per playlist.
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    dir: PathBuf,
}

impl PlaylistStore {
    /// Creates the playlists directory if it isn't there yet.
    pub fn new(dir: PathBuf) -> io::Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            info!("Created playlists directory: {}", dir.display());
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `queue` under `name`. Never overwrites an existing playlist.
    pub fn write(&self, name: &str, queue: &Queue) -> Result<PathBuf, StoreError> {
        let path = self.path_for(name)?;
        let io_err = |source| StoreError::Io {
            name: name.to_string(),
            source,
        };

        let bytes = queue.serialize().map_err(|e| io_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(name.to_string()));
            }
            Err(e) => return Err(io_err(e)),
        };
        file.write_all(&bytes).map_err(io_err)?;

        info!("Saved {} songs to playlist {}", queue.len(), path.display());
        Ok(path)
    }

    /// Loads the playlist `name`. Any bad record rejects the whole file.
    pub fn read(&self, name: &str) -> Result<Queue, StoreError> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(StoreError::NotFound(name.to_string()));
        }

        let bytes = fs::read(&path).map_err(|source| StoreError::Io {
            name: name.to_string(),
            source,
        })?;

        let queue = Queue::deserialize(&bytes).map_err(|source| {
            warn!("Rejected playlist {}: {}", path.display(), source);
            StoreError::Corrupt {
                name: name.to_string(),
                source,
            }
        })?;

        info!("Loaded {} songs from playlist {}", queue.len(), path.display());
        Ok(queue)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.exists()).unwrap_or(false)
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let name = name.trim();
        let bad = name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
            || name.contains('\0');
        if bad {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(name))
    }
}
