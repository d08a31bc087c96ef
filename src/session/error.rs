use thiserror::Error;

use super::command::Command;
use crate::catalog::CatalogError;
use crate::queue::{QueueError, StoreError};

/// Everything a command can fail with. The `Display` text is exactly the
/// line shown to the user.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Nonexistent command")]
    UnknownCommand(String),

    #[error("Missing search query")]
    MissingQuery,

    #[error("Missing argument to {0}")]
    MissingArgument(Command),

    #[error("Wrong context for {0}")]
    WrongContext(Command),

    #[error("Invalid argument to {0}")]
    InvalidArgument(Command),

    #[error("Index out of range: valid between 1-{total}")]
    OutOfRange { total: usize },

    #[error("The queue is empty")]
    EmptyQueue,

    #[error("Queue is empty, nothing to write")]
    NothingToWrite,

    #[error("{0} has no songs to play")]
    NothingToPlay(String),

    #[error("Search failed: {0}")]
    Search(#[source] CatalogError),

    #[error("Could not load {name}: {source}")]
    Lookup {
        name: String,
        #[source]
        source: CatalogError,
    },

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
