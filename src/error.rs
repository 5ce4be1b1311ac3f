//! Error types shared by the library store and the playback controller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the library/playback core.
#[derive(Debug, Error)]
pub enum Error {
    /// The persisted library exists but could not be parsed.
    #[error("library file {path:?} is corrupt: {source}")]
    StorageCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the library file failed.
    #[error("library storage error: {0}")]
    Storage(#[from] io::Error),

    /// A track record points at a file that no longer exists.
    #[error("audio file is missing: {0:?}")]
    MissingFile(PathBuf),

    /// Removing a track's audio file failed; the library entry was kept.
    #[error("could not delete '{title}': {source}")]
    DeleteFailed {
        title: String,
        #[source]
        source: io::Error,
    },

    /// The audio engine failed to load or start a file.
    #[error("playback failed: {0}")]
    Playback(String),

    /// Tag/duration extraction failed.
    #[error("metadata error: {0}")]
    Metadata(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the acquisition side (search + download).
#[derive(Debug, Error)]
pub enum AcquireError {
    /// A search or download is already in flight; only one runs at a time.
    #[error("another search or download is still running")]
    Busy,

    #[error("source {0:?} is not available")]
    SourceUnavailable(PathBuf),

    #[error("no audio found for '{0}'")]
    NotFound(String),

    #[error("acquisition I/O error: {0}")]
    Io(#[from] io::Error),
}
