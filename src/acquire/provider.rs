use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AcquireError;

/// One search hit offered to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub source: PathBuf,
    pub duration: Option<Duration>,
}

/// A track fetched into the library directory, ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acquired {
    pub title: String,
    pub path: PathBuf,
    /// Length in whole seconds as reported by the source (0 if unknown).
    pub duration_hint: u64,
}

/// Search + download backend. Calls may block; they run on the worker thread.
pub trait TrackProvider: Send + Sync {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, AcquireError>;
    fn fetch(&self, candidate: &Candidate, dest_dir: &Path) -> Result<Acquired, AcquireError>;
}
