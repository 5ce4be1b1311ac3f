use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Persisted metadata for one acquired audio file.
///
/// The title is the key in the library index and is not stored inside the
/// record itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub filename: String,
    pub path: PathBuf,
    /// Best-known length in whole seconds.
    pub duration: u64,
}

impl TrackRecord {
    /// Build a record for a file at `path`, deriving `filename` from it.
    pub fn from_path(path: PathBuf, duration: u64) -> Self {
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        Self {
            filename,
            path,
            duration,
        }
    }

    pub fn file_exists(&self) -> bool {
        self.path.is_file()
    }
}
