//! JSON-backed library index: an ordered title -> `TrackRecord` mapping.
//!
//! The index is the only persisted state of the player. It is read once at
//! startup and rewritten in full after every mutation.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::model::TrackRecord;

#[derive(Debug, Clone)]
pub struct LibraryStore {
    path: PathBuf,
    // Insertion order is the display order of the library view.
    entries: Vec<(String, TrackRecord)>,
}

impl LibraryStore {
    /// Load the index at `path`. A missing file yields an empty library;
    /// unparsable content is rejected with `Error::StorageCorrupt`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => parse_index(&path, &content)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no library index yet, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), tracks = entries.len(), "library loaded");
        Ok(Self { path, entries })
    }

    /// Atomically overwrite the index file with the full mapping.
    pub fn save(&self) -> Result<()> {
        let mut map = Map::new();
        for (title, record) in &self.entries {
            let value = serde_json::to_value(record).map_err(io::Error::other)?;
            map.insert(title.clone(), value);
        }
        let json = serde_json::to_string_pretty(&map).map_err(io::Error::other)?;

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir)?;

        // Write next to the target and rename over it, so a failed write
        // leaves the previous index untouched.
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), tracks = self.entries.len(), "library saved");
        Ok(())
    }

    /// Insert `record` under `title`, replacing (in place) any existing record.
    /// Returns the replaced record, if any.
    pub fn insert_or_replace(&mut self, title: &str, record: TrackRecord) -> Option<TrackRecord> {
        match self.entries.iter_mut().find(|(t, _)| t == title) {
            Some((_, existing)) => Some(std::mem::replace(existing, record)),
            None => {
                self.entries.push((title.to_string(), record));
                None
            }
        }
    }

    pub fn remove(&mut self, title: &str) -> Option<TrackRecord> {
        let pos = self.entries.iter().position(|(t, _)| t == title)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn get(&self, title: &str) -> Option<&TrackRecord> {
        self.entries
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, r)| r)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.get(title).is_some()
    }

    /// All titles in library order.
    pub fn titles(&self) -> Vec<String> {
        self.entries.iter().map(|(t, _)| t.clone()).collect()
    }

    /// Titles containing `query`, compared case-insensitively.
    pub fn search(&self, query: &str) -> Vec<String> {
        let query = query.to_lowercase();
        self.entries
            .iter()
            .filter(|(t, _)| t.to_lowercase().contains(&query))
            .map(|(t, _)| t.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_index(path: &Path, content: &str) -> Result<Vec<(String, TrackRecord)>> {
    let corrupt = |source| Error::StorageCorrupt {
        path: path.to_path_buf(),
        source,
    };

    let map: Map<String, Value> = serde_json::from_str(content).map_err(corrupt)?;
    map.into_iter()
        .map(|(title, value)| {
            serde_json::from_value::<TrackRecord>(value)
                .map(|record| (title, record))
                .map_err(corrupt)
        })
        .collect()
}
