//! Provider that "searches" a directory tree of audio files and "downloads"
//! by copying the chosen file into the library directory.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::audio::{TagSummary, read_tags};
use crate::config::Settings;
use crate::error::AcquireError;
use crate::library::safe_file_stem;

use super::provider::{Acquired, Candidate, TrackProvider};

#[derive(Debug, Clone)]
pub struct LocalDirProvider {
    root: PathBuf,
    extensions: Vec<String>,
    follow_links: bool,
}

impl LocalDirProvider {
    pub fn new(root: impl Into<PathBuf>, extensions: &[String]) -> Self {
        let extensions = extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            root: root.into(),
            extensions,
            follow_links: true,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut provider = Self::new(settings.source_dir(), &settings.acquire.extensions);
        provider.follow_links = settings.acquire.follow_links;
        provider
    }

    fn is_audio_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| e == &ext)
            })
            .unwrap_or(false)
    }
}

/// "Artist - Title" when both tags exist, else the title tag, else the file stem.
fn candidate_title(path: &Path, tags: &TagSummary) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN");
    match (tags.artist.as_deref(), tags.title.as_deref()) {
        (Some(artist), Some(title)) => format!("{artist} - {title}"),
        (None, Some(title)) => title.to_string(),
        _ => stem.to_string(),
    }
}

impl TrackProvider for LocalDirProvider {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, AcquireError> {
        if !self.root.is_dir() {
            return Err(AcquireError::SourceUnavailable(self.root.clone()));
        }

        let query = query.trim().to_lowercase();
        let mut found: Vec<Candidate> = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !path.is_file() || !self.is_audio_file(path) {
                continue;
            }

            let tags = read_tags(path);
            let title = candidate_title(path, &tags);
            if title.to_lowercase().contains(&query) {
                found.push(Candidate {
                    title,
                    source: path.to_path_buf(),
                    duration: tags.duration,
                });
            }
        }

        found.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        found.truncate(limit);
        debug!(query = %query, hits = found.len(), "local search finished");
        Ok(found)
    }

    fn fetch(&self, candidate: &Candidate, dest_dir: &Path) -> Result<Acquired, AcquireError> {
        if !candidate.source.is_file() {
            return Err(AcquireError::NotFound(candidate.title.clone()));
        }

        fs::create_dir_all(dest_dir)?;
        let dest_dir = dest_dir.canonicalize()?;
        let ext = candidate
            .source
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| "mp3".to_string());
        let dest = dest_dir.join(format!("{}.{}", safe_file_stem(&candidate.title), ext));

        // Copy under a temporary name so a half-written file never carries
        // the final name.
        let mut tmp = NamedTempFile::new_in(&dest_dir)?;
        io::copy(&mut File::open(&candidate.source)?, &mut tmp)?;
        tmp.persist(&dest).map_err(|e| e.error)?;

        info!(title = %candidate.title, dest = %dest.display(), "track fetched");
        Ok(Acquired {
            title: candidate.title.clone(),
            path: dest,
            duration_hint: candidate.duration.map_or(0, |d| d.as_secs()),
        })
    }
}
