//! Tag and duration extraction backed by `lofty`.

use std::path::Path;
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};

use crate::error::{Error, Result};

pub trait MetadataReader {
    fn read_duration(&self, path: &Path) -> Result<Duration>;
}

/// Reads durations straight from the audio file's headers.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyReader;

impl MetadataReader for LoftyReader {
    fn read_duration(&self, path: &Path) -> Result<Duration> {
        let tagged = lofty::read_from_path(path)
            .map_err(|e| Error::Metadata(format!("{}: {e}", path.display())))?;
        Ok(tagged.properties().duration())
    }
}

/// The handful of tag fields the acquisition side cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSummary {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<Duration>,
}

/// Best-effort tag read. Unreadable files give an empty summary.
pub fn read_tags(path: &Path) -> TagSummary {
    let Ok(tagged) = lofty::read_from_path(path) else {
        return TagSummary::default();
    };

    let mut summary = TagSummary {
        duration: Some(tagged.properties().duration()),
        ..TagSummary::default()
    };

    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        summary.title = tag
            .title()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        summary.artist = tag
            .artist()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
    }

    summary
}
