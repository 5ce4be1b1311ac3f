//! The playback/library state machine.
//!
//! All methods run on the control thread; nothing here locks. Background
//! acquisition hands its results over through `commit_downloaded_track`.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::audio::{AudioEngine, MetadataReader};
use crate::error::{Error, Result};
use crate::library::{LibraryStore, TrackRecord};

use super::session::{Direction, PlaybackSession, PlaybackSnapshot};

pub struct PlaybackController<E, M> {
    engine: E,
    metadata: M,
    library: LibraryStore,
    session: PlaybackSession,
    rng: StdRng,
    // Tombstones already warned about; repeats log at debug level.
    reported_missing: HashSet<String>,
}

impl<E: AudioEngine, M: MetadataReader> PlaybackController<E, M> {
    pub fn new(engine: E, metadata: M, library: LibraryStore) -> Self {
        Self::with_rng(engine, metadata, library, StdRng::from_entropy())
    }

    /// Like `new`, with an explicit random source for shuffle picks.
    pub fn with_rng(engine: E, metadata: M, library: LibraryStore, rng: StdRng) -> Self {
        Self {
            engine,
            metadata,
            library,
            session: PlaybackSession::default(),
            rng,
            reported_missing: HashSet::new(),
        }
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot::from(&self.session)
    }

    pub fn library(&self) -> &LibraryStore {
        &self.library
    }

    #[cfg(test)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    #[cfg(test)]
    pub fn reported_missing(&self) -> usize {
        self.reported_missing.len()
    }

    /// Replace the navigable playlist. The current track and index are left
    /// alone even if the new playlist does not contain them.
    pub fn set_active_playlist(&mut self, titles: Vec<String>) {
        debug!(len = titles.len(), "active playlist replaced");
        self.session.active_playlist = titles;
    }

    /// Play the playlist entry at `index`.
    ///
    /// Returns `Ok(false)` without touching anything when the index is out of
    /// range or the entry is a tombstone (unknown title or missing file).
    pub fn play_track_at(&mut self, index: usize) -> Result<bool> {
        let Some(title) = self.session.active_playlist.get(index).cloned() else {
            debug!(index, "play request outside the active playlist");
            return Ok(false);
        };
        let Some(record) = self.playable(&title) else {
            return Ok(false);
        };

        self.start(index, title, &record)?;
        Ok(true)
    }

    pub fn toggle_play_pause(&mut self) {
        if !self.session.is_playing {
            return;
        }
        if self.session.is_paused {
            self.engine.unpause();
        } else {
            self.engine.pause();
        }
        self.session.is_paused = !self.session.is_paused;
        debug!(paused = self.session.is_paused, "play/pause toggled");
    }

    /// Move to the neighbouring playlist entry, wrapping in both directions.
    /// With shuffle on, both directions pick a random entry instead.
    pub fn advance(&mut self, direction: Direction) -> Result<bool> {
        let len = self.session.active_playlist.len();
        if len == 0 {
            return Ok(false);
        }
        if self.session.shuffle_enabled {
            return self.play_random();
        }

        // No current index behaves like -1.
        let current = self.session.current_index.map_or(-1, |i| i as i64);
        let step = match direction {
            Direction::Next => 1,
            Direction::Previous => -1,
        };
        let target = (current + step).rem_euclid(len as i64) as usize;
        debug!(?direction, from = current, to = target, "advance");
        self.step_to(target)
    }

    /// Play a uniformly random playlist entry (repeats allowed).
    pub fn play_random(&mut self) -> Result<bool> {
        let len = self.session.active_playlist.len();
        if self.library.is_empty() || len == 0 {
            return Ok(false);
        }
        let target = self.rng.gen_range(0..len);
        debug!(to = target, "shuffle pick");
        self.step_to(target)
    }

    pub fn toggle_shuffle(&mut self) {
        self.session.shuffle_enabled = !self.session.shuffle_enabled;
        info!(enabled = self.session.shuffle_enabled, "shuffle toggled");
    }

    /// Delete a track's audio file and its library entry.
    ///
    /// Deleting the track that is playing stops it first. If the file cannot
    /// be removed the entry is kept and `Error::DeleteFailed` is returned.
    pub fn delete_track(&mut self, title: &str) -> Result<bool> {
        if self.session.is_playing && self.session.current_title.as_deref() == Some(title) {
            self.engine.stop();
            self.session.current_title = None;
            self.session.current_file = None;
            self.session.is_playing = false;
            self.session.is_paused = false;
            self.session.position = Duration::ZERO;
            info!(title, "stopped playback of deleted track");
        }

        let Some(path) = self.library.get(title).map(|r| r.path.clone()) else {
            return Ok(false);
        };
        if path.exists() {
            fs::remove_file(&path).map_err(|source| Error::DeleteFailed {
                title: title.to_string(),
                source,
            })?;
        }

        let before = self.library.clone();
        self.library.remove(title);
        if let Err(e) = self.library.save() {
            self.library = before;
            return Err(e);
        }

        info!(title, path = %path.display(), "track deleted");
        Ok(true)
    }

    /// Mark the start of a user seek; polling pauses until `request_seek`.
    pub fn begin_seek(&mut self) {
        self.session.is_seeking = true;
    }

    /// Restart the current track at `target` (clamped to the track length).
    ///
    /// Only effective while a track is playing and its duration is known.
    /// The pause state is kept and the seeking flag is always cleared.
    pub fn request_seek(&mut self, target: Duration) -> Result<()> {
        let result = self.seek_to(target);
        self.session.is_seeking = false;
        result
    }

    /// Periodic tick. Returns the current position while audio is flowing.
    ///
    /// When the engine has run dry while the session still believes it is
    /// playing, the track ended naturally and playback advances.
    pub fn poll_position(&mut self) -> Result<Option<Duration>> {
        let s = &self.session;
        if !s.is_playing || s.is_paused || s.is_seeking {
            return Ok(None);
        }

        if self.engine.is_active() {
            let pos = self.engine.elapsed_since_load() + self.session.last_seek_offset;
            if pos <= self.session.duration {
                self.session.position = pos;
                return Ok(Some(pos));
            }
            return Ok(None);
        }

        debug!(title = ?self.session.current_title, "end of track");
        self.advance(Direction::Next)?;
        Ok(None)
    }

    /// Record a freshly acquired track and persist the library.
    ///
    /// A colliding title overwrites the old record; its audio file is left on
    /// disk.
    pub fn commit_downloaded_track(
        &mut self,
        title: &str,
        path: PathBuf,
        duration_hint: u64,
    ) -> Result<()> {
        let before = self.library.clone();
        let record = TrackRecord::from_path(path, duration_hint);
        let replaced = self.library.insert_or_replace(title, record.clone());
        if let Err(e) = self.library.save() {
            self.library = before;
            return Err(e);
        }

        if let Some(old) = replaced.filter(|old| old.path != record.path) {
            warn!(title, orphan = %old.path.display(), "replaced record, old file left on disk");
        }
        info!(title, path = %record.path.display(), duration = duration_hint, "track added to library");
        Ok(())
    }

    /// Move the navigation cursor to `index`, then try to play it. A
    /// tombstone leaves playback as it was.
    fn step_to(&mut self, index: usize) -> Result<bool> {
        self.session.current_index = Some(index);
        self.play_track_at(index)
    }

    fn playable(&mut self, title: &str) -> Option<TrackRecord> {
        let checked = match self.library.get(title) {
            Some(record) => ensure_file(record)
                .map(|()| record.clone())
                .map_err(|e| e.to_string()),
            None => Err("title is not in the library".to_string()),
        };
        match checked {
            Ok(record) => {
                self.reported_missing.remove(title);
                Some(record)
            }
            Err(reason) => {
                // End-of-track polling keeps cycling over tombstones.
                if self.reported_missing.insert(title.to_string()) {
                    warn!(title, error = %reason, "skipping track");
                } else {
                    debug!(title, error = %reason, "skipping track");
                }
                None
            }
        }
    }

    fn start(&mut self, index: usize, title: String, record: &TrackRecord) -> Result<()> {
        self.restart_at(&record.path, Duration::ZERO)?;

        let duration = match self.metadata.read_duration(&record.path) {
            Ok(d) => d,
            Err(e) => {
                debug!(error = %e, hint = record.duration, "using stored duration");
                Duration::from_secs(record.duration)
            }
        };

        info!(title = %title, index, ?duration, "now playing");
        let s = &mut self.session;
        s.current_title = Some(title);
        s.current_file = Some(record.path.clone());
        s.current_index = Some(index);
        s.is_playing = true;
        s.is_paused = false;
        s.duration = duration;
        s.last_seek_offset = Duration::ZERO;
        s.position = Duration::ZERO;
        Ok(())
    }

    fn seek_to(&mut self, target: Duration) -> Result<()> {
        if !self.session.is_playing || self.session.duration.is_zero() {
            return Ok(());
        }
        let Some(path) = self.session.current_file.clone() else {
            return Ok(());
        };

        let target = target.min(self.session.duration);
        self.restart_at(&path, target)?;
        if self.session.is_paused {
            self.engine.pause();
        }

        self.session.last_seek_offset = target;
        self.session.position = target;
        debug!(?target, "seeked");
        Ok(())
    }

    /// Load `path`, stop whatever is playing and start at `offset`.
    ///
    /// A load failure leaves both engine and session untouched. If starting
    /// fails after the old output was stopped, the session drops to idle.
    fn restart_at(&mut self, path: &Path, offset: Duration) -> Result<()> {
        self.engine.load(path)?;
        self.engine.stop();
        if let Err(e) = self.engine.play(offset) {
            warn!(error = %e, "engine failed to start, playback stopped");
            self.session.is_playing = false;
            self.session.is_paused = false;
            return Err(e);
        }
        Ok(())
    }
}

fn ensure_file(record: &TrackRecord) -> Result<()> {
    if record.file_exists() {
        Ok(())
    } else {
        Err(Error::MissingFile(record.path.clone()))
    }
}
