//! Transient playback state owned by the controller.

use std::path::PathBuf;
use std::time::Duration;

/// Coarse transport state derived from the session flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Idle
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// In-memory session; never persisted.
///
/// Invariant: `is_paused` implies `is_playing`.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    pub current_title: Option<String>,
    pub current_file: Option<PathBuf>,
    /// Position of the current track inside `active_playlist`. May go stale
    /// when the playlist is replaced; it is only re-synced by navigation.
    pub current_index: Option<usize>,
    pub active_playlist: Vec<String>,

    pub is_playing: bool,
    pub is_paused: bool,
    pub is_seeking: bool,

    pub duration: Duration,
    /// Seek baseline added to the engine's elapsed time.
    pub last_seek_offset: Duration,
    /// Last position reported by polling (or set by a seek).
    pub position: Duration,

    pub shuffle_enabled: bool,
}

impl PlaybackSession {
    pub fn state(&self) -> PlaybackState {
        match (self.is_playing, self.is_paused) {
            (false, _) => PlaybackState::Idle,
            (true, false) => PlaybackState::Playing,
            (true, true) => PlaybackState::Paused,
        }
    }
}

/// Read-only projection of the session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub title: Option<String>,
    pub state: PlaybackState,
    pub position: Duration,
    pub duration: Duration,
    pub shuffle: bool,
    pub index: Option<usize>,
    pub playlist_len: usize,
}

impl From<&PlaybackSession> for PlaybackSnapshot {
    fn from(s: &PlaybackSession) -> Self {
        Self {
            title: s.current_title.clone(),
            state: s.state(),
            position: s.position,
            duration: s.duration,
            shuffle: s.shuffle_enabled,
            index: s.current_index,
            playlist_len: s.active_playlist.len(),
        }
    }
}
