//! Playback controller and the session it owns.
//!
//! `PlaybackController` is the only writer of `PlaybackSession` and of the
//! library index; the UI reads `PlaybackSnapshot` projections.

mod controller;
mod format;
mod session;

pub use controller::PlaybackController;
pub use format::{format_time, progress_ratio};
pub use session::{Direction, PlaybackSession, PlaybackSnapshot, PlaybackState};
