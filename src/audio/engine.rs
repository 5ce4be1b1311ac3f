use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Primitive transport over an audio output.
///
/// `load` only prepares a file; nothing becomes audible until `play`.
/// `elapsed_since_load` is measured from the last `play` call and does not
/// advance while paused.
pub trait AudioEngine {
    fn load(&mut self, path: &Path) -> Result<()>;
    fn play(&mut self, start_at: Duration) -> Result<()>;
    fn pause(&mut self);
    fn unpause(&mut self);
    fn stop(&mut self);
    fn elapsed_since_load(&self) -> Duration;
    /// True while the output still has queued audio (paused audio counts).
    fn is_active(&self) -> bool;
}
