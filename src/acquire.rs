//! Acquisition pipeline: a search/download provider plus the background
//! worker that runs it off the control thread.

mod local;
mod provider;
mod worker;

pub use local::LocalDirProvider;
pub use provider::{Acquired, Candidate, TrackProvider};
pub use worker::{AcquireEvent, AcquireWorker};

#[cfg(test)]
mod tests;
