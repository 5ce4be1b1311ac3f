//! Single-slot background worker for searches and downloads.
//!
//! At most one request runs at a time; a second one is rejected with
//! `AcquireError::Busy`. Results come back as `AcquireEvent`s which the
//! control thread drains and applies itself. There is no cancellation.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::AcquireError;

use super::provider::{Acquired, Candidate, TrackProvider};

#[derive(Debug)]
pub enum AcquireEvent {
    SearchFinished {
        query: String,
        result: Result<Vec<Candidate>, AcquireError>,
    },
    DownloadFinished {
        title: String,
        result: Result<Acquired, AcquireError>,
    },
}

pub struct AcquireWorker {
    provider: Arc<dyn TrackProvider>,
    dest_dir: PathBuf,
    tx: Sender<AcquireEvent>,
    rx: Receiver<AcquireEvent>,
    in_flight: Option<JoinHandle<()>>,
}

impl AcquireWorker {
    pub fn new(provider: Arc<dyn TrackProvider>, dest_dir: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel::<AcquireEvent>();
        Self {
            provider,
            dest_dir,
            tx,
            rx,
            in_flight: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn search(&mut self, query: String, limit: usize) -> Result<(), AcquireError> {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        debug!(query = %query, "search requested");
        self.spawn(move || {
            let result = provider.search(&query, limit);
            let _ = tx.send(AcquireEvent::SearchFinished { query, result });
        })
    }

    pub fn download(&mut self, candidate: Candidate) -> Result<(), AcquireError> {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let dest_dir = self.dest_dir.clone();
        debug!(title = %candidate.title, "download requested");
        self.spawn(move || {
            let result = provider.fetch(&candidate, &dest_dir);
            let _ = tx.send(AcquireEvent::DownloadFinished {
                title: candidate.title,
                result,
            });
        })
    }

    /// Collect finished results without blocking. Frees the slot once the
    /// in-flight request has reported (or its thread died without reporting).
    pub fn try_drain(&mut self) -> Vec<AcquireEvent> {
        // Check for exit before reading so a result sent just before the
        // thread ended is always seen in the same call.
        let finished = self.in_flight.as_ref().is_some_and(|h| h.is_finished());
        let events: Vec<AcquireEvent> = self.rx.try_iter().collect();

        if !events.is_empty() || finished {
            if let Some(handle) = self.in_flight.take() {
                if events.is_empty() {
                    warn!("acquisition worker exited without a result");
                }
                let _ = handle.join();
            }
        }
        events
    }

    fn spawn<F>(&mut self, job: F) -> Result<(), AcquireError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_busy() {
            return Err(AcquireError::Busy);
        }
        let handle = thread::Builder::new()
            .name("tunebox-acquire".to_string())
            .spawn(job)?;
        self.in_flight = Some(handle);
        Ok(())
    }
}
