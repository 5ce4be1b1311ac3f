use std::fs;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use tempfile::tempdir;

use super::*;
use crate::error::AcquireError;

fn exts() -> Vec<String> {
    vec!["mp3".to_string(), ".FLAC".to_string()]
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"not really audio").unwrap();
}

#[test]
fn search_matches_file_stems_case_insensitively() {
    let src = tempdir().unwrap();
    touch(&src.path().join("Blue Monday.mp3"));
    touch(&src.path().join("nested/blue velvet.flac"));
    touch(&src.path().join("Yellow.mp3"));
    touch(&src.path().join("blue notes.txt"));

    let provider = LocalDirProvider::new(src.path(), &exts());
    let hits = provider.search("BLUE", 10).unwrap();

    let titles: Vec<&str> = hits.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Blue Monday", "blue velvet"]);
}

#[test]
fn search_respects_limit() {
    let src = tempdir().unwrap();
    for name in ["a1.mp3", "a2.mp3", "a3.mp3"] {
        touch(&src.path().join(name));
    }
    let provider = LocalDirProvider::new(src.path(), &exts());
    let hits = provider.search("a", 2).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "a1");
}

#[test]
fn search_on_missing_root_is_source_unavailable() {
    let src = tempdir().unwrap();
    let provider = LocalDirProvider::new(src.path().join("nope"), &exts());
    assert!(matches!(
        provider.search("x", 5),
        Err(AcquireError::SourceUnavailable(_))
    ));
}

#[test]
fn fetch_copies_into_dest_with_safe_name() {
    let src = tempdir().unwrap();
    let dest = tempdir().unwrap();
    let source = src.path().join("weird.MP3");
    touch(&source);

    let provider = LocalDirProvider::new(src.path(), &exts());
    let candidate = Candidate {
        title: "AC/DC: Back in Black?".to_string(),
        source: source.clone(),
        duration: Some(Duration::from_secs(255)),
    };
    let lib_dir = dest.path().join("songs");
    let acquired = provider.fetch(&candidate, &lib_dir).unwrap();

    assert_eq!(acquired.title, "AC/DC: Back in Black?");
    assert_eq!(acquired.duration_hint, 255);
    assert_eq!(
        acquired.path.file_name().and_then(|n| n.to_str()),
        Some("ACDC Back in Black.mp3")
    );
    assert_eq!(fs::read(&acquired.path).unwrap(), b"not really audio");
    assert!(source.exists());
}

#[test]
fn fetch_missing_source_is_not_found() {
    let dest = tempdir().unwrap();
    let provider = LocalDirProvider::new(dest.path(), &exts());
    let candidate = Candidate {
        title: "Ghost".to_string(),
        source: dest.path().join("ghost.mp3"),
        duration: None,
    };
    assert!(matches!(
        provider.fetch(&candidate, dest.path()),
        Err(AcquireError::NotFound(title)) if title == "Ghost"
    ));
}

/// Provider whose search blocks until the test releases it.
struct GatedProvider {
    gate: Mutex<Receiver<()>>,
}

impl GatedProvider {
    fn new() -> (Self, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        (Self { gate: Mutex::new(rx) }, tx)
    }
}

impl TrackProvider for GatedProvider {
    fn search(&self, query: &str, _limit: usize) -> Result<Vec<Candidate>, AcquireError> {
        let _ = self.gate.lock().unwrap().recv();
        Ok(vec![Candidate {
            title: query.to_string(),
            source: query.into(),
            duration: None,
        }])
    }

    fn fetch(&self, candidate: &Candidate, dest_dir: &Path) -> Result<Acquired, AcquireError> {
        Ok(Acquired {
            title: candidate.title.clone(),
            path: dest_dir.join("x.mp3"),
            duration_hint: 7,
        })
    }
}

fn drain_until_idle(worker: &mut AcquireWorker) -> Vec<AcquireEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while worker.is_busy() && Instant::now() < deadline {
        events.extend(worker.try_drain());
        thread::sleep(Duration::from_millis(5));
    }
    events
}

#[test]
fn worker_rejects_second_request_while_busy() {
    let (provider, release) = GatedProvider::new();
    let dir = tempdir().unwrap();
    let mut worker = AcquireWorker::new(Arc::new(provider), dir.path().to_path_buf());

    worker.search("first".to_string(), 5).unwrap();
    assert!(worker.is_busy());
    assert!(matches!(
        worker.search("second".to_string(), 5),
        Err(AcquireError::Busy)
    ));

    release.send(()).unwrap();
    let events = drain_until_idle(&mut worker);
    assert!(!worker.is_busy());
    assert_eq!(events.len(), 1);
    match &events[0] {
        AcquireEvent::SearchFinished { query, result } => {
            assert_eq!(query, "first");
            assert_eq!(result.as_ref().unwrap().len(), 1);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn worker_accepts_new_request_after_drain() {
    let (provider, release) = GatedProvider::new();
    let dir = tempdir().unwrap();
    let mut worker = AcquireWorker::new(Arc::new(provider), dir.path().to_path_buf());

    release.send(()).unwrap();
    worker.search("one".to_string(), 5).unwrap();
    drain_until_idle(&mut worker);

    let candidate = Candidate {
        title: "two".to_string(),
        source: "two".into(),
        duration: None,
    };
    worker.download(candidate).unwrap();
    let events = drain_until_idle(&mut worker);
    match events.as_slice() {
        [AcquireEvent::DownloadFinished { title, result }] => {
            assert_eq!(title, "two");
            assert_eq!(result.as_ref().unwrap().duration_hint, 7);
        }
        other => panic!("unexpected events {other:?}"),
    }
}
