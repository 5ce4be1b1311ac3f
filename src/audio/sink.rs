//! `rodio`-backed implementation of [`AudioEngine`].
//!
//! Seeking is done the simple way: a fresh `Sink` is built for the file and
//! the decoder skips ahead with `Source::skip_duration`.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use crate::error::{Error, Result};

use super::engine::AudioEngine;

type FileDecoder = Decoder<BufReader<File>>;

struct Loaded {
    path: PathBuf,
    // Decoded by `load`, consumed by the next `play`.
    decoder: Option<FileDecoder>,
}

pub struct RodioEngine {
    stream: OutputStream,
    loaded: Option<Loaded>,
    sink: Option<Sink>,
    started_at: Option<Instant>,
    accumulated: Duration,
    paused: bool,
}

impl RodioEngine {
    /// Open the default output device.
    pub fn open_default() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| Error::Playback(format!("no audio output device: {e}")))?;
        // rodio logs to stderr when the stream is dropped, which corrupts the TUI.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            loaded: None,
            sink: None,
            started_at: None,
            accumulated: Duration::ZERO,
            paused: false,
        })
    }
}

fn open_decoder(path: &Path) -> Result<FileDecoder> {
    let file =
        File::open(path).map_err(|e| Error::Playback(format!("failed to open {path:?}: {e}")))?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| Error::Playback(format!("failed to decode {path:?}: {e}")))
}

impl AudioEngine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<()> {
        let decoder = open_decoder(path)?;
        self.loaded = Some(Loaded {
            path: path.to_path_buf(),
            decoder: Some(decoder),
        });
        Ok(())
    }

    fn play(&mut self, start_at: Duration) -> Result<()> {
        let loaded = self
            .loaded
            .as_mut()
            .ok_or_else(|| Error::Playback("no file loaded".to_string()))?;
        let decoder = match loaded.decoder.take() {
            Some(d) => d,
            None => open_decoder(&loaded.path)?,
        };

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(decoder.skip_duration(start_at));

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        sink.play();
        debug!(path = %loaded.path.display(), ?start_at, "sink started");

        self.sink = Some(sink);
        self.started_at = Some(Instant::now());
        self.accumulated = Duration::ZERO;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if self.paused {
            return;
        }
        sink.pause();
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
    }

    fn unpause(&mut self) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if !self.paused {
            return;
        }
        sink.play();
        self.started_at = Some(Instant::now());
        self.paused = false;
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.paused = false;
    }

    fn elapsed_since_load(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn is_active(&self) -> bool {
        self.sink.as_ref().is_some_and(|s| !s.empty())
    }
}
