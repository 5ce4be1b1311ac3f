use std::path::PathBuf;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tunebox/config.toml` or `~/.config/tunebox/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TUNEBOX__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub acquire: AcquireSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory holding acquired audio files and the index file.
    /// Unset means `$XDG_DATA_HOME/tunebox` (or `~/.local/share/tunebox`).
    pub dir: Option<PathBuf>,
    /// Name of the JSON index file inside `dir`.
    pub index_file: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            dir: None,
            index_file: "library.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// How often the position is polled and end-of-track is detected (milliseconds).
    pub poll_interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            poll_interval_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AcquireSettings {
    /// Directory searched by the local provider. Unset means `~/Music`.
    pub source_dir: Option<PathBuf>,
    /// Maximum number of search results shown.
    pub max_results: usize,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks while searching.
    pub follow_links: bool,
}

impl Default for AcquireSettings {
    fn default() -> Self {
        Self {
            source_dir: None,
            max_results: 15,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ tunebox ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub filter: String,
    /// Log file name, written inside the library directory.
    pub file_name: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            file_name: "tunebox.log".to_string(),
        }
    }
}
