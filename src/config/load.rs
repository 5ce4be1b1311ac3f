use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `TUNEBOX__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TUNEBOX")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("acquire.extensions"),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.playback.poll_interval_ms == 0 {
            return Err("playback.poll_interval_ms must be >= 1".to_string());
        }
        if self.acquire.max_results == 0 {
            return Err("acquire.max_results must be >= 1".to_string());
        }
        if self.library.index_file.trim().is_empty() {
            return Err("library.index_file must not be empty".to_string());
        }
        Ok(())
    }

    /// Directory for acquired files, the index and the log.
    pub fn library_dir(&self) -> PathBuf {
        self.library
            .dir
            .clone()
            .or_else(default_data_dir)
            .unwrap_or_else(|| PathBuf::from("tunebox-data"))
    }

    /// Full path of the JSON library index.
    pub fn index_path(&self) -> PathBuf {
        self.library_dir().join(&self.library.index_file)
    }

    /// Directory searched by the local provider.
    pub fn source_dir(&self) -> PathBuf {
        self.acquire
            .source_dir
            .clone()
            .or_else(|| env::var_os("HOME").map(|h| PathBuf::from(h).join("Music")))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Resolve the config path from `TUNEBOX_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TUNEBOX_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tunebox/config.toml`
/// or `~/.config/tunebox/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("tunebox").join("config.toml"))
}

/// `$XDG_DATA_HOME/tunebox` or `~/.local/share/tunebox`.
pub fn default_data_dir() -> Option<PathBuf> {
    xdg_dir("XDG_DATA_HOME", ".local/share").map(|d| d.join("tunebox"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
