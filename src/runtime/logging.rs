use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Send `tracing` output to a file in `dir`; the terminal belongs to the TUI.
///
/// `RUST_LOG` wins over `logging.filter`. Keep the returned guard alive for
/// the life of the program or buffered lines are lost.
pub fn init_logging(
    dir: &Path,
    settings: &LoggingSettings,
) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, &settings.file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter.as_str()));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}
