use std::sync::Arc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use crate::acquire::{AcquireWorker, LocalDirProvider};
use crate::app::App;
use crate::audio::{LoftyReader, RodioEngine};
use crate::library::LibraryStore;
use crate::player::PlaybackController;

mod event_loop;
mod logging;
mod settings;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let library_dir = settings.library_dir();

    // Held until return so buffered log lines are flushed.
    let _log_guard = match logging::init_logging(&library_dir, &settings.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("tunebox: logging disabled: {e}");
            None
        }
    };

    let index_path = settings.index_path();
    let library = LibraryStore::open(index_path.clone()).inspect_err(|e| {
        error!(error = %e, path = %index_path.display(), "refusing to start");
    })?;
    info!(tracks = library.len(), path = %index_path.display(), "library loaded");

    let engine = RodioEngine::open_default()?;
    let mut controller = PlaybackController::new(engine, LoftyReader, library);
    if settings.playback.shuffle {
        controller.toggle_shuffle();
    }

    let provider = Arc::new(LocalDirProvider::from_settings(&settings));
    let mut worker = AcquireWorker::new(provider, library_dir);

    let mut app = App::new();
    event_loop::show_library(&mut app, &mut controller);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        &mut worker,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
