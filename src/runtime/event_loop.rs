use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::acquire::{AcquireEvent, AcquireWorker};
use crate::app::{App, InputMode, View};
use crate::audio::{AudioEngine, MetadataReader};
use crate::config;
use crate::error::AcquireError;
use crate::player::{Direction, PlaybackController};
use crate::ui;

/// Longest time to block on input, so worker results show up promptly.
const MAX_INPUT_WAIT: Duration = Duration::from_millis(50);

/// Main terminal event loop: drains acquisition results, ticks the
/// controller, draws and handles input. Returns `Ok(())` on quit.
pub fn run<E, M>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<E, M>,
    worker: &mut AcquireWorker,
) -> Result<(), Box<dyn std::error::Error>>
where
    E: AudioEngine,
    M: MetadataReader,
{
    let tick = Duration::from_millis(settings.playback.poll_interval_ms);
    let mut last_tick = Instant::now();

    loop {
        for ev in worker.try_drain() {
            apply_acquire_event(ev, app, controller);
        }

        if last_tick.elapsed() >= tick {
            if let Err(e) = controller.poll_position() {
                report(app, "Playback error", &e);
            }
            last_tick = Instant::now();
        }

        let now = controller.snapshot();
        let library_len = controller.library().len();
        let busy = worker.is_busy();
        terminal.draw(|f| {
            ui::draw(f, app, &now, library_len, busy, &settings.ui, &settings.controls)
        })?;

        let wait = tick.saturating_sub(last_tick.elapsed()).min(MAX_INPUT_WAIT);
        if event::poll(wait)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, controller, worker) {
                    break;
                }
            }
        }
    }

    info!("quit requested");
    Ok(())
}

/// Put the library listing on screen and make it the active playlist.
pub(crate) fn show_library<E: AudioEngine, M: MetadataReader>(
    app: &mut App,
    controller: &mut PlaybackController<E, M>,
) {
    let playlist = app.show_library(controller.library());
    controller.set_active_playlist(playlist);
}

fn report(app: &mut App, context: &str, err: &dyn std::error::Error) {
    warn!(error = %err, "{context}");
    app.set_status(format!("{context}: {err}"));
}

/// Apply a finished search or download on the control thread.
pub(crate) fn apply_acquire_event<E: AudioEngine, M: MetadataReader>(
    ev: AcquireEvent,
    app: &mut App,
    controller: &mut PlaybackController<E, M>,
) {
    match ev {
        AcquireEvent::SearchFinished { query, result } => match result {
            Ok(results) => {
                if results.is_empty() {
                    app.set_status(format!("No results for '{query}'"));
                } else {
                    app.set_status(format!("Found {} results", results.len()));
                }
                app.set_results(query, results);
            }
            Err(e) => report(app, "Search failed", &e),
        },
        AcquireEvent::DownloadFinished { title, result } => match result {
            Ok(acquired) => {
                let verb = if controller.library().contains(&acquired.title) {
                    "Replaced"
                } else {
                    "Added"
                };
                match controller.commit_downloaded_track(
                    &acquired.title,
                    acquired.path,
                    acquired.duration_hint,
                ) {
                    Ok(()) => {
                        app.set_status(format!("{verb} '{title}' in the library"));
                        if app.view == View::Library {
                            show_library(app, controller);
                        } else {
                            app.refresh_library(controller.library());
                        }
                    }
                    Err(e) => report(app, "Could not save library", &e),
                }
            }
            Err(e) => report(app, "Download failed", &e),
        },
    }
}

/// Handle a single key press. Returns `true` when the app should quit.
pub(crate) fn handle_key_event<E: AudioEngine, M: MetadataReader>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<E, M>,
    worker: &mut AcquireWorker,
) -> bool {
    match app.input_mode {
        InputMode::ConfirmDelete => {
            handle_confirm_key(key, app, controller);
            false
        }
        InputMode::Filter | InputMode::Search => {
            handle_input_key(key, settings, app, controller, worker);
            false
        }
        InputMode::Normal => handle_normal_key(key, settings, app, controller, worker),
    }
}

fn handle_confirm_key<E: AudioEngine, M: MetadataReader>(
    key: KeyEvent,
    app: &mut App,
    controller: &mut PlaybackController<E, M>,
) {
    let confirmed = match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => true,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
        _ => return,
    };
    let Some(title) = app.resolve_delete(confirmed) else {
        app.set_status("Delete cancelled");
        return;
    };

    match controller.delete_track(&title) {
        Ok(_) => {
            app.set_status(format!("Deleted '{title}'"));
            show_library(app, controller);
        }
        Err(e) => report(app, "Delete failed", &e),
    }
}

fn handle_input_key<E: AudioEngine, M: MetadataReader>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<E, M>,
    worker: &mut AcquireWorker,
) {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.pop_input(),
        KeyCode::Enter => {
            let mode = app.input_mode;
            let text = app.take_input();
            match mode {
                InputMode::Filter => {
                    app.filter_query = text.trim().to_string();
                    app.selected = 0;
                    show_library(app, controller);
                }
                InputMode::Search => {
                    let query = text.trim().to_string();
                    if query.is_empty() {
                        return;
                    }
                    match worker.search(query.clone(), settings.acquire.max_results) {
                        Ok(()) => app.set_status(format!("Searching for '{query}'...")),
                        Err(e) => report(app, "Search not started", &e),
                    }
                }
                InputMode::Normal | InputMode::ConfirmDelete => {}
            }
        }
        KeyCode::Char(c) if !c.is_control() => app.push_input(c),
        _ => {}
    }
}

fn handle_normal_key<E: AudioEngine, M: MetadataReader>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlaybackController<E, M>,
    worker: &mut AcquireWorker,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Enter => match app.view {
            View::Library => {
                if app.selected_title().is_none() {
                    return false;
                }
                match controller.play_track_at(app.selected) {
                    Ok(true) => app.clear_status(),
                    Ok(false) => app.set_status("That song's file is missing"),
                    Err(e) => report(app, "Playback error", &e),
                }
            }
            View::Search => {
                let Some(candidate) = app.selected_candidate().cloned() else {
                    return false;
                };
                let title = candidate.title.clone();
                match worker.download(candidate) {
                    Ok(()) => app.set_status(format!("Downloading '{title}'...")),
                    Err(AcquireError::Busy) => {
                        app.set_status("Please wait for the current download to finish")
                    }
                    Err(e) => report(app, "Download not started", &e),
                }
            }
        },
        KeyCode::Char(' ') | KeyCode::Char('p') => controller.toggle_play_pause(),
        KeyCode::Char('l') => step(app, controller, Direction::Next),
        KeyCode::Char('h') => step(app, controller, Direction::Previous),
        KeyCode::Char('L') => scrub(app, controller, settings.controls.scrub_seconds, true),
        KeyCode::Char('H') => scrub(app, controller, settings.controls.scrub_seconds, false),
        KeyCode::Char('s') => {
            controller.toggle_shuffle();
            let on = controller.session().shuffle_enabled;
            app.set_status(if on { "Shuffle on" } else { "Shuffle off" });
        }
        KeyCode::Char('/') => app.begin_input(InputMode::Filter),
        KeyCode::Char('o') => app.begin_input(InputMode::Search),
        KeyCode::Tab => {
            if app.toggle_view() {
                show_library(app, controller);
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.request_delete();
        }
        KeyCode::Esc => {
            if !app.filter_query.is_empty() {
                app.filter_query.clear();
                if app.view == View::Library {
                    show_library(app, controller);
                } else {
                    app.refresh_library(controller.library());
                }
            }
            app.clear_status();
        }
        _ => {}
    }

    false
}

fn step<E: AudioEngine, M: MetadataReader>(
    app: &mut App,
    controller: &mut PlaybackController<E, M>,
    direction: Direction,
) {
    if let Err(e) = controller.advance(direction) {
        report(app, "Playback error", &e);
    }
}

fn scrub<E: AudioEngine, M: MetadataReader>(
    app: &mut App,
    controller: &mut PlaybackController<E, M>,
    seconds: u64,
    forward: bool,
) {
    let pos = controller.session().position;
    let delta = Duration::from_secs(seconds);
    let target = if forward {
        pos.saturating_add(delta)
    } else {
        pos.saturating_sub(delta)
    };
    controller.begin_seek();
    if let Err(e) = controller.request_seek(target) {
        report(app, "Seek failed", &e);
    }
}
