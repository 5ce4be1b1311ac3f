//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::{App, InputMode, View};
use crate::config::{ControlsSettings, UiSettings};
use crate::player::{PlaybackSnapshot, PlaybackState, format_time, progress_ratio};

static CONTROLS_MAP: LazyLock<BTreeMap<String, String>> = LazyLock::new(|| {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    map.insert("j/k".to_string(), "up/down".to_string());
    map.insert("enter".to_string(), "play / download".to_string());
    map.insert("space/p".to_string(), "play/pause".to_string());
    map.insert("h/l".to_string(), "prev/next song".to_string());
    // H/L is filled dynamically from config.
    map.insert("/".to_string(), "filter library".to_string());
    map.insert("o".to_string(), "search".to_string());
    map.insert("tab".to_string(), "library/results".to_string());
    map.insert("s".to_string(), "shuffle".to_string());
    map.insert("d".to_string(), "delete".to_string());
    map.insert("q".to_string(), "quit".to_string());
    map
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    let order = [
        "j/k", "h/l", "H/L", "enter", "space/p", "/", "o", "tab", "s", "d", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Text of the "now playing" line.
pub(crate) fn now_playing_text(now: &PlaybackSnapshot) -> String {
    match (&now.title, now.state) {
        (Some(title), PlaybackState::Paused) => format!("{title} (paused)"),
        (Some(title), _) => title.clone(),
        (None, _) => "No track playing".to_string(),
    }
}

/// "i/len" for the playlist cursor; "-/len" when there is none or the
/// playlist was replaced under it.
pub(crate) fn playlist_position(now: &PlaybackSnapshot) -> String {
    match now.index {
        Some(i) if i < now.playlist_len => format!("{}/{}", i + 1, now.playlist_len),
        _ => format!("-/{}", now.playlist_len),
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn left_pad() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    now: &PlaybackSnapshot,
    library_len: usize,
    busy: bool,
    ui_settings: &UiSettings,
    controls_settings: &ControlsSettings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" tunebox ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    draw_player_bar(frame, chunks[1], now, library_len);
    draw_list(frame, chunks[2], app, now);
    draw_status_line(frame, chunks[3], app, busy);

    if app.input_mode == InputMode::ConfirmDelete {
        if let Some(title) = &app.pending_delete {
            let popup_area = centered_rect_sized(60, 6, chunks[2]);
            frame.render_widget(Clear, popup_area);
            let text = format!("Delete '{title}' from the library?\n\n[y] yes   [n] no");
            let prompt = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::bordered().title(" confirm delete "))
                .wrap(Wrap { trim: true });
            frame.render_widget(prompt, popup_area);
        }
    }

    let footer = Paragraph::new(controls_text(controls_settings.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(left_pad()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}

fn draw_player_bar(frame: &mut Frame, area: Rect, now: &PlaybackSnapshot, library_len: usize) {
    let shuffle = if now.shuffle { "Shuffle: ON" } else { "Shuffle: OFF" };
    let title = format!(
        " {} • {} • {} • {} songs ",
        now_playing_text(now),
        playlist_position(now),
        shuffle,
        library_len
    );
    let block = Block::bordered().title(title);

    let label = format!("{} / {}", format_time(now.position), format_time(now.duration));
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(progress_ratio(now.position, now.duration))
        .label(label);
    frame.render_widget(gauge, area);
}

fn draw_list(frame: &mut Frame, area: Rect, app: &App, now: &PlaybackSnapshot) {
    let rows = app.visible_titles();
    let total = rows.len();

    // Only build items for the visible window, keeping the cursor centered.
    let list_height = area.height.saturating_sub(2) as usize;
    let sel = app.selected.min(total.saturating_sub(1));
    let (start, end) = if total <= list_height || list_height == 0 {
        (0, total)
    } else {
        let half = list_height / 2;
        let mut start = sel.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height)
    };

    let playing = now.title.as_deref();
    let items: Vec<ListItem> = rows[start..end]
        .iter()
        .map(|title| {
            let item = ListItem::new(format!("♫  {title}"));
            if app.view == View::Library && playing == Some(*title) {
                item.bold()
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", app.list_heading())))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(sel - start));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status_line(frame: &mut Frame, area: Rect, app: &App, busy: bool) {
    let (title, text) = match app.input_mode {
        InputMode::Filter => (" filter library ", format!("/{}", app.input)),
        InputMode::Search => (" search ", format!("?{}", app.input)),
        InputMode::Normal | InputMode::ConfirmDelete => {
            let mut parts: Vec<String> = Vec::new();
            if busy {
                parts.push("Working...".to_string());
            }
            if let Some(msg) = &app.status {
                parts.push(msg.clone());
            }
            let q = app.filter_query.trim();
            if !q.is_empty() {
                parts.push(format!("FILTER: {q}"));
            }
            (" status ", parts.join(" • "))
        }
    };

    let par = Paragraph::new(text)
        .block(Block::bordered().padding(left_pad()).title(title))
        .wrap(Wrap { trim: true });
    frame.render_widget(par, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn snapshot(title: Option<&str>, state: PlaybackState) -> PlaybackSnapshot {
        PlaybackSnapshot {
            title: title.map(str::to_string),
            state,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            shuffle: false,
            index: None,
            playlist_len: 0,
        }
    }

    #[test]
    fn now_playing_placeholder_when_idle() {
        let s = snapshot(None, PlaybackState::Idle);
        assert_eq!(now_playing_text(&s), "No track playing");
    }

    #[test]
    fn now_playing_marks_paused() {
        let s = snapshot(Some("Song"), PlaybackState::Paused);
        assert_eq!(now_playing_text(&s), "Song (paused)");
        let s = snapshot(Some("Song"), PlaybackState::Playing);
        assert_eq!(now_playing_text(&s), "Song");
    }

    #[test]
    fn playlist_position_hides_stale_index() {
        let mut s = snapshot(Some("Song"), PlaybackState::Playing);
        s.index = Some(1);
        s.playlist_len = 3;
        assert_eq!(playlist_position(&s), "2/3");

        s.index = Some(4);
        assert_eq!(playlist_position(&s), "-/3");

        s.index = None;
        s.playlist_len = 0;
        assert_eq!(playlist_position(&s), "-/0");
    }

    #[test]
    fn controls_text_includes_scrub_seconds() {
        let text = controls_text(7);
        assert!(text.contains("[H/L] scrub -/+7s"));
        assert!(text.contains("[o] search"));
    }
}
