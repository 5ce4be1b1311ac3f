//! Application model types: `App`, `View` and `InputMode`.
//!
//! The `App` struct holds what the terminal shows: which list is visible,
//! the cursor, the text being typed and the status line. Playback state is
//! not stored here; it is read from the controller's snapshot on each draw.

use crate::acquire::Candidate;
use crate::library::LibraryStore;

/// Which list the main pane shows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum View {
    Library,
    Search,
}

impl Default for View {
    fn default() -> Self {
        Self::Library
    }
}

/// What keystrokes currently mean.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a library filter (`/`).
    Filter,
    /// Typing a provider search query (`o`).
    Search,
    /// Waiting for y/n on a pending delete.
    ConfirmDelete,
}

impl Default for InputMode {
    fn default() -> Self {
        Self::Normal
    }
}

/// The main application model.
#[derive(Debug, Default)]
pub struct App {
    pub view: View,
    pub input_mode: InputMode,
    pub input: String,
    pub selected: usize,

    /// Library titles currently listed (all of them, or the filter result).
    pub library_titles: Vec<String>,
    /// Filter applied to `library_titles`; empty means "show all".
    pub filter_query: String,

    pub results: Vec<Candidate>,
    pub last_query: Option<String>,

    pub pending_delete: Option<String>,
    pub status: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the library listing from `store` (respecting the current
    /// filter) and switch to the library view.
    ///
    /// Returns the listed titles; the caller hands them to the controller as
    /// the new active playlist.
    pub fn show_library(&mut self, store: &LibraryStore) -> Vec<String> {
        self.view = View::Library;
        self.refresh_library(store);
        self.library_titles.clone()
    }

    /// Recompute the library listing without changing the visible view.
    pub fn refresh_library(&mut self, store: &LibraryStore) {
        self.library_titles = if self.filter_query.trim().is_empty() {
            store.titles()
        } else {
            store.search(self.filter_query.trim())
        };
        if self.view == View::Library {
            self.clamp_selection();
        }
    }

    /// Replace the search results and switch to the search view.
    pub fn set_results(&mut self, query: String, results: Vec<Candidate>) {
        self.results = results;
        self.last_query = Some(query);
        self.view = View::Search;
        self.selected = 0;
    }

    /// Flip between the library and search views. Returns `true` when the
    /// library view became visible (so the playlist should be refreshed).
    pub fn toggle_view(&mut self) -> bool {
        self.view = match self.view {
            View::Library => View::Search,
            View::Search => View::Library,
        };
        self.selected = 0;
        self.view == View::Library
    }

    /// Number of rows in the visible list.
    pub fn visible_len(&self) -> usize {
        match self.view {
            View::Library => self.library_titles.len(),
            View::Search => self.results.len(),
        }
    }

    /// Row labels for the visible list.
    pub fn visible_titles(&self) -> Vec<&str> {
        match self.view {
            View::Library => self.library_titles.iter().map(String::as_str).collect(),
            View::Search => self.results.iter().map(|c| c.title.as_str()).collect(),
        }
    }

    /// Heading above the list, e.g. "Your Library" or "Found 3 songs".
    pub fn list_heading(&self) -> String {
        match self.view {
            View::Library if self.filter_query.trim().is_empty() => "Your Library".to_string(),
            View::Library => format!("Found {} songs", self.library_titles.len()),
            View::Search => match &self.last_query {
                Some(q) => format!("Results for '{q}'"),
                None => "Search (press o)".to_string(),
            },
        }
    }

    pub fn selected_title(&self) -> Option<&str> {
        match self.view {
            View::Library => self.library_titles.get(self.selected).map(String::as_str),
            View::Search => None,
        }
    }

    pub fn selected_candidate(&self) -> Option<&Candidate> {
        match self.view {
            View::Search => self.results.get(self.selected),
            View::Library => None,
        }
    }

    /// Move selection to the next row, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous row, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    pub fn begin_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.input = match mode {
            InputMode::Filter => self.filter_query.clone(),
            _ => String::new(),
        };
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    /// Leave input mode, returning the typed text.
    pub fn take_input(&mut self) -> String {
        self.input_mode = InputMode::Normal;
        std::mem::take(&mut self.input)
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input.clear();
    }

    /// Ask for confirmation before deleting the selected library entry.
    ///
    /// Only the library view can delete; elsewhere a warning is shown.
    pub fn request_delete(&mut self) -> bool {
        if self.view != View::Library {
            self.set_status("Switch to the library view to delete songs");
            return false;
        }
        let Some(title) = self.selected_title().map(str::to_string) else {
            self.set_status("Select a song to delete");
            return false;
        };
        self.pending_delete = Some(title);
        self.input_mode = InputMode::ConfirmDelete;
        true
    }

    /// Resolve the pending delete. Returns the title when confirmed.
    pub fn resolve_delete(&mut self, confirmed: bool) -> Option<String> {
        self.input_mode = InputMode::Normal;
        let title = self.pending_delete.take()?;
        confirmed.then_some(title)
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}
