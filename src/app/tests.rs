use super::*;
use crate::acquire::Candidate;
use crate::library::{LibraryStore, TrackRecord};
use std::path::PathBuf;

fn store(titles: &[&str]) -> (tempfile::TempDir, LibraryStore) {
    let dir = tempfile::tempdir().unwrap();
    let mut store = LibraryStore::open(dir.path().join("library.json")).unwrap();
    for t in titles {
        let path = dir.path().join(format!("{t}.mp3"));
        store.insert_or_replace(t, TrackRecord::from_path(path, 60));
    }
    (dir, store)
}

fn candidate(title: &str) -> Candidate {
    Candidate {
        title: title.into(),
        source: PathBuf::from(format!("/src/{title}.mp3")),
        duration: None,
    }
}

#[test]
fn show_library_lists_all_titles_in_order() {
    let (_dir, store) = store(&["Alpha", "Beta", "Gamma"]);
    let mut app = App::new();
    let playlist = app.show_library(&store);
    assert_eq!(playlist, vec!["Alpha", "Beta", "Gamma"]);
    assert_eq!(app.view, View::Library);
    assert_eq!(app.list_heading(), "Your Library");
}

#[test]
fn show_library_applies_filter_case_insensitively() {
    let (_dir, store) = store(&["Alpha", "Beta", "alphabet"]);
    let mut app = App::new();
    app.filter_query = "ALPHA".into();
    let playlist = app.show_library(&store);
    assert_eq!(playlist, vec!["Alpha", "alphabet"]);
    assert_eq!(app.list_heading(), "Found 2 songs");
}

#[test]
fn selection_is_clamped_when_listing_shrinks() {
    let (_dir, store) = store(&["Alpha", "Beta", "Gamma"]);
    let mut app = App::new();
    app.show_library(&store);
    app.selected = 2;
    app.filter_query = "a".into();
    app.show_library(&store);
    // "Alpha", "Beta", "Gamma" all contain 'a'
    assert_eq!(app.selected, 2);
    app.filter_query = "beta".into();
    app.show_library(&store);
    assert_eq!(app.selected, 0);
}

#[test]
fn next_prev_wrap_around() {
    let (_dir, store) = store(&["Alpha", "Beta", "Gamma"]);
    let mut app = App::new();
    app.show_library(&store);

    app.prev();
    assert_eq!(app.selected, 2);
    app.next();
    assert_eq!(app.selected, 0);
    app.next();
    assert_eq!(app.selected_title(), Some("Beta"));
}

#[test]
fn next_prev_on_empty_list_do_nothing() {
    let mut app = App::new();
    app.next();
    app.prev();
    assert_eq!(app.selected, 0);
    assert_eq!(app.selected_title(), None);
}

#[test]
fn set_results_switches_to_search_view() {
    let mut app = App::new();
    app.selected = 4;
    app.set_results("blue".into(), vec![candidate("Blue"), candidate("Blues")]);
    assert_eq!(app.view, View::Search);
    assert_eq!(app.selected, 0);
    assert_eq!(app.visible_titles(), vec!["Blue", "Blues"]);
    assert_eq!(app.selected_candidate().map(|c| c.title.as_str()), Some("Blue"));
    assert_eq!(app.selected_title(), None);
    assert_eq!(app.list_heading(), "Results for 'blue'");
}

#[test]
fn toggle_view_reports_library_visibility() {
    let mut app = App::new();
    assert!(!app.toggle_view());
    assert_eq!(app.view, View::Search);
    assert!(app.toggle_view());
    assert_eq!(app.view, View::Library);
}

#[test]
fn delete_requires_library_view() {
    let mut app = App::new();
    app.set_results("x".into(), vec![candidate("X")]);
    assert!(!app.request_delete());
    assert!(app.pending_delete.is_none());
    assert!(app.status.as_deref().unwrap().contains("library view"));
}

#[test]
fn delete_confirmation_flow() {
    let (_dir, store) = store(&["Alpha", "Beta"]);
    let mut app = App::new();
    app.show_library(&store);
    app.next();

    assert!(app.request_delete());
    assert_eq!(app.input_mode, InputMode::ConfirmDelete);
    assert_eq!(app.pending_delete.as_deref(), Some("Beta"));
    assert_eq!(app.resolve_delete(true), Some("Beta".to_string()));
    assert_eq!(app.input_mode, InputMode::Normal);

    app.request_delete();
    assert_eq!(app.resolve_delete(false), None);
    assert!(app.pending_delete.is_none());
}

#[test]
fn filter_input_starts_from_current_filter() {
    let mut app = App::new();
    app.filter_query = "ab".into();
    app.begin_input(InputMode::Filter);
    app.push_input('c');
    app.pop_input();
    app.push_input('x');
    assert_eq!(app.take_input(), "abx");
    assert_eq!(app.input_mode, InputMode::Normal);

    app.begin_input(InputMode::Search);
    assert!(app.input.is_empty());
    app.push_input('q');
    app.cancel_input();
    assert!(app.input.is_empty());
    assert_eq!(app.input_mode, InputMode::Normal);
}
