/// Derive an on-disk file stem from a track title.
///
/// Keeps alphanumerics, spaces, `-` and `_`, then trims surrounding
/// whitespace. Falls back to `"track"` when nothing survives.
pub fn safe_file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let stem = stem.trim();
    if stem.is_empty() {
        "track".to_string()
    } else {
        stem.to_string()
    }
}
