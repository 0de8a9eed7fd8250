use std::path::Path;

/// Base name of a screenshot file: the file name without its extension.
pub fn base_name(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// Key under which the embedding table stores a screenshot.
///
/// The layout-vector table names screenshots with a different image extension
/// than the screenshot files themselves (`123.jpg` is stored as `123.png`), so
/// lookups substitute `table_extension` for the screenshot's own extension.
pub fn embedding_key(base_name: &str, table_extension: &str) -> String {
    format!("{}.{}", base_name, table_extension.trim_start_matches('.'))
}

/// True when `path` carries one of `extensions` (case-insensitive, no dot).
pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |ext| {
            extensions
                .iter()
                .any(|want| want.trim_start_matches('.').eq_ignore_ascii_case(ext))
        })
}
