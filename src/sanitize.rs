//! Title sanitization for output filenames and folder names.
//!
//! Video, playlist, and channel titles come straight from the extractor and
//! routinely contain characters that are invalid in filenames (`/`, `:`, `?`,
//! quotes, ...). Every path component this tool writes goes through
//! [`sanitize_title`] first.

/// Strips filename-invalid characters from a title.
///
/// The result is safe to use as a single path component on all supported
/// platforms and the function is idempotent: sanitizing an already-sanitized
/// title returns it unchanged. Titles that sanitize down to nothing fall back
/// to `"untitled"` so the output file always has a name.
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    let cleaned = sanitize_filename::sanitize(title);
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}
