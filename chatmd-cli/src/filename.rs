//! Export filename suggestion.
//!
//! Mirrors what the in-browser exporter did with the page title: strip the
//! characters no common filesystem accepts, cap the stem, and stamp the
//! export time so repeated exports of the same thread never collide.

use chrono::{DateTime, Utc};

/// Characters that are invalid in filenames on common filesystems.
const INVALID_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Fallback stem when sanitization produces an empty result.
const FALLBACK_STEM: &str = "chat-thread";

/// Maximum length of the title-derived stem.
const MAX_STEM_LENGTH: usize = 80;

/// Filesystem-safe stem derived from a thread title.
pub fn sanitize_stem(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !INVALID_CHARS.contains(c))
        .collect();
    let stem: String = cleaned.trim().chars().take(MAX_STEM_LENGTH).collect();
    let stem = stem.trim_end().to_string();
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

/// `<stem>__<YYYY-MM-DD_HH-MM-SS>.md`
pub fn suggest_filename(title: &str, exported_at: DateTime<Utc>) -> String {
    format!(
        "{}__{}.md",
        sanitize_stem(title),
        exported_at.format("%Y-%m-%d_%H-%M-%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 7, 10, 30, 5).unwrap()
    }

    #[test]
    fn strips_invalid_characters() {
        assert_eq!(sanitize_stem(r#"a/b\c:d*e?f"g<h>i|j"#), "abcdefghij");
    }

    #[test]
    fn caps_stem_length() {
        let long = "x".repeat(200);
        assert_eq!(sanitize_stem(&long).len(), 80);
    }

    #[test]
    fn empty_titles_fall_back() {
        assert_eq!(sanitize_stem("  ***  "), "chat-thread");
        assert_eq!(
            suggest_filename("", at()),
            "chat-thread__2025-08-07_10-30-05.md"
        );
    }

    #[test]
    fn stamps_export_time() {
        assert_eq!(
            suggest_filename("Rust intro", at()),
            "Rust intro__2025-08-07_10-30-05.md"
        );
    }
}
