use std::sync::LazyLock;

use regex::Regex;

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([^"']+)["']"#).expect("invalid quote pattern"));

static WATCHED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)watched\s+([A-Za-z0-9\s]+?)(?:\s+and|\s+was|\s+is|$)")
        .expect("invalid watched pattern")
});

static SAW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bsaw\s+([A-Za-z0-9\s]+?)(?:\s+and|\s+was|\s+is|$)")
        .expect("invalid saw pattern")
});

/// Pull a candidate title out of an utterance.
///
/// Tries, in order: the first quoted substring, then text following
/// "watched " or "saw " up to a stop word or end of string. Returns the
/// first non-empty match, trimmed. No I/O; `None` simply means no match.
pub fn extract_title(text: &str) -> Option<String> {
    for pattern in [&*QUOTED, &*WATCHED, &*SAW] {
        if let Some(captures) = pattern.captures(text) {
            let title = captures[1].trim();
            if !title.is_empty() {
                return Some(title.to_string());
            }
        }
    }

    None
}
