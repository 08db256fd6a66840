/// Canonicalize a free-text lookup key: non-breaking spaces become ordinary
/// spaces, runs of whitespace collapse to one, leading/trailing whitespace is
/// trimmed, and the result is lowercased. An empty result means "empty key"
/// and is the caller's condition to handle, not an error.
pub fn normalize(raw: &str) -> String {
    raw.replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
