//! Output normalization used on both sides of every comparison.

/// Canonical comparison form: every line trimmed, blank lines dropped, joined
/// with a single `\n`. `\r\n` and `\n` line endings are treated the same.
pub fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
