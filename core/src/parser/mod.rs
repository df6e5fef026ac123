//! Canonicalization of raw example text.
//!
//! A raw example such as `nums = [1,2,3], target = 9` becomes the token
//! stream a competitive-programming solution reads from stdin: every array is
//! preceded by its size, every 2-D row by its column count, and scalars are
//! emitted as-is. Variables keep their declaration order.
//!
//! ```text
//! nums = [1,2,3], target = 9   =>   3
//!                                   1 2 3
//!                                   9
//! ```

mod tokenizer;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub use tokenizer::{is_array_literal, tokenize_array, ArrayShape};

/// Newline-joined canonical token stream for one side of a test case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalText(String);

impl CanonicalText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for CanonicalText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits `raw` at every `<identifier> =` that sits outside a quoted string.
///
/// Returns the trimmed, non-empty value segments in declaration order. Text
/// without any assignment comes back as a single segment, which is how raw
/// outputs (`[0,1]`, `true`) are handled.
pub fn split_assignments(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            in_quote = !in_quote;
            current.push(c);
            i += 1;
            continue;
        }

        let at_word_start = is_word(c) && (i == 0 || !is_word(chars[i - 1]));
        if in_quote || !at_word_start {
            current.push(c);
            i += 1;
            continue;
        }

        let word_end = (i..chars.len())
            .find(|&j| !is_word(chars[j]))
            .unwrap_or(chars.len());
        let mut k = word_end;
        while k < chars.len() && chars[k].is_whitespace() {
            k += 1;
        }

        let is_assignment =
            k < chars.len() && chars[k] == '=' && chars.get(k + 1).copied() != Some('=');
        if is_assignment {
            segments.push(std::mem::take(&mut current));
            i = k + 1;
        } else {
            current.extend(&chars[i..word_end]);
            i = word_end;
        }
    }
    segments.push(current);

    segments
        .into_iter()
        .map(|s| clean_segment(&s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trims a value segment and drops the comma separating it from the next
/// assignment.
fn clean_segment(segment: &str) -> String {
    let trimmed = segment.trim();
    let balanced_quotes = trimmed.matches('"').count() % 2 == 0;
    match trimmed.strip_suffix(',') {
        Some(rest) if balanced_quotes => rest.trim_end().to_string(),
        _ => trimmed.to_string(),
    }
}

fn render_array(shape: &ArrayShape, lines: &mut Vec<String>) {
    match shape {
        ArrayShape::Flat(columns) => {
            lines.push(columns.len().to_string());
            lines.push(columns.join(" "));
        }
        ArrayShape::Rows(rows) => {
            lines.push(rows.len().to_string());
            for row in rows {
                lines.push(row.len().to_string());
                lines.push(row.join(" "));
            }
        }
    }
}

/// Canonical lines for one value segment.
pub fn canonicalize_value(value: &str) -> Result<Vec<String>, ParseError> {
    let mut lines = Vec::new();
    if is_array_literal(value) {
        let shape = tokenize_array(value)?;
        render_array(&shape, &mut lines);
    } else {
        lines.push(value.replace('"', "").trim().to_string());
    }
    Ok(lines)
}

/// Converts one raw example string into its canonical token stream.
pub fn parse(raw: &str) -> Result<CanonicalText, ParseError> {
    let mut lines = Vec::new();
    for value in split_assignments(raw) {
        lines.extend(canonicalize_value(&value)?);
    }
    Ok(CanonicalText(lines.join("\n")))
}
