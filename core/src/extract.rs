//! Pulls the labelled `Input:` / `Output:` example blocks out of a statement.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ExtractError;

/// One example block as written in the statement, before canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawExample {
    /// 1-based position in the statement.
    pub index: usize,
    pub raw_input: String,
    pub raw_output: String,
}

static LABEL_REGEX: OnceLock<Regex> = OnceLock::new();

fn label_regex() -> &'static Regex {
    LABEL_REGEX.get_or_init(|| {
        Regex::new(r"Input:|Output:|Explanation:|Example|Constraints:")
            .expect("LABEL_REGEX is valid")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Input,
    Output,
    /// `Explanation:`, `Example`, `Constraints:`; these only close an output.
    Stop,
}

impl Label {
    fn of(text: &str) -> Self {
        match text {
            "Input:" => Label::Input,
            "Output:" => Label::Output,
            _ => Label::Stop,
        }
    }

    /// Whether `next` ends a segment opened by `self`.
    fn closed_by(self, next: Label) -> bool {
        match self {
            Label::Input => next != Label::Stop,
            Label::Output | Label::Stop => true,
        }
    }
}

/// Raw input and output segments in statement order, matched by position.
///
/// An input runs until the next `Input:` or `Output:` label, so a repeated
/// `Input:` opens a new segment instead of leaking into the previous one.
pub fn extract_segments(text: &str) -> Result<(Vec<String>, Vec<String>), ExtractError> {
    let labels: Vec<(Label, usize, usize)> = label_regex()
        .find_iter(text)
        .map(|m| (Label::of(m.as_str()), m.start(), m.end()))
        .collect();

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    for (i, &(label, _, body_start)) in labels.iter().enumerate() {
        let target = match label {
            Label::Input => &mut inputs,
            Label::Output => &mut outputs,
            Label::Stop => continue,
        };
        let end = labels[i + 1..]
            .iter()
            .find(|(next, _, _)| label.closed_by(*next))
            .map_or(text.len(), |&(_, start, _)| start);
        target.push(text[body_start..end].trim().to_string());
    }

    if inputs.len() != outputs.len() {
        return Err(ExtractError::ExtractionMismatch {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }
    if inputs.is_empty() {
        return Err(ExtractError::NoExamples);
    }
    Ok((inputs, outputs))
}

pub fn extract(text: &str) -> Result<Vec<RawExample>, ExtractError> {
    let (inputs, outputs) = extract_segments(text)?;
    let examples: Vec<RawExample> = inputs
        .into_iter()
        .zip(outputs)
        .enumerate()
        .map(|(i, (raw_input, raw_output))| RawExample {
            index: i + 1,
            raw_input,
            raw_output,
        })
        .collect();

    tracing::debug!(examples = examples.len(), "extracted examples");
    Ok(examples)
}
