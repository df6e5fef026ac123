use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Which half of an example a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseSide {
    Input,
    Output,
}

impl std::fmt::Display for CaseSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseSide::Input => f.write_str("input"),
            CaseSide::Output => f.write_str("output"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("found {inputs} `Input:` blocks but {outputs} `Output:` blocks")]
    ExtractionMismatch { inputs: usize, outputs: usize },
    #[error("no `Input:`/`Output:` examples found in statement")]
    NoExamples,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unbalanced brackets in value: {value}")]
    UnbalancedBrackets { value: String },
    #[error("unterminated quote in value: {value}")]
    UnterminatedQuote { value: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("layout error: {0}")]
    Layout(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error("failed to read statement: {0}")]
    Source(#[source] std::io::Error),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("example {index} {side}: {source}")]
    Parse {
        index: usize,
        side: CaseSide,
        #[source]
        source: ParseError,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failure of a single build or execution. Scoped to one test case by the judge.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
    #[error("compilation failed:\n{diagnostic}")]
    CompileFailure { diagnostic: String },
    #[error("runtime error ({}):\n{stderr}", exit_label(.exit_code))]
    RuntimeFailure {
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("time limit exceeded ({limit_ms} ms)")]
    Timeout { limit_ms: u64 },
    #[error("spawn failed: {0}")]
    Spawn(String),
    #[error("{stage} io error: {source}")]
    Io {
        stage: &'static str,
        source: std::io::Error,
    },
    #[error("aborted")]
    Aborted,
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "terminated by signal".to_string(),
    }
}

/// Errors that stop a judge run before any case is executed.
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("mismatch in the number of input ({inputs}) and output ({outputs}) files")]
    CountMismatch { inputs: usize, outputs: usize },
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("usage error: {0}")]
    Usage(String),
    #[error(transparent)]
    Prepare(#[from] PrepareError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Judge(#[from] JudgeError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}
