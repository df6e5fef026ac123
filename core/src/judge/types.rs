use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parser::CanonicalText;
use crate::store::CaseListing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Pass => "Passed",
            Outcome::Fail => "Failed",
            Outcome::Error => "Error",
        }
    }
}

/// Verdict for one test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JudgeResult {
    pub index: usize,
    pub outcome: Outcome,
    /// Normalized expected output.
    pub expected: CanonicalText,
    /// Normalized candidate output; absent when the candidate never produced one.
    pub actual: Option<CanonicalText>,
    pub diagnostic: Option<String>,
    pub duration_ms: Option<u64>,
}

impl JudgeResult {
    pub fn pass(index: usize, expected: CanonicalText, actual: CanonicalText, duration_ms: u64) -> Self {
        Self {
            index,
            outcome: Outcome::Pass,
            expected,
            actual: Some(actual),
            diagnostic: None,
            duration_ms: Some(duration_ms),
        }
    }

    pub fn fail(
        index: usize,
        expected: CanonicalText,
        actual: CanonicalText,
        diff: String,
        duration_ms: u64,
    ) -> Self {
        Self {
            index,
            outcome: Outcome::Fail,
            expected,
            actual: Some(actual),
            diagnostic: Some(diff),
            duration_ms: Some(duration_ms),
        }
    }

    pub fn error(
        index: usize,
        expected: CanonicalText,
        diagnostic: impl Into<String>,
        duration_ms: Option<u64>,
    ) -> Self {
        Self {
            index,
            outcome: Outcome::Error,
            expected,
            actual: None,
            diagnostic: Some(diagnostic.into()),
            duration_ms,
        }
    }
}

/// Everything a judge run needs: the candidate and the paired case files.
#[derive(Debug, Clone)]
pub struct JudgeRequest {
    pub solution: PathBuf,
    /// Language tag; inferred from the solution's extension when `None`.
    pub language: Option<String>,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
}

impl JudgeRequest {
    pub fn new(solution: impl Into<PathBuf>, language: Option<String>, cases: CaseListing) -> Self {
        Self {
            solution: solution.into(),
            language,
            inputs: cases.inputs,
            outputs: cases.outputs,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JudgeReport {
    pub run_id: String,
    pub language: String,
    pub solution: PathBuf,
    pub started_at: DateTime<Utc>,
    pub total_cases: usize,
    pub results: Vec<JudgeResult>,
    pub aborted: bool,
}

impl JudgeReport {
    pub fn new(language: &str, solution: impl Into<PathBuf>, total_cases: usize) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            language: language.to_string(),
            solution: solution.into(),
            started_at: Utc::now(),
            total_cases,
            results: Vec::new(),
            aborted: false,
        }
    }

    fn count(&self, outcome: Outcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn passed(&self) -> usize {
        self.count(Outcome::Pass)
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::Fail)
    }

    pub fn errored(&self) -> usize {
        self.count(Outcome::Error)
    }

    /// True only for a complete, non-empty run where every case passed.
    pub fn all_passed(&self) -> bool {
        !self.aborted
            && !self.results.is_empty()
            && self.results.len() == self.total_cases
            && self.passed() == self.results.len()
    }
}
