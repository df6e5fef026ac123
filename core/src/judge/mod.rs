//! Judging: run the candidate on every stored input and compare normalized output.

pub mod diff;
pub mod report;
mod run;
mod types;

pub use diff::{diff_lines, LineDiff};
pub use report::{build_report, format_text};
pub use run::Judge;
pub use types::{JudgeReport, JudgeRequest, JudgeResult, Outcome};
