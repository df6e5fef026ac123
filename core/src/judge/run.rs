use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use tokio::sync::Semaphore;

use crate::error::{JudgeError, RunnerError};
use crate::language::LanguageDescriptor;
use crate::normalize::normalize;
use crate::parser::CanonicalText;
use crate::runner::{AbortSignal, PreparedProgram, Runner};

use super::diff::diff_lines;
use super::types::{JudgeReport, JudgeRequest, JudgeResult};

/// One input/expected pair, 1-based.
#[derive(Debug, Clone)]
struct Case {
    index: usize,
    input: PathBuf,
    expected: PathBuf,
}

/// Runs a candidate against every stored case and records one verdict each.
#[derive(Clone)]
pub struct Judge {
    runner: Runner,
    jobs: usize,
}

impl Judge {
    pub fn new(runner: Runner, jobs: usize) -> Self {
        Self {
            runner,
            jobs: jobs.max(1),
        }
    }

    fn resolve_language(&self, req: &JudgeRequest) -> Result<LanguageDescriptor, JudgeError> {
        let resolved = match req.language.as_deref() {
            Some(tag) => self.runner.resolve(tag),
            None => self.runner.registry().for_path(&req.solution),
        };
        resolved.copied().map_err(|e| match e {
            RunnerError::UnsupportedLanguage(tag) => JudgeError::UnsupportedLanguage(tag),
            other => JudgeError::UnsupportedLanguage(other.to_string()),
        })
    }

    /// Judges every case in `req`.
    ///
    /// Fatal problems (count mismatch, unknown language) fail before any
    /// process is started. Everything after that is recorded per case; an
    /// abort keeps the results gathered so far and marks the report.
    #[tracing::instrument(
        name = "judge",
        skip_all,
        fields(solution = %req.solution.display(), cases = req.inputs.len(), jobs = self.jobs)
    )]
    pub async fn judge(
        &self,
        req: &JudgeRequest,
        abort: &AbortSignal,
    ) -> Result<JudgeReport, JudgeError> {
        if req.inputs.len() != req.outputs.len() {
            tracing::error!(
                inputs = req.inputs.len(),
                outputs = req.outputs.len(),
                "input/output count mismatch"
            );
            return Err(JudgeError::CountMismatch {
                inputs: req.inputs.len(),
                outputs: req.outputs.len(),
            });
        }

        let language = self.resolve_language(req)?;
        let cases: Vec<Case> = req
            .inputs
            .iter()
            .zip(&req.outputs)
            .enumerate()
            .map(|(i, (input, expected))| Case {
                index: i + 1,
                input: input.clone(),
                expected: expected.clone(),
            })
            .collect();

        let mut report = JudgeReport::new(language.name, &req.solution, cases.len());
        tracing::debug!(run_id = %report.run_id, language = language.name, "judge run started");

        if abort.is_aborted() {
            report.aborted = true;
            return Ok(report);
        }

        let program = match self.runner.prepare(&req.solution, &language, abort).await {
            Ok(program) => program,
            Err(RunnerError::Aborted) => {
                report.aborted = true;
                return Ok(report);
            }
            Err(e) => {
                tracing::warn!(run_id = %report.run_id, error = %e, "candidate could not be prepared");
                let diagnostic = e.to_string();
                for case in &cases {
                    let expected = read_expected(&case.expected).await.unwrap_or_default();
                    report
                        .results
                        .push(JudgeResult::error(case.index, expected, diagnostic.clone(), None));
                }
                log_summary(&report);
                return Ok(report);
            }
        };

        report.results = if self.jobs == 1 {
            self.run_sequential(&program, &cases, abort).await
        } else {
            self.run_pool(&program, &cases, abort).await
        };
        report.aborted = abort.is_aborted() || report.results.len() < cases.len();

        log_summary(&report);
        Ok(report)
    }

    async fn run_sequential(
        &self,
        program: &PreparedProgram,
        cases: &[Case],
        abort: &AbortSignal,
    ) -> Vec<JudgeResult> {
        let mut results = Vec::with_capacity(cases.len());
        for case in cases {
            if abort.is_aborted() {
                break;
            }
            match self.judge_case(program, case, abort).await {
                Some(result) => results.push(result),
                None => break,
            }
        }
        results
    }

    async fn run_pool(
        &self,
        program: &PreparedProgram,
        cases: &[Case],
        abort: &AbortSignal,
    ) -> Vec<JudgeResult> {
        let sem = Arc::new(Semaphore::new(self.jobs));
        let mut futs = FuturesUnordered::new();

        for case in cases {
            let sem = sem.clone();
            futs.push(async move {
                let _permit = sem.acquire_owned().await.ok()?;
                if abort.is_aborted() {
                    return None;
                }
                self.judge_case(program, case, abort).await
            });
        }

        let mut results = Vec::with_capacity(cases.len());
        while let Some(res) = futs.next().await {
            if let Some(result) = res {
                results.push(result);
            }
        }
        results.sort_by_key(|r| r.index);
        results
    }

    /// `None` means the case was cut short by an abort and has no verdict.
    async fn judge_case(
        &self,
        program: &PreparedProgram,
        case: &Case,
        abort: &AbortSignal,
    ) -> Option<JudgeResult> {
        let expected = match read_expected(&case.expected).await {
            Ok(text) => text,
            Err(e) => {
                let diagnostic = format!(
                    "failed to read expected output {}: {e}",
                    case.expected.display()
                );
                tracing::warn!(case = case.index, outcome = "error", %diagnostic);
                return Some(JudgeResult::error(
                    case.index,
                    CanonicalText::default(),
                    diagnostic,
                    None,
                ));
            }
        };

        let started = Instant::now();
        let res = self.runner.run_prepared(program, &case.input, abort).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let result = match res {
            Err(RunnerError::Aborted) => return None,
            Err(e) => {
                tracing::warn!(case = case.index, outcome = "error", duration_ms, error = %e);
                JudgeResult::error(case.index, expected, e.to_string(), Some(duration_ms))
            }
            Ok(stdout) => {
                let actual = CanonicalText::new(normalize(&stdout));
                if actual == expected {
                    JudgeResult::pass(case.index, expected, actual, duration_ms)
                } else {
                    let diff = diff_lines(expected.as_str(), actual.as_str()).render();
                    JudgeResult::fail(case.index, expected, actual, diff, duration_ms)
                }
            }
        };

        tracing::debug!(
            case = result.index,
            outcome = result.outcome.label(),
            duration_ms,
            "case judged"
        );
        Some(result)
    }
}

async fn read_expected(path: &Path) -> std::io::Result<CanonicalText> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(CanonicalText::new(normalize(&raw)))
}

fn log_summary(report: &JudgeReport) {
    tracing::info!(
        run_id = %report.run_id,
        passed = report.passed(),
        failed = report.failed(),
        errored = report.errored(),
        aborted = report.aborted,
        "judge run finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::Outcome;
    use crate::language::LanguageRegistry;
    use crate::runner::{ExecOutput, ExecRequest, ProgramExecutor, RunOptions};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes a fixed stdout and counts every execution.
    struct Spy {
        calls: AtomicUsize,
        stdout: String,
    }

    impl Spy {
        fn new(stdout: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                stdout: stdout.to_string(),
            })
        }
    }

    #[async_trait]
    impl ProgramExecutor for Spy {
        async fn execute(
            &self,
            _req: &ExecRequest,
            _abort: &AbortSignal,
        ) -> Result<ExecOutput, RunnerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ExecOutput {
                exit_code: Some(0),
                success: true,
                stdout: self.stdout.clone(),
                stderr: String::new(),
                duration_ms: 0,
            })
        }
    }

    fn judge_with(spy: Arc<Spy>, jobs: usize) -> Judge {
        let runner = Runner::new(spy, LanguageRegistry::builtin(), RunOptions::default());
        Judge::new(runner, jobs)
    }

    fn write_cases(dir: &Path, expected: &[&str]) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for (i, exp) in expected.iter().enumerate() {
            let input = dir.join(format!("input_{}.txt", i + 1));
            let output = dir.join(format!("output_{}.txt", i + 1));
            std::fs::write(&input, "1").unwrap();
            std::fs::write(&output, exp).unwrap();
            inputs.push(input);
            outputs.push(output);
        }
        (inputs, outputs)
    }

    #[tokio::test]
    async fn count_mismatch_runs_nothing() {
        let spy = Spy::new("");
        let req = JudgeRequest {
            solution: "sol.py".into(),
            language: None,
            inputs: vec!["a".into(), "b".into()],
            outputs: vec!["c".into()],
        };
        let err = judge_with(spy.clone(), 1)
            .judge(&req, &AbortSignal::never())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            JudgeError::CountMismatch {
                inputs: 2,
                outputs: 1
            }
        ));
        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_language_is_fatal_and_runs_nothing() {
        let spy = Spy::new("");
        let req = JudgeRequest {
            solution: "sol.rb".into(),
            language: None,
            inputs: vec![],
            outputs: vec![],
        };
        let err = judge_with(spy.clone(), 1)
            .judge(&req, &AbortSignal::never())
            .await
            .unwrap_err();
        assert!(matches!(err, JudgeError::UnsupportedLanguage(_)));
        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn whitespace_differences_pass_token_differences_fail() {
        let dir = tempfile::tempdir().unwrap();
        let (inputs, outputs) = write_cases(dir.path(), &["2\n0 1\n", "2\n1 0"]);
        let spy = Spy::new("  2\r\n\n0 1  \n");
        let req = JudgeRequest {
            solution: "sol.py".into(),
            language: Some("python".into()),
            inputs,
            outputs,
        };

        let report = judge_with(spy.clone(), 1)
            .judge(&req, &AbortSignal::never())
            .await
            .unwrap();

        assert_eq!(spy.calls.load(Ordering::SeqCst), 2);
        assert_eq!(report.results[0].outcome, Outcome::Pass);
        let fail = &report.results[1];
        assert_eq!(fail.outcome, Outcome::Fail);
        assert_eq!(fail.expected.as_str(), "2\n1 0");
        assert_eq!(fail.actual.as_ref().map(|a| a.as_str()), Some("2\n0 1"));
        assert!(fail.diagnostic.as_deref().unwrap_or_default().contains("line 2"));
        assert!(!report.all_passed());
    }

    #[tokio::test]
    async fn unreadable_expected_file_is_an_error_for_that_case_only() {
        let dir = tempfile::tempdir().unwrap();
        let (inputs, mut outputs) = write_cases(dir.path(), &["7", "7"]);
        outputs[0] = dir.path().join("gone.txt");
        let req = JudgeRequest {
            solution: "sol.py".into(),
            language: None,
            inputs,
            outputs,
        };

        let report = judge_with(Spy::new("7"), 1)
            .judge(&req, &AbortSignal::never())
            .await
            .unwrap();
        assert_eq!(report.results[0].outcome, Outcome::Error);
        assert_eq!(report.results[1].outcome, Outcome::Pass);
    }

    #[tokio::test]
    async fn pool_results_come_back_in_index_order() {
        let dir = tempfile::tempdir().unwrap();
        let expected: Vec<&str> = vec!["5"; 6];
        let (inputs, outputs) = write_cases(dir.path(), &expected);
        let req = JudgeRequest {
            solution: "sol.py".into(),
            language: None,
            inputs,
            outputs,
        };

        let report = judge_with(Spy::new("5"), 3)
            .judge(&req, &AbortSignal::never())
            .await
            .unwrap();
        let indices: Vec<usize> = report.results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
        assert!(report.all_passed());
    }

    #[tokio::test]
    async fn abort_before_start_yields_empty_aborted_report() {
        let dir = tempfile::tempdir().unwrap();
        let (inputs, outputs) = write_cases(dir.path(), &["1"]);
        let handle = crate::runner::AbortHandle::new();
        handle.abort("user");
        let spy = Spy::new("1");
        let req = JudgeRequest {
            solution: "sol.py".into(),
            language: None,
            inputs,
            outputs,
        };

        let report = judge_with(spy.clone(), 1)
            .judge(&req, &handle.signal())
            .await
            .unwrap();
        assert!(report.aborted);
        assert!(report.results.is_empty());
        assert_eq!(spy.calls.load(Ordering::SeqCst), 0);
    }
}
