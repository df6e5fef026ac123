//! `cpjudge judge`: run a solution against the stored cases and report.
use crate::commands::cli::{JudgeArgs, OutputFormat};
use cpjudge_core::api as core_api;
use cpjudge_core::api::CaseStore;

/// Exit code when the run was interrupted.
pub const EXIT_ABORTED: i32 = 130;

/// Effective judge settings: config file values with command-line overrides applied.
pub fn effective_config(args: &JudgeArgs, cfg: &core_api::AppConfig) -> core_api::JudgeConfig {
    let mut judge = cfg.judge.clone();
    if let Some(ms) = args.timeout_ms {
        judge.timeout_ms = ms;
    }
    if let Some(jobs) = args.jobs {
        judge.jobs = jobs;
    }
    if args.allow_stderr {
        judge.stderr_policy = core_api::StderrPolicy::Ignore;
    }
    judge
}

pub fn exit_code_for_report(report: &core_api::JudgeReport) -> i32 {
    if report.aborted {
        EXIT_ABORTED
    } else if report.all_passed() {
        0
    } else {
        1
    }
}

pub async fn handle_judge(
    args: JudgeArgs,
    cfg: &core_api::AppConfig,
    abort: &core_api::AbortSignal,
) -> Result<i32, core_api::CliError> {
    if !args.solution.is_file() {
        return Err(core_api::CliError::Usage(format!(
            "solution file not found: {}",
            args.solution.display()
        )));
    }

    let mut layout = cfg.layout.clone();
    if let Some(root) = &args.root {
        layout.root = root.clone();
    }
    let cases = core_api::FsCaseStore::from_layout(&layout).list()?;

    let judge_cfg = effective_config(&args, cfg);
    let runner = core_api::Runner::with_processes(core_api::RunOptions::from(&judge_cfg));
    let judge = core_api::Judge::new(runner, judge_cfg.jobs);

    let req = core_api::JudgeRequest::new(&args.solution, args.language.clone(), cases);
    let report = judge.judge(&req, abort).await?;

    match args.format {
        OutputFormat::Text => print!("{}", core_api::format_text(&report)),
        OutputFormat::Json => {
            let text = core_api::build_report(&report)
                .and_then(|value| serde_json::to_string_pretty(&value))
                .map_err(|e| core_api::CliError::Anyhow(e.into()))?;
            println!("{text}");
        }
    }

    Ok(exit_code_for_report(&report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpjudge_core::api::{CanonicalText, JudgeReport, JudgeResult};

    fn args() -> JudgeArgs {
        JudgeArgs {
            solution: "sol.py".into(),
            language: None,
            root: None,
            timeout_ms: None,
            jobs: None,
            allow_stderr: false,
            format: OutputFormat::Text,
        }
    }

    #[test]
    fn flags_override_config() {
        let cfg = core_api::AppConfig::default();
        let unchanged = effective_config(&args(), &cfg);
        assert_eq!(unchanged.timeout_ms, 5_000);
        assert_eq!(unchanged.stderr_policy, core_api::StderrPolicy::Strict);

        let mut a = args();
        a.timeout_ms = Some(0);
        a.jobs = Some(8);
        a.allow_stderr = true;
        let cfg = effective_config(&a, &cfg);
        assert_eq!(cfg.timeout_ms, 0);
        assert_eq!(cfg.jobs, 8);
        assert_eq!(cfg.stderr_policy, core_api::StderrPolicy::Ignore);
    }

    #[test]
    fn report_exit_codes() {
        let mut report = JudgeReport::new("Python", "sol.py", 1);
        report.results = vec![JudgeResult::pass(
            1,
            CanonicalText::new("1"),
            CanonicalText::new("1"),
            1,
        )];
        assert_eq!(exit_code_for_report(&report), 0);

        report.results[0] = JudgeResult::error(1, CanonicalText::new("1"), "boom", None);
        assert_eq!(exit_code_for_report(&report), 1);

        report.aborted = true;
        assert_eq!(exit_code_for_report(&report), EXIT_ABORTED);
    }
}
