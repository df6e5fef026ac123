#![cfg(unix)]

mod common;

use std::time::{Duration, Instant};

use common::{judge, options, request_for, write_script};
use cpjudge_core::config::StderrPolicy;
use cpjudge_core::judge::Outcome;
use cpjudge_core::runner::{AbortHandle, AbortSignal};
use pretty_assertions::assert_eq;

const STRICT: StderrPolicy = StderrPolicy::Strict;

#[tokio::test]
async fn echo_candidate_passes() {
    common::init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let sol = write_script(dir.path(), "echo.sh", "cat\n");
    let req = request_for(dir.path(), &sol, &[("3\n1 2 3\n9", "3\n1 2 3\n9")]);

    let report = judge(options(5_000, STRICT), 1)
        .judge(&req, &AbortSignal::never())
        .await
        .unwrap();

    assert_eq!(report.language, "Shell");
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].outcome, Outcome::Pass);
    assert!(report.all_passed());
}

#[tokio::test]
async fn whitespace_layout_differences_still_pass() {
    let dir = tempfile::tempdir().unwrap();
    let sol = write_script(
        dir.path(),
        "loose.sh",
        "printf '\\n  3 \\r\\n\\n1 2 3\\n9   \\n\\n'\n",
    );
    let req = request_for(dir.path(), &sol, &[("ignored", "3\n1 2 3\n9")]);

    let report = judge(options(5_000, STRICT), 1)
        .judge(&req, &AbortSignal::never())
        .await
        .unwrap();
    assert_eq!(report.results[0].outcome, Outcome::Pass);
}

#[tokio::test]
async fn token_difference_fails_with_both_sides_kept() {
    let dir = tempfile::tempdir().unwrap();
    let sol = write_script(dir.path(), "wrong.sh", "echo 3; echo 1 2 4; echo 9\n");
    let req = request_for(dir.path(), &sol, &[("x", "3\n1 2 3\n9")]);

    let report = judge(options(5_000, STRICT), 1)
        .judge(&req, &AbortSignal::never())
        .await
        .unwrap();

    let r = &report.results[0];
    assert_eq!(r.outcome, Outcome::Fail);
    assert_eq!(r.expected.as_str(), "3\n1 2 3\n9");
    assert_eq!(r.actual.as_ref().unwrap().as_str(), "3\n1 2 4\n9");
    assert!(r.diagnostic.as_deref().unwrap().contains("line 2"));
}

#[tokio::test]
async fn every_case_gets_an_outcome_even_after_failures() {
    let dir = tempfile::tempdir().unwrap();
    let sol = write_script(
        dir.path(),
        "mixed.sh",
        "read n\nif [ \"$n\" = 2 ]; then exit 3; fi\necho \"$n\"\n",
    );
    let req = request_for(
        dir.path(),
        &sol,
        &[("1", "1"), ("2", "2"), ("3", "4"), ("4", "4")],
    );

    let report = judge(options(5_000, STRICT), 1)
        .judge(&req, &AbortSignal::never())
        .await
        .unwrap();

    let outcomes: Vec<Outcome> = report.results.iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        vec![Outcome::Pass, Outcome::Error, Outcome::Fail, Outcome::Pass]
    );
    assert!(report.results[1]
        .diagnostic
        .as_deref()
        .unwrap()
        .contains("exit code 3"));
    assert!(!report.aborted);
}

#[tokio::test]
async fn timeout_kills_candidate_and_records_error() {
    let dir = tempfile::tempdir().unwrap();
    let sol = write_script(dir.path(), "slow.sh", "sleep 30 &\nsleep 30\n");
    let req = request_for(dir.path(), &sol, &[("1", "1"), ("2", "2")]);

    let started = Instant::now();
    let report = judge(options(300, STRICT), 1)
        .judge(&req, &AbortSignal::never())
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(report.results.len(), 2);
    for r in &report.results {
        assert_eq!(r.outcome, Outcome::Error);
        assert!(r.diagnostic.as_deref().unwrap().contains("time limit exceeded"));
    }
}

#[tokio::test]
async fn stderr_output_follows_the_configured_policy() {
    let dir = tempfile::tempdir().unwrap();
    let sol = write_script(dir.path(), "noisy.sh", "cat\necho debug >&2\n");
    let req = request_for(dir.path(), &sol, &[("5", "5")]);

    let strict = judge(options(5_000, StderrPolicy::Strict), 1)
        .judge(&req, &AbortSignal::never())
        .await
        .unwrap();
    assert_eq!(strict.results[0].outcome, Outcome::Error);
    assert!(strict.results[0]
        .diagnostic
        .as_deref()
        .unwrap()
        .contains("debug"));

    let lenient = judge(options(5_000, StderrPolicy::Ignore), 1)
        .judge(&req, &AbortSignal::never())
        .await
        .unwrap();
    assert_eq!(lenient.results[0].outcome, Outcome::Pass);
}

#[tokio::test]
async fn compiled_candidate_is_built_once_and_artifact_removed() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("artifact_path.txt");
    let body = format!("echo \"$0\" > '{}'\ncat\n", marker.display());
    let sol = write_script(dir.path(), "sol.bsh", &body);
    let req = request_for(dir.path(), &sol, &[("1", "1"), ("2", "2"), ("3", "3")]);

    let report = judge(options(5_000, STRICT), 1)
        .judge(&req, &AbortSignal::never())
        .await
        .unwrap();
    assert!(report.all_passed());

    let builds = std::fs::read_to_string(dir.path().join("sol.bsh.builds")).unwrap();
    assert_eq!(builds.lines().count(), 1);

    let artifact = std::fs::read_to_string(&marker).unwrap();
    assert!(!std::path::Path::new(artifact.trim()).exists());
}

#[tokio::test]
async fn build_failure_marks_every_case_as_error() {
    let dir = tempfile::tempdir().unwrap();
    let sol = write_script(dir.path(), "sol.broken", "touch ran\n");
    let req = request_for(dir.path(), &sol, &[("1", "1"), ("2", "2")]);

    let report = judge(options(5_000, STRICT), 1)
        .judge(&req, &AbortSignal::never())
        .await
        .unwrap();

    assert_eq!(report.results.len(), 2);
    for r in &report.results {
        assert_eq!(r.outcome, Outcome::Error);
        assert!(r.diagnostic.as_deref().unwrap().contains("expected ;"));
    }
    assert_eq!(report.results[1].expected.as_str(), "2");
    assert!(!dir.path().join("ran").exists());
}

#[tokio::test]
async fn worker_pool_keeps_index_order() {
    let dir = tempfile::tempdir().unwrap();
    // Later cases finish first.
    let sol = write_script(
        dir.path(),
        "pool.sh",
        "read n\nsleep \"0.$((5 - n))\"\necho \"$n\"\n",
    );
    let req = request_for(
        dir.path(),
        &sol,
        &[("1", "1"), ("2", "2"), ("3", "3"), ("4", "4")],
    );

    let report = judge(options(5_000, STRICT), 4)
        .judge(&req, &AbortSignal::never())
        .await
        .unwrap();

    let indices: Vec<usize> = report.results.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
    assert!(report.all_passed());
}

#[tokio::test]
async fn abort_mid_run_keeps_partial_results() {
    let dir = tempfile::tempdir().unwrap();
    let sol = write_script(
        dir.path(),
        "hang.sh",
        "read n\nif [ \"$n\" = 1 ]; then echo 1; exit 0; fi\nsleep 30\n",
    );
    let req = request_for(dir.path(), &sol, &[("1", "1"), ("2", "2"), ("3", "3")]);

    let handle = AbortHandle::new();
    let signal = handle.signal();
    let judge = judge(options(60_000, STRICT), 1);
    let task = tokio::spawn(async move { judge.judge(&req, &signal).await });

    tokio::time::sleep(Duration::from_millis(500)).await;
    handle.abort("interrupted");

    let report = tokio::time::timeout(Duration::from_secs(10), task)
        .await
        .expect("abort should stop the run promptly")
        .unwrap()
        .unwrap();

    assert!(report.aborted);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].outcome, Outcome::Pass);
    assert!(!report.all_passed());
}
