#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use cpjudge_core::config::StderrPolicy;
use cpjudge_core::language::{CommandTemplate, LanguageDescriptor, LanguageRegistry};
use cpjudge_core::judge::{Judge, JudgeRequest};
use cpjudge_core::parser::CanonicalText;
use cpjudge_core::prepare::CanonicalCase;
use cpjudge_core::runner::{ProcessExecutor, RunOptions, Runner};
use cpjudge_core::store::{CaseStore, FsCaseStore};

/// Interpreted stand-in: `sh <source>`.
pub const SHELL: LanguageDescriptor = LanguageDescriptor {
    name: "Shell",
    aliases: &["sh"],
    file_extension: "sh",
    source_extensions: &["sh"],
    build: None,
    run: CommandTemplate {
        program: "sh",
        args: &["{source}"],
    },
};

/// Compiled stand-in: the "build" copies the source to the artifact and logs
/// one line to `<source>.builds`.
pub const BUILT_SHELL: LanguageDescriptor = LanguageDescriptor {
    name: "BuiltShell",
    aliases: &["bsh"],
    file_extension: "bsh",
    source_extensions: &["bsh"],
    build: Some(CommandTemplate {
        program: "sh",
        args: &[
            "-c",
            "echo built >> \"$1.builds\" && cp \"$1\" \"$2\"",
            "sh",
            "{source}",
            "{artifact}",
        ],
    }),
    run: CommandTemplate {
        program: "sh",
        args: &["{artifact}"],
    },
};

/// Compiled stand-in whose build always fails with a diagnostic.
pub const BROKEN_BUILD: LanguageDescriptor = LanguageDescriptor {
    name: "Broken",
    aliases: &[],
    file_extension: "broken",
    source_extensions: &["broken"],
    build: Some(CommandTemplate {
        program: "sh",
        args: &["-c", "echo 'solution:1:5: error: expected ;' >&2; exit 1"],
    }),
    run: CommandTemplate {
        program: "sh",
        args: &["{artifact}"],
    },
};

/// Routes core tracing output through the test harness; safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("cpjudge_core=debug")
        .with_test_writer()
        .try_init();
}

pub fn options(timeout_ms: u64, stderr_policy: StderrPolicy) -> RunOptions {
    RunOptions {
        timeout: Some(Duration::from_millis(timeout_ms)),
        build_timeout: Some(Duration::from_secs(30)),
        stderr_policy,
    }
}

pub fn judge(options: RunOptions, jobs: usize) -> Judge {
    let registry = LanguageRegistry::new(vec![SHELL, BUILT_SHELL, BROKEN_BUILD]);
    let runner = Runner::new(Arc::new(ProcessExecutor::new()), registry, options);
    Judge::new(runner, jobs)
}

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write script");
    path
}

/// Persists `(input, expected)` pairs under `root` and returns a request for `solution`.
pub fn request_for(root: &Path, solution: &Path, cases: &[(&str, &str)]) -> JudgeRequest {
    let store = FsCaseStore::new(root);
    let cases: Vec<CanonicalCase> = cases
        .iter()
        .enumerate()
        .map(|(i, (input, output))| CanonicalCase {
            index: i + 1,
            input: CanonicalText::new(*input),
            output: CanonicalText::new(*output),
        })
        .collect();
    store.persist(&cases).expect("persist cases");
    JudgeRequest::new(solution, None, store.list().expect("list cases"))
}
