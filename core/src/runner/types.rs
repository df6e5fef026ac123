use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{JudgeConfig, StderrPolicy};
use crate::language::CommandLine;

/// One external program invocation.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// File bound to the child's stdin; `None` gives it an empty stdin.
    pub stdin: Option<PathBuf>,
    pub cwd: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl ExecRequest {
    pub fn new(cmd: CommandLine) -> Self {
        Self {
            program: cmd.program,
            args: cmd.args,
            stdin: None,
            cwd: None,
            timeout: None,
        }
    }

    pub fn stdin(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn describe(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(self.args.iter().map(|a| a.to_string_lossy().into_owned()));
        parts.join(" ")
    }
}

/// What a finished process left behind.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub timeout: Option<Duration>,
    pub build_timeout: Option<Duration>,
    pub stderr_policy: StderrPolicy,
}

fn limit(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from(&JudgeConfig::default())
    }
}

impl From<&JudgeConfig> for RunOptions {
    fn from(cfg: &JudgeConfig) -> Self {
        Self {
            timeout: limit(cfg.timeout_ms),
            build_timeout: limit(cfg.build_timeout_ms),
            stderr_policy: cfg.stderr_policy,
        }
    }
}
