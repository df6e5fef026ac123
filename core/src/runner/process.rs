//! `ProgramExecutor` backed by real child processes.
//!
//! Every child is spawned as the leader of its own process group (Unix) and is
//! owned by a [`ProcessGuard`]; timeouts, aborts and early drops all kill the
//! whole group, so grandchildren such as a shell's subprocesses go with it.

use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::error::RunnerError;

use super::abort::AbortSignal;
use super::io_pump;
use super::traits::ProgramExecutor;
use super::types::{ExecOutput, ExecRequest};

/// Time allowed after exit for stdout/stderr to reach EOF before the group is killed.
const PIPE_DRAIN_GRACE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

struct ProcessGuard {
    child: Child,
    pid: Option<u32>,
    reaped: bool,
}

impl ProcessGuard {
    fn new(child: Child) -> Self {
        let pid = child.id();
        Self {
            child,
            pid,
            reaped: false,
        }
    }

    fn kill_tree(&mut self) {
        #[cfg(unix)]
        if let Some(pid) = self.pid {
            // SAFETY: kill(2) with a negative pid targets the process group we created.
            let rc = unsafe { libc::kill(-(pid as libc::pid_t), libc::SIGKILL) };
            if rc != 0 {
                tracing::trace!(pid, error = %std::io::Error::last_os_error(), "group kill failed");
            }
        }
        let _ = self.child.start_kill();
    }

    async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        let status = self.child.wait().await?;
        self.reaped = true;
        Ok(status)
    }

    async fn kill_and_reap(&mut self) {
        self.kill_tree();
        let _ = self.wait().await;
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        if !self.reaped {
            self.kill_tree();
        }
    }
}

enum Waited {
    Exited(std::io::Result<ExitStatus>),
    TimedOut,
    Aborted,
}

async fn sleep_or_pending(limit: Option<Duration>) {
    match limit {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}

type Pump = JoinHandle<Result<Vec<u8>, RunnerError>>;

fn flatten(res: Result<Result<Vec<u8>, RunnerError>, tokio::task::JoinError>) -> Vec<u8> {
    match res {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "output capture failed");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "output capture task failed");
            Vec::new()
        }
    }
}

/// Collects both pipes; kills the group if they stay open past the grace period.
async fn drain(guard: &mut ProcessGuard, mut out_task: Pump, mut err_task: Pump) -> (Vec<u8>, Vec<u8>) {
    let deadline = tokio::time::sleep(PIPE_DRAIN_GRACE);
    tokio::pin!(deadline);

    let mut stdout = None;
    let mut stderr = None;
    let mut killed = false;

    while stdout.is_none() || stderr.is_none() {
        tokio::select! {
            r = &mut out_task, if stdout.is_none() => stdout = Some(flatten(r)),
            r = &mut err_task, if stderr.is_none() => stderr = Some(flatten(r)),
            _ = &mut deadline, if !killed => {
                tracing::debug!(pid = ?guard.pid, "pipes still open after exit, killing process group");
                guard.kill_tree();
                killed = true;
            }
        }
    }

    (stdout.unwrap_or_default(), stderr.unwrap_or_default())
}

fn open_stdin(req: &ExecRequest) -> Result<Stdio, RunnerError> {
    match &req.stdin {
        Some(path) => std::fs::File::open(path)
            .map(Stdio::from)
            .map_err(|e| RunnerError::Io {
                stage: "stdin",
                source: e,
            }),
        None => Ok(Stdio::null()),
    }
}

#[async_trait]
impl ProgramExecutor for ProcessExecutor {
    async fn execute(
        &self,
        req: &ExecRequest,
        abort: &AbortSignal,
    ) -> Result<ExecOutput, RunnerError> {
        if abort.is_aborted() {
            return Err(RunnerError::Aborted);
        }

        let mut cmd = Command::new(&req.program);
        cmd.args(&req.args)
            .stdin(open_stdin(req)?)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &req.cwd {
            cmd.current_dir(dir);
        }
        #[cfg(unix)]
        cmd.process_group(0);

        let started_at = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|e| RunnerError::Spawn(format!("{}: {e}", req.program.to_string_lossy())))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| RunnerError::Spawn("no stdout".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RunnerError::Spawn("no stderr".into()))?;

        let mut guard = ProcessGuard::new(child);
        tracing::trace!(pid = ?guard.pid, cmd = %req.describe(), "spawned");

        let out_task = io_pump::pump(stdout, "stdout");
        let err_task = io_pump::pump(stderr, "stderr");

        let waited = tokio::select! {
            res = guard.wait() => Waited::Exited(res),
            _ = sleep_or_pending(req.timeout) => Waited::TimedOut,
            _ = abort.aborted() => Waited::Aborted,
        };

        let status = match waited {
            Waited::Exited(res) => res.map_err(|e| RunnerError::Io {
                stage: "wait",
                source: e,
            })?,
            Waited::TimedOut => {
                guard.kill_and_reap().await;
                out_task.abort();
                err_task.abort();
                let limit_ms = req.timeout.map(|d| d.as_millis() as u64).unwrap_or_default();
                tracing::debug!(pid = ?guard.pid, limit_ms, "time limit exceeded");
                return Err(RunnerError::Timeout { limit_ms });
            }
            Waited::Aborted => {
                guard.kill_and_reap().await;
                out_task.abort();
                err_task.abort();
                return Err(RunnerError::Aborted);
            }
        };

        let (stdout, stderr) = drain(&mut guard, out_task, err_task).await;
        let duration_ms = started_at.elapsed().as_millis() as u64;

        Ok(ExecOutput {
            exit_code: status.code(),
            success: status.success(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            duration_ms,
        })
    }
}
