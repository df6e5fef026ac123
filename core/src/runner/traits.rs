use async_trait::async_trait;

use crate::error::RunnerError;

use super::abort::AbortSignal;
use super::types::{ExecOutput, ExecRequest};

/// Runs an external program with redirected input.
///
/// Implementations return `Ok` for any process that ran to completion, whatever
/// its exit status; `Timeout`, `Aborted`, `Spawn` and `Io` are reported as
/// errors. Exit-status policy belongs to the caller.
#[async_trait]
pub trait ProgramExecutor: Send + Sync {
    async fn execute(
        &self,
        req: &ExecRequest,
        abort: &AbortSignal,
    ) -> Result<ExecOutput, RunnerError>;
}
