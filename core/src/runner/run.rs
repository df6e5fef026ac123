use std::path::Path;
use std::sync::Arc;

use crate::config::StderrPolicy;
use crate::error::RunnerError;
use crate::language::{LanguageDescriptor, LanguageRegistry};

use super::abort::AbortSignal;
use super::build::{prepare_program, PreparedProgram};
use super::process::ProcessExecutor;
use super::traits::ProgramExecutor;
use super::types::{ExecOutput, ExecRequest, RunOptions};

/// Builds and executes candidate programs for one language table.
#[derive(Clone)]
pub struct Runner {
    executor: Arc<dyn ProgramExecutor>,
    registry: LanguageRegistry,
    options: RunOptions,
}

impl Runner {
    pub fn new(
        executor: Arc<dyn ProgramExecutor>,
        registry: LanguageRegistry,
        options: RunOptions,
    ) -> Self {
        Self {
            executor,
            registry,
            options,
        }
    }

    /// Real processes, builtin languages.
    pub fn with_processes(options: RunOptions) -> Self {
        Self::new(
            Arc::new(ProcessExecutor::new()),
            LanguageRegistry::builtin(),
            options,
        )
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn resolve(&self, language: &str) -> Result<&LanguageDescriptor, RunnerError> {
        self.registry.resolve(language)
    }

    pub async fn prepare(
        &self,
        source: &Path,
        language: &LanguageDescriptor,
        abort: &AbortSignal,
    ) -> Result<PreparedProgram, RunnerError> {
        prepare_program(
            self.executor.as_ref(),
            language,
            source,
            &self.options,
            abort,
        )
        .await
    }

    /// Executes an already prepared program with `input` as its stdin.
    pub async fn run_prepared(
        &self,
        program: &PreparedProgram,
        input: &Path,
        abort: &AbortSignal,
    ) -> Result<String, RunnerError> {
        let req = ExecRequest::new(program.run_command().clone())
            .stdin(input)
            .timeout(self.options.timeout);
        let out = self.executor.execute(&req, abort).await?;
        classify(out, self.options.stderr_policy)
    }

    /// Resolve, build and run in one go. The judge uses `prepare` +
    /// `run_prepared` instead so the build happens once per run.
    pub async fn run(
        &self,
        source: &Path,
        input: &Path,
        language: &str,
        abort: &AbortSignal,
    ) -> Result<String, RunnerError> {
        let descriptor = *self.resolve(language)?;
        let program = self.prepare(source, &descriptor, abort).await?;
        self.run_prepared(&program, input, abort).await
    }
}

/// Applies the exit-status and stderr policy to a finished process.
pub fn classify(out: ExecOutput, policy: StderrPolicy) -> Result<String, RunnerError> {
    if !out.success {
        return Err(RunnerError::RuntimeFailure {
            exit_code: out.exit_code,
            stderr: out.stderr.trim_end().to_string(),
        });
    }
    if policy == StderrPolicy::Strict && !out.stderr.is_empty() {
        return Err(RunnerError::RuntimeFailure {
            exit_code: out.exit_code,
            stderr: out.stderr.trim_end().to_string(),
        });
    }
    Ok(out.stdout.trim().to_string())
}
