use std::path::{Path, PathBuf};

use crate::error::RunnerError;
use crate::language::{CommandLine, LanguageDescriptor};

use super::abort::AbortSignal;
use super::traits::ProgramExecutor;
use super::types::{ExecRequest, RunOptions};

/// A candidate ready to be executed against test inputs.
///
/// For compiled languages this owns the temporary directory holding the build
/// artifact; dropping it deletes the artifact.
#[derive(Debug)]
pub struct PreparedProgram {
    pub language: LanguageDescriptor,
    pub source: PathBuf,
    run: CommandLine,
    _artifact_dir: Option<tempfile::TempDir>,
}

impl PreparedProgram {
    pub fn run_command(&self) -> &CommandLine {
        &self.run
    }
}

/// Builds `source` once (compiled languages) and returns the reusable run command.
pub async fn prepare_program(
    executor: &dyn ProgramExecutor,
    language: &LanguageDescriptor,
    source: &Path,
    options: &RunOptions,
    abort: &AbortSignal,
) -> Result<PreparedProgram, RunnerError> {
    if !language.is_compiled() {
        return Ok(PreparedProgram {
            language: *language,
            source: source.to_path_buf(),
            run: language.run_command(source, Path::new("")),
            _artifact_dir: None,
        });
    }

    let dir = tempfile::Builder::new()
        .prefix("cpjudge-build-")
        .tempdir()
        .map_err(|e| RunnerError::Io {
            stage: "build",
            source: e,
        })?;
    let artifact = language.artifact_path(dir.path());
    // The build runs inside `dir`, so a relative source must be anchored first.
    let source_abs = if source.is_absolute() {
        source.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| RunnerError::Io {
                stage: "build",
                source: e,
            })?
            .join(source)
    };
    let build = language
        .build_command(&source_abs, &artifact)
        .ok_or_else(|| RunnerError::Spawn("language has no build step".into()))?;

    tracing::debug!(language = language.name, cmd = %build.display(), "building candidate");
    // Compiler scratch files land next to the artifact and go away with it.
    let req = ExecRequest::new(build)
        .timeout(options.build_timeout)
        .cwd(dir.path());
    let out = executor.execute(&req, abort).await.map_err(|e| match e {
        RunnerError::Timeout { limit_ms } => RunnerError::CompileFailure {
            diagnostic: format!("build exceeded {limit_ms} ms"),
        },
        RunnerError::Spawn(msg) => RunnerError::CompileFailure {
            diagnostic: format!("could not start compiler: {msg}"),
        },
        other => other,
    })?;

    if !out.success {
        let diagnostic = if !out.stderr.trim().is_empty() {
            out.stderr.trim_end().to_string()
        } else if !out.stdout.trim().is_empty() {
            out.stdout.trim_end().to_string()
        } else {
            format!("compiler exited with {:?}", out.exit_code)
        };
        return Err(RunnerError::CompileFailure { diagnostic });
    }

    tracing::debug!(artifact = %artifact.display(), duration_ms = out.duration_ms, "build finished");
    Ok(PreparedProgram {
        language: *language,
        source: source.to_path_buf(),
        run: language.run_command(source, &artifact),
        _artifact_dir: Some(dir),
    })
}
