use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub judge: JudgeConfig,

    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "cpjudge_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// What to do when a candidate writes to stderr but exits with status 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StderrPolicy {
    /// Any stderr output fails the case.
    #[default]
    Strict,
    /// Stderr is captured for diagnostics but does not affect the outcome.
    Ignore,
}

impl std::str::FromStr for StderrPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "ignore" => Ok(Self::Ignore),
            other => Err(format!("invalid stderr policy '{other}' (expected strict|ignore)")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    /// Wall-clock limit per test case; 0 disables it.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_build_timeout_ms")]
    pub build_timeout_ms: u64,

    #[serde(default)]
    pub stderr_policy: StderrPolicy,

    /// Test cases run concurrently; 1 keeps the sequential reference order.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_build_timeout_ms() -> u64 {
    30_000
}

fn default_jobs() -> usize {
    1
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            build_timeout_ms: default_build_timeout_ms(),
            stderr_policy: StderrPolicy::default(),
            jobs: default_jobs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_layout_root")]
    pub root: PathBuf,

    #[serde(default = "default_inputs_dir")]
    pub inputs_dir: String,

    #[serde(default = "default_outputs_dir")]
    pub outputs_dir: String,
}

fn default_layout_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_inputs_dir() -> String {
    "inputs".to_string()
}

fn default_outputs_dir() -> String {
    "outputs".to_string()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            root: default_layout_root(),
            inputs_dir: default_inputs_dir(),
            outputs_dir: default_outputs_dir(),
        }
    }
}
