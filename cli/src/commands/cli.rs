use std::path::PathBuf;

use clap::{ArgGroup, Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "cpjudge",
    version,
    about = "Turn problem statements into test cases and judge solutions against them"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(ClapArgs, Debug, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["statement", "stdin"])))]
pub struct ExtractArgs {
    /// Statement text file.
    #[arg(long)]
    pub statement: Option<PathBuf>,

    /// Read the statement from standard input.
    #[arg(long)]
    pub stdin: bool,

    /// Directory holding `inputs/` and `outputs/` (overrides `[layout] root`).
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Print the canonical cases instead of writing them.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ParseArgs {
    /// One raw example, e.g. `nums = [1,2,3], target = 9`.
    pub text: String,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct JudgeArgs {
    #[arg(long)]
    pub solution: PathBuf,

    /// Language name or alias; inferred from the file extension when omitted.
    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Per-case wall-clock limit, 0 disables.
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Cases run concurrently (1 = sequential).
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Do not treat output on stderr as a runtime error.
    #[arg(long, default_value_t = false)]
    pub allow_stderr: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract examples from a statement and write the canonical case files.
    Extract(ExtractArgs),
    /// Print the canonical form of one raw example string.
    Parse(ParseArgs),
    /// Run a solution against the stored cases.
    Judge(JudgeArgs),
    /// List supported languages.
    Languages,
}
