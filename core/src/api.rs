//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `cpjudge_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, AppConfig, JudgeConfig, LayoutConfig, LoggingConfig, StderrPolicy,
};
pub use crate::error::{
    CaseSide, CliError, ExtractError, JudgeError, ParseError, PrepareError, RunnerError,
    StoreError,
};
pub use crate::extract::{extract, RawExample};
pub use crate::judge::{
    build_report, format_text, Judge, JudgeReport, JudgeRequest, JudgeResult, Outcome,
};
pub use crate::language::{LanguageDescriptor, LanguageRegistry, LANGUAGES};
pub use crate::normalize::normalize;
pub use crate::parser::{parse, CanonicalText};
pub use crate::prepare::{build_cases, canonicalize, prepare, CanonicalCase};
pub use crate::runner::{AbortHandle, AbortSignal, ProgramExecutor, RunOptions, Runner};
pub use crate::statement::{FileStatement, ReaderStatement, StatementSource, TextStatement};
pub use crate::store::{CaseFiles, CaseListing, CaseStore, FsCaseStore};
