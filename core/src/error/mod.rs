#[allow(clippy::module_inception)]
pub mod error;

pub use error::{
    CaseSide, CliError, ExtractError, JudgeError, ParseError, PrepareError, RunnerError,
    StoreError,
};
