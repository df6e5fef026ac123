mod abort;
mod build;
mod io_pump;
mod process;
mod run;
mod traits;
pub mod types;

pub use abort::{AbortHandle, AbortSignal};
pub use build::{prepare_program, PreparedProgram};
pub use process::ProcessExecutor;
pub use run::{classify, Runner};
pub use traits::ProgramExecutor;
pub use types::{ExecOutput, ExecRequest, RunOptions};
