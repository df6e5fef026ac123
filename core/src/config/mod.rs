mod load;
mod types;

pub use load::{apply_env_overrides, get_cpjudge_data_dir, load_default, load_from_str};
pub use types::{AppConfig, JudgeConfig, LayoutConfig, LoggingConfig, StderrPolicy};
