use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default cpjudge data directory: ~/.cpjudge
pub fn get_cpjudge_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".cpjudge"))
}

pub fn load_from_str(s: &str) -> anyhow::Result<AppConfig> {
    Ok(toml::from_str::<AppConfig>(s)?)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.cpjudge/config.toml
    let user_config = get_cpjudge_data_dir()?.join("config.toml");

    // Priority 2: ./cpjudge.toml
    let local_config = Path::new("cpjudge.toml");

    let mut cfg = if user_config.exists() {
        load_from_str(&std::fs::read_to_string(&user_config)?)?
    } else if local_config.exists() {
        load_from_str(&std::fs::read_to_string(local_config)?)?
    } else {
        AppConfig::default()
    };

    // Environment variable overrides (Priority 0: highest)
    apply_env_overrides(&mut cfg, |k| std::env::var(k).ok())?;

    Ok(cfg)
}

pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("CPJUDGE_TIMEOUT_MS") {
        cfg.judge.timeout_ms = v
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("CPJUDGE_TIMEOUT_MS={v}: {e}"))?;
    }
    if let Some(v) = get("CPJUDGE_STDERR_POLICY") {
        cfg.judge.stderr_policy = v.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    }
    if let Some(v) = get("CPJUDGE_JOBS") {
        cfg.judge.jobs = v
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("CPJUDGE_JOBS={v}: {e}"))?;
    }
    if let Some(v) = get("CPJUDGE_LOG_LEVEL") {
        cfg.logging.level = v;
    }

    Ok(())
}
