use clap::Parser;
use cpjudge_cli::commands::{self, cli};
use cpjudge_core::api::{AbortHandle, AbortSignal};
use cpjudge_core::error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, error::CliError> {
    let args = cli::Args::parse();
    let cfg =
        cpjudge_core::config::load_default().map_err(|e| error::CliError::Config(e.to_string()))?;
    init_tracing(&cfg.logging).map_err(error::CliError::Config)?;

    dispatch(args.command, &cfg).await
}

/// Ctrl-C aborts the judge run; running candidates are killed and the
/// partial report is still printed.
fn abort_on_ctrl_c() -> AbortSignal {
    let handle = AbortHandle::new();
    let signal = handle.signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping judge run");
            handle.abort("interrupted");
        }
    });
    signal
}

fn exit_code_for_error(e: &error::CliError) -> i32 {
    // 0: all cases passed
    // 1: some case failed or errored, or an uncategorized failure
    // 2: usage / config error
    // 3: extraction or parse error
    // 4: judge setup error
    match e {
        error::CliError::Config(_) | error::CliError::Usage(_) => 2,
        error::CliError::Prepare(pe) => match pe {
            error::PrepareError::Source(_) => 2,
            error::PrepareError::Extract(_)
            | error::PrepareError::Parse { .. }
            | error::PrepareError::Store(_) => 3,
        },
        error::CliError::Parse(_) => 3,
        error::CliError::Judge(_) | error::CliError::Store(_) => 4,
        error::CliError::Anyhow(_) => 1,
    }
}

async fn dispatch(
    cmd: cli::Commands,
    cfg: &cpjudge_core::config::AppConfig,
) -> Result<i32, error::CliError> {
    match cmd {
        cli::Commands::Extract(args) => commands::extract::handle_extract(args, cfg),
        cli::Commands::Parse(args) => commands::parse::handle_parse(args),
        cli::Commands::Judge(args) => {
            let abort = abort_on_ctrl_c();
            commands::judge::handle_judge(args, cfg, &abort).await
        }
        cli::Commands::Languages => commands::languages::handle_languages(),
    }
}

/// `[logging] directory`, or `<tmp>/cpjudge` when unset or blank.
fn log_directory(logging: &cpjudge_core::config::LoggingConfig) -> std::path::PathBuf {
    logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("cpjudge"))
}

fn init_tracing(logging: &cpjudge_core::config::LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let maybe_writer = if logging.file {
        let dir = log_directory(logging);
        std::fs::create_dir_all(&dir)
            .map_err(|e| format!("create log dir {} failed: {e}", dir.display()))?;
        let appender =
            tracing_appender::rolling::never(dir, format!("cpjudge.{}.log", std::process::id()));
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        Some(non_blocking)
    } else {
        None
    };

    if !logging.console && maybe_writer.is_none() {
        return Err("logging enabled but both console and file output are off".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
            .with_target(false)
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
