use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context;
use framecast_core::api::LoggingConfig;
use framecast_core::config::get_framecast_data_dir;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "framecast.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configured directory, else `~/.framecast/logs`, else the OS temp dir.
pub fn log_dir(logging: &LoggingConfig) -> PathBuf {
    if let Some(dir) = logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return PathBuf::from(dir);
    }
    get_framecast_data_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|_| std::env::temp_dir().join("framecast").join("logs"))
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// Console output goes to stderr so stdout stays clean for results; the file
/// layer rolls daily.
pub fn init(logging: &LoggingConfig) -> anyhow::Result<()> {
    if !logging.enabled || (!logging.console && !logging.file) {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("invalid log level {:?}", logging.level))?,
    };

    let file_layer = if logging.file {
        let dir = log_dir(logging);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create log dir {}", dir.display()))?;
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX));
        let _ = LOG_GUARD.set(guard);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
    } else {
        None
    };

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("install tracing subscriber")?;

    Ok(())
}
