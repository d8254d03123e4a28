//! Structured logging to stderr, optionally mirrored to daily log files.
//!
//! Stdout is left to command output (reports, JSON). The filter comes from an
//! explicit directive, then `TIMOTHY_LOG`, then `RUST_LOG`, then a build-type
//! default.

use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding a log filter directive.
pub const LOG_ENV: &str = "TIMOTHY_LOG";

/// Logging configuration.
#[derive(Debug, Default)]
pub struct LogConfig {
    /// Directory for daily log files; stderr only when unset
    pub log_dir: Option<PathBuf>,
    /// Optional custom log filter
    pub log_filter: Option<String>,
}

impl LogConfig {
    /// Also write every event to a daily file under `dir`.
    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    /// Set custom log filter.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }
}

/// Guard that must be held for the lifetime of the program.
///
/// Dropping this guard flushes pending file log entries.
pub struct LoggingGuard {
    _worker_guard: Option<WorkerGuard>,
}

/// Initialize logging with the given configuration.
///
/// A log directory that cannot be used is reported on stderr and skipped.
pub fn init_logging(config: LogConfig) -> LoggingGuard {
    let file = config.log_dir.as_deref().and_then(|dir| match file_writer(dir) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to initialize file logging: {}. Using stderr only.", e);
            None
        }
    });
    let (file_layer, worker_guard) = match file {
        Some((writer, guard)) => {
            (Some(fmt::layer().with_writer(writer).with_ansi(false).with_target(true)), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false);

    tracing_subscriber::registry()
        .with(build_env_filter(config.log_filter.as_deref()))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    LoggingGuard { _worker_guard: worker_guard }
}

/// Non-blocking writer over a daily `timothy.<date>.log` in `dir`.
fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("timothy")
        .filename_suffix("log")
        .build(dir)?;

    Ok(tracing_appender::non_blocking(file_appender))
}

/// Build the environment filter from config or defaults.
fn build_env_filter(custom_filter: Option<&str>) -> EnvFilter {
    if let Some(filter) = custom_filter {
        return EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(default_log_filter()));
    }

    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_env("RUST_LOG"))
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter()))
}

/// Get the default log filter based on build type.
pub fn default_log_filter() -> &'static str {
    #[cfg(debug_assertions)]
    {
        "info,timothy=debug,timothy_core=debug"
    }
    #[cfg(not(debug_assertions))]
    {
        "warn,timothy=info,timothy_core=info"
    }
}
