//! Logging setup for quire with file output and optional stdout.
//!
//! Logs always go to a file at `warn` level (or whatever `QUIRE_LOG`/`RUST_LOG` asks for).
//! Stdout logging is enabled when `QUIRE_LOG` or `RUST_LOG` is set, or in debug builds.
//!
//! ## Environment Variables
//!
//! 1. **`QUIRE_LOG`** (highest priority) - quire-specific logging control
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn` globally, `info` for quire crates
//!
//! `QUIRE_LOG=debug` applies the level to every quire crate; anything containing `=`,
//! `:` or `,` is passed through as a full filter (`QUIRE_LOG=quire_buffer=trace`).
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/quire/logs/quire-<pid>.log`
//! - macOS: `~/Library/Application Support/quire/logs/quire-12345.log`
//! - Linux: `~/.local/share/quire/logs/quire-12345.log`
//!
//! Override with [`LogConfig::log_file_path`].

use std::{
    env,
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const QUIRE_CRATES: &[&str] = &["quire_rblist", "quire_buffer", "quire_bin"];

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

#[derive(Debug, Default, Clone)]
pub struct LogConfig {
    /// A file path, or a directory to put the default file name in.
    pub log_file_path: Option<PathBuf>,
}

/// Initialize logging.
///
/// The returned [`LogGuard`] must be held for the lifetime of the program --
/// dropping it flushes and stops the background file writer.
///
/// Fails if a global subscriber is already installed.
pub fn init(config: LogConfig) -> Result<LogGuard, BoxError> {
    let (log_dir, filename) = resolve_log_path(config.log_file_path);

    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &filename);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_filter(create_file_filter());

    let stdout_enabled =
        env::var("QUIRE_LOG").is_ok() || env::var("RUST_LOG").is_ok() || cfg!(debug_assertions);

    let stdout_layer = stdout_enabled.then(|| fmt::layer().with_filter(create_filter()));

    Registry::default()
        .with(file_layer)
        .with(stdout_layer)
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file: log_dir.join(filename),
    })
}

/// Initialize logging for tests.
///
/// Stdout-only (captured by the test harness), no file output. Will not crash if called
/// multiple times or if logging is already initialized by another test.
pub fn test() {
    let _ = fmt()
        .with_env_filter(create_filter())
        .with_test_writer()
        .try_init();
}

fn resolve_log_path(override_path: Option<PathBuf>) -> (PathBuf, String) {
    let filename = format!("quire-{}.log", std::process::id());

    if let Some(path) = override_path {
        if path.extension().is_some() {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(filename);
            return (dir.to_path_buf(), name);
        }
        return (path, filename);
    }

    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quire")
        .join("logs");

    (dir, filename)
}

/// File filter: uses the user-specified level if set, otherwise `warn`.
fn create_file_filter() -> EnvFilter {
    if env::var("QUIRE_LOG").is_ok() || env::var("RUST_LOG").is_ok() {
        return create_filter();
    }
    EnvFilter::new("warn")
}

/// Implements the priority system: `QUIRE_LOG` > `RUST_LOG` > defaults.
fn create_filter() -> EnvFilter {
    if let Ok(quire_log) = env::var("QUIRE_LOG") {
        return EnvFilter::new(expand_quire_log(&quire_log));
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }

    EnvFilter::new(crate_directives("info"))
}

fn expand_quire_log(quire_log: &str) -> String {
    if quire_log.contains('=') || quire_log.contains(':') || quire_log.contains(',') {
        return quire_log.to_string();
    }
    crate_directives(quire_log)
}

/// `warn` globally, `level` for every quire crate.
fn crate_directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for name in QUIRE_CRATES {
        directives.push_str(&format!(",{name}={level}"));
    }
    directives
}
