//! Structured JSONL logging plus human-readable stderr output.
//!
//! - **JSONL to file** (`<data dir>/logs/prompt-hash.jsonl`) for later parsing
//! - **Compact to stderr** for whoever is running the command
//!
//! # Usage
//!
//! ```rust,ignore
//! use prompt_hash::logging;
//!
//! // Keep the guard alive for the duration of the program
//! let _guard = logging::init(&data_dir, false);
//!
//! tracing::info!(event_type = "expansion", shortcut = "#ask", "Shortcut expanded");
//! ```
//!
//! # JSONL Output Format
//!
//! ```json
//! {"timestamp":"2026-01-05T10:30:45.123Z","level":"INFO","target":"prompt_hash::expander","fields":{"message":"Shortcut expanded","shortcut":"#ask"}}
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_NAME: &str = "prompt-hash.jsonl";

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "info";

/// Flushes and closes the log file when dropped.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the file and stderr layers.
///
/// `quiet` drops the stderr layer to warnings and above, for commands whose
/// stdout is meant to be piped.
pub fn init(data_dir: &Path, quiet: bool) -> LoggingGuard {
    let log_dir = log_dir(data_dir);
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }
    let log_path = log_dir.join(LOG_FILE_NAME);

    let file: Box<dyn Write + Send> = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => Box::new(file),
        Err(e) => {
            eprintln!("[LOGGING] Failed to open log file: {}", e);
            Box::new(std::io::sink())
        }
    };
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    let stderr_level = if quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::TRACE
    };
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr.with_max_level(stderr_level))
        .with_ansi(true)
        .with_target(false)
        .with_level(true)
        .compact();

    // A subscriber may already be installed (tests, embedding hosts)
    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            event_type = "app_lifecycle",
            action = "started",
            log_path = %log_path.display(),
            "Logging initialized"
        );
    }

    LoggingGuard {
        _file_guard: file_guard,
    }
}

fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Path of the JSONL log file for `data_dir`
pub fn log_path(data_dir: &Path) -> PathBuf {
    log_dir(data_dir).join(LOG_FILE_NAME)
}

/// Record the outcome of one CLI command
pub fn log_command(command: &str, success: bool, duration_ms: u64) {
    if success {
        tracing::info!(
            event_type = "command",
            command,
            success,
            duration_ms,
            "Command {} finished",
            command
        );
    } else {
        tracing::warn!(
            event_type = "command",
            command,
            success,
            duration_ms,
            "Command {} failed",
            command
        );
    }
}
