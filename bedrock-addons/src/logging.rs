//! Log output for the installer binary.
//!
//! Sets up the `tracing` subscriber that [`crate::log::TracingLogger`] feeds:
//! - Appends to the install log file (never truncated between runs)
//! - Mirrors every line to stdout
//! - One line per event: `YYYY-MM-DD HH:MM:SS LEVEL message`
//! - Verbosity via `RUST_LOG`, `info` by default

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Timestamp layout used at the start of every log line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Local wall-clock timer for log lines.
#[derive(Debug, Clone, Copy, Default)]
struct LocalTimestamp;

impl FormatTime for LocalTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format(TIMESTAMP_FORMAT))
    }
}

/// Initialize logging to `log_file` and stdout.
///
/// Creates the parent directory if needed. Existing log content is kept;
/// new lines are appended.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created, the path has no
/// file name, or a global subscriber is already installed.
pub fn init_logging(log_file: &Path) -> Result<LoggingGuard, io::Error> {
    let file_name = log_file.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("log path has no file name: {}", log_file.display()),
        )
    })?;
    let log_dir = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(false)
        .with_timer(LocalTimestamp);

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(false)
        .with_target(false)
        .with_timer(LocalTimestamp);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_timestamp_format() {
        let stamp = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(7, 5, 1))
            .unwrap();
        assert_eq!(
            stamp.format(TIMESTAMP_FORMAT).to_string(),
            "2024-03-09 07:05:01"
        );
    }

    #[test]
    fn test_local_timestamp_writes_formatted_time() {
        let mut out = String::new();
        LocalTimestamp
            .format_time(&mut Writer::new(&mut out))
            .unwrap();

        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(out.len(), 19);
        assert_eq!(&out[4..5], "-");
        assert_eq!(&out[10..11], " ");
    }

    #[test]
    fn test_init_logging_rejects_path_without_file_name() {
        let result = init_logging(Path::new("/"));
        assert!(result.is_err());
    }
}
