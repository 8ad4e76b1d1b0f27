//! Log setup: stderr plus a daily file under `~/.orochi-helper/logs`.
//!
//! `RUST_LOG` picks the filter; `OROCHI_HELPER_DEBUG_LOG=1` forces `debug`.
//! stdout is left alone because the subcommands print their results there.

use std::env;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEBUG_ENV: &str = "OROCHI_HELPER_DEBUG_LOG";
const LOG_FILE_PREFIX: &str = "orochi-helper.log";

fn debug_enabled() -> bool {
    env::var(DEBUG_ENV)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES")
}

fn log_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".orochi-helper").join("logs"))
}

fn filter() -> EnvFilter {
    if debug_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

/// Installs the global subscriber. Keep the guard alive until exit so the
/// file writer flushes.
pub fn init() -> Option<WorkerGuard> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let file = log_dir().and_then(|dir| {
        fs_err::create_dir_all(&dir).ok()?;
        Some(tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX))
    });

    match file {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
            let _ = tracing_subscriber::registry()
                .with(filter())
                .with(stderr_layer)
                .with(file_layer)
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::registry()
                .with(filter())
                .with(stderr_layer)
                .try_init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_values() {
        for value in ["1", "true", "TRUE", "yes", "YES"] {
            assert!(is_truthy(value), "{value}");
        }
        for value in ["0", "false", "", "on"] {
            assert!(!is_truthy(value), "{value}");
        }
    }
}
