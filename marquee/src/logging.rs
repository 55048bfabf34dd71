//! Tracing subscriber setup.
//!
//! The filter comes from `RUST_LOG` when set, defaulting to `info`.
//! With a log directory configured, events go to a daily-rotated file
//! through a non-blocking writer; otherwise they go to stderr.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber.
///
/// Returns the appender guard when logging to a file; hold it for the
/// lifetime of the process or buffered events are lost on exit. Calling
/// this more than once is a no-op.
pub fn init(directory: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let timer = LocalTime::rfc_3339();

    match directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "marquee.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .ok();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_timer(timer)
                .with_writer(std::io::stderr)
                .try_init()
                .ok();
            None
        }
    }
}
