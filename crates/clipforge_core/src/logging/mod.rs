//! Logging for clipforge.
//!
//! Two layers, used together:
//! - `tracing` macros throughout library code, with a process-wide
//!   subscriber installed by [`init_tracing`]
//! - a per-job [`JobLogger`] owned by the orchestrator context, writing a
//!   dedicated file per job plus an optional callback sink

mod job_logger;
mod types;

use std::path::Path;

pub use job_logger::JobLogger;
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the process-wide tracing subscriber.
///
/// Writes human-readable output to stderr and a daily-rotated file under
/// `logs_dir`. The returned guard must be held for the process lifetime or
/// buffered file output is lost.
pub fn init_tracing(logs_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, "clipforge.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    Ok(guard)
}
