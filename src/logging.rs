//! Diagnostics for music-app-rs.
//!
//! Raw mode and the alternate screen own stdout while the client runs, so
//! every `tracing` event lands in `.logs/music-app-rs.YYYY-MM-DD.log`.
//! `RUST_LOG` replaces the default directives.

use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "music-app-rs";
const LOG_FILE_SUFFIX: &str = "log";
const DEFAULT_DIRECTIVES: &str = "music_app_rs=debug,warn";

/// Flushes buffered lines when the process exits.
static WRITER_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the file subscriber. Fails if the log directory cannot be
/// created or a global subscriber is already set.
pub fn init_logging() -> anyhow::Result<()> {
    let writer = log_writer(Path::new(LOG_DIR))?;

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(file_layer)
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        dir = LOG_DIR,
        "Diagnostics enabled"
    );
    Ok(())
}

fn log_writer(dir: &Path) -> anyhow::Result<NonBlocking> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .build(dir)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    // Only the first install keeps its guard; a second one fails in try_init
    let _ = WRITER_GUARD.set(guard);
    Ok(writer)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Record how a call to a remote collaborator ended.
#[macro_export]
macro_rules! log_request_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::info!(operation = $operation, "Collaborator replied"),
            Err(e) => tracing::error!(operation = $operation, error = %e, "Collaborator call failed"),
        }
    };
}

/// Record an outgoing call, with its arguments as fields.
#[macro_export]
macro_rules! log_request {
    ($operation:expr, $($field:tt)*) => {
        tracing::debug!(operation = $operation, $($field)*, "Calling collaborator");
    };
}
