use crate::config::data_dir;
use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

/// Sends tracing output to `<data dir>/taskmy.log`; the terminal belongs to the UI.
///
/// `TASKMY_LOG` overrides `level` with a full filter directive. Keep the
/// returned guard alive until exit or buffered lines are lost.
pub fn init_file_logging(level: &str) -> Result<Option<WorkerGuard>> {
    let Some(dir) = data_dir() else {
        return Ok(None);
    };
    init_logging_in(dir, level).map(Some)
}

pub fn init_logging_in(dir: PathBuf, level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&dir)?;
    let appender = tracing_appender::rolling::never(&dir, "taskmy.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = tracing_subscriber::EnvFilter::try_from_env("TASKMY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(guard)
}
