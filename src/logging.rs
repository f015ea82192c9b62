use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Installs the tracing subscriber: stdout always, plus a daily-rolling file
/// layer when the config carries a log directory. The returned guard must
/// stay alive for the file writer to flush.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match config.log_dir.as_deref().map(file_writer) {
        Some(Ok((writer, guard))) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(FileLogGuard { _guard: guard }))
        }
        Some(Err(err)) => {
            eprintln!("file logging disabled: {err}");
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    guard
}

fn file_writer(dir: &str) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, Path::new(dir), "vocabook.log");
    Ok(tracing_appender::non_blocking(appender))
}
