use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

/// Initializes console logging, plus daily-rotated JSON file logging when a
/// log directory is configured.
///
/// `RUST_LOG` overrides the configured filter. Keep the returned guard alive
/// for as long as file logs should be flushed. Calling this a second time is
/// a no-op.
pub fn init_logging(settings: &LoggingSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("dhelp=info"));

    let console_layer = fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match &settings.directory {
        Some(directory) if fs::create_dir_all(directory).is_ok() => {
            let file_appender = tracing_appender::rolling::daily(directory, "dhelp.log");
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().json().with_writer(non_blocking_writer);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .is_ok();

    if installed {
        guard
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let settings = LoggingSettings {
            filter: "dhelp=debug".to_string(),
            directory: Some(dir.path().join("logs")),
        };
        let _first = init_logging(&settings);
        let second = init_logging(&settings);
        assert!(second.is_none());
    }
}
