use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::{FileLogConfig, LogFormat, LogRotation, LoggingConfig, Profile};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber; `RUST_LOG` overrides the configured level.
///
/// With `logging.file.enabled` a second, plain-text layer writes to
/// `<directory>/<profile>.log`. Keep the returned guard alive until exit or
/// buffered lines are lost.
pub fn init_logging(
    config: &LoggingConfig,
    profile: Profile,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let stdout: BoxedLayer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    };

    let mut layers = vec![stdout];
    let mut guard = None;

    if config.file.enabled {
        let appender = file_appender(&config.file, profile)?;
        let (writer, worker_guard) = tracing_appender::non_blocking(appender);
        layers.push(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed(),
        );
        guard = Some(worker_guard);
    }

    let result = tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init();

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
        return Ok(None);
    }

    tracing::info!("Logging initialized with level: {}", config.level);
    if config.file.enabled {
        tracing::info!(
            directory = %config.file.directory.display(),
            file = %format!("{}.log", profile),
            "File logging enabled"
        );
    }

    Ok(guard)
}

/// Rolling appender for `<directory>/<profile>[.<period>].log`
pub fn file_appender(
    config: &FileLogConfig,
    profile: Profile,
) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(&config.directory)?;

    let appender = RollingFileAppender::builder()
        .rotation(rotation(config.rotation))
        .filename_prefix(profile.as_str())
        .filename_suffix("log")
        .max_log_files(config.max_files.max(1))
        .build(&config.directory)?;

    Ok(appender)
}

fn rotation(rotation: LogRotation) -> Rotation {
    match rotation {
        LogRotation::Minutely => Rotation::MINUTELY,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::{Path, PathBuf};

    use super::*;

    fn log_dir() -> PathBuf {
        std::env::temp_dir().join(format!("leaning-logs-{}", uuid::Uuid::new_v4()))
    }

    fn file_names(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_file_appender_writes_profile_log() {
        let dir = log_dir();
        let config = FileLogConfig {
            enabled: true,
            directory: dir.clone(),
            rotation: LogRotation::Never,
            max_files: 7,
        };

        let mut appender = file_appender(&config, Profile::Production).unwrap();
        appender.write_all(b"Model registry ready\n").unwrap();
        appender.flush().unwrap();

        let content = std::fs::read_to_string(dir.join("production.log")).unwrap();
        assert!(content.contains("Model registry ready"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_rotating_file_is_named_after_profile() {
        let dir = log_dir();
        let config = FileLogConfig {
            enabled: true,
            directory: dir.clone(),
            ..FileLogConfig::default()
        };

        let mut appender = file_appender(&config, Profile::Development).unwrap();
        appender.write_all(b"line\n").unwrap();
        appender.flush().unwrap();

        let names = file_names(&dir);
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("development."));
        assert!(names[0].ends_with(".log"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_rotation_mapping() {
        assert_eq!(rotation(LogRotation::Daily), Rotation::DAILY);
        assert_eq!(rotation(LogRotation::Never), Rotation::NEVER);
    }
}
