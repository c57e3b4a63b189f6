//! Logging System for DeskFocus
//!
//! One global `tracing` subscriber with a console layer, a rolling file layer,
//! or both. File output goes through a non-blocking writer so the keyboard
//! hook thread never waits on disk.

mod config;


pub use config::{
    default_log_directory, LogFormat, LogLevel, LogOutput, LoggingConfig, RotationConfig,
    RotationStrategy,
};

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log file name prefix
pub const LOG_FILE_PREFIX: &str = "deskfocus";

/// `RUST_LOG`-style directives here replace the configured level
pub const LOG_ENV_VAR: &str = "DESKFOCUS_LOG";

/// Logging system errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to install subscriber: {0}")]
    Subscriber(String),

    #[error("Failed to prepare log directory {path:?}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open log file: {0}")]
    Appender(String),
}

pub type LoggingResult<T> = Result<T, LoggingError>;

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Installed logging; hold it until exit so buffered file lines are flushed
pub struct LoggingSystem {
    log_directory: Option<PathBuf>,
    _file_guard: Option<WorkerGuard>,
}

impl LoggingSystem {
    /// Install the global subscriber described by `config`
    pub fn init(config: LoggingConfig) -> LoggingResult<Self> {
        let file = if config.output.writes_file() {
            Some(file_layer(&config)?)
        } else {
            None
        };
        let (file_layer, file_guard) = match file {
            Some((layer, guard)) => (Some(layer), Some(guard)),
            None => (None, None),
        };

        let console_layer = config
            .output
            .writes_console()
            .then(|| finish(decorate(fmt::layer(), &config), config.format));

        tracing_subscriber::registry()
            .with(env_filter(config.level))
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .map_err(|e| LoggingError::Subscriber(e.to_string()))?;

        Ok(Self {
            log_directory: config.output.writes_file().then_some(config.log_directory),
            _file_guard: file_guard,
        })
    }

    /// Directory receiving log files, if file output is on
    pub fn log_directory(&self) -> Option<&Path> {
        self.log_directory.as_deref()
    }
}

fn env_filter(level: LogLevel) -> EnvFilter {
    std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_str()))
}

/// Apply the per-line fields shared by console and file output
fn decorate<S, W>(
    layer: fmt::Layer<S, DefaultFields, Format, W>,
    config: &LoggingConfig,
) -> fmt::Layer<S, DefaultFields, Format, W> {
    layer
        .with_thread_names(config.thread_names)
        .with_thread_ids(config.thread_names)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
}

fn finish<S, W>(layer: fmt::Layer<S, DefaultFields, Format, W>, format: LogFormat) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Text => layer.boxed(),
    }
}

fn file_layer<S>(config: &LoggingConfig) -> LoggingResult<(BoxedLayer<S>, WorkerGuard)>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let dir = &config.log_directory;
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::Directory {
        path: dir.clone(),
        source,
    })?;

    let rotation = match config.rotation.strategy {
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
        RotationStrategy::Never => Rotation::NEVER,
    };
    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(config.rotation.max_files.max(1))
        .build(dir)
        .map_err(|e| LoggingError::Appender(e.to_string()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = decorate(fmt::layer().with_writer(writer).with_ansi(false), config);
    Ok((finish(layer, config.format), guard))
}
