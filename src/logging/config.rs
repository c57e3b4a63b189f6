//! Logging settings chosen by the binary at startup

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Minimum severity that gets recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `EnvFilter`
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s.to_ascii_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            other => return Err(format!("unknown log level '{}'", other)),
        };
        Ok(level)
    }
}

/// Line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
}

impl LogOutput {
    pub fn writes_console(self) -> bool {
        matches!(self, LogOutput::Console | LogOutput::Both)
    }

    pub fn writes_file(self) -> bool {
        matches!(self, LogOutput::File | LogOutput::Both)
    }
}

/// How often a new log file is started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStrategy {
    Daily,
    Hourly,
    Never,
}

/// File rollover and retention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationConfig {
    pub strategy: RotationStrategy,
    /// Older files beyond this count are deleted on rollover
    pub max_files: usize,
}

/// Everything `LoggingSystem::init` needs
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Used when `output` writes a file
    pub log_directory: PathBuf,
    /// Thread names and ids on every line; the hook thread is named
    pub thread_names: bool,
    /// Source file and line on every line
    pub source_location: bool,
    pub rotation: RotationConfig,
}

impl LoggingConfig {
    /// Verbose console-only logging for debug builds
    pub fn development() -> Self {
        Self {
            level: LogLevel::Debug,
            format: LogFormat::Text,
            output: LogOutput::Console,
            log_directory: default_log_directory(),
            thread_names: true,
            source_location: true,
            rotation: RotationConfig {
                strategy: RotationStrategy::Never,
                max_files: 1,
            },
        }
    }

    /// Console plus a daily file kept for two weeks
    pub fn production() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Text,
            output: LogOutput::Both,
            log_directory: default_log_directory(),
            thread_names: true,
            source_location: false,
            rotation: RotationConfig {
                strategy: RotationStrategy::Daily,
                max_files: 14,
            },
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }
}

/// `<local data dir>/DeskFocus/logs`, or `./logs` when there is no data dir
pub fn default_log_directory() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("DeskFocus").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}
