//! DeskFocus - per-monitor "show desktop"
//!
//! Main entry point: parses the command line, applies persisted settings and
//! runs the keyboard interceptor until Ctrl+C or the console is closed.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use deskfocus::config::{Autostart, ConfigStore};
use deskfocus::core::ErrorRecovery;
use deskfocus::logging::{LogFormat, LogLevel, LogOutput, LoggingConfig, LoggingSystem};
use deskfocus::os::{
    describe_monitors, DisplayChangeEvent, DisplayChangeListener, KeyboardInterceptor,
    NativeDesktopPlatform,
};
use deskfocus::toggle::ToggleController;

#[derive(Parser)]
#[command(name = "deskfocus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Monitor that Win+D acts on (1-based); saved for later runs
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    monitor: Option<u64>,

    /// Start DeskFocus when you log in
    #[arg(long, value_enum, value_name = "STATE")]
    autostart: Option<Switch>,

    /// Print the connected monitors and exit
    #[arg(long)]
    list_monitors: bool,

    /// Log verbosity
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Log line format (text or json)
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<LogFormat>,

    /// Do not write log files
    #[arg(long)]
    console_only: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Switch {
    fn enabled(self) -> bool {
        self == Switch::On
    }
}

fn logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if cfg!(debug_assertions) {
        LoggingConfig::development()
    } else {
        LoggingConfig::production()
    };

    if let Some(level) = cli.log_level {
        config = config.with_level(level);
    }
    if let Some(format) = cli.log_format {
        config = config.with_format(format);
    }
    if cli.console_only {
        config = config.with_output(LogOutput::Console);
    }
    config
}

/// Abort startup on a fatal error, otherwise log it and carry on
fn startup_step<T>(result: deskfocus::Result<T>, what: &str) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(anyhow::Error::new(e).context(format!("{} failed", what))),
        Err(e) => {
            tracing::warn!("{} failed, continuing without it: {}", what, e);
            Ok(None)
        }
    }
}

/// Resolves on Ctrl+C, or when the console window is closed
#[cfg(windows)]
async fn shutdown_signal() -> anyhow::Result<&'static str> {
    let mut close = tokio::signal::windows::ctrl_close().context("Failed to watch console close")?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to wait for Ctrl+C")?;
            Ok("Ctrl+C")
        }
        _ = close.recv() => Ok("console closed"),
    }
}

#[cfg(not(windows))]
async fn shutdown_signal() -> anyhow::Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for Ctrl+C")?;
    Ok("Ctrl+C")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Keep the logging system alive so file output is flushed on exit
    let _logging_system = match LoggingSystem::init(logging_config(&cli)) {
        Ok(system) => {
            if let Some(dir) = system.log_directory() {
                tracing::debug!("Writing logs to {}", dir.display());
            }
            Some(system)
        }
        Err(e) => {
            // Fall back to basic logging if advanced logging fails
            eprintln!("Failed to initialize logging system: {}. Using basic logging.", e);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::INFO.into()),
                )
                .try_init();
            None
        }
    };

    tracing::info!("Starting DeskFocus {}", env!("CARGO_PKG_VERSION"));

    let store = ConfigStore::open_default()
        .await
        .context("Failed to open settings")?;

    if let Some(monitor) = cli.monitor {
        let index = usize::try_from(monitor - 1).context("Monitor number out of range")?;
        store
            .set_allowed_monitor(index)
            .await
            .context("Failed to save monitor selection")?;
    }
    if let Some(switch) = cli.autostart {
        store
            .set_autostart(switch.enabled())
            .await
            .context("Failed to save autostart preference")?;
    }

    let settings = store.get().await;
    tracing::info!(
        allowed_monitor = settings.allowed_monitor + 1,
        autostart = settings.autostart,
        "Settings loaded from {}",
        store.path().display()
    );

    let platform = Arc::new(NativeDesktopPlatform::new());
    let controller = Arc::new(ToggleController::new(platform, settings.allowed_monitor));

    startup_step(controller.refresh_monitors(), "Initial monitor enumeration")?;

    if cli.list_monitors {
        print!("{}", describe_monitors(&controller.monitors()));
        return Ok(());
    }

    let autostart = Autostart::new().and_then(|autostart| autostart.apply(settings.autostart));
    if let Some(true) = startup_step(autostart, "Autostart registration")? {
        tracing::info!(enabled = settings.autostart, "Autostart registration updated");
    }

    let mut interceptor = KeyboardInterceptor::new();
    startup_step(interceptor.start(controller.combo_callback()), "Keyboard hook installation")?;

    let mut listener = DisplayChangeListener::new();
    let refresh_target = Arc::clone(&controller);
    let on_display_change = Arc::new(move |event: DisplayChangeEvent| {
        tracing::info!(
            width = event.width,
            height = event.height,
            "Display configuration changed"
        );
        if let Err(e) = refresh_target.refresh_monitors() {
            tracing::warn!("Monitor refresh failed: {}", e);
        }
    });
    startup_step(listener.start(on_display_change), "Display change listener")?;

    tracing::info!(
        "DeskFocus ready: Win+D acts on monitor {}",
        controller.allowed() + 1
    );

    let reason = shutdown_signal().await?;

    tracing::info!("Shutting down ({})", reason);
    listener.stop();
    interceptor.stop();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use deskfocus::OsError;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_settings() {
        let cli = Cli::try_parse_from([
            "deskfocus",
            "--monitor",
            "2",
            "--autostart",
            "off",
            "--log-level",
            "warn",
            "--log-format",
            "json",
            "--console-only",
        ])
        .unwrap();

        assert_eq!(cli.monitor, Some(2));
        assert_eq!(cli.autostart, Some(Switch::Off));
        let config = logging_config(&cli);
        assert_eq!(config.level, LogLevel::Warn);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Console);
    }

    #[test]
    fn test_cli_rejects_monitor_zero() {
        assert!(Cli::try_parse_from(["deskfocus", "--monitor", "0"]).is_err());
        assert!(Cli::try_parse_from(["deskfocus", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_fatal_startup_error_aborts() {
        let result: deskfocus::Result<()> = Err(OsError::KeyboardHookFailed {
            reason: "access denied".to_string(),
        }
        .into());
        let err = startup_step(result, "Keyboard hook installation").unwrap_err();
        assert!(err.to_string().contains("Keyboard hook installation"));
    }

    #[test]
    fn test_optional_startup_error_continues() {
        let result: deskfocus::Result<()> = Err(OsError::DisplayListenerFailed {
            reason: "RegisterClassW failed".to_string(),
        }
        .into());
        assert!(startup_step(result, "Display change listener").unwrap().is_none());
        assert_eq!(startup_step(Ok(3), "Anything").unwrap(), Some(3));
    }
}
