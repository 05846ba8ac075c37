//! File-based logging module.
//!
//! Console output plus, when a log directory is configured, a root log file
//! and per-component log files with rotation:
//!
//! | Log File      | Component                     | Target Prefixes            |
//! |---------------|-------------------------------|----------------------------|
//! | coffer.log    | Root logger (all components)  | (all)                      |
//! | custody.log   | Custody ledger                | coffer_custody::ledger     |
//! | registry.log  | Hosted asset registries       | coffer_custody::registry   |
//! | api.log       | HTTP API                      | coffer_server::api         |

use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Internal definition for a component log file.
struct ComponentLogDef {
    file_name: &'static str,
    /// Target module prefixes routed to this file
    targets: &'static [&'static str],
}

const COMPONENT_LOGS: &[ComponentLogDef] = &[
    ComponentLogDef {
        file_name: "custody.log",
        targets: &["coffer_custody::ledger"],
    },
    ComponentLogDef {
        file_name: "registry.log",
        targets: &["coffer_custody::registry"],
    },
    ComponentLogDef {
        file_name: "api.log",
        targets: &["coffer_server::api", "actix_web"],
    },
];

/// Log rotation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Daily,
    Hourly,
    /// Single file, never rotated
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "hourly" => Ok(Self::Hourly),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown log rotation '{}'", other)),
        }
    }
}

/// Logging configuration for the entire application.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Directory for log files; file logging is off when unset
    pub log_dir: Option<PathBuf>,
    pub console_output: bool,
    /// Default level, overridden by `RUST_LOG`
    pub level: Level,
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            console_output: true,
            level: Level::INFO,
            rotation: LogRotation::Daily,
        }
    }
}

/// Guard that keeps the file appenders alive.
///
/// Must be held for the duration of the application; dropping it flushes
/// buffered log output.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Initialize console and file logging.
///
/// `RUST_LOG` controls the level of the console and root file layers.
/// Component files use per-layer [`Targets`] filters to route events by
/// their tracing target (module path).
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.console_output {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_names(true)
            .with_filter(env_filter(config.level));
        layers.push(Box::new(console_layer));
    }

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;

        let root_appender = RollingFileAppender::new(config.rotation.into(), log_dir, "coffer.log");
        let (root_nb, root_guard) = tracing_appender::non_blocking(root_appender);
        guards.push(root_guard);

        let root_layer = fmt::layer()
            .with_writer(root_nb)
            .with_target(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_filter(env_filter(config.level));
        layers.push(Box::new(root_layer));

        for component in COMPONENT_LOGS {
            let appender =
                RollingFileAppender::new(config.rotation.into(), log_dir, component.file_name);
            let (nb, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);

            let level: LevelFilter = config.level.into();
            let mut targets = Targets::new();
            for target in component.targets {
                targets = targets.with_target(*target, level);
            }

            let layer = fmt::layer()
                .with_writer(nb)
                .with_target(true)
                .with_ansi(false)
                .with_filter(targets);
            layers.push(Box::new(layer));
        }
    }

    // try_init also installs the `log` bridge, so actix's access log lands here
    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if let Some(log_dir) = &config.log_dir {
        tracing::info!(
            log_dir = %log_dir.display(),
            component_files = COMPONENT_LOGS.len(),
            "File logging initialized"
        );
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}
