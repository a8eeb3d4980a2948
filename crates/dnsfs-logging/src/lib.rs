//! Logging bootstrap for dnsfs binaries.
//!
//! Wires a `tracing` subscriber from a small serde-friendly config: an env
//! filter (overridable via `RUST_LOG`), a console layer, and an optional
//! rolling file layer whose writer guard the caller must keep alive.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// How log files are rotated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    Hourly,
    Daily,
    Never,
}

impl From<Rotation> for rolling::Rotation {
    fn from(r: Rotation) -> Self {
        match r {
            Rotation::Hourly => rolling::Rotation::HOURLY,
            Rotation::Daily => rolling::Rotation::DAILY,
            Rotation::Never => rolling::Rotation::NEVER,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for log files. If `None`, no file logging.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Prefix for log file names.
    #[serde(default = "default_prefix")]
    pub file_prefix: String,

    /// Log file rotation.
    #[serde(default)]
    pub rotation: Rotation,

    /// Whether to output JSON format.
    #[serde(default)]
    pub json_format: bool,

    /// Whether to also log to stdout.
    #[serde(default = "default_true")]
    pub console_output: bool,
}

fn default_level() -> String {
    "info".into()
}

fn default_prefix() -> String {
    "dnsfs".into()
}

fn default_true() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            log_dir: None,
            file_prefix: default_prefix(),
            rotation: Rotation::default(),
            json_format: false,
            console_output: true,
        }
    }
}

impl LogConfig {
    /// A debug-level console config, the daemon's default posture.
    pub fn debug() -> Self {
        Self {
            level: "debug".into(),
            ..Default::default()
        }
    }
}

type BoxedLayer = Box<dyn tracing_subscriber::Layer<tracing_subscriber::Registry> + Send + Sync>;

fn console_layer(config: &LogConfig) -> Option<BoxedLayer> {
    if !config.console_output {
        return None;
    }
    if config.json_format {
        Some(fmt::layer().json().boxed())
    } else {
        Some(fmt::layer().boxed())
    }
}

fn file_layer(config: &LogConfig) -> Option<(BoxedLayer, WorkerGuard)> {
    let log_dir = config.log_dir.as_ref()?;

    let appender = rolling::RollingFileAppender::builder()
        .rotation(config.rotation.into())
        .filename_prefix(&config.file_prefix)
        .filename_suffix("log")
        .build(log_dir)
        .expect("failed to create rolling file appender");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = if config.json_format {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer().with_writer(writer).boxed()
    };
    Some((layer, guard))
}

/// Initialize the logging system. Call once at program startup.
///
/// Returns the file writer's guard; hold it for the program's lifetime or
/// buffered log lines are lost on exit.
pub fn init_logging(config: &LogConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if let Some(console) = console_layer(config) {
        layers.push(console);
    }
    let mut guard = None;
    if let Some((file, file_guard)) = file_layer(config) {
        layers.push(file);
        guard = Some(file_guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    guard
}
