//! Structured logging setup using tracing
//!
//! Console output is always on. When local logging is enabled, every event
//! also goes to a rotating `transcript_syncer.log`, and errors are copied to
//! a separate rotating `errors.log` so failures can be reviewed without
//! wading through routine progress lines.

use crate::config::LoggingConfig;
use crate::domain::{Result, SyncError};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// File name of the main log
pub const LOG_FILE_NAME: &str = "transcript_syncer.log";

/// File name of the error-only log
pub const ERROR_LOG_FILE_NAME: &str = "errors.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Guard that must be kept alive for the duration of the program
/// to ensure logs are flushed properly
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

impl LoggingGuard {
    fn new(file_guards: Vec<WorkerGuard>) -> Self {
        Self {
            _file_guards: file_guards,
        }
    }

    /// Number of background file writers held by this guard
    pub fn file_writers(&self) -> usize {
        self._file_guards.len()
    }
}

/// Initialize the logging system based on configuration
///
/// `RUST_LOG`, when set, overrides `log_level_str`.
///
/// # Returns
///
/// A `LoggingGuard` that must be kept alive for the duration of the program
///
/// # Example
///
/// ```no_run
/// use transcript_syncer::logging::init_logging;
/// use transcript_syncer::config::LoggingConfig;
///
/// let config = LoggingConfig::default();
/// let _guard = init_logging("info", &config).expect("Failed to initialize logging");
/// // Keep _guard alive for the duration of the program
/// ```
pub fn init_logging(log_level_str: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let log_level = parse_log_level(log_level_str)?;
    let (layers, guards) = build_layers(log_level, config)?;

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| SyncError::Other(format!("Failed to install tracing subscriber: {e}")))?;

    tracing::info!(
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        error_log = config.local_enabled && config.error_log_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard::new(guards))
}

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("transcript_syncer={level}")))
}

fn build_layers(
    level: Level,
    config: &LoggingConfig,
) -> Result<(Vec<BoxedLayer>, Vec<WorkerGuard>)> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guards = Vec::new();

    // Console layer (always enabled)
    layers.push(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_filter(env_filter(level))
            .boxed(),
    );

    if !config.local_enabled {
        return Ok((layers, guards));
    }

    let dir = Path::new(&config.local_path);
    std::fs::create_dir_all(dir).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to create log directory {}: {e}",
            config.local_path
        ))
    })?;
    let rotation = parse_rotation(&config.local_rotation);

    let (writer, guard) = file_writer(rotation.clone(), dir, LOG_FILE_NAME);
    guards.push(guard);
    layers.push(file_layer(writer, config.json, env_filter(level)));

    if config.error_log_enabled {
        let (writer, guard) = file_writer(rotation, dir, ERROR_LOG_FILE_NAME);
        guards.push(guard);
        layers.push(file_layer(writer, config.json, LevelFilter::ERROR));
    }

    Ok((layers, guards))
}

fn file_writer(rotation: Rotation, dir: &Path, file_name: &str) -> (NonBlocking, WorkerGuard) {
    let appender = RollingFileAppender::new(rotation, dir, file_name);
    tracing_appender::non_blocking(appender)
}

fn file_layer<F>(writer: NonBlocking, json: bool, filter: F) -> BoxedLayer
where
    F: tracing_subscriber::layer::Filter<Registry> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    if json {
        layer.json().with_filter(filter).boxed()
    } else {
        layer.with_filter(filter).boxed()
    }
}

fn parse_rotation(rotation: &str) -> Rotation {
    match rotation {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

/// Parse log level from string
fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(SyncError::Configuration(format!(
            "Invalid log level: {level_str}. Must be one of: trace, debug, info, warn, error"
        ))),
    }
}
