//! Logging and observability
//!
//! Structured logging through `tracing`, with:
//! - Configurable log levels (`RUST_LOG` wins when set)
//! - Local file logging with rotation, as text or JSON lines
//! - A separate error-only log file
//!
//! # Example
//!
//! ```no_run
//! use transcript_syncer::logging::init_logging;
//! use transcript_syncer::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(folder = "dragon", "Processing folder");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard, ERROR_LOG_FILE_NAME, LOG_FILE_NAME};
