//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SyncConfig;
use super::secret::secret_string;
use crate::domain::errors::SyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Default configuration file name
pub const DEFAULT_CONFIG_PATH: &str = "syncer.toml";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SyncConfig
/// 4. Applies environment variable overrides (SYNCER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns a `Configuration` error if the file is missing or unreadable, a
/// referenced environment variable is unset, the TOML is malformed, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use transcript_syncer::config::load_config;
///
/// let config = load_config("syncer.toml").expect("Failed to load config");
/// println!("{} folder mappings", config.folders.len());
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    parse_config(&contents)
}

/// Parse and validate configuration text
///
/// Same pipeline as [`load_config`] minus the file read.
pub fn parse_config(contents: &str) -> Result<SyncConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: SyncConfig = toml::from_str(&contents)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        SyncError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left alone so documented placeholders don't have to be
/// set.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    String::new()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the SYNCER_* prefix
///
/// Variables follow the pattern `SYNCER_<SECTION>_<KEY>`, for example
/// `SYNCER_DRIVE_ACCESS_TOKEN` or `SYNCER_STATE_LEDGER_PATH`.
fn apply_env_overrides(config: &mut SyncConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("SYNCER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("SYNCER_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_bool("SYNCER_APPLICATION_DRY_RUN", &val)?;
    }

    // Drive overrides
    if let Ok(val) = std::env::var("SYNCER_DRIVE_API_BASE_URL") {
        config.drive.api_base_url = val;
    }
    if let Ok(val) = std::env::var("SYNCER_DRIVE_ACCESS_TOKEN") {
        config.drive.access_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("SYNCER_DRIVE_CREDENTIALS_PATH") {
        config.drive.credentials_path = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("SYNCER_DRIVE_TIMEOUT_SECONDS") {
        config.drive.timeout_seconds = val.parse().map_err(|_| {
            SyncError::Configuration(format!("SYNCER_DRIVE_TIMEOUT_SECONDS is not a number: {val}"))
        })?;
    }

    // State overrides
    if let Ok(val) = std::env::var("SYNCER_STATE_LEDGER_PATH") {
        config.state.ledger_path = PathBuf::from(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("SYNCER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_bool("SYNCER_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("SYNCER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("SYNCER_LOGGING_JSON") {
        config.logging.json = parse_bool("SYNCER_LOGGING_JSON", &val)?;
    }

    Ok(())
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    value.trim().parse().map_err(|_| {
        SyncError::Configuration(format!("{name} must be 'true' or 'false', got '{value}'"))
    })
}
