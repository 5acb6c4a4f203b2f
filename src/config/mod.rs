//! Configuration management for the syncer.
//!
//! TOML-based configuration loading, parsing, and validation with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SYNCER_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [drive]
//! access_token = "${SYNCER_DRIVE_TOKEN}"
//!
//! [state]
//! ledger_path = "state/processed_files.json"
//!
//! [[folders]]
//! key = "dragon"
//! drive_folder_id = "1FsPM-xB7EH6Fc2CCu67EHDhYMotx0EYc"
//! local_path = "/vault/Dragon/Transcripts"
//! related = { kind = "static", text = "[[Dashboard. Dragon]]" }
//!
//! [default_related]
//! kind = "static"
//! text = "[[S3. Establish and maintain user testing pipeline]]"
//! ```
//!
//! ```rust,no_run
//! use transcript_syncer::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("syncer.toml")?;
//! config.ensure_directories()?;
//! for folder in &config.folders {
//!     println!("{} -> {}", folder.key, folder.local_path.display());
//! }
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config, DEFAULT_CONFIG_PATH};
pub use schema::{
    ApplicationConfig, DriveConfig, FolderMapping, LoggingConfig, OutputConfig, StateConfig,
    SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
