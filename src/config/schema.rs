//! Configuration schema types
//!
//! This module defines the configuration structure for the syncer.

use crate::config::SecretString;
use crate::core::naming::{DateExtractor, NoteNamer, DEFAULT_LABELED_MARKER, DEFAULT_NOTE_LABEL};
use crate::core::transform::{NoteBuilder, RelatedNotes, DEFAULT_CREATOR_LINK};
use crate::domain::{FolderId, Result, SyncError, GOOGLE_DOC_MIME_TYPE, MARKDOWN_MIME_TYPE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Main syncer configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Google Drive connection settings
    pub drive: DriveConfig,

    /// Ledger location
    #[serde(default)]
    pub state: StateConfig,

    /// Note naming and header settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Source folder to vault directory mappings, processed in order
    #[serde(default)]
    pub folders: Vec<FolderMapping>,

    /// Related-notes annotation for folders without their own
    #[serde(default)]
    pub default_related: RelatedNotes,
}

impl SyncConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.drive.validate()?;
        self.state.validate()?;
        self.output.validate()?;
        self.logging.validate()?;

        if self.folders.is_empty() {
            return Err("At least one [[folders]] mapping is required".to_string());
        }

        let mut keys = HashSet::new();
        let mut folder_ids = HashSet::new();
        for folder in &self.folders {
            folder.validate()?;
            if !keys.insert(folder.key.as_str()) {
                return Err(format!("Duplicate folder key '{}'", folder.key));
            }
            if !folder_ids.insert(folder.drive_folder_id.as_str()) {
                return Err(format!(
                    "Duplicate drive_folder_id '{}'",
                    folder.drive_folder_id
                ));
            }
        }

        self.default_related
            .validate()
            .map_err(|e| format!("default_related: {e}"))?;
        Ok(())
    }

    /// Every configured destination directory, in mapping order
    ///
    /// Dedup checks all of them regardless of which folder an item came from.
    pub fn destinations(&self) -> Vec<PathBuf> {
        self.folders.iter().map(|f| f.local_path.clone()).collect()
    }

    /// Mappings to process, optionally restricted to `keys`
    ///
    /// # Errors
    ///
    /// Returns an error naming the first key that matches no mapping.
    pub fn select_folders(&self, keys: &[String]) -> Result<Vec<&FolderMapping>> {
        if keys.is_empty() {
            return Ok(self.folders.iter().collect());
        }

        if let Some(unknown) = keys
            .iter()
            .find(|key| !self.folders.iter().any(|f| &f.key == *key))
        {
            return Err(SyncError::Configuration(format!(
                "Unknown folder key '{unknown}'"
            )));
        }

        Ok(self
            .folders
            .iter()
            .filter(|f| keys.contains(&f.key))
            .collect())
    }

    /// File namer configured from `[output]`
    pub fn note_namer(&self) -> NoteNamer {
        NoteNamer::new(
            self.output.note_label.clone(),
            DateExtractor::new(self.output.labeled_marker.clone()),
        )
    }

    /// Note builder configured from `[output]`, the folders and `[default_related]`
    ///
    /// # Errors
    ///
    /// Returns an error if a folder id is empty.
    pub fn note_builder(&self) -> Result<NoteBuilder> {
        let mut builder = NoteBuilder::new(
            self.output.creator_link.clone(),
            self.default_related.clone(),
        )
        .with_extractor(DateExtractor::new(self.output.labeled_marker.clone()));

        for folder in &self.folders {
            if let Some(related) = &folder.related {
                builder = builder.with_related(folder.folder_id()?, related.clone());
            }
        }
        Ok(builder)
    }

    /// Create the ledger directory, log directory and every destination
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub fn ensure_directories(&self) -> Result<()> {
        let mut dirs: Vec<&Path> = Vec::new();

        if let Some(parent) = self
            .state
            .ledger_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            dirs.push(parent);
        }
        if self.logging.local_enabled {
            dirs.push(Path::new(&self.logging.local_path));
        }
        dirs.extend(self.folders.iter().map(|f| f.local_path.as_path()));

        for dir in dirs {
            fs::create_dir_all(dir).map_err(|e| {
                SyncError::Configuration(format!(
                    "Failed to create directory {}: {e}",
                    dir.display()
                ))
            })?;
        }
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (no notes written, ledger untouched)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Google Drive API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Base URL of the Drive v3 REST API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// JSON credentials file: `{"access_token": ...}` or a service-account key
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,

    /// OAuth access token, takes precedence over `credentials_path`
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Only files whose name contains this text are listed
    #[serde(default = "default_name_contains")]
    pub name_contains: String,

    /// Mime types accepted by the listing
    #[serde(default = "default_mime_types")]
    pub mime_types: Vec<String>,

    /// Format requested when exporting native documents
    #[serde(default = "default_export_mime_type")]
    pub export_mime_type: String,

    /// Listing page size
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl DriveConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        url::Url::parse(&self.api_base_url)
            .map_err(|e| format!("Invalid drive.api_base_url '{}': {e}", self.api_base_url))?;

        if self.access_token.is_none() && self.credentials_path.is_none() {
            return Err(
                "Either drive.access_token or drive.credentials_path must be provided".to_string(),
            );
        }

        if self.name_contains.trim().is_empty() {
            return Err("drive.name_contains cannot be empty".to_string());
        }

        if self.mime_types.is_empty() || self.mime_types.iter().any(|m| m.trim().is_empty()) {
            return Err("drive.mime_types must list at least one non-empty type".to_string());
        }

        if self.export_mime_type.trim().is_empty() {
            return Err("drive.export_mime_type cannot be empty".to_string());
        }

        if self.page_size == 0 || self.page_size > 1000 {
            return Err("drive.page_size must be between 1 and 1000".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("drive.timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            credentials_path: None,
            access_token: None,
            name_contains: default_name_contains(),
            mime_types: default_mime_types(),
            export_mime_type: default_export_mime_type(),
            page_size: default_page_size(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Path of the processed-items ledger
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
}

impl StateConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.ledger_path.as_os_str().is_empty() {
            return Err("state.ledger_path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            ledger_path: default_ledger_path(),
        }
    }
}

/// Note naming and header configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Prefix of every note file name (`<label>. <date> - <name>.md`)
    #[serde(default = "default_note_label")]
    pub note_label: String,

    /// Text that precedes a leading date in labeled file names
    #[serde(default = "default_labeled_marker")]
    pub labeled_marker: String,

    /// Link named in the provenance line of each note
    #[serde(default = "default_creator_link")]
    pub creator_link: String,
}

impl OutputConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.note_label.trim().is_empty() {
            return Err("output.note_label cannot be empty".to_string());
        }
        if self.note_label.contains(['/', ':']) {
            return Err("output.note_label cannot contain '/' or ':'".to_string());
        }
        if self.labeled_marker.is_empty() {
            return Err("output.labeled_marker cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            note_label: default_note_label(),
            labeled_marker: default_labeled_marker(),
            creator_link: default_creator_link(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Write JSON lines instead of text to the log files
    #[serde(default)]
    pub json: bool,

    /// Also write errors to a separate `errors.log`
    #[serde(default = "default_true")]
    pub error_log_enabled: bool,
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".into());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            json: false,
            error_log_enabled: true,
        }
    }
}

/// One source folder and the vault directory its notes are written to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderMapping {
    /// Short name used in logs and by `sync --folder`
    pub key: String,

    /// Google Drive folder id
    pub drive_folder_id: String,

    /// Destination directory
    pub local_path: PathBuf,

    /// Related-notes annotation for this folder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<RelatedNotes>,
}

impl FolderMapping {
    /// Typed Drive folder id
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty.
    pub fn folder_id(&self) -> Result<FolderId> {
        FolderId::new(self.drive_folder_id.clone()).map_err(SyncError::Configuration)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if self.key.trim().is_empty() {
            return Err("folders.key cannot be empty".to_string());
        }
        if self.drive_folder_id.trim().is_empty() {
            return Err(format!(
                "folders.drive_folder_id cannot be empty (folder '{}')",
                self.key
            ));
        }
        if self.local_path.as_os_str().is_empty() {
            return Err(format!(
                "folders.local_path cannot be empty (folder '{}')",
                self.key
            ));
        }
        if let Some(related) = &self.related {
            related
                .validate()
                .map_err(|e| format!("folder '{}': {e}", self.key))?;
        }
        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_api_base_url() -> String {
    "https://www.googleapis.com/drive/v3".to_string()
}

fn default_name_contains() -> String {
    "Transcript".to_string()
}

fn default_mime_types() -> Vec<String> {
    vec![
        GOOGLE_DOC_MIME_TYPE.to_string(),
        MARKDOWN_MIME_TYPE.to_string(),
    ]
}

fn default_export_mime_type() -> String {
    MARKDOWN_MIME_TYPE.to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("state/processed_files.json")
}

fn default_note_label() -> String {
    DEFAULT_NOTE_LABEL.to_string()
}

fn default_labeled_marker() -> String {
    DEFAULT_LABELED_MARKER.to_string()
}

fn default_creator_link() -> String {
    DEFAULT_CREATOR_LINK.to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
