//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "syncer.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Transcript Syncer configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your Drive folder ids and vault paths", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - Set SYNCER_DRIVE_ACCESS_TOKEN, or");
                println!("     - Point drive.credentials_path at a token or service-account key file");
                println!("  3. Validate configuration: transcript-syncer validate-config");
                println!("  4. Preview a run: transcript-syncer sync --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Transcript Syncer Configuration File
# Google Drive transcripts to Markdown vault notes

[application]
log_level = "info"
dry_run = false

[drive]
access_token = "${SYNCER_DRIVE_ACCESS_TOKEN}"

[state]
ledger_path = "state/processed_files.json"

[logging]
local_enabled = true
local_path = "logs"
local_rotation = "daily"

[[folders]]
key = "meetings"
drive_folder_id = "your-drive-folder-id"
local_path = "/path/to/vault/Meetings/Transcripts"
related = { kind = "daily_note" }
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Transcript Syncer Configuration File
#
# Pulls transcript documents from Google Drive folders and writes them as
# Markdown notes into a local vault. Every item is recorded in a ledger so
# repeated runs never write the same transcript twice.
#
# Values of the form ${VAR} are substituted from the environment (and a
# .env file, if present). Most settings can also be overridden with
# SYNCER_<SECTION>_<KEY> environment variables.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

# Dry run: list and fetch, but write neither notes nor ledger entries
dry_run = false

# ============================================================================
# Google Drive
# ============================================================================
[drive]
api_base_url = "https://www.googleapis.com/drive/v3"

# OAuth bearer token. Either this or credentials_path is required.
access_token = "${SYNCER_DRIVE_ACCESS_TOKEN}"

# JSON file holding {"access_token": "..."} (or {"token": "..."}), or a
# service-account key downloaded from the Cloud console. Share the Drive
# folders with the service account's client_email.
# credentials_path = "credentials/service-account.json"

# Only items whose name contains this text are listed
name_contains = "Transcript"

# Item types to list. Google Docs are exported, Markdown files downloaded.
mime_types = ["application/vnd.google-apps.document", "text/markdown"]

# Export format requested for Google Docs
export_mime_type = "text/markdown"

# Listing page size (1-1000)
page_size = 100

# Per-request timeout
timeout_seconds = 60

# ============================================================================
# Ledger
# ============================================================================
[state]
# JSON map of processed item ids. Written atomically after each note.
ledger_path = "state/processed_files.json"

# ============================================================================
# Note Output
# ============================================================================
[output]
# Label placed between the date and the original name
note_label = "TS"

# Names containing this marker directly followed by YYYY/MM/DD use that date
labeled_marker = "Dragon & Matt - "

# Wiki link placed in the "Created by" header line
creator_link = "[[Transcript Syncer]]"

# ============================================================================
# Logging
# ============================================================================
[logging]
local_enabled = true
local_path = "logs"
# daily | hourly | never
local_rotation = "daily"
# Write file logs as JSON lines
json = false
# Copy errors into a separate errors.log
error_log_enabled = true

# ============================================================================
# Related Notes
# ============================================================================
# Used by folders that do not set their own `related`.
# kind = "static" writes the text verbatim.
# kind = "daily_note" renders the note date with a strftime format.
[default_related]
kind = "static"
text = "[[S3. Establish and maintain user testing pipeline]]"

# ============================================================================
# Folder Mappings
# ============================================================================
# Processed in order. An item already present in ANY destination is skipped.

[[folders]]
key = "dragon"
drive_folder_id = "your-first-folder-id"
local_path = "/path/to/vault/Dragon/Transcripts"
related = { kind = "static", text = "[[Dashboard. Dragon]]" }

[[folders]]
key = "meetings"
drive_folder_id = "your-second-folder-id"
local_path = "/path/to/vault/Meetings/Transcripts"
related = { kind = "daily_note", format = "[[No %Y-%m-%d %a]]" }
"#
        .to_string()
    }
}
