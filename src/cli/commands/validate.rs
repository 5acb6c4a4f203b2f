//! Validate config command implementation
//!
//! Loads and validates the configuration file, then prints a summary of the
//! folder mappings without contacting Google Drive.

use crate::adapters::drive::TokenProvider;
use crate::config::{load_config, DriveConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Drive API: {}", config.drive.api_base_url);
        println!("  Credentials: {}", describe_credentials(&config.drive));
        println!("  Ledger: {}", config.state.ledger_path.display());
        println!("  Note Label: {}", config.output.note_label);
        println!("  Folders:");
        for folder in &config.folders {
            println!(
                "    - {} ({}) -> {}",
                folder.key,
                folder.drive_folder_id,
                folder.local_path.display()
            );
        }
        println!();
        Ok(0)
    }
}

/// One-line description of the credentials the sync would use
///
/// Reads the credentials file but never requests a token.
fn describe_credentials(drive: &DriveConfig) -> String {
    match TokenProvider::from_config(drive) {
        Ok(TokenProvider::ServiceAccount(auth)) => {
            format!("service account {}", auth.client_email())
        }
        Ok(TokenProvider::Static(_)) if drive.access_token.is_some() => {
            "inline access token".to_string()
        }
        Ok(TokenProvider::Static(_)) => match &drive.credentials_path {
            Some(path) => format!("access token from {}", path.display()),
            None => "access token".to_string(),
        },
        Err(e) => format!("⚠️  unusable ({e})"),
    }
}
