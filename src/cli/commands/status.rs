//! Status command implementation
//!
//! Shows how many items the ledger holds and which were processed most
//! recently.

use crate::config::load_config;
use crate::core::state::LedgerStore;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Number of recent entries to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking sync status");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let store = LedgerStore::new(config.state.ledger_path.clone());
        println!("📊 Sync Status");
        println!();
        println!("  Ledger: {}", store.path().display());

        if !store.path().exists() {
            println!("  No ledger yet. Run `transcript-syncer sync` first.");
            return Ok(0);
        }

        let ledger = store.load();
        println!("  Processed items: {}", ledger.len());

        let recent = ledger.most_recent(self.limit);
        if !recent.is_empty() {
            println!();
            println!("  Most recent:");
            for (id, record) in recent {
                println!(
                    "    {}  {}  ({})",
                    record.processed_at.format("%Y-%m-%d %H:%M:%S"),
                    record.name,
                    id
                );
            }
        }
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::Ledger;
    use crate::domain::ItemId;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir) -> String {
        let ledger = dir.path().join("ledger.json");
        let path = dir.path().join("syncer.toml");
        fs::write(
            &path,
            format!(
                r#"
[drive]
access_token = "token"

[state]
ledger_path = "{}"

[[folders]]
key = "calls"
drive_folder_id = "folder"
local_path = "{}"
"#,
                ledger.display(),
                dir.path().join("vault").display()
            ),
        )
        .unwrap();
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_status_without_ledger() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);

        let code = StatusArgs { limit: 5 }.execute(&config).await.unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_status_with_entries() {
        let dir = TempDir::new().unwrap();
        let config = write_config(&dir);
        let mut ledger = Ledger::new();
        ledger.record(ItemId::new("a").unwrap(), "Transcript A");
        LedgerStore::new(dir.path().join("ledger.json"))
            .save(&ledger)
            .unwrap();

        let code = StatusArgs { limit: 5 }.execute(&config).await.unwrap();
        assert_eq!(code, 0);
    }
}
