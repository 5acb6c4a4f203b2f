//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use transcript_syncer::config::{parse_config, SyncConfig};
use transcript_syncer::core::state::LedgerStore;
use transcript_syncer::domain::{FolderId, RemoteItemPayload, GOOGLE_DOC_MIME_TYPE};

pub const DRAGON_FOLDER: &str = "1FsPM-xB7EH6Fc2CCu67EHDhYMotx0EYc";
pub const MEETINGS_FOLDER: &str = "1EiScFFGiE6hdKBOZeSicnO_lxv2U3mcB";

/// A vault with two destination folders and a ledger, all under a temp dir
pub struct Vault {
    pub root: TempDir,
}

impl Vault {
    pub fn new() -> Self {
        let vault = Self {
            root: TempDir::new().unwrap(),
        };
        fs::create_dir_all(vault.dragon_dir()).unwrap();
        fs::create_dir_all(vault.meetings_dir()).unwrap();
        vault
    }

    pub fn dragon_dir(&self) -> PathBuf {
        self.root.path().join("vault").join("Dragon")
    }

    pub fn meetings_dir(&self) -> PathBuf {
        self.root.path().join("vault").join("Meetings")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.root.path().join("state").join("processed_files.json")
    }

    pub fn store(&self) -> LedgerStore {
        LedgerStore::new(self.ledger_path())
    }

    pub fn config_toml(&self) -> String {
        format!(
            r#"
[drive]
access_token = "test-token"

[state]
ledger_path = '{ledger}'

[logging]
local_enabled = false

[[folders]]
key = "dragon"
drive_folder_id = "{DRAGON_FOLDER}"
local_path = '{dragon}'
related = {{ kind = "static", text = "[[Dashboard. Dragon]]" }}

[[folders]]
key = "meetings"
drive_folder_id = "{MEETINGS_FOLDER}"
local_path = '{meetings}'
related = {{ kind = "daily_note" }}
"#,
            ledger = self.ledger_path().display(),
            dragon = self.dragon_dir().display(),
            meetings = self.meetings_dir().display(),
        )
    }

    pub fn config(&self) -> SyncConfig {
        parse_config(&self.config_toml()).unwrap()
    }
}

pub fn dragon() -> FolderId {
    FolderId::new(DRAGON_FOLDER).unwrap()
}

pub fn meetings() -> FolderId {
    FolderId::new(MEETINGS_FOLDER).unwrap()
}

pub fn doc(id: &str, name: &str) -> RemoteItemPayload {
    RemoteItemPayload::new(id, name, GOOGLE_DOC_MIME_TYPE)
}
