//! Integration tests for graceful shutdown functionality
//!
//! These tests verify that:
//! - A shutdown signal stops the run between items
//! - Items finished before the signal stay committed
//! - The next run picks up the remaining items

mod common;

use async_trait::async_trait;
use common::{doc, dragon, meetings, Vault};
use std::sync::Arc;
use tokio::sync::watch;
use transcript_syncer::adapters::drive::{DocumentSource, MemorySource};
use transcript_syncer::core::sync::{SyncContext, SyncCoordinator};
use transcript_syncer::domain::{FolderId, ItemId, RemoteItemPayload, Result};

/// Wraps a source and raises the shutdown signal after the first fetch
struct InterruptAfterFirstFetch {
    inner: MemorySource,
    shutdown: watch::Sender<bool>,
}

#[async_trait]
impl DocumentSource for InterruptAfterFirstFetch {
    async fn list_items(&self, folder: &FolderId) -> Result<Vec<RemoteItemPayload>> {
        self.inner.list_items(folder).await
    }

    async fn fetch_as_text(&self, id: &ItemId, mime_type: &str) -> Result<String> {
        let content = self.inner.fetch_as_text(id, mime_type).await;
        let _ = self.shutdown.send(true);
        content
    }
}

fn source() -> MemorySource {
    MemorySource::new()
        .with_document(&dragon(), doc("one", "One - 2024/05/01 09:00 PST - Transcript"), "1")
        .with_document(&dragon(), doc("two", "Two - 2024/05/02 09:00 PST - Transcript"), "2")
        .with_document(&meetings(), doc("three", "Three - 2024/05/03 09:00 PST - Transcript"), "3")
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_interrupt_finishes_current_item_and_stops() {
    let vault = Vault::new();
    let (tx, rx) = watch::channel(false);
    let wrapped = InterruptAfterFirstFetch {
        inner: source(),
        shutdown: tx,
    };
    let context = SyncContext::from_config(&vault.config(), &[]).unwrap();

    let stats = SyncCoordinator::new(context, Arc::new(wrapped), rx)
        .run()
        .await;

    assert!(stats.interrupted);
    assert_eq!(stats.processed, 1);
    assert_eq!(stats.mappings_visited, 1);

    let ledger = vault.store().load();
    assert_eq!(ledger.len(), 1);
    assert!(ledger.contains(&ItemId::new("one").unwrap()));
}

#[tokio::test]
async fn test_next_run_resumes_after_interrupt() {
    let vault = Vault::new();
    let (tx, rx) = watch::channel(false);
    let wrapped = InterruptAfterFirstFetch {
        inner: source(),
        shutdown: tx,
    };
    let context = SyncContext::from_config(&vault.config(), &[]).unwrap();
    SyncCoordinator::new(context, Arc::new(wrapped), rx)
        .run()
        .await;

    let resumed_source = Arc::new(source());
    let context = SyncContext::from_config(&vault.config(), &[]).unwrap();
    let (_tx, rx) = watch::channel(false);
    let stats = SyncCoordinator::new(context, resumed_source.clone(), rx)
        .run()
        .await;

    assert!(!stats.interrupted);
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.skipped, 1);
    assert_eq!(
        resumed_source.fetched(),
        vec!["two".to_string(), "three".to_string()]
    );
    assert_eq!(vault.store().load().len(), 3);
}

#[tokio::test]
async fn test_signal_before_start_processes_nothing() {
    let vault = Vault::new();
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();
    let context = SyncContext::from_config(&vault.config(), &[]).unwrap();

    let stats = SyncCoordinator::new(context, Arc::new(source()), rx)
        .run()
        .await;

    assert!(stats.interrupted);
    assert_eq!(stats.processed, 0);
    assert!(!vault.ledger_path().exists());
}
