//! Sync coordinator - drives one pass over all folder mappings
//!
//! Items are handled strictly one at a time. Each item runs inside its own
//! failure boundary: whatever goes wrong is logged, counted and the pass moves
//! on. A ledger entry is committed only after the note is on disk, so an item
//! that fails anywhere before that point is retried on the next run.

use crate::adapters::drive::DocumentSource;
use crate::config::SyncConfig;
use crate::core::dedup::{DedupEngine, Decision};
use crate::core::state::{LedgerStore, TrackedLedger};
use crate::core::sync::summary::{RunError, RunErrorKind, RunStats};
use crate::core::transform::NoteBuilder;
use crate::domain::{FolderId, RemoteItem, RemoteItemPayload, Result, SyncError};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// One source folder and the directory it syncs into
#[derive(Debug, Clone)]
pub struct SyncMapping {
    pub key: String,
    pub folder_id: FolderId,
    pub destination: PathBuf,
}

/// Everything a run needs, built once from configuration
#[derive(Debug, Clone)]
pub struct SyncContext {
    /// Mappings to visit, in order
    pub mappings: Vec<SyncMapping>,
    pub dedup: DedupEngine,
    pub builder: NoteBuilder,
    pub store: LedgerStore,
    pub dry_run: bool,
}

impl SyncContext {
    /// Build the context for the mappings selected by `folder_keys` (all if empty)
    ///
    /// Dedup always checks every configured destination, including those of
    /// mappings that are not selected for this run.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown keys or invalid folder ids.
    pub fn from_config(config: &SyncConfig, folder_keys: &[String]) -> Result<Self> {
        let mappings = config
            .select_folders(folder_keys)?
            .into_iter()
            .map(|folder| {
                Ok(SyncMapping {
                    key: folder.key.clone(),
                    folder_id: folder.folder_id()?,
                    destination: folder.local_path.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            mappings,
            dedup: DedupEngine::new(config.note_namer(), config.destinations()),
            builder: config.note_builder()?,
            store: LedgerStore::new(config.state.ledger_path.clone()),
            dry_run: config.application.dry_run,
        })
    }
}

enum ItemOutcome {
    Written(PathBuf),
    Skipped,
}

/// Sync coordinator
pub struct SyncCoordinator {
    context: SyncContext,
    source: Arc<dyn DocumentSource>,
    shutdown_signal: watch::Receiver<bool>,
}

impl SyncCoordinator {
    pub fn new(
        context: SyncContext,
        source: Arc<dyn DocumentSource>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            context,
            source,
            shutdown_signal,
        }
    }

    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown_signal.borrow()
    }

    /// Run one sync pass
    ///
    /// Never fails: every error is recorded in the returned [`RunStats`],
    /// which is also logged before returning.
    pub async fn run(&self) -> RunStats {
        let start_time = Instant::now();
        let mut stats = RunStats::new(self.context.dry_run);

        tracing::info!(
            mappings = self.context.mappings.len(),
            dry_run = self.context.dry_run,
            "Starting sync"
        );

        let mut ledger = TrackedLedger::open(self.context.store.clone());
        if self.context.dry_run {
            ledger = ledger.without_persistence();
        }

        'mappings: for mapping in &self.context.mappings {
            if self.shutdown_requested() {
                stats.interrupted = true;
                break;
            }
            stats.mappings_visited += 1;

            tracing::info!(folder = %mapping.key, folder_id = %mapping.folder_id, "Processing folder");

            let payloads = match self.source.list_items(&mapping.folder_id).await {
                Ok(payloads) => payloads,
                Err(e) => {
                    log_remote_failure(&e, &mapping.key, "Failed to list folder");
                    stats.add_error(
                        RunError::new(RunErrorKind::Listing, e.to_string())
                            .with_context(format!("folder={}", mapping.key)),
                    );
                    continue;
                }
            };

            if payloads.is_empty() {
                tracing::info!(folder = %mapping.key, "No transcript files found");
                continue;
            }
            tracing::info!(folder = %mapping.key, count = payloads.len(), "Found transcripts");

            for payload in payloads {
                if self.shutdown_requested() {
                    tracing::info!("Shutdown requested, stopping before next item");
                    stats.interrupted = true;
                    break 'mappings;
                }

                let label = payload
                    .name
                    .clone()
                    .or_else(|| payload.id.clone())
                    .unwrap_or_else(|| "<unnamed>".to_string());

                match self.process_item(mapping, payload, &mut ledger).await {
                    Ok(ItemOutcome::Written(path)) => {
                        stats.processed += 1;
                        stats.written.push(path);
                    }
                    Ok(ItemOutcome::Skipped) => {
                        tracing::info!(file = %label, "Skipping file");
                        stats.skipped += 1;
                    }
                    Err(e) => {
                        log_remote_failure(&e, &mapping.key, "Error processing file");
                        stats.add_error(
                            RunError::new(RunErrorKind::for_item_error(&e), e.to_string())
                                .with_context(format!("folder={}, file={label}", mapping.key)),
                        );
                    }
                }
            }
        }

        if stats.interrupted {
            tracing::warn!("Sync interrupted, remaining items are left for the next run");
        }

        let stats = stats.with_duration(start_time.elapsed());
        stats.log_summary();
        stats
    }

    async fn process_item(
        &self,
        mapping: &SyncMapping,
        payload: RemoteItemPayload,
        ledger: &mut TrackedLedger,
    ) -> Result<ItemOutcome> {
        let item = RemoteItem::try_from(payload)?;

        let note = match self.context.dedup.decide(&item, ledger)? {
            Decision::Process(note) => note,
            Decision::InLedger | Decision::FoundOnDisk { .. } => return Ok(ItemOutcome::Skipped),
        };

        tracing::info!(
            item_id = %item.id,
            file = %item.name,
            date = %note.date.date,
            date_strategy = %note.date.strategy,
            "Processing new file"
        );

        let content = self
            .source
            .fetch_as_text(&item.id, &item.mime_type)
            .await?;
        let body = self
            .context
            .builder
            .build_note_for_date(&content, note.date.date, &mapping.folder_id);
        let output_path = mapping.destination.join(&note.file_name);

        if self.context.dry_run {
            tracing::info!(
                path = %output_path.display(),
                bytes = body.len(),
                "Dry run, not writing note"
            );
        } else {
            fs::write(&output_path, body.as_bytes()).map_err(|e| {
                SyncError::Io(format!("failed to write {}: {e}", output_path.display()))
            })?;
            tracing::info!(path = %output_path.display(), "Saved note");
        }

        ledger.commit(item.id.clone(), &item.name)?;
        Ok(ItemOutcome::Written(output_path))
    }
}

fn log_remote_failure(error: &SyncError, folder: &str, message: &str) {
    match error {
        SyncError::Drive(drive) if drive.is_connectivity() => {
            tracing::error!(
                folder = %folder,
                error = %error,
                "{message}: network connectivity issue, will retry next run"
            );
        }
        _ => tracing::error!(folder = %folder, error = %error, "{message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::drive::MemorySource;
    use crate::core::naming::NoteNamer;
    use crate::core::transform::RelatedNotes;
    use crate::domain::{GOOGLE_DOC_MIME_TYPE, MARKDOWN_MIME_TYPE};
    use tempfile::TempDir;

    struct Fixture {
        root: TempDir,
        folder_a: FolderId,
        folder_b: FolderId,
    }

    impl Fixture {
        fn new() -> Self {
            let root = TempDir::new().unwrap();
            fs::create_dir_all(root.path().join("a")).unwrap();
            fs::create_dir_all(root.path().join("b")).unwrap();
            Self {
                root,
                folder_a: FolderId::new("folder-a").unwrap(),
                folder_b: FolderId::new("folder-b").unwrap(),
            }
        }

        fn dir(&self, name: &str) -> PathBuf {
            self.root.path().join(name)
        }

        fn store(&self) -> LedgerStore {
            LedgerStore::new(self.root.path().join("state").join("processed_files.json"))
        }

        fn context(&self, dry_run: bool) -> SyncContext {
            SyncContext {
                mappings: vec![
                    SyncMapping {
                        key: "a".to_string(),
                        folder_id: self.folder_a.clone(),
                        destination: self.dir("a"),
                    },
                    SyncMapping {
                        key: "b".to_string(),
                        folder_id: self.folder_b.clone(),
                        destination: self.dir("b"),
                    },
                ],
                dedup: DedupEngine::new(NoteNamer::default(), vec![self.dir("a"), self.dir("b")]),
                builder: NoteBuilder::default().with_related(
                    self.folder_a.clone(),
                    RelatedNotes::Static {
                        text: "[[Dashboard. A]]".to_string(),
                    },
                ),
                store: self.store(),
                dry_run,
            }
        }

        fn coordinator(&self, source: MemorySource, dry_run: bool) -> SyncCoordinator {
            let (_tx, rx) = watch::channel(false);
            SyncCoordinator::new(self.context(dry_run), Arc::new(source), rx)
        }
    }

    fn doc(id: &str, name: &str) -> RemoteItemPayload {
        RemoteItemPayload::new(id, name, GOOGLE_DOC_MIME_TYPE)
    }

    #[tokio::test]
    async fn test_writes_note_and_commits_ledger() {
        let fx = Fixture::new();
        let source = MemorySource::new().with_document(
            &fx.folder_a,
            doc("x", "Weekly Sync - 2024/11/26 12:58 PST - notes"),
            "# Transcript",
        );

        let stats = fx.coordinator(source, false).run().await;

        assert_eq!(stats.processed, 1);
        assert_eq!(stats.error_count(), 0);
        let path = fx
            .dir("a")
            .join("TS. 2024-11-26 - Weekly Sync - 2024-11-26 12-58 PST - notes.md");
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("*Created by [[Transcript Syncer]] at "));
        assert!(written.contains("> - [[Dashboard. A]]\n"));
        assert!(written.ends_with("---\n\n# Transcript"));
        assert!(fx.store().load().contains(&crate::domain::ItemId::new("x").unwrap()));
    }

    #[tokio::test]
    async fn test_second_run_skips_everything() {
        let fx = Fixture::new();
        let source = || {
            MemorySource::new()
                .with_document(&fx.folder_a, doc("x", "Sync - 2024/01/02"), "one")
                .with_document(&fx.folder_b, doc("y", "Call (2024-07-11 15:23 GMT-7) notes"), "two")
        };

        let first = fx.coordinator(source(), false).run().await;
        let second_source = source();
        let second = fx.coordinator(second_source, false).run().await;

        assert_eq!(first.processed, 2);
        assert_eq!(second.processed, 0);
        assert_eq!(second.skipped, 2);
    }

    #[tokio::test]
    async fn test_malformed_and_failed_items_do_not_stop_the_run() {
        let fx = Fixture::new();
        let source = MemorySource::new()
            .with_payload(
                &fx.folder_a,
                RemoteItemPayload {
                    id: None,
                    name: Some("Transcript".to_string()),
                    mime_type: None,
                },
            )
            .with_document(&fx.folder_a, doc("bad", "Broken - 2024/01/01"), "")
            .with_document(&fx.folder_a, doc("good", "Fine - 2024/01/03"), "ok")
            .failing_fetch("bad");

        let stats = fx.coordinator(source, false).run().await;

        assert_eq!(stats.processed, 1);
        assert_eq!(stats.error_count(), 2);
        assert_eq!(stats.errors[0].kind, RunErrorKind::MalformedItem);
        assert_eq!(stats.errors[1].kind, RunErrorKind::Download);
        let ledger = fx.store().load();
        assert!(!ledger.contains(&crate::domain::ItemId::new("bad").unwrap()));
        assert!(ledger.contains(&crate::domain::ItemId::new("good").unwrap()));
    }

    #[tokio::test]
    async fn test_listing_failure_is_counted_and_next_mapping_runs() {
        let fx = Fixture::new();
        let source = MemorySource::new()
            .failing_listing(&fx.folder_a)
            .with_document(&fx.folder_b, doc("y", "Sync - 2024/01/02"), "two");

        let stats = fx.coordinator(source, false).run().await;

        assert_eq!(stats.mappings_visited, 2);
        assert_eq!(stats.processed, 1);
        assert_eq!(stats.errors[0].kind, RunErrorKind::Listing);
    }

    #[tokio::test]
    async fn test_write_failure_skips_ledger_commit() {
        let fx = Fixture::new();
        let mut context = fx.context(false);
        context.mappings[0].destination = fx.dir("missing-dir");
        let source = MemorySource::new().with_document(
            &fx.folder_a,
            RemoteItemPayload::new("x", "Sync - 2024/01/02", MARKDOWN_MIME_TYPE),
            "body",
        );
        let (_tx, rx) = watch::channel(false);

        let stats = SyncCoordinator::new(context, Arc::new(source), rx).run().await;

        assert_eq!(stats.processed, 0);
        assert_eq!(stats.errors[0].kind, RunErrorKind::Write);
        assert!(fx.store().load().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let fx = Fixture::new();
        let source = MemorySource::new()
            .with_document(&fx.folder_a, doc("x", "Sync - 2024/01/02"), "one");

        let stats = fx.coordinator(source, true).run().await;

        assert_eq!(stats.processed, 1);
        assert!(stats.dry_run);
        assert!(!fx.dir("a").join("TS. 2024-01-02 - Sync - 2024-01-02.md").exists());
        assert!(!fx.store().path().exists());
    }

    #[tokio::test]
    async fn test_shutdown_stops_before_first_item() {
        let fx = Fixture::new();
        let source = MemorySource::new()
            .with_document(&fx.folder_a, doc("x", "Sync - 2024/01/02"), "one");
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let stats = SyncCoordinator::new(fx.context(false), Arc::new(source), rx)
            .run()
            .await;

        assert!(stats.interrupted);
        assert_eq!(stats.processed, 0);
        assert_eq!(stats.mappings_visited, 0);
    }
}
