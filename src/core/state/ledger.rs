//! Ledger model for tracking processed remote items
//!
//! The ledger maps each remote item id to the record written when the item
//! was synced (or found to already exist locally). It is a cache of "we don't
//! need to look again", not a mirror of the filesystem: an entry whose output
//! file was deleted out-of-band is tolerated.

use crate::domain::ids::ItemId;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a ledger timestamp into local wall-clock time
///
/// Accepts naive ISO-8601 (what the syncer writes), ISO-8601 with an offset
/// or `Z` (converted to local time), and a bare date (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.with_timezone(&Local).naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp '{raw}'")))
}

/// Record of one processed remote item
///
/// Serialized as `{"name": "...", "processed_at": "2024-11-26T12:58:00.123456"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingRecord {
    /// Remote name at the time of processing
    pub name: String,

    /// Local wall-clock time the item was processed
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub processed_at: NaiveDateTime,
}

impl ProcessingRecord {
    /// Create a record stamped with the current local time
    pub fn now(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            processed_at: Local::now().naive_local(),
        }
    }
}

/// In-memory ledger, persisted by [`LedgerStore`](super::LedgerStore)
///
/// # Examples
///
/// ```
/// use transcript_syncer::core::state::Ledger;
/// use transcript_syncer::domain::ItemId;
///
/// let mut ledger = Ledger::new();
/// let id = ItemId::new("1AbC").unwrap();
///
/// assert!(!ledger.contains(&id));
/// ledger.record(id.clone(), "Weekly Sync - 2024/11/26");
/// assert!(ledger.contains(&id));
/// ```
///
/// Loading is tolerant per entry: a record whose fields cannot be read still
/// keeps its id in the ledger, with an empty name and the epoch as its time.
/// Dropping it would make the next run download the item again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: BTreeMap<ItemId, ProcessingRecord>,
}

/// A ledger entry as found on disk
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Record(ProcessingRecord),
    Named { name: String },
    Unreadable(IgnoredAny),
}

impl<'de> Deserialize<'de> for Ledger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let stored = BTreeMap::<ItemId, StoredEntry>::deserialize(deserializer)?;
        let entries = stored
            .into_iter()
            .map(|(id, entry)| {
                let record = match entry {
                    StoredEntry::Record(record) => record,
                    StoredEntry::Named { name } => {
                        tracing::warn!(item_id = %id, "Ledger entry has an unreadable timestamp");
                        ProcessingRecord {
                            name,
                            processed_at: NaiveDateTime::default(),
                        }
                    }
                    StoredEntry::Unreadable(_) => {
                        tracing::warn!(item_id = %id, "Ledger entry is unreadable, keeping its id");
                        ProcessingRecord {
                            name: String::new(),
                            processed_at: NaiveDateTime::default(),
                        }
                    }
                };
                (id, record)
            })
            .collect();
        Ok(Self { entries })
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &ItemId) -> Option<&ProcessingRecord> {
        self.entries.get(id)
    }

    /// Record `id` as processed now, replacing any previous record
    pub fn record(&mut self, id: ItemId, name: impl Into<String>) -> &ProcessingRecord {
        self.insert(id, ProcessingRecord::now(name))
    }

    /// Insert an explicit record, replacing any previous one
    pub fn insert(&mut self, id: ItemId, record: ProcessingRecord) -> &ProcessingRecord {
        self.entries.insert(id.clone(), record);
        &self.entries[&id]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &ProcessingRecord)> {
        self.entries.iter()
    }

    /// The `limit` most recently processed entries, newest first
    pub fn most_recent(&self, limit: usize) -> Vec<(&ItemId, &ProcessingRecord)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| b.1.processed_at.cmp(&a.1.processed_at));
        entries.truncate(limit);
        entries
    }
}
