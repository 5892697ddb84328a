//! Bookmark persistence.
//!
//! Two kinds of keys live in the backing [`KeyValueStore`]:
//!
//! ```text
//! FAVOURITE_CARDS_LIST_STORE  -> JSON array of CardSnapshot, insertion order
//! bookmark-<card id>          -> "true" | "false"
//! ```
//!
//! [`BookmarkStore`] is the only place these keys are formatted. It never
//! emits notifications; widgets broadcast after a store call returns.
//!
//! `add` and `remove` write the list and the flag in one [`WriteBatch`], so a
//! failed write leaves both untouched rather than half-applied.
//!
//! List entries are rewritten from the JSON they were read as. Entries this
//! build cannot decode, or decodes only partially, are never reshaped by an
//! unrelated write.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CardError, CardResult};
use crate::storage::{DiskStore, KeyValueStore, MemoryStore, WriteBatch};
use crate::types::{CardId, CardKind, CardSnapshot};

/// Key holding the serialized bookmark list
pub const LIST_KEY: &str = "FAVOURITE_CARDS_LIST_STORE";

/// Prefix of the per-card bookmark flag keys
pub const FLAG_PREFIX: &str = "bookmark-";

/// Outcome of [`BookmarkStore::reconcile`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Ids whose flag was true without a list entry
    pub flags_cleared: Vec<CardId>,
    /// Ids listed without a true flag
    pub flags_set: Vec<CardId>,
    /// Ids that appeared more than once in the list
    pub duplicates_dropped: Vec<CardId>,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.flags_cleared.is_empty() && self.flags_set.is_empty() && self.duplicates_dropped.is_empty()
    }
}

/// One list entry exactly as stored
#[derive(Debug, Clone)]
struct StoredEntry {
    id: Option<CardId>,
    raw: Value,
}

impl StoredEntry {
    fn from_raw(raw: Value) -> Self {
        let id = raw.get("id").and_then(Value::as_str).map(CardId::from);
        Self { id, raw }
    }

    fn from_snapshot(snapshot: &CardSnapshot) -> CardResult<Self> {
        let raw = serde_json::to_value(snapshot)
            .map_err(|e| CardError::Serialization(e.to_string()))?;
        Ok(Self {
            id: Some(snapshot.id.clone()),
            raw,
        })
    }

    fn is(&self, id: &CardId) -> bool {
        self.id.as_ref() == Some(id)
    }

    /// Typed view of the entry.
    ///
    /// An entry with an id that does not otherwise decode shows as an unknown
    /// card so it can still be deleted; one without an id is not shown.
    fn snapshot(&self) -> Option<CardSnapshot> {
        match CardSnapshot::deserialize(&self.raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                let Some(id) = self.id.clone() else {
                    warn!(error = %e, "Bookmark entry has no id, hiding it");
                    return None;
                };
                warn!(card_id = %id, error = %e, "Bookmark entry does not decode, showing as unknown");
                let timestamp = self
                    .raw
                    .get("timestamp")
                    .and_then(|ts| DateTime::<Utc>::deserialize(ts).ok())
                    .unwrap_or_default();
                Some(CardSnapshot {
                    id,
                    kind: CardKind::Unknown,
                    bookmarked: true,
                    timestamp,
                })
            }
        }
    }
}

/// Bookmark list and per-card flags over a key-value backend
#[derive(Clone)]
pub struct BookmarkStore {
    backend: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for BookmarkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookmarkStore").finish_non_exhaustive()
    }
}

impl BookmarkStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Store backed by a fresh [`MemoryStore`]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Store backed by a redb file at `path`
    pub fn open(path: impl AsRef<Path>) -> CardResult<Self> {
        Ok(Self::new(DiskStore::new(path)?))
    }

    fn flag_key(id: &CardId) -> String {
        format!("{}{}", FLAG_PREFIX, id)
    }

    /// Read the list, treating absent content or anything other than a JSON
    /// array as empty.
    ///
    /// Backend failures are still errors so a write never replaces a list it
    /// could not read.
    fn read_list(&self) -> CardResult<Vec<StoredEntry>> {
        let Some(raw) = self.backend.get(LIST_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(values) => Ok(values.into_iter().map(StoredEntry::from_raw).collect()),
            Err(e) => {
                warn!(error = %e, "Bookmark list is malformed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn encode_list(list: &[StoredEntry]) -> CardResult<String> {
        let values: Vec<&Value> = list.iter().map(|entry| &entry.raw).collect();
        serde_json::to_string(&values).map_err(|e| CardError::Serialization(e.to_string()))
    }

    /// All bookmarked snapshots in insertion order.
    ///
    /// Never fails: a backend error is logged and reads as an empty list.
    pub fn get_all(&self) -> Vec<CardSnapshot> {
        match self.read_list() {
            Ok(list) => list.iter().filter_map(StoredEntry::snapshot).collect(),
            Err(e) => {
                warn!(error = %e, "Failed to read bookmark list");
                Vec::new()
            }
        }
    }

    /// Append a snapshot and set its flag.
    ///
    /// An existing entry with the same id is dropped first, so the list keeps
    /// at most one entry per id.
    pub fn add(&self, snapshot: CardSnapshot) -> CardResult<()> {
        let mut list = self.read_list()?;
        list.retain(|entry| !entry.is(&snapshot.id));

        let flag_key = Self::flag_key(&snapshot.id);
        debug!(card_id = %snapshot.id, "Adding bookmark");
        list.push(StoredEntry::from_snapshot(&snapshot)?);

        let batch = WriteBatch::new()
            .put(LIST_KEY, Self::encode_list(&list)?)
            .put(flag_key, "true");
        self.backend.apply(batch)
    }

    /// Remove every entry with `id`.
    ///
    /// The flag is cleared only when an entry was actually removed; returns
    /// whether that happened.
    pub fn remove(&self, id: &CardId) -> CardResult<bool> {
        let mut list = self.read_list()?;
        let before = list.len();
        list.retain(|entry| !entry.is(id));
        let removed = list.len() < before;

        let mut batch = WriteBatch::new().put(LIST_KEY, Self::encode_list(&list)?);
        if removed {
            batch = batch.put(Self::flag_key(id), "false");
        }
        self.backend.apply(batch)?;

        debug!(card_id = %id, removed, "Removed bookmark");
        Ok(removed)
    }

    /// Read the per-card flag. Absent, unreadable or non-`"true"` values read as false.
    pub fn is_bookmarked(&self, id: &CardId) -> bool {
        match self.backend.get(&Self::flag_key(id)) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!(card_id = %id, error = %e, "Failed to read bookmark flag");
                false
            }
        }
    }

    /// Bring every flag in line with list membership and drop duplicate entries.
    ///
    /// Data written by this type is always consistent; this repairs stores
    /// written by older builds or edited by hand.
    pub fn reconcile(&self) -> CardResult<ReconcileReport> {
        let list = self.read_list()?;
        let mut report = ReconcileReport::default();

        // keep the last occurrence of each id, as `add` would have
        let mut seen = BTreeSet::new();
        let mut deduped: Vec<StoredEntry> = Vec::with_capacity(list.len());
        for entry in list.into_iter().rev() {
            let Some(id) = entry.id.clone() else {
                deduped.push(entry);
                continue;
            };
            if seen.insert(id.clone()) {
                deduped.push(entry);
            } else if !report.duplicates_dropped.contains(&id) {
                report.duplicates_dropped.push(id);
            }
        }
        deduped.reverse();

        let mut batch = WriteBatch::new();
        if !report.duplicates_dropped.is_empty() {
            batch = batch.put(LIST_KEY, Self::encode_list(&deduped)?);
        }

        for key in self.backend.keys_with_prefix(FLAG_PREFIX)? {
            let id = CardId::new(&key[FLAG_PREFIX.len()..]);
            let flagged = self.backend.get(&key)?.as_deref() == Some("true");
            if flagged && !seen.contains(&id) {
                batch = batch.put(key, "false");
                report.flags_cleared.push(id);
            }
        }

        for id in deduped.iter().filter_map(|entry| entry.id.as_ref()) {
            if !self.is_bookmarked(id) {
                batch = batch.put(Self::flag_key(id), "true");
                report.flags_set.push(id.clone());
            }
        }

        self.backend.apply(batch)?;

        if !report.is_clean() {
            warn!(
                cleared = report.flags_cleared.len(),
                set = report.flags_set.len(),
                duplicates = report.duplicates_dropped.len(),
                "Reconciled bookmark flags"
            );
        }
        Ok(report)
    }
}
