//! In-memory key-value store
//!
//! Used for tests and headless sessions. An optional quota mimics the size
//! limit browsers put on local storage: a batch that would push the total of
//! key and value bytes over the quota fails and leaves the store untouched.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{KeyValueStore, WriteBatch, WriteOp};
use crate::error::CardError;

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

/// Process-local key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects batches growing it past `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        let store = Self::default();
        store.set_quota(Some(bytes));
        store
    }

    /// Change or lift the quota. Existing data is kept even if over the new limit.
    pub fn set_quota(&self, bytes: Option<usize>) {
        self.inner.write().quota = bytes;
    }

    /// Total key and value bytes currently stored
    pub fn usage(&self) -> usize {
        usage_of(&self.inner.read().entries)
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    /// Write a raw value, bypassing the quota. Test fixtures use this to plant
    /// malformed or legacy data.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.write().entries.insert(key.into(), value.into());
    }
}

fn usage_of(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CardError> {
        Ok(self.inner.read().entries.get(key).cloned())
    }

    fn apply(&self, batch: WriteBatch) -> Result<(), CardError> {
        let mut inner = self.inner.write();

        let mut next = inner.entries.clone();
        for op in batch.ops() {
            match op {
                WriteOp::Put { key, value } => {
                    next.insert(key.clone(), value.clone());
                }
                WriteOp::Delete { key } => {
                    next.remove(key);
                }
            }
        }

        if let Some(limit) = inner.quota {
            let needed = usage_of(&next);
            if needed > limit {
                return Err(CardError::QuotaExceeded { needed, limit });
            }
        }

        inner.entries = next;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CardError> {
        Ok(self
            .inner
            .read()
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
