//! Key-value persistence backends.
//!
//! Bookmark state lives in a flat string-to-string map, the same shape as
//! browser local storage. Two backends implement [`KeyValueStore`]:
//! - [`DiskStore`]: a redb database file, one write transaction per batch
//! - [`MemoryStore`]: an in-process map with an optional byte quota
//!
//! Writes go through [`WriteBatch`] so callers can update several keys
//! atomically.

use crate::error::CardError;
use parking_lot::RwLock;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

mod memory;

pub use memory::MemoryStore;

/// Single table holding every key
const KV_TABLE: TableDefinition<&str, &str> = TableDefinition::new("kv");

/// One mutation inside a [`WriteBatch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put { key: String, value: String },
    Delete { key: String },
}

/// Ordered set of mutations applied all-or-nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `key = value`
    pub fn put(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Put {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Queue removal of `key`
    pub fn delete(mut self, key: impl Into<String>) -> Self {
        self.ops.push(WriteOp::Delete { key: key.into() });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Flat string key-value persistence
pub trait KeyValueStore: Send + Sync {
    /// Read a single key; `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>, CardError>;

    /// Apply every operation in the batch, or none of them
    fn apply(&self, batch: WriteBatch) -> Result<(), CardError>;

    /// List keys starting with `prefix`, in key order
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CardError>;
}

/// Storage backend using redb for ACID-compliant persistence
#[derive(Clone)]
pub struct DiskStore {
    db: Arc<RwLock<Database>>,
}

impl DiskStore {
    /// Open or create a store at the given path.
    ///
    /// This will:
    /// - Create the parent directory if it doesn't exist
    /// - Initialize the database file
    /// - Create the key-value table
    pub fn new(path: impl AsRef<Path>) -> Result<Self, CardError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;

        tracing::debug!(path = %path.display(), "Opened bookmark database");

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
        })
    }
}

impl KeyValueStore for DiskStore {
    fn get(&self, key: &str) -> Result<Option<String>, CardError> {
        let db = self.db.read();
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;

        Ok(table.get(key)?.map(|v| v.value().to_string()))
    }

    fn apply(&self, batch: WriteBatch) -> Result<(), CardError> {
        if batch.is_empty() {
            return Ok(());
        }

        // shared guard is enough: redb serialises write transactions itself
        let db = self.db.read();
        let write_txn = db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            for op in batch.ops() {
                match op {
                    WriteOp::Put { key, value } => {
                        table.insert(key.as_str(), value.as_str())?;
                    }
                    WriteOp::Delete { key } => {
                        table.remove(key.as_str())?;
                    }
                }
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CardError> {
        let db = self.db.read();
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;

        let mut keys = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            let key = key.value();
            if key.starts_with(prefix) {
                keys.push(key.to_string());
            }
        }
        Ok(keys)
    }
}
