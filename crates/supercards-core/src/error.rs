//! Error types for SuperCards

use thiserror::Error;

/// Main error type for SuperCards operations
#[derive(Error, Debug)]
pub enum CardError {
    /// A batch write would exceed the configured storage quota
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} bytes allowed")]
    QuotaExceeded {
        /// Size the store would have after the write
        needed: usize,
        /// Configured quota
        limit: usize,
    },

    /// Database creation/opening error
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// Table error
    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    /// Storage operation error
    #[error("Storage operation error: {0}")]
    StorageOp(#[from] redb::StorageError),

    /// Commit error
    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// Error during serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Card catalogue could not be loaded
    #[error("Catalogue error: {0}")]
    Catalogue(String),

    /// No card with this id is known to the catalogue or board
    #[error("Card not found: {0}")]
    CardNotFound(String),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using CardError
pub type CardResult<T> = Result<T, CardError>;
