/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A key read by the transaction was modified before it committed.
    #[error("version conflict on key {key}")]
    VersionConflict { key: String },

    /// A stored value could not be encoded or decoded.
    #[error("serialization error for key {key}: {reason}")]
    Serialization { key: String, reason: String },

    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
