use crate::error::StoreResult;
use crate::key::StateKey;

/// A stored value together with its version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub value: Vec<u8>,
    pub version: u64,
}

/// A single buffered mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    Put(Vec<u8>),
    Delete,
}

/// Versions observed by a transaction; `None` records that the key was absent.
pub type ReadSet = Vec<(StateKey, Option<u64>)>;

/// Everything a transaction wants to apply, plus the reads it depends on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    pub reads: ReadSet,
    pub writes: Vec<(StateKey, WriteOp)>,
}

impl WriteBatch {
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Key-value store backing the contracts' state.
///
/// All implementations must satisfy these invariants:
/// - `commit` is all-or-nothing: either every write in the batch is applied
///   or none is.
/// - `commit` rejects the batch if any key in its read set no longer has the
///   recorded version (absent keys must still be absent).
/// - Versions are drawn from a counter that never repeats, so deleting and
///   recreating a key cannot make a stale read look current.
pub trait DocumentStore: Send + Sync {
    /// Read a value. Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &StateKey) -> StoreResult<Option<Entry>>;

    /// Write a value outside any transaction and return its new version.
    ///
    /// Intended for seeding state; contracts go through [`crate::Transaction`].
    fn put(&self, key: &StateKey, value: Vec<u8>) -> StoreResult<u64>;

    /// Delete a value outside any transaction. Returns `true` if it existed.
    fn delete(&self, key: &StateKey) -> StoreResult<bool>;

    /// Atomically validate the read set and apply the write set.
    fn commit(&self, batch: &WriteBatch) -> StoreResult<()>;

    /// Check whether a non-empty value exists under the key.
    fn exists(&self, key: &StateKey) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some_and(|e| !e.value.is_empty()))
    }
}
