use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StoreError, StoreResult};
use crate::key::StateKey;
use crate::traits::{DocumentStore, Entry, WriteBatch, WriteOp};

#[derive(Default)]
struct Inner {
    entries: HashMap<StateKey, Entry>,
    next_version: u64,
    commits: u64,
}

impl Inner {
    fn bump(&mut self) -> u64 {
        self.next_version += 1;
        self.next_version
    }
}

/// In-memory, HashMap-based document store.
///
/// Intended for tests and embedding. All entries are held behind a single
/// `RwLock`; a commit validates its read set and applies its writes while
/// holding the write lock, so concurrent commits are serialized.
pub struct InMemoryDocumentStore {
    inner: RwLock<Inner>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    fn read_lock(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write_lock(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_lock()?.entries.len())
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_lock()?.entries.is_empty())
    }

    /// Number of batches successfully committed.
    pub fn commit_count(&self) -> StoreResult<u64> {
        Ok(self.read_lock()?.commits)
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> StoreResult<Vec<StateKey>> {
        let inner = self.read_lock()?;
        let mut keys: Vec<StateKey> = inner.entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn get(&self, key: &StateKey) -> StoreResult<Option<Entry>> {
        Ok(self.read_lock()?.entries.get(key).cloned())
    }

    fn put(&self, key: &StateKey, value: Vec<u8>) -> StoreResult<u64> {
        let mut inner = self.write_lock()?;
        let version = inner.bump();
        inner.entries.insert(key.clone(), Entry { value, version });
        Ok(version)
    }

    fn delete(&self, key: &StateKey) -> StoreResult<bool> {
        let mut inner = self.write_lock()?;
        Ok(inner.entries.remove(key).is_some())
    }

    fn commit(&self, batch: &WriteBatch) -> StoreResult<()> {
        let mut inner = self.write_lock()?;

        for (key, seen) in &batch.reads {
            let current = inner.entries.get(key).map(|e| e.version);
            if current != *seen {
                tracing::debug!(%key, ?seen, ?current, "read set validation failed");
                return Err(StoreError::VersionConflict {
                    key: key.to_string(),
                });
            }
        }

        for (key, op) in &batch.writes {
            match op {
                WriteOp::Put(value) => {
                    let version = inner.bump();
                    inner.entries.insert(
                        key.clone(),
                        Entry {
                            value: value.clone(),
                            version,
                        },
                    );
                }
                WriteOp::Delete => {
                    inner.entries.remove(key);
                }
            }
        }
        inner.commits += 1;
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("InMemoryDocumentStore")
            .field("entry_count", &count)
            .finish()
    }
}
