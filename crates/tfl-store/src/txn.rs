use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::key::StateKey;
use crate::traits::{DocumentStore, WriteBatch, WriteOp};

/// Outcome of a committed transaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Number of keys read from the store.
    pub reads: usize,
    /// Number of writes applied. Zero means the store was not touched.
    pub writes: usize,
}

#[derive(Clone, Debug)]
struct Observed {
    version: Option<u64>,
    value: Option<Vec<u8>>,
}

/// A buffered unit of work against a [`DocumentStore`].
///
/// Reads go to the store once per key and are pinned for the life of the
/// transaction; later reads of the same key return the pinned value, or the
/// buffered write if this transaction has written it. Nothing is visible to
/// other readers until [`Transaction::commit`] succeeds.
pub struct Transaction<'a> {
    store: &'a dyn DocumentStore,
    reads: BTreeMap<StateKey, Observed>,
    writes: BTreeMap<StateKey, WriteOp>,
}

impl<'a> Transaction<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            reads: BTreeMap::new(),
            writes: BTreeMap::new(),
        }
    }

    /// Raw read. Empty values are reported as absent.
    pub fn get(&mut self, key: &StateKey) -> StoreResult<Option<Vec<u8>>> {
        if let Some(op) = self.writes.get(key) {
            return Ok(match op {
                WriteOp::Put(value) if !value.is_empty() => Some(value.clone()),
                _ => None,
            });
        }
        if !self.reads.contains_key(key) {
            let entry = self.store.get(key)?;
            let observed = Observed {
                version: entry.as_ref().map(|e| e.version),
                value: entry.map(|e| e.value),
            };
            self.reads.insert(key.clone(), observed);
        }
        Ok(self
            .reads
            .get(key)
            .and_then(|o| o.value.clone())
            .filter(|v| !v.is_empty()))
    }

    pub fn exists(&mut self, key: &StateKey) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    pub fn get_string(&mut self, key: &StateKey) -> StoreResult<Option<String>> {
        match self.get(key)? {
            None => Ok(None),
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| StoreError::Serialization {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    pub fn get_json<T: DeserializeOwned>(&mut self, key: &StateKey) -> StoreResult<Option<T>> {
        match self.get(key)? {
            None => Ok(None),
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StoreError::Serialization {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }

    pub fn put(&mut self, key: StateKey, value: Vec<u8>) {
        self.writes.insert(key, WriteOp::Put(value));
    }

    pub fn put_string(&mut self, key: StateKey, value: impl Into<String>) {
        self.put(key, value.into().into_bytes());
    }

    pub fn put_json<T: Serialize>(&mut self, key: StateKey, value: &T) -> StoreResult<()> {
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.put(key, bytes);
        Ok(())
    }

    pub fn delete(&mut self, key: StateKey) {
        self.writes.insert(key, WriteOp::Delete);
    }

    /// Number of buffered writes.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Apply the buffered writes atomically.
    ///
    /// Fails with [`StoreError::VersionConflict`] if any key read by this
    /// transaction changed in the meantime; nothing is written in that case.
    pub fn commit(self) -> StoreResult<CommitSummary> {
        let summary = CommitSummary {
            reads: self.reads.len(),
            writes: self.writes.len(),
        };
        if self.writes.is_empty() {
            return Ok(summary);
        }
        let batch = WriteBatch {
            reads: self
                .reads
                .into_iter()
                .map(|(key, observed)| (key, observed.version))
                .collect(),
            writes: self.writes.into_iter().collect(),
        };
        self.store.commit(&batch)?;
        tracing::debug!(reads = summary.reads, writes = summary.writes, "transaction committed");
        Ok(summary)
    }
}

impl std::fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("reads", &self.reads.len())
            .field("writes", &self.writes.len())
            .finish()
    }
}
