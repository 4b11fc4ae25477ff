//! Key-value document storage for the Trade Finance Ledger.
//!
//! Contracts never write to the store directly. Each invocation opens a
//! [`Transaction`] that buffers its writes and records the version of every
//! key it read; on success the whole write set is handed to
//! [`DocumentStore::commit`], which applies it atomically or not at all.
//!
//! # Keys
//!
//! - Documents live under composite keys ([`Namespace`] + id), e.g. the
//!   letter of credit of `trade-1` is `LetterOfCredit/trade-1`.
//! - Deployment settings live under flat keys (`tradeContractId`, ...).
//!
//! # Storage Backends
//!
//! - [`InMemoryDocumentStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Every stored value carries a version from a store-wide counter; versions are never reused.
//! 2. A commit fails with [`StoreError::VersionConflict`] if any key it read has changed since.
//! 3. A transaction without writes never touches the store on commit.
//! 4. The store never interprets values; typed access goes through [`Transaction::get_json`].

pub mod error;
pub mod key;
pub mod memory;
pub mod traits;
pub mod txn;

pub use error::{StoreError, StoreResult};
pub use key::{Namespace, StateKey};
pub use memory::InMemoryDocumentStore;
pub use traits::{DocumentStore, Entry, ReadSet, WriteBatch, WriteOp};
pub use txn::{CommitSummary, Transaction};
