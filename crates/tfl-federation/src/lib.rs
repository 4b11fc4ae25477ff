//! Cross-contract fact fetching for the Trade Finance Ledger.
//!
//! The trade, shipment, and bill-of-lading facts that the workflows validate
//! against are owned by sibling contracts. This crate defines the
//! [`ContractInvoker`] seam those contracts are reached through and a typed
//! [`FactFetcher`] on top of it.
//!
//! Facts are never cached: each call goes to the remote contract. A
//! non-success status, an empty payload, or a payload that does not decode is
//! a [`FederationError`].
//!
//! [`StaticInvoker`] is an in-memory invoker with canned responses, used by
//! tests and local embeddings.

pub mod error;
pub mod fetcher;
pub mod fixed;
pub mod invoker;

pub use error::{FederationError, FederationResult};
pub use fetcher::{FactFetcher, FactRoute, GET_BILL_OF_LADING, GET_SHIPMENT_LOCATION, GET_TRADE};
pub use fixed::StaticInvoker;
pub use invoker::{ContractInvoker, InvocationRequest, InvocationResponse, InvocationStatus};
