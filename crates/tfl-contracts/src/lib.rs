//! Trade Finance Ledger contracts.
//!
//! Two contracts are hosted here:
//!
//! - the **export-license** contract, where an exporter requests a license for
//!   an accepted trade and the regulator issues it;
//! - the **letter-of-credit** contract, where the importer requests a letter
//!   of credit, the importer's bank issues it, the exporter's bank accepts it,
//!   and payment is settled in two milestones as the shipment moves.
//!
//! Each contract is a [`ContractHost`]: an [`tfl_gate::AccessGate`] built
//! from an immutable access table, an [`OperationRegistry`] mapping operation
//! names to handlers, and the document store and sibling contracts it runs
//! against. Every invocation is checked by the gate, runs in its own
//! [`tfl_store::Transaction`], and commits only if the handler succeeds.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use tfl_contracts::{ops, ContractHost};
//! use tfl_federation::StaticInvoker;
//! use tfl_store::InMemoryDocumentStore;
//! use tfl_types::Identity;
//!
//! let host = ContractHost::export_license(
//!     Arc::new(InMemoryDocumentStore::new()),
//!     Arc::new(StaticInvoker::new()),
//! );
//! let exporter = Identity::new("ExporterOrgMSP", None);
//! let args = ["tradechannel", "trade", "CarrierOrgMSP", "RegulatorOrgMSP"];
//! let response = host.invoke(&exporter, ops::INIT, &args).unwrap();
//! assert_eq!(response.writes, 4);
//! ```

pub mod accounts;
pub mod acl;
pub mod config;
pub mod context;
pub mod error;
pub mod export_license;
pub mod host;
pub mod letter_of_credit;
pub mod payment;
pub mod registry;
pub mod response;

#[cfg(test)]
mod fixtures;

pub use accounts::BankAccountLedger;
pub use config::{
    AccountSetup, AclOverrides, ConfigError, ConfigKey, DeploymentConfig, ExportLicenseSetup,
    LetterOfCreditSetup,
};
pub use context::InvocationContext;
pub use error::{ContractError, ContractResult, ErrorKind};
pub use export_license::ExportLicenseWorkflow;
pub use host::{ContractHost, Response};
pub use letter_of_credit::LetterOfCreditWorkflow;
pub use payment::{PaymentRequest, PaymentSettlementEngine, Settlement};
pub use registry::{ops, Handler, OperationRegistry};
pub use response::{BalanceView, StatusView};
