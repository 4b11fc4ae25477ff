//! Foundation types for the Trade Finance Ledger (TFL).
//!
//! This crate provides the identity, document, and fact types shared by every
//! other TFL crate.
//!
//! # Key Types
//!
//! - [`OrganizationId`]: Verified identifier of a participating organization
//! - [`Identity`]: Caller organization plus business role
//! - [`TradeId`]: Key of a trade agreement and of every document derived from it
//! - [`ExportLicense`] / [`LetterOfCredit`]: Status-tracked trade documents
//! - [`BankAccount`]: Per-organization balance record
//! - [`TradeFact`] / [`ShipmentLocation`] / [`BillOfLadingFact`]: Facts owned by sibling contracts

pub mod document;
pub mod error;
pub mod fact;
pub mod identity;
pub mod status;
pub mod trade;

pub use document::{BankAccount, ExportLicense, LcDocument, LetterOfCredit};
pub use error::TypeError;
pub use fact::{BillOfLadingFact, ShipmentLocation, ShipmentLocationFact, TradeFact, TradeStatus};
pub use identity::{roles, Identity, OrganizationId, Role, BUSINESS_ROLE_ATTR};
pub use status::{DocumentStatus, Transition};
pub use trade::TradeId;

pub use rust_decimal::Decimal;
