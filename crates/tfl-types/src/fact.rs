//! Read-only facts owned by sibling contracts.
//!
//! These are decoded from the JSON payloads returned by cross-contract calls
//! and are never cached: every invocation fetches them again.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::identity::OrganizationId;

/// Status of a trade agreement in the trade contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    Requested,
    Accepted,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => write!(f, "REQUESTED"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// The trade agreement between an importer and an exporter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeFact {
    #[serde(rename = "tradeID", default, skip_serializing_if = "Option::is_none")]
    pub trade_id: Option<String>,
    #[serde(rename = "exporterMSP")]
    pub exporter: OrganizationId,
    #[serde(rename = "importerMSP")]
    pub importer: OrganizationId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub description_of_goods: String,
    pub status: TradeStatus,
}

/// Where a shipment currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentLocation {
    Source,
    Destination,
}

impl fmt::Display for ShipmentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "SOURCE"),
            Self::Destination => write!(f, "DESTINATION"),
        }
    }
}

/// Wire form of the shipment contract's location response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentLocationFact {
    #[serde(rename = "Location")]
    pub location: ShipmentLocation,
}

/// Bill of lading issued by the carrier for a shipment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOfLadingFact {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub expiration_date: String,
    #[serde(rename = "exporterMSP")]
    pub exporter: OrganizationId,
    #[serde(rename = "carrierMSP", default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<OrganizationId>,
    pub description_of_goods: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub beneficiary: OrganizationId,
    #[serde(default)]
    pub source_port: String,
    #[serde(default)]
    pub destination_port: String,
}
