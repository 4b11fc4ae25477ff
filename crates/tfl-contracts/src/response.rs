use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tfl_types::DocumentStatus;

use crate::error::{ContractError, ContractResult};

/// `{"Status": "<value>"}`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    #[serde(rename = "Status")]
    pub status: DocumentStatus,
}

/// `{"Balance": <number>}`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceView {
    #[serde(rename = "Balance", with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

/// Serialize a handler's return value.
pub(crate) fn to_payload<T: Serialize>(value: &T) -> ContractResult<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| ContractError::Encoding(format!("cannot encode response: {e}")))
}
