use serde::de::DeserializeOwned;
use tfl_types::{BillOfLadingFact, ShipmentLocation, ShipmentLocationFact, TradeFact, TradeId};

use crate::error::{FederationError, FederationResult};
use crate::invoker::{ContractInvoker, InvocationRequest};

pub const GET_TRADE: &str = "getTrade";
pub const GET_SHIPMENT_LOCATION: &str = "getShipmentLocation";
pub const GET_BILL_OF_LADING: &str = "getBillOfLading";

/// Where a sibling contract lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactRoute {
    pub contract: String,
    pub channel: Option<String>,
}

impl FactRoute {
    /// A contract on the caller's own channel.
    pub fn local(contract: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            channel: None,
        }
    }

    pub fn on_channel(contract: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            channel: Some(channel.into()),
        }
    }
}

/// Typed, uncached access to facts owned by sibling contracts.
#[derive(Clone, Copy)]
pub struct FactFetcher<'a> {
    invoker: &'a dyn ContractInvoker,
}

impl<'a> FactFetcher<'a> {
    pub fn new(invoker: &'a dyn ContractInvoker) -> Self {
        Self { invoker }
    }

    pub fn fetch_trade(&self, route: &FactRoute, trade_id: &TradeId) -> FederationResult<TradeFact> {
        self.fetch(route, GET_TRADE, trade_id)
    }

    pub fn fetch_shipment_location(
        &self,
        route: &FactRoute,
        trade_id: &TradeId,
    ) -> FederationResult<ShipmentLocation> {
        let fact: ShipmentLocationFact = self.fetch(route, GET_SHIPMENT_LOCATION, trade_id)?;
        Ok(fact.location)
    }

    pub fn fetch_bill_of_lading(
        &self,
        route: &FactRoute,
        trade_id: &TradeId,
    ) -> FederationResult<BillOfLadingFact> {
        self.fetch(route, GET_BILL_OF_LADING, trade_id)
    }

    fn fetch<T: DeserializeOwned>(
        &self,
        route: &FactRoute,
        function: &str,
        trade_id: &TradeId,
    ) -> FederationResult<T> {
        let request = InvocationRequest {
            contract: route.contract.clone(),
            function: function.to_string(),
            args: vec![trade_id.to_string()],
            channel: route.channel.clone(),
        };
        tracing::debug!(
            contract = %request.contract,
            function,
            channel = ?request.channel,
            trade_id = %trade_id,
            "invoking sibling contract"
        );

        let response = self.invoker.invoke(&request);
        if !response.is_success() {
            return Err(FederationError::Failed {
                contract: request.contract,
                function: request.function,
                message: response.message,
            });
        }
        if response.payload.is_empty() {
            return Err(FederationError::EmptyPayload {
                contract: request.contract,
                function: request.function,
            });
        }
        serde_json::from_slice(&response.payload).map_err(|e| FederationError::Malformed {
            contract: request.contract,
            function: request.function,
            reason: e.to_string(),
        })
    }
}

impl std::fmt::Debug for FactFetcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactFetcher").finish_non_exhaustive()
    }
}
