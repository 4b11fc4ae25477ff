use std::str::FromStr;

use rust_decimal::Decimal;
use tfl_store::{Namespace, StateKey, StoreError, Transaction};
use tfl_types::{DocumentStatus, ShipmentLocation, TradeId};

use crate::accounts::BankAccountLedger;
use crate::context::InvocationContext;
use crate::error::{ContractError, ContractResult};
use crate::letter_of_credit::LetterOfCreditWorkflow;
use crate::registry::{exact, ops, trade_id};

/// Outcome of [`PaymentSettlementEngine::request_payment`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentRequest {
    /// A new request marker was written.
    Recorded,
    /// A request was already pending; nothing changed.
    AlreadyPending,
}

/// A completed transfer from importer to exporter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub location: ShipmentLocation,
    pub obligation: Decimal,
    /// Cumulative amount paid after this settlement.
    pub paid_to_date: Decimal,
}

/// Milestone payments: half when goods leave the source, the remainder once
/// they reach the destination.
///
/// A pending request is a marker under `PaymentStatus/<trade>`; the running
/// total is a decimal string under `Payment/<trade>`.
pub struct PaymentSettlementEngine;

impl PaymentSettlementEngine {
    fn marker_key(trade_id: &TradeId) -> StateKey {
        StateKey::composite(Namespace::PaymentStatus, trade_id.as_str())
    }

    fn record_key(trade_id: &TradeId) -> StateKey {
        StateKey::composite(Namespace::Payment, trade_id.as_str())
    }

    /// Cumulative amount paid for a trade. Absent or empty state is zero.
    pub fn paid_to_date(txn: &mut Transaction<'_>, trade_id: &TradeId) -> ContractResult<Decimal> {
        let key = Self::record_key(trade_id);
        match txn.get_string(&key)? {
            None => Ok(Decimal::ZERO),
            Some(raw) => Decimal::from_str(raw.trim()).map_err(|e| {
                StoreError::Serialization {
                    key: key.to_string(),
                    reason: e.to_string(),
                }
                .into()
            }),
        }
    }

    /// Amount due at a milestone.
    pub fn compute_obligation(location: ShipmentLocation, trade_amount: Decimal, paid: Decimal) -> Decimal {
        match location {
            ShipmentLocation::Source => trade_amount / Decimal::TWO,
            ShipmentLocation::Destination => trade_amount - paid,
        }
    }

    fn fetch_location(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<ShipmentLocation> {
        let route = LetterOfCreditWorkflow::shipping_route(ctx)?;
        Ok(ctx.facts().fetch_shipment_location(&route, trade_id)?)
    }

    /// Record the exporter's request to be paid for the current milestone.
    ///
    /// Idempotent while a request is pending. The bill of lading must agree
    /// with the trade on exporter, goods, amount, and beneficiary.
    pub fn request_payment(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<PaymentRequest> {
        let marker = Self::marker_key(trade_id);
        if ctx.txn().exists(&marker)? {
            tracing::info!(trade_id = %trade_id, "payment request already pending");
            return Ok(PaymentRequest::AlreadyPending);
        }

        let location = Self::fetch_location(ctx, trade_id)?;
        let trade = LetterOfCreditWorkflow::fetch_trade(ctx, trade_id)?;
        ctx.require_caller(&trade.exporter, trade_id, "exporter")?;

        let paid = Self::paid_to_date(ctx.txn(), trade_id)?;
        if paid >= trade.amount {
            return Err(ContractError::Validation(format!(
                "Payment for '{trade_id}' already made in full: {:.2}",
                trade.amount
            )));
        }

        let route = LetterOfCreditWorkflow::shipping_route(ctx)?;
        let bl = ctx.facts().fetch_bill_of_lading(&route, trade_id)?;
        if bl.exporter != trade.exporter {
            return Err(ContractError::Validation(format!(
                "'{trade_id}' exporter {} does not match B/L exporter {}",
                trade.exporter, bl.exporter
            )));
        }
        if bl.description_of_goods != trade.description_of_goods {
            return Err(ContractError::Validation(format!(
                "'{trade_id}' goods {} don't match B/L goods {}",
                trade.description_of_goods, bl.description_of_goods
            )));
        }
        if bl.amount != trade.amount {
            return Err(ContractError::Validation(format!(
                "'{trade_id}' amount {:.2} does not match B/L amount {:.2}",
                trade.amount, bl.amount
            )));
        }
        if bl.beneficiary != trade.importer {
            return Err(ContractError::Validation(format!(
                "'{trade_id}' importer {} does not match B/L importer {}",
                trade.importer, bl.beneficiary
            )));
        }

        if location == ShipmentLocation::Source && paid > Decimal::ZERO {
            return Err(ContractError::Validation(format!(
                "Shipment for '{trade_id}' still at source location and partial amount has already been paid"
            )));
        }

        ctx.txn().put_string(marker, DocumentStatus::Requested.as_str());
        tracing::info!(trade_id = %trade_id, %location, paid = %paid, "payment requested");
        Ok(PaymentRequest::Recorded)
    }

    /// Settle the pending request: move the milestone obligation from the
    /// importer's account to the exporter's and clear the marker.
    ///
    /// The shipment location is read again here, so the obligation follows
    /// where the goods are now rather than where they were at request time.
    pub fn make_payment(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<Settlement> {
        let marker = Self::marker_key(trade_id);
        if !ctx.txn().exists(&marker)? {
            return Err(ContractError::NotFound(format!(
                "No payment request recorded for '{trade_id}'"
            )));
        }

        let location = Self::fetch_location(ctx, trade_id)?;
        let trade = LetterOfCreditWorkflow::fetch_trade(ctx, trade_id)?;
        ctx.require_caller(&trade.importer, trade_id, "importer")?;

        let paid = Self::paid_to_date(ctx.txn(), trade_id)?;
        let obligation = Self::compute_obligation(location, trade.amount, paid).normalize();
        if obligation <= Decimal::ZERO {
            return Err(ContractError::Validation(format!(
                "Payment for '{trade_id}' already made in full: {:.2}",
                trade.amount
            )));
        }
        let paid_to_date = (paid + obligation).normalize();
        if paid_to_date > trade.amount {
            return Err(ContractError::Validation(format!(
                "'{trade_id}' payment of {obligation:.2} would bring total paid to {paid_to_date:.2}, above trade amount {:.2}",
                trade.amount
            )));
        }

        let txn = ctx.txn();
        let mut importer = BankAccountLedger::lookup(txn, &trade.importer)?;
        let mut exporter = BankAccountLedger::lookup(txn, &trade.exporter)?;
        importer.debit(obligation);
        exporter.credit(obligation);
        BankAccountLedger::update(txn, &importer)?;
        BankAccountLedger::update(txn, &exporter)?;
        txn.put_string(Self::record_key(trade_id), paid_to_date.to_string());
        txn.delete(marker);

        tracing::info!(
            trade_id = %trade_id,
            %location,
            obligation = %obligation,
            paid_to_date = %paid_to_date,
            "payment settled"
        );
        Ok(Settlement {
            location,
            obligation,
            paid_to_date,
        })
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub(crate) fn handle_request_payment(
    ctx: &mut InvocationContext<'_>,
    args: &[&str],
) -> ContractResult<Vec<u8>> {
    let [id] = exact(ops::REQUEST_PAYMENT, args)?;
    PaymentSettlementEngine::request_payment(ctx, &trade_id(id)?)?;
    Ok(Vec::new())
}

pub(crate) fn handle_make_payment(
    ctx: &mut InvocationContext<'_>,
    args: &[&str],
) -> ContractResult<Vec<u8>> {
    let [id] = exact(ops::MAKE_PAYMENT, args)?;
    PaymentSettlementEngine::make_payment(ctx, &trade_id(id)?)?;
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn source_obligation_is_half() {
        let due = PaymentSettlementEngine::compute_obligation(ShipmentLocation::Source, dec("50000.50"), Decimal::ZERO);
        assert_eq!(due, dec("25000.25"));
    }

    #[test]
    fn destination_obligation_is_remainder() {
        let due = PaymentSettlementEngine::compute_obligation(
            ShipmentLocation::Destination,
            dec("50000.50"),
            dec("25000.25"),
        );
        assert_eq!(due, dec("25000.25"));
        let full = PaymentSettlementEngine::compute_obligation(ShipmentLocation::Destination, dec("100"), Decimal::ZERO);
        assert_eq!(full, dec("100"));
    }

    #[test]
    fn normalized_half_keeps_two_decimals() {
        let due = PaymentSettlementEngine::compute_obligation(ShipmentLocation::Source, dec("50000.50"), Decimal::ZERO);
        assert_eq!(due.to_string(), "25000.250");
        assert_eq!(due.normalize().to_string(), "25000.25");
    }

    #[test]
    fn odd_cents_split_exactly() {
        let due = PaymentSettlementEngine::compute_obligation(ShipmentLocation::Source, dec("0.01"), Decimal::ZERO);
        assert_eq!(due + due, dec("0.01"));
    }
}
