use std::str::FromStr;

use rust_decimal::Decimal;
use tfl_federation::FactRoute;
use tfl_store::{Namespace, StateKey};
use tfl_types::{
    BankAccount, DocumentStatus, LetterOfCredit, TradeFact, TradeId, TradeStatus, Transition,
    TypeError,
};

use crate::accounts::BankAccountLedger;
use crate::config::{AccountSetup, ConfigKey, LetterOfCreditSetup};
use crate::context::InvocationContext;
use crate::error::{ContractError, ContractResult};
use crate::registry::{exact, ops, trade_id};
use crate::response::{to_payload, BalanceView, StatusView};

/// Lifecycle of the letter of credit: `REQUESTED -> ISSUED -> ACCEPTED`.
///
/// Trade facts come from the trade contract on the caller's own channel;
/// shipment facts come from the shipment contract on the shipping channel.
pub struct LetterOfCreditWorkflow;

impl LetterOfCreditWorkflow {
    fn key(trade_id: &TradeId) -> StateKey {
        StateKey::composite(Namespace::LetterOfCredit, trade_id.as_str())
    }

    pub(crate) fn fetch_trade(
        ctx: &mut InvocationContext<'_>,
        trade_id: &TradeId,
    ) -> ContractResult<TradeFact> {
        let route = FactRoute::local(ctx.require_config(ConfigKey::TradeContractId)?);
        Ok(ctx.facts().fetch_trade(&route, trade_id)?)
    }

    pub(crate) fn shipping_route(ctx: &mut InvocationContext<'_>) -> ContractResult<FactRoute> {
        let contract = ctx.require_config(ConfigKey::ShipmentContractId)?;
        let channel = ctx.require_config(ConfigKey::ShippingChannel)?;
        Ok(FactRoute::on_channel(contract, channel))
    }

    /// Record routing settings and open both bank accounts.
    pub fn init(ctx: &mut InvocationContext<'_>, setup: &LetterOfCreditSetup) -> ContractResult<()> {
        let txn = ctx.txn();
        txn.put_string(ConfigKey::TradeContractId.state_key(), setup.trade_contract_id.as_str());
        txn.put_string(ConfigKey::ShippingChannel.state_key(), setup.shipping_channel.as_str());
        txn.put_string(ConfigKey::ShipmentContractId.state_key(), setup.shipment_contract_id.as_str());
        for party in [&setup.exporter, &setup.importer] {
            let account = BankAccount::new(party.organization.clone(), party.bank.as_str(), party.balance);
            BankAccountLedger::open(txn, &account)?;
        }
        tracing::info!(
            trade_contract = %setup.trade_contract_id,
            shipping_channel = %setup.shipping_channel,
            shipment_contract = %setup.shipment_contract_id,
            "letter of credit contract initialized"
        );
        Ok(())
    }

    pub fn exists(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<bool> {
        Ok(ctx.txn().exists(&Self::key(trade_id))?)
    }

    /// Request a letter of credit for an accepted trade. The importer's
    /// balance must cover the trade amount. A repeated request replaces the
    /// stored document.
    pub fn request(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<LetterOfCredit> {
        let trade = Self::fetch_trade(ctx, trade_id)?;
        if trade.status != TradeStatus::Accepted {
            return Err(ContractError::StateConflict(format!(
                "'{trade_id}' is in '{}' state. Expected '{}'",
                trade.status,
                TradeStatus::Accepted
            )));
        }
        ctx.require_caller(&trade.importer, trade_id, "importer")?;

        let importer = BankAccountLedger::lookup(ctx.txn(), &trade.importer)?;
        if trade.amount > importer.balance {
            return Err(ContractError::Validation(format!(
                "'{trade_id}' requires amount {:.2} but importer balance is only {:.2}",
                trade.amount, importer.balance
            )));
        }

        let lc = LetterOfCredit::requested(trade.exporter, trade.amount);
        ctx.txn().put_json(Self::key(trade_id), &lc)?;
        tracing::info!(trade_id = %trade_id, amount = %lc.amount, "letter of credit requested");
        Ok(lc)
    }

    /// Issue the letter of credit on behalf of the trade's importer. An empty
    /// `doc_types` keeps the documents already recorded.
    pub fn issue(
        ctx: &mut InvocationContext<'_>,
        trade_id: &TradeId,
        lc_id: &str,
        expiration_date: &str,
        doc_types: &[&str],
    ) -> ContractResult<Transition> {
        let mut lc = Self::load(ctx, trade_id)?;
        let trade = Self::fetch_trade(ctx, trade_id)?;
        ctx.require_caller(&trade.importer, trade_id, "importer")?;

        let transition = lc.issue(lc_id, expiration_date, doc_types);
        match transition {
            Transition::Applied => {
                ctx.txn().put_json(Self::key(trade_id), &lc)?;
                tracing::info!(trade_id = %trade_id, lc_id, documents = lc.documents.len(), "letter of credit issued");
            }
            Transition::AlreadyApplied(status) => {
                tracing::info!(trade_id = %trade_id, %status, "letter of credit already issued");
            }
        }
        Ok(transition)
    }

    /// Accept an issued letter of credit on behalf of the trade's exporter.
    pub fn accept(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<Transition> {
        let mut lc = Self::load(ctx, trade_id)?;
        let trade = Self::fetch_trade(ctx, trade_id)?;
        ctx.require_caller(&trade.exporter, trade_id, "exporter")?;

        let transition = lc.accept().map_err(|e| match e {
            TypeError::InvalidTransition { .. } => {
                ContractError::StateConflict(format!("L/C for trade '{trade_id}' has not been issued"))
            }
            other => other.into(),
        })?;
        match transition {
            Transition::Applied => {
                ctx.txn().put_json(Self::key(trade_id), &lc)?;
                tracing::info!(trade_id = %trade_id, "letter of credit accepted");
            }
            Transition::AlreadyApplied(_) => {
                tracing::info!(trade_id = %trade_id, "letter of credit already accepted");
            }
        }
        Ok(transition)
    }

    pub fn load(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<LetterOfCredit> {
        ctx.txn()
            .get_json(&Self::key(trade_id))?
            .ok_or_else(|| ContractError::NotFound(format!("No L/C recorded for trade '{trade_id}'")))
    }

    /// The stored document, byte for byte.
    pub fn get(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<Vec<u8>> {
        let raw = ctx.txn().get(&Self::key(trade_id))?;
        tracing::debug!(trade_id = %trade_id, found = raw.is_some(), "letter of credit read");
        raw.ok_or_else(|| ContractError::NotFound(format!("No L/C recorded for trade '{trade_id}'")))
    }

    pub fn status(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<DocumentStatus> {
        Ok(Self::load(ctx, trade_id)?.status)
    }

    /// Balance of the caller's own account.
    pub fn account_balance(ctx: &mut InvocationContext<'_>) -> ContractResult<Decimal> {
        let owner = ctx.caller().clone();
        Ok(BankAccountLedger::lookup(ctx.txn(), &owner)?.balance)
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

fn balance_arg(raw: &str) -> ContractResult<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|_| TypeError::InvalidAmount(raw.to_string()).into())
}

pub(crate) fn handle_init(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [
        trade_contract_id,
        shipping_channel,
        shipment_contract_id,
        exporter,
        exporter_bank,
        exporter_balance,
        importer,
        importer_bank,
        importer_balance,
    ] = exact(ops::INIT, args)?;
    let setup = LetterOfCreditSetup {
        trade_contract_id: trade_contract_id.to_string(),
        shipping_channel: shipping_channel.to_string(),
        shipment_contract_id: shipment_contract_id.to_string(),
        exporter: AccountSetup {
            organization: exporter.into(),
            bank: exporter_bank.to_string(),
            balance: balance_arg(exporter_balance)?,
        },
        importer: AccountSetup {
            organization: importer.into(),
            bank: importer_bank.to_string(),
            balance: balance_arg(importer_balance)?,
        },
    };
    LetterOfCreditWorkflow::init(ctx, &setup)?;
    Ok(Vec::new())
}

pub(crate) fn handle_exists(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [id] = exact(ops::EXISTS_LETTER_OF_CREDIT, args)?;
    to_payload(&LetterOfCreditWorkflow::exists(ctx, &trade_id(id)?)?)
}

pub(crate) fn handle_request(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [id] = exact(ops::REQUEST_LETTER_OF_CREDIT, args)?;
    LetterOfCreditWorkflow::request(ctx, &trade_id(id)?)?;
    Ok(Vec::new())
}

pub(crate) fn handle_issue(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [id, lc_id, expiration_date, doc_types @ ..] = args else {
        return Err(ContractError::Validation(format!(
            "'{}' expects at least 3 arguments, got {}",
            ops::ISSUE_LETTER_OF_CREDIT,
            args.len()
        )));
    };
    LetterOfCreditWorkflow::issue(ctx, &trade_id(id)?, lc_id, expiration_date, doc_types)?;
    Ok(Vec::new())
}

pub(crate) fn handle_accept(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [id] = exact(ops::ACCEPT_LETTER_OF_CREDIT, args)?;
    LetterOfCreditWorkflow::accept(ctx, &trade_id(id)?)?;
    Ok(Vec::new())
}

pub(crate) fn handle_get(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [id] = exact(ops::GET_LETTER_OF_CREDIT, args)?;
    LetterOfCreditWorkflow::get(ctx, &trade_id(id)?)
}

pub(crate) fn handle_status(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [id] = exact(ops::GET_LETTER_OF_CREDIT_STATUS, args)?;
    let status = LetterOfCreditWorkflow::status(ctx, &trade_id(id)?)?;
    to_payload(&StatusView { status })
}

pub(crate) fn handle_account_balance(
    ctx: &mut InvocationContext<'_>,
    args: &[&str],
) -> ContractResult<Vec<u8>> {
    let [] = exact(ops::GET_ACCOUNT_BALANCE, args)?;
    let balance = LetterOfCreditWorkflow::account_balance(ctx)?;
    to_payload(&BalanceView { balance })
}
