use tfl_federation::FactRoute;
use tfl_store::{Namespace, StateKey};
use tfl_types::{DocumentStatus, ExportLicense, OrganizationId, TradeId, TradeStatus, Transition};

use crate::config::{ConfigKey, ExportLicenseSetup};
use crate::context::InvocationContext;
use crate::error::{ContractError, ContractResult};
use crate::registry::{exact, ops, trade_id};
use crate::response::{to_payload, StatusView};

/// Lifecycle of the export license: `REQUESTED -> ISSUED`.
///
/// Trade facts are read from the trade contract on the configured trade
/// channel.
pub struct ExportLicenseWorkflow;

impl ExportLicenseWorkflow {
    fn key(trade_id: &TradeId) -> StateKey {
        StateKey::composite(Namespace::ExportLicense, trade_id.as_str())
    }

    fn trade_route(ctx: &mut InvocationContext<'_>) -> ContractResult<FactRoute> {
        let channel = ctx.require_config(ConfigKey::TradeChannel)?;
        let contract = ctx.require_config(ConfigKey::TradeContractId)?;
        Ok(FactRoute::on_channel(contract, channel))
    }

    /// Record the deployment settings this contract depends on.
    pub fn init(ctx: &mut InvocationContext<'_>, setup: &ExportLicenseSetup) -> ContractResult<()> {
        let txn = ctx.txn();
        txn.put_string(ConfigKey::TradeChannel.state_key(), setup.trade_channel.as_str());
        txn.put_string(ConfigKey::TradeContractId.state_key(), setup.trade_contract_id.as_str());
        txn.put_string(ConfigKey::Carrier.state_key(), setup.carrier.as_str());
        txn.put_string(ConfigKey::Regulator.state_key(), setup.regulator.as_str());
        tracing::info!(
            trade_channel = %setup.trade_channel,
            trade_contract = %setup.trade_contract_id,
            carrier = %setup.carrier,
            regulator = %setup.regulator,
            "export license contract initialized"
        );
        Ok(())
    }

    pub fn exists(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<bool> {
        Ok(ctx.txn().exists(&Self::key(trade_id))?)
    }

    /// Request a license for an accepted trade. A repeated request replaces
    /// the stored document.
    pub fn request(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<ExportLicense> {
        let route = Self::trade_route(ctx)?;
        let trade = ctx.facts().fetch_trade(&route, trade_id)?;
        if trade.status != TradeStatus::Accepted {
            return Err(ContractError::StateConflict(format!(
                "'{trade_id}' is in '{}' state. Expected '{}'",
                trade.status,
                TradeStatus::Accepted
            )));
        }
        ctx.require_caller(&trade.exporter, trade_id, "exporter")?;

        let carrier = ctx.require_config(ConfigKey::Carrier)?;
        let approver = ctx.require_config(ConfigKey::Regulator)?;
        let license = ExportLicense::requested(
            trade.exporter,
            OrganizationId::new(carrier),
            trade.description_of_goods,
            OrganizationId::new(approver),
        );
        ctx.txn().put_json(Self::key(trade_id), &license)?;
        tracing::info!(trade_id = %trade_id, exporter = %license.exporter, "export license requested");
        Ok(license)
    }

    /// Issue the license. Only the regulator recorded at `init`, which must
    /// also be the document's approver, may do so.
    pub fn issue(
        ctx: &mut InvocationContext<'_>,
        trade_id: &TradeId,
        license_id: &str,
        expiration_date: &str,
    ) -> ContractResult<Transition> {
        let mut license = Self::load(ctx, trade_id)?;
        let regulator = OrganizationId::new(ctx.require_config(ConfigKey::Regulator)?);
        if license.approver != regulator {
            return Err(ContractError::Validation(format!(
                "Regulator recorded on ledger '{regulator}' does not match E/L approver '{}'",
                license.approver
            )));
        }
        ctx.require_caller(&regulator, trade_id, "regulator")?;

        let transition = license.issue(license_id, expiration_date);
        match transition {
            Transition::Applied => {
                ctx.txn().put_json(Self::key(trade_id), &license)?;
                tracing::info!(trade_id = %trade_id, license_id, "export license issued");
            }
            Transition::AlreadyApplied(_) => {
                tracing::info!(trade_id = %trade_id, "export license already issued");
            }
        }
        Ok(transition)
    }

    pub fn load(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<ExportLicense> {
        ctx.txn()
            .get_json(&Self::key(trade_id))?
            .ok_or_else(|| ContractError::NotFound(format!("No E/L recorded for trade '{trade_id}'")))
    }

    /// The stored document, byte for byte.
    pub fn get(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<Vec<u8>> {
        let raw = ctx.txn().get(&Self::key(trade_id))?;
        tracing::debug!(trade_id = %trade_id, found = raw.is_some(), "export license read");
        raw.ok_or_else(|| ContractError::NotFound(format!("No E/L recorded for trade '{trade_id}'")))
    }

    pub fn status(ctx: &mut InvocationContext<'_>, trade_id: &TradeId) -> ContractResult<DocumentStatus> {
        Ok(Self::load(ctx, trade_id)?.status)
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub(crate) fn handle_init(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [trade_channel, trade_contract_id, carrier, regulator] = exact(ops::INIT, args)?;
    let setup = ExportLicenseSetup {
        trade_channel: trade_channel.to_string(),
        trade_contract_id: trade_contract_id.to_string(),
        carrier: carrier.into(),
        regulator: regulator.into(),
    };
    ExportLicenseWorkflow::init(ctx, &setup)?;
    Ok(Vec::new())
}

pub(crate) fn handle_exists(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [id] = exact(ops::EXISTS_EXPORT_LICENSE, args)?;
    to_payload(&ExportLicenseWorkflow::exists(ctx, &trade_id(id)?)?)
}

pub(crate) fn handle_request(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [id] = exact(ops::REQUEST_EXPORT_LICENSE, args)?;
    ExportLicenseWorkflow::request(ctx, &trade_id(id)?)?;
    Ok(Vec::new())
}

pub(crate) fn handle_issue(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [id, license_id, expiration_date] = exact(ops::ISSUE_EXPORT_LICENSE, args)?;
    ExportLicenseWorkflow::issue(ctx, &trade_id(id)?, license_id, expiration_date)?;
    Ok(Vec::new())
}

pub(crate) fn handle_get(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [id] = exact(ops::GET_EXPORT_LICENSE, args)?;
    ExportLicenseWorkflow::get(ctx, &trade_id(id)?)
}

pub(crate) fn handle_status(ctx: &mut InvocationContext<'_>, args: &[&str]) -> ContractResult<Vec<u8>> {
    let [id] = exact(ops::GET_EXPORT_LICENSE_STATUS, args)?;
    let status = ExportLicenseWorkflow::status(ctx, &trade_id(id)?)?;
    to_payload(&StatusView { status })
}
