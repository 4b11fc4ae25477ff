use tfl_federation::FactFetcher;
use tfl_store::Transaction;
use tfl_types::{Identity, OrganizationId, TradeId};

use crate::config::ConfigKey;
use crate::error::{ContractError, ContractResult};

/// Everything a handler may touch during one invocation.
///
/// The caller's identity is fixed for the life of the context. State access
/// goes through the buffered [`Transaction`]; sibling-contract facts go
/// through the [`FactFetcher`].
///
/// Contexts are only built by [`crate::ContractHost::invoke`], after the
/// access gate has admitted the caller, so the typed workflow entry points
/// cannot be reached without passing the gate:
///
/// ```compile_fail
/// use tfl_contracts::InvocationContext;
/// use tfl_federation::{FactFetcher, StaticInvoker};
/// use tfl_store::{InMemoryDocumentStore, Transaction};
/// use tfl_types::Identity;
///
/// let store = InMemoryDocumentStore::new();
/// let invoker = StaticInvoker::new();
/// let _ctx = InvocationContext::new(
///     Identity::new("ImporterOrgMSP", Some("auditor")),
///     Transaction::new(&store),
///     FactFetcher::new(&invoker),
/// );
/// ```
pub struct InvocationContext<'a> {
    identity: Identity,
    txn: Transaction<'a>,
    facts: FactFetcher<'a>,
}

impl<'a> InvocationContext<'a> {
    pub(crate) fn new(identity: Identity, txn: Transaction<'a>, facts: FactFetcher<'a>) -> Self {
        Self {
            identity,
            txn,
            facts,
        }
    }

    /// The calling organization.
    pub fn caller(&self) -> &OrganizationId {
        &self.identity.organization
    }

    pub fn txn(&mut self) -> &mut Transaction<'a> {
        &mut self.txn
    }

    pub fn facts(&self) -> FactFetcher<'a> {
        self.facts
    }

    /// A configuration value recorded by `init`, or `None` if absent or empty.
    pub fn config(&mut self, key: ConfigKey) -> ContractResult<Option<String>> {
        Ok(self.txn.get_string(&key.state_key())?)
    }

    /// Like [`Self::config`], but absence is a `NotFound` error.
    pub fn require_config(&mut self, key: ConfigKey) -> ContractResult<String> {
        self.config(key)?
            .ok_or_else(|| ContractError::NotFound(format!("No {} recorded on ledger", key.describe())))
    }

    /// Fail with `Authorization` unless the caller is `owner`, the `party`
    /// of the trade (exporter, importer, regulator).
    pub fn require_caller(
        &self,
        owner: &OrganizationId,
        trade_id: &TradeId,
        party: &str,
    ) -> ContractResult<()> {
        if self.caller() == owner {
            Ok(())
        } else {
            Err(ContractError::Authorization(format!(
                "'{trade_id}' does not belong to {party} {}",
                self.caller()
            )))
        }
    }

    pub(crate) fn into_transaction(self) -> Transaction<'a> {
        self.txn
    }
}

impl std::fmt::Debug for InvocationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationContext")
            .field("identity", &self.identity)
            .field("txn", &self.txn)
            .finish()
    }
}
