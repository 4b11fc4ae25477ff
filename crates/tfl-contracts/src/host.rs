use std::sync::Arc;

use serde::de::DeserializeOwned;
use tfl_federation::{ContractInvoker, FactFetcher};
use tfl_gate::{AccessGate, AccessTable};
use tfl_store::{DocumentStore, Transaction};
use tfl_types::Identity;

use crate::acl;
use crate::config::{ConfigError, DeploymentConfig};
use crate::context::InvocationContext;
use crate::error::{ContractError, ContractResult};
use crate::registry::OperationRegistry;

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Result of a successful invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    /// JSON payload; empty for operations that return nothing.
    pub payload: Vec<u8>,
    /// Number of keys written by the committed transaction.
    pub writes: usize,
}

impl Response {
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn json<T: DeserializeOwned>(&self) -> ContractResult<T> {
        serde_json::from_slice(&self.payload)
            .map_err(|e| ContractError::Encoding(format!("cannot decode response: {e}")))
    }
}

// ---------------------------------------------------------------------------
// ContractHost
// ---------------------------------------------------------------------------

/// One deployed contract: an access gate, an operation registry, and the
/// state and sibling contracts it runs against.
///
/// Each [`ContractHost::invoke`] is one unit of work. The gate runs first;
/// the handler's writes are buffered in a [`Transaction`] that is committed
/// only if the handler succeeds.
pub struct ContractHost {
    registry: OperationRegistry,
    gate: AccessGate,
    store: Arc<dyn DocumentStore>,
    invoker: Arc<dyn ContractInvoker>,
}

impl ContractHost {
    pub fn new(
        registry: OperationRegistry,
        table: AccessTable,
        store: Arc<dyn DocumentStore>,
        invoker: Arc<dyn ContractInvoker>,
    ) -> Self {
        Self {
            registry,
            gate: AccessGate::new(table),
            store,
            invoker,
        }
    }

    /// Export-license contract with the built-in access table.
    pub fn export_license(store: Arc<dyn DocumentStore>, invoker: Arc<dyn ContractInvoker>) -> Self {
        Self::new(
            OperationRegistry::export_license(),
            acl::export_license_table(),
            store,
            invoker,
        )
    }

    /// Letter-of-credit contract with the built-in access table.
    pub fn letter_of_credit(store: Arc<dyn DocumentStore>, invoker: Arc<dyn ContractInvoker>) -> Self {
        Self::new(
            OperationRegistry::letter_of_credit(),
            acl::letter_of_credit_table(),
            store,
            invoker,
        )
    }

    /// Export-license contract using the deployment's access rules.
    pub fn export_license_for(
        config: &DeploymentConfig,
        store: Arc<dyn DocumentStore>,
        invoker: Arc<dyn ContractInvoker>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            OperationRegistry::export_license(),
            config.export_license_acl()?,
            store,
            invoker,
        ))
    }

    /// Letter-of-credit contract using the deployment's access rules.
    pub fn letter_of_credit_for(
        config: &DeploymentConfig,
        store: Arc<dyn DocumentStore>,
        invoker: Arc<dyn ContractInvoker>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            OperationRegistry::letter_of_credit(),
            config.letter_of_credit_acl()?,
            store,
            invoker,
        ))
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Run `operation` on behalf of `identity`.
    pub fn invoke(&self, identity: &Identity, operation: &str, args: &[&str]) -> ContractResult<Response> {
        self.gate.check(identity, operation)?;
        let handler = self.registry.get(operation).ok_or_else(|| {
            ContractError::NotFound(format!(
                "operation '{operation}' is not defined on {}",
                self.registry.contract()
            ))
        })?;

        let txn = Transaction::new(self.store.as_ref());
        let facts = FactFetcher::new(self.invoker.as_ref());
        let mut ctx = InvocationContext::new(identity.clone(), txn, facts);

        let payload = handler(&mut ctx, args).inspect_err(|e| {
            tracing::debug!(
                contract = self.registry.contract(),
                operation,
                caller = %identity,
                kind = %e.kind(),
                error = %e,
                "invocation aborted"
            );
        })?;
        let summary = ctx.into_transaction().commit()?;
        tracing::debug!(
            contract = self.registry.contract(),
            operation,
            caller = %identity,
            writes = summary.writes,
            "invocation committed"
        );
        Ok(Response {
            payload,
            writes: summary.writes,
        })
    }
}

impl std::fmt::Debug for ContractHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractHost")
            .field("registry", &self.registry)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
