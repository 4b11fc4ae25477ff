use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use serde::Serialize;

use crate::error::{FederationError, FederationResult};
use crate::invoker::{ContractInvoker, InvocationRequest, InvocationResponse};

type CallKey = (String, String, String);

/// In-memory stand-in for sibling contracts.
///
/// Answers are keyed by (contract, function, first argument). Unregistered
/// calls fail. Every request is recorded so callers can assert on routing.
#[derive(Default)]
pub struct StaticInvoker {
    responses: RwLock<HashMap<CallKey, InvocationResponse>>,
    calls: Mutex<Vec<InvocationRequest>>,
}

impl StaticInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(contract: &str, function: &str, arg: &str) -> CallKey {
        (contract.to_string(), function.to_string(), arg.to_string())
    }

    /// Register a raw response.
    pub fn respond(&self, contract: &str, function: &str, arg: &str, response: InvocationResponse) {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(Self::key(contract, function, arg), response);
    }

    /// Register a successful response carrying `value` as JSON.
    pub fn respond_json<T: Serialize>(
        &self,
        contract: &str,
        function: &str,
        arg: &str,
        value: &T,
    ) -> FederationResult<()> {
        let payload = serde_json::to_vec(value).map_err(|e| FederationError::Malformed {
            contract: contract.to_string(),
            function: function.to_string(),
            reason: e.to_string(),
        })?;
        self.respond(contract, function, arg, InvocationResponse::success(payload));
        Ok(())
    }

    /// Register a failure response.
    pub fn fail(&self, contract: &str, function: &str, arg: &str, message: &str) {
        self.respond(contract, function, arg, InvocationResponse::failure(message));
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<InvocationRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ContractInvoker for StaticInvoker {
    fn invoke(&self, request: &InvocationRequest) -> InvocationResponse {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let arg = request.args.first().map(String::as_str).unwrap_or_default();
        let key = Self::key(&request.contract, &request.function, arg);
        self.responses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                InvocationResponse::failure(format!(
                    "no response registered for {}.{}({arg})",
                    request.contract, request.function
                ))
            })
    }
}

impl std::fmt::Debug for StaticInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self
            .responses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("StaticInvoker")
            .field("response_count", &count)
            .finish()
    }
}
