use serde::{Deserialize, Serialize};

/// A synchronous call into another contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub contract: String,
    pub function: String,
    pub args: Vec<String>,
    /// Logical channel to invoke on; `None` means the caller's own channel.
    pub channel: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationStatus {
    Success,
    Failure,
}

/// What the remote contract answered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub status: InvocationStatus,
    pub message: String,
    pub payload: Vec<u8>,
}

impl InvocationResponse {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: InvocationStatus::Success,
            message: String::new(),
            payload,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: InvocationStatus::Failure,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == InvocationStatus::Success
    }
}

/// Transport to sibling contracts.
///
/// Implementations block until the remote side answers. There is no retry
/// or timeout at this layer; a failure is terminal for the invocation.
pub trait ContractInvoker: Send + Sync {
    fn invoke(&self, request: &InvocationRequest) -> InvocationResponse;
}
