use std::fmt;

use tfl_federation::FederationError;
use tfl_gate::GateError;
use tfl_store::StoreError;
use tfl_types::TypeError;

/// Discriminant of a [`ContractError`], for callers that dispatch on kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authorization,
    NotFound,
    StateConflict,
    Validation,
    Upstream,
    Store,
    Encoding,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authorization => "authorization",
            Self::NotFound => "not_found",
            Self::StateConflict => "state_conflict",
            Self::Validation => "validation",
            Self::Upstream => "upstream",
            Self::Store => "store",
            Self::Encoding => "encoding",
        };
        f.write_str(name)
    }
}

/// Errors returned by contract operations.
///
/// Any error aborts the invocation; its buffered writes are discarded.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// Unknown participant, operation not permitted, or document owned by
    /// another organization.
    #[error("authorization error: {0}")]
    Authorization(String),

    /// Missing document, account, configuration key, or operation.
    #[error("not found: {0}")]
    NotFound(String),

    /// The operation is not valid for the document's current status.
    #[error("state conflict: {0}")]
    StateConflict(String),

    /// Inputs or facts disagree, or a business limit was hit.
    #[error("validation error: {0}")]
    Validation(String),

    /// A sibling contract failed or returned an unusable payload.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The document store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A response payload could not be encoded or decoded.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::StateConflict(_) => ErrorKind::StateConflict,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Upstream(_) => ErrorKind::Upstream,
            Self::Store(_) => ErrorKind::Store,
            Self::Encoding(_) => ErrorKind::Encoding,
        }
    }
}

impl From<GateError> for ContractError {
    fn from(err: GateError) -> Self {
        Self::Authorization(err.to_string())
    }
}

impl From<FederationError> for ContractError {
    fn from(err: FederationError) -> Self {
        Self::Upstream(err.to_string())
    }
}

impl From<TypeError> for ContractError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidTransition { .. } => Self::StateConflict(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

/// Result alias for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;
