/// Errors from cross-contract invocations.
#[derive(Debug, thiserror::Error)]
pub enum FederationError {
    /// The remote contract answered with a non-success status.
    #[error("call to {contract}.{function} failed: {message}")]
    Failed {
        contract: String,
        function: String,
        message: String,
    },

    /// The remote contract succeeded but returned nothing.
    #[error("call to {contract}.{function} returned an empty payload")]
    EmptyPayload { contract: String, function: String },

    /// The payload could not be decoded into the expected fact.
    #[error("malformed payload from {contract}.{function}: {reason}")]
    Malformed {
        contract: String,
        function: String,
        reason: String,
    },
}

/// Result alias for federation operations.
pub type FederationResult<T> = Result<T, FederationError>;
