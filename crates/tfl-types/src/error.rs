use thiserror::Error;

use crate::status::DocumentStatus;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("{kind} must not be empty")]
    EmptyIdentifier { kind: &'static str },

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("cannot move document from {from} to {to}")]
    InvalidTransition {
        from: DocumentStatus,
        to: DocumentStatus,
    },
}
