use std::fmt;

/// Errors that can occur during access checks.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The (organization, role) pair has no entry in the access table.
    #[error("unrecognized participant: {subject}")]
    UnrecognizedParticipant { subject: String },

    /// The participant is known but the operation is not in its allow-list.
    #[error("{subject} is not authorized to invoke '{operation}'")]
    Denied { subject: String, operation: String },

    /// The access table itself is malformed.
    #[error("invalid access table: {0}")]
    InvalidTable(String),
}

impl PartialEq for GateError {
    fn eq(&self, other: &Self) -> bool {
        // Compare by display representation for test convenience.
        fmt::format(format_args!("{self}")) == fmt::format(format_args!("{other}"))
    }
}

impl Eq for GateError {}
