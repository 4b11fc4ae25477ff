use tfl_types::Identity;

use crate::error::GateError;
use crate::table::{AccessTable, AclSubject};

// ---------------------------------------------------------------------------
// AccessDecision / GateResult
// ---------------------------------------------------------------------------

/// Verdict for a known participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Reject { reason: String },
}

/// The outcome of an access check.
#[derive(Clone, Debug)]
pub struct GateResult {
    pub decision: AccessDecision,
    /// Fingerprint of the table that produced the decision.
    pub table_hash: [u8; 32],
    pub subject: AclSubject,
}

impl GateResult {
    pub fn is_allowed(&self) -> bool {
        self.decision == AccessDecision::Allow
    }
}

// ---------------------------------------------------------------------------
// AccessGate
// ---------------------------------------------------------------------------

/// Checks every invocation against an immutable [`AccessTable`].
///
/// The gate is pure: it reads nothing but its own table and has no side
/// effects beyond logging.
#[derive(Debug)]
pub struct AccessGate {
    table: AccessTable,
    table_hash: [u8; 32],
}

impl AccessGate {
    pub fn new(table: AccessTable) -> Self {
        let table_hash = table.fingerprint();
        tracing::info!(
            subjects = table.len(),
            fingerprint = %hex::encode(table_hash),
            "access gate ready"
        );
        Self { table, table_hash }
    }

    pub fn table(&self) -> &AccessTable {
        &self.table
    }

    pub fn table_hash(&self) -> [u8; 32] {
        self.table_hash
    }

    /// Decide whether `identity` may invoke `operation`.
    ///
    /// An identity whose (organization, role) pair is absent from the table
    /// is an error, not a rejection, so unknown principals are
    /// distinguishable from known-but-unauthorized ones.
    pub fn authorize(&self, identity: &Identity, operation: &str) -> Result<GateResult, GateError> {
        let subject = AclSubject::from(identity);
        let Some(allowed) = self.table.lookup(&subject) else {
            tracing::warn!(%subject, operation, "unrecognized participant");
            return Err(GateError::UnrecognizedParticipant {
                subject: subject.to_string(),
            });
        };

        let decision = if allowed.contains(operation) {
            AccessDecision::Allow
        } else {
            tracing::warn!(%subject, operation, "operation not permitted");
            AccessDecision::Reject {
                reason: format!("{subject} is not authorized to invoke '{operation}'"),
            }
        };

        Ok(GateResult {
            decision,
            table_hash: self.table_hash,
            subject,
        })
    }

    /// Like [`Self::authorize`], but a rejection is also an error.
    pub fn check(&self, identity: &Identity, operation: &str) -> Result<GateResult, GateError> {
        let result = self.authorize(identity, operation)?;
        match &result.decision {
            AccessDecision::Allow => Ok(result),
            AccessDecision::Reject { .. } => Err(GateError::Denied {
                subject: result.subject.to_string(),
                operation: operation.to_string(),
            }),
        }
    }
}
