//! Access gate for the Trade Finance Ledger.
//!
//! Every contract operation passes through an [`AccessGate`] before it reads
//! or writes any state. The gate looks up the caller's exact
//! (organization, role) pair in an immutable [`AccessTable`] and allows the
//! call only if the operation is in that pair's allow-list.
//!
//! # Quick Start
//!
//! ```rust
//! use tfl_gate::{AccessGate, AccessTable};
//! use tfl_types::Identity;
//!
//! let table = AccessTable::new().allow("ImporterOrgMSP", "importer", &["requestLetterOfCredit"]);
//! let gate = AccessGate::new(table);
//! let caller = Identity::new("ImporterOrgMSP", Some("importer"));
//! assert!(gate.authorize(&caller, "requestLetterOfCredit").unwrap().is_allowed());
//! ```

pub mod error;
pub mod gate;
pub mod table;

pub use error::GateError;
pub use gate::{AccessDecision, AccessGate, GateResult};
pub use table::{AccessRule, AccessTable, AclSubject};

#[cfg(test)]
mod tests {
    use super::*;
    use tfl_types::{roles, Identity};

    fn table() -> AccessTable {
        AccessTable::new()
            .allow("ImporterOrgMSP", roles::ANY, &["init"])
            .allow(
                "ImporterOrgMSP",
                roles::IMPORTER,
                &["requestLetterOfCredit", "getAccountBalance"],
            )
            .allow("ImporterOrgMSP", roles::IMPORTER_BANKER, &["makePayment"])
    }

    // -----------------------------------------------------------------------
    // 1. Listed operation is allowed
    // -----------------------------------------------------------------------
    #[test]
    fn listed_operation_is_allowed() {
        let gate = AccessGate::new(table());
        let caller = Identity::new("ImporterOrgMSP", Some(roles::IMPORTER));
        let result = gate.authorize(&caller, "requestLetterOfCredit").unwrap();
        assert!(result.is_allowed());
        assert_eq!(result.table_hash, gate.table().fingerprint());
    }

    // -----------------------------------------------------------------------
    // 2. Known participant, unlisted operation is a rejection
    // -----------------------------------------------------------------------
    #[test]
    fn unlisted_operation_is_rejected() {
        let gate = AccessGate::new(table());
        let caller = Identity::new("ImporterOrgMSP", Some(roles::IMPORTER));
        let result = gate.authorize(&caller, "makePayment").unwrap();
        assert!(!result.is_allowed());
        assert!(matches!(result.decision, AccessDecision::Reject { .. }));
    }

    // -----------------------------------------------------------------------
    // 3. Unknown pair is an error, not a rejection
    // -----------------------------------------------------------------------
    #[test]
    fn unknown_pair_is_unrecognized() {
        let gate = AccessGate::new(table());
        let caller = Identity::new("ImporterOrgMSP", Some(roles::EXPORTER));
        let err = gate.authorize(&caller, "init").unwrap_err();
        assert!(matches!(err, GateError::UnrecognizedParticipant { .. }));
        assert!(err.to_string().contains("unrecognized participant"));

        let stranger = Identity::new("StrangerOrgMSP", None);
        assert!(gate.authorize(&stranger, "init").is_err());
    }

    // -----------------------------------------------------------------------
    // 4. Missing role resolves to the wildcard row
    // -----------------------------------------------------------------------
    #[test]
    fn missing_role_uses_wildcard_row() {
        let gate = AccessGate::new(table());
        let caller = Identity::new("ImporterOrgMSP", None);
        assert!(gate.authorize(&caller, "init").unwrap().is_allowed());
        assert!(!gate.authorize(&caller, "makePayment").unwrap().is_allowed());
    }

    // -----------------------------------------------------------------------
    // 5. Wildcard row does not match a concrete role
    // -----------------------------------------------------------------------
    #[test]
    fn wildcard_is_exact_match_only() {
        let gate = AccessGate::new(table());
        let banker = Identity::new("ImporterOrgMSP", Some(roles::IMPORTER_BANKER));
        assert!(!gate.authorize(&banker, "init").unwrap().is_allowed());
    }

    // -----------------------------------------------------------------------
    // 6. check() turns a rejection into Denied
    // -----------------------------------------------------------------------
    #[test]
    fn check_maps_rejection_to_error() {
        let gate = AccessGate::new(table());
        let caller = Identity::new("ImporterOrgMSP", Some(roles::IMPORTER_BANKER));
        assert!(gate.check(&caller, "makePayment").is_ok());
        let err = gate.check(&caller, "requestLetterOfCredit").unwrap_err();
        assert_eq!(
            err,
            GateError::Denied {
                subject: "MSP ID: ImporterOrgMSP, Role: importer_banker".into(),
                operation: "requestLetterOfCredit".into(),
            }
        );
    }

    // -----------------------------------------------------------------------
    // 7. Empty table recognizes nobody
    // -----------------------------------------------------------------------
    #[test]
    fn empty_table_recognizes_nobody() {
        let gate = AccessGate::new(AccessTable::new());
        let caller = Identity::new("ImporterOrgMSP", Some(roles::IMPORTER));
        assert!(gate.check(&caller, "getAccountBalance").is_err());
    }
}
