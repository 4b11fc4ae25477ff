//! Built-in access tables for the two contract hosts.

use tfl_gate::AccessTable;
use tfl_types::roles;

use crate::registry::ops;

pub const EXPORTER_ORG: &str = "ExporterOrgMSP";
pub const IMPORTER_ORG: &str = "ImporterOrgMSP";
pub const REGULATOR_ORG: &str = "RegulatorOrgMSP";
pub const CARRIER_ORG: &str = "CarrierOrgMSP";

const LC_READS: [&str; 3] = [
    ops::EXISTS_LETTER_OF_CREDIT,
    ops::GET_LETTER_OF_CREDIT,
    ops::GET_LETTER_OF_CREDIT_STATUS,
];

const EL_READS: [&str; 3] = [
    ops::EXISTS_EXPORT_LICENSE,
    ops::GET_EXPORT_LICENSE,
    ops::GET_EXPORT_LICENSE_STATUS,
];

fn with(reads: &[&'static str], extra: &[&'static str]) -> Vec<&'static str> {
    extra.iter().chain(reads).copied().collect()
}

/// Default rules of the export-license host.
pub fn export_license_table() -> AccessTable {
    AccessTable::new()
        .allow(EXPORTER_ORG, roles::ANY, &[ops::INIT])
        .allow(REGULATOR_ORG, roles::ANY, &[ops::INIT])
        .allow(
            EXPORTER_ORG,
            roles::EXPORTER,
            &with(&EL_READS, &[ops::REQUEST_EXPORT_LICENSE]),
        )
        .allow(
            REGULATOR_ORG,
            roles::REGULATOR,
            &with(&EL_READS, &[ops::ISSUE_EXPORT_LICENSE]),
        )
}

/// Default rules of the letter-of-credit host.
pub fn letter_of_credit_table() -> AccessTable {
    AccessTable::new()
        .allow(IMPORTER_ORG, roles::ANY, &[ops::INIT])
        .allow(EXPORTER_ORG, roles::ANY, &[ops::INIT])
        .allow(
            IMPORTER_ORG,
            roles::IMPORTER_BANKER,
            &with(&LC_READS, &[ops::MAKE_PAYMENT, ops::ISSUE_LETTER_OF_CREDIT]),
        )
        .allow(
            EXPORTER_ORG,
            roles::EXPORTER_BANKER,
            &with(&LC_READS, &[ops::REQUEST_PAYMENT, ops::ACCEPT_LETTER_OF_CREDIT]),
        )
        .allow(
            IMPORTER_ORG,
            roles::IMPORTER,
            &with(
                &LC_READS,
                &[ops::REQUEST_LETTER_OF_CREDIT, ops::GET_ACCOUNT_BALANCE],
            ),
        )
        .allow(
            EXPORTER_ORG,
            roles::EXPORTER,
            &with(&LC_READS, &[ops::GET_ACCOUNT_BALANCE]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfl_gate::AclSubject;

    #[test]
    fn letter_of_credit_rows() {
        let table = letter_of_credit_table();
        assert_eq!(table.len(), 6);
        let banker = table
            .lookup(&AclSubject::new(IMPORTER_ORG, roles::IMPORTER_BANKER))
            .unwrap();
        assert!(banker.contains(ops::MAKE_PAYMENT));
        assert!(!banker.contains(ops::REQUEST_LETTER_OF_CREDIT));
        let exporter = table
            .lookup(&AclSubject::new(EXPORTER_ORG, roles::EXPORTER))
            .unwrap();
        assert_eq!(exporter.len(), 4);
    }

    #[test]
    fn export_license_rows() {
        let table = export_license_table();
        assert_eq!(table.len(), 4);
        let regulator = table
            .lookup(&AclSubject::new(REGULATOR_ORG, roles::REGULATOR))
            .unwrap();
        assert!(regulator.contains(ops::ISSUE_EXPORT_LICENSE));
        assert!(!regulator.contains(ops::REQUEST_EXPORT_LICENSE));
        assert!(table
            .lookup(&AclSubject::new(CARRIER_ORG, roles::ANY))
            .is_none());
    }

    #[test]
    fn presets_have_distinct_fingerprints() {
        assert_ne!(
            export_license_table().fingerprint(),
            letter_of_credit_table().fingerprint()
        );
    }
}
