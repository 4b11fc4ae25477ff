use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tfl_types::{Identity, OrganizationId, Role};

use crate::error::GateError;

// ---------------------------------------------------------------------------
// AclSubject
// ---------------------------------------------------------------------------

/// The key of an access rule: an organization acting in a role.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AclSubject {
    pub organization: OrganizationId,
    pub role: Role,
}

impl AclSubject {
    pub fn new(organization: impl Into<OrganizationId>, role: impl Into<Role>) -> Self {
        Self {
            organization: organization.into(),
            role: role.into(),
        }
    }
}

impl From<&Identity> for AclSubject {
    fn from(identity: &Identity) -> Self {
        Self {
            organization: identity.organization.clone(),
            role: identity.role.clone(),
        }
    }
}

impl fmt::Display for AclSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MSP ID: {}, Role: {}", self.organization, self.role)
    }
}

// ---------------------------------------------------------------------------
// AccessRule
// ---------------------------------------------------------------------------

/// Serialized form of one table row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub organization: OrganizationId,
    pub role: Role,
    pub operations: Vec<String>,
}

// ---------------------------------------------------------------------------
// AccessTable
// ---------------------------------------------------------------------------

/// Immutable allow-list keyed by exact (organization, role) pairs.
///
/// There is no wildcard matching: a caller whose role resolved to `any` only
/// matches rows whose role is literally `any`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AccessRule>", into = "Vec<AccessRule>")]
pub struct AccessTable {
    rules: BTreeMap<AclSubject, BTreeSet<String>>,
}

impl AccessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: grant `operations` to `(organization, role)`. Repeated calls
    /// for the same subject extend its allow-list.
    pub fn allow(
        mut self,
        organization: impl Into<OrganizationId>,
        role: impl Into<Role>,
        operations: &[&str],
    ) -> Self {
        let subject = AclSubject::new(organization, role);
        self.rules
            .entry(subject)
            .or_default()
            .extend(operations.iter().map(|op| op.to_string()));
        self
    }

    /// Build a table from serialized rows. Each subject may appear once.
    pub fn from_rules(rules: Vec<AccessRule>) -> Result<Self, GateError> {
        let mut table = BTreeMap::new();
        for rule in rules {
            let subject = AclSubject::new(rule.organization, rule.role);
            if table.contains_key(&subject) {
                return Err(GateError::InvalidTable(format!(
                    "duplicate rule for {subject}"
                )));
            }
            table.insert(subject, rule.operations.into_iter().collect());
        }
        Ok(Self { rules: table })
    }

    /// Rows in canonical (sorted) order.
    pub fn rules(&self) -> Vec<AccessRule> {
        self.rules
            .iter()
            .map(|(subject, ops)| AccessRule {
                organization: subject.organization.clone(),
                role: subject.role.clone(),
                operations: ops.iter().cloned().collect(),
            })
            .collect()
    }

    /// The allow-list of a subject, or `None` if it is unknown.
    pub fn lookup(&self, subject: &AclSubject) -> Option<&BTreeSet<String>> {
        self.rules.get(subject)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// BLAKE3 digest of the canonical JSON rows, domain-separated.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"tfl-gate-acl-v1:");
        match serde_json::to_vec(&self.rules()) {
            Ok(data) => {
                hasher.update(&data);
                *hasher.finalize().as_bytes()
            }
            Err(_) => [0u8; 32],
        }
    }

    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.fingerprint())
    }
}

impl TryFrom<Vec<AccessRule>> for AccessTable {
    type Error = GateError;

    fn try_from(rules: Vec<AccessRule>) -> Result<Self, Self::Error> {
        Self::from_rules(rules)
    }
}

impl From<AccessTable> for Vec<AccessRule> {
    fn from(table: AccessTable) -> Self {
        table.rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_display() {
        let subject = AclSubject::new("ImporterOrgMSP", "importer");
        assert_eq!(subject.to_string(), "MSP ID: ImporterOrgMSP, Role: importer");
    }

    #[test]
    fn allow_merges_operations() {
        let table = AccessTable::new()
            .allow("Org1", "r", &["a"])
            .allow("Org1", "r", &["b", "a"]);
        let ops = table.lookup(&AclSubject::new("Org1", "r")).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn duplicate_rows_are_rejected() {
        let row = AccessRule {
            organization: "Org1".into(),
            role: "r".into(),
            operations: vec!["a".into()],
        };
        let err = AccessTable::from_rules(vec![row.clone(), row]).unwrap_err();
        assert!(matches!(err, GateError::InvalidTable(_)));
    }

    #[test]
    fn json_rows_round_trip() {
        let json = r#"[{"organization":"Org1","role":"any","operations":["init"]}]"#;
        let table: AccessTable = serde_json::from_str(json).unwrap();
        assert!(table.lookup(&AclSubject::new("Org1", Role::any())).is_some());
        assert_eq!(serde_json::to_string(&table).unwrap(), json);
    }

    #[test]
    fn fingerprint_ignores_insertion_order() {
        let a = AccessTable::new().allow("A", "x", &["1", "2"]).allow("B", "y", &["3"]);
        let b = AccessTable::new().allow("B", "y", &["3"]).allow("A", "x", &["2", "1"]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint_hex().len(), 64);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = AccessTable::new().allow("A", "x", &["1"]);
        let b = AccessTable::new().allow("A", "x", &["1", "2"]);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
