use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Credential attribute carrying the caller's business role.
pub const BUSINESS_ROLE_ATTR: &str = "BUSINESS_ROLE";

/// Well-known business role names.
pub mod roles {
    /// Wildcard role assigned when the credential carries no role attribute.
    pub const ANY: &str = "any";
    pub const IMPORTER: &str = "importer";
    pub const IMPORTER_BANKER: &str = "importer_banker";
    pub const EXPORTER: &str = "exporter";
    pub const EXPORTER_BANKER: &str = "exporter_banker";
    pub const REGULATOR: &str = "regulator";
}

/// Verified identifier of a participating organization.
///
/// Every ownership check in the workflows compares `OrganizationId`s, never
/// raw strings, so a document field cannot accidentally be compared against
/// an unrelated piece of text.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(String);

impl OrganizationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrganizationId({})", self.0)
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrganizationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for OrganizationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Business role within an organization (e.g. "importer" vs "importer_banker").
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The wildcard role.
    pub fn any() -> Self {
        Self(roles::ANY.to_string())
    }

    /// Resolve an optional credential attribute; blank or absent means [`Role::any`].
    /// Any other value is kept verbatim so it must match an access rule exactly.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.trim().is_empty() => Self::new(v),
            _ => Self::any(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_any(&self) -> bool {
        self.0 == roles::ANY
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identity of the caller of a single invocation.
///
/// Recomputed on every call from the verified credential; never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    pub organization: OrganizationId,
    pub role: Role,
}

impl Identity {
    pub fn new(organization: impl Into<OrganizationId>, role: Option<&str>) -> Self {
        Self {
            organization: organization.into(),
            role: Role::from_attribute(role),
        }
    }

    /// Build an identity from the credential's attribute map.
    pub fn from_attributes(
        organization: impl Into<OrganizationId>,
        attributes: &BTreeMap<String, String>,
    ) -> Self {
        Self::new(
            organization,
            attributes.get(BUSINESS_ROLE_ATTR).map(String::as_str),
        )
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.organization, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_role_is_wildcard() {
        let id = Identity::new("ImporterOrgMSP", None);
        assert!(id.role.is_any());
        assert_eq!(id.role.as_str(), "any");
    }

    #[test]
    fn blank_role_is_wildcard() {
        assert!(Role::from_attribute(Some("   ")).is_any());
    }

    #[test]
    fn padded_role_is_kept_verbatim() {
        let role = Role::from_attribute(Some(" importer "));
        assert_eq!(role.as_str(), " importer ");
        assert_ne!(role, Role::new(roles::IMPORTER));
        assert!(!role.is_any());
    }

    #[test]
    fn role_read_from_business_attribute() {
        let mut attrs = BTreeMap::new();
        attrs.insert(BUSINESS_ROLE_ATTR.to_string(), "importer_banker".to_string());
        attrs.insert("hf.EnrollmentID".to_string(), "user1".to_string());
        let id = Identity::from_attributes("ImporterOrgMSP", &attrs);
        assert_eq!(id.role, Role::new(roles::IMPORTER_BANKER));
        assert_eq!(id.organization.as_str(), "ImporterOrgMSP");
    }

    #[test]
    fn organization_ids_compare_by_value() {
        assert_eq!(OrganizationId::from("ExporterOrgMSP"), OrganizationId::new("ExporterOrgMSP".to_string()));
        assert_ne!(OrganizationId::from("ExporterOrgMSP"), OrganizationId::from("ImporterOrgMSP"));
    }

    #[test]
    fn organization_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&OrganizationId::from("CarrierOrgMSP")).unwrap();
        assert_eq!(json, "\"CarrierOrgMSP\"");
    }

    #[test]
    fn identity_display() {
        let id = Identity::new("ExporterOrgMSP", Some("exporter"));
        assert_eq!(id.to_string(), "ExporterOrgMSP (exporter)");
    }
}
