use std::fmt;

use serde::{Deserialize, Serialize};

/// Document namespaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Namespace {
    ExportLicense,
    LetterOfCredit,
    /// Cumulative amount paid per trade.
    Payment,
    /// Pending payment request markers.
    PaymentStatus,
    Account,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExportLicense => "ExportLicense",
            Self::LetterOfCredit => "LetterOfCredit",
            Self::Payment => "Payment",
            Self::PaymentStatus => "PaymentStatus",
            Self::Account => "Account",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a value in the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StateKey {
    /// A document keyed by namespace and id.
    Composite { namespace: Namespace, id: String },
    /// A flat deployment setting.
    Flat(String),
}

impl StateKey {
    pub fn composite(namespace: Namespace, id: impl Into<String>) -> Self {
        Self::Composite {
            namespace,
            id: id.into(),
        }
    }

    pub fn flat(name: impl Into<String>) -> Self {
        Self::Flat(name.into())
    }

    pub fn namespace(&self) -> Option<Namespace> {
        match self {
            Self::Composite { namespace, .. } => Some(*namespace),
            Self::Flat(_) => None,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Composite { namespace, id } => write!(f, "{namespace}/{id}"),
            Self::Flat(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_display() {
        let key = StateKey::composite(Namespace::LetterOfCredit, "trade-1");
        assert_eq!(key.to_string(), "LetterOfCredit/trade-1");
    }

    #[test]
    fn flat_and_composite_never_collide() {
        let flat = StateKey::flat("LetterOfCredit/trade-1");
        let composite = StateKey::composite(Namespace::LetterOfCredit, "trade-1");
        assert_eq!(flat.to_string(), composite.to_string());
        assert_ne!(flat, composite);
    }

    #[test]
    fn namespaces_separate_same_id() {
        let a = StateKey::composite(Namespace::Payment, "trade-1");
        let b = StateKey::composite(Namespace::PaymentStatus, "trade-1");
        assert_ne!(a, b);
        assert_eq!(a.namespace(), Some(Namespace::Payment));
        assert_eq!(StateKey::flat("x").namespace(), None);
    }
}
