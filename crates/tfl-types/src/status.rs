use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a trade document.
///
/// Export licenses move `Requested -> Issued`; letters of credit move
/// `Requested -> Issued -> Accepted`. There are no backward transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    Requested,
    Issued,
    Accepted,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Issued => "ISSUED",
            Self::Accepted => "ACCEPTED",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of applying a status transition to a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The document changed and must be persisted.
    Applied,
    /// The document was already at or past the target status; nothing changed.
    AlreadyApplied(DocumentStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&DocumentStatus::Requested).unwrap(), "\"REQUESTED\"");
        assert_eq!(serde_json::to_string(&DocumentStatus::Issued).unwrap(), "\"ISSUED\"");
        let parsed: DocumentStatus = serde_json::from_str("\"ACCEPTED\"").unwrap();
        assert_eq!(parsed, DocumentStatus::Accepted);
    }

    #[test]
    fn ordering_follows_lifecycle() {
        assert!(DocumentStatus::Requested < DocumentStatus::Issued);
        assert!(DocumentStatus::Issued < DocumentStatus::Accepted);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(DocumentStatus::Issued.to_string(), "ISSUED");
    }
}
