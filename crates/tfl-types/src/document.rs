use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::identity::OrganizationId;
use crate::status::{DocumentStatus, Transition};

// ---------------------------------------------------------------------------
// ExportLicense
// ---------------------------------------------------------------------------

/// Regulatory approval required before goods may be exported.
///
/// Created in `Requested` status with an empty id and expiration date; the
/// approving authority fills both in when it issues the license.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportLicense {
    pub id: String,
    pub expiration_date: String,
    pub exporter: OrganizationId,
    pub carrier: OrganizationId,
    pub description_of_goods: String,
    pub approver: OrganizationId,
    pub status: DocumentStatus,
}

impl ExportLicense {
    /// A freshly requested license.
    pub fn requested(
        exporter: OrganizationId,
        carrier: OrganizationId,
        description_of_goods: impl Into<String>,
        approver: OrganizationId,
    ) -> Self {
        Self {
            id: String::new(),
            expiration_date: String::new(),
            exporter,
            carrier,
            description_of_goods: description_of_goods.into(),
            approver,
            status: DocumentStatus::Requested,
        }
    }

    /// Issue the license. Re-issuing an issued license changes nothing.
    pub fn issue(&mut self, id: &str, expiration_date: &str) -> Transition {
        if self.status >= DocumentStatus::Issued {
            return Transition::AlreadyApplied(self.status);
        }
        self.id = id.to_string();
        self.expiration_date = expiration_date.to_string();
        self.status = DocumentStatus::Issued;
        Transition::Applied
    }
}

// ---------------------------------------------------------------------------
// LetterOfCredit
// ---------------------------------------------------------------------------

/// A document the beneficiary must present to draw on a letter of credit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcDocument {
    #[serde(rename = "docType")]
    pub doc_type: String,
}

impl LcDocument {
    pub fn new(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: doc_type.into(),
        }
    }
}

/// Letter of credit guaranteeing payment of a trade to its exporter.
///
/// `amount` is fixed to the trade amount at request time and never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterOfCredit {
    pub id: String,
    pub expiration_date: String,
    pub beneficiary: OrganizationId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub documents: Vec<LcDocument>,
    pub status: DocumentStatus,
}

impl LetterOfCredit {
    /// A freshly requested letter of credit with no required documents.
    pub fn requested(beneficiary: OrganizationId, amount: Decimal) -> Self {
        Self {
            id: String::new(),
            expiration_date: String::new(),
            beneficiary,
            amount,
            documents: Vec::new(),
            status: DocumentStatus::Requested,
        }
    }

    /// Issue the letter of credit.
    ///
    /// An empty `doc_types` list keeps whatever documents are already
    /// recorded. Issued or accepted letters are left untouched.
    pub fn issue(&mut self, id: &str, expiration_date: &str, doc_types: &[&str]) -> Transition {
        if self.status >= DocumentStatus::Issued {
            return Transition::AlreadyApplied(self.status);
        }
        self.id = id.to_string();
        self.expiration_date = expiration_date.to_string();
        if !doc_types.is_empty() {
            self.documents = doc_types.iter().map(|d| LcDocument::new(*d)).collect();
        }
        self.status = DocumentStatus::Issued;
        Transition::Applied
    }

    /// Accept an issued letter of credit.
    pub fn accept(&mut self) -> Result<Transition, TypeError> {
        match self.status {
            DocumentStatus::Accepted => Ok(Transition::AlreadyApplied(self.status)),
            DocumentStatus::Requested => Err(TypeError::InvalidTransition {
                from: DocumentStatus::Requested,
                to: DocumentStatus::Accepted,
            }),
            DocumentStatus::Issued => {
                self.status = DocumentStatus::Accepted;
                Ok(Transition::Applied)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// BankAccount
// ---------------------------------------------------------------------------

/// Balance record of one organization.
///
/// The owner is persisted as `ownerMSP` so records written by existing
/// deployments still decode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    #[serde(rename = "ownerMSP")]
    pub owner: OrganizationId,
    pub bank: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl BankAccount {
    pub fn new(owner: OrganizationId, bank: impl Into<String>, balance: Decimal) -> Self {
        Self {
            owner,
            bank: bank.into(),
            balance,
        }
    }

    pub fn debit(&mut self, amount: Decimal) {
        self.balance -= amount;
    }

    pub fn credit(&mut self, amount: Decimal) {
        self.balance += amount;
    }
}
