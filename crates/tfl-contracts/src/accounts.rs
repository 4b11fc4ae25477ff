use tfl_store::{Namespace, StateKey, Transaction};
use tfl_types::{BankAccount, OrganizationId};

use crate::error::{ContractError, ContractResult};

/// Per-organization balance records, stored under `Account/<org>`.
pub struct BankAccountLedger;

impl BankAccountLedger {
    fn key(owner: &OrganizationId) -> StateKey {
        StateKey::composite(Namespace::Account, owner.as_str())
    }

    /// Create or replace an account.
    pub fn open(txn: &mut Transaction<'_>, account: &BankAccount) -> ContractResult<()> {
        Self::update(txn, account)?;
        tracing::info!(
            organization = %account.owner,
            bank = %account.bank,
            balance = %account.balance,
            "bank account opened"
        );
        Ok(())
    }

    pub fn find(txn: &mut Transaction<'_>, owner: &OrganizationId) -> ContractResult<Option<BankAccount>> {
        Ok(txn.get_json(&Self::key(owner))?)
    }

    /// The account of `owner`; `NotFound` if none was opened.
    pub fn lookup(txn: &mut Transaction<'_>, owner: &OrganizationId) -> ContractResult<BankAccount> {
        Self::find(txn, owner)?.ok_or_else(|| {
            ContractError::NotFound(format!("No account recorded for organization '{owner}'"))
        })
    }

    pub fn update(txn: &mut Transaction<'_>, account: &BankAccount) -> ContractResult<()> {
        txn.put_json(Self::key(&account.owner), account)?;
        Ok(())
    }

    /// Remove an account. Returns `true` if it existed.
    pub fn close(txn: &mut Transaction<'_>, owner: &OrganizationId) -> ContractResult<bool> {
        let existed = txn.exists(&Self::key(owner))?;
        if existed {
            txn.delete(Self::key(owner));
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfl_store::{DocumentStore, InMemoryDocumentStore};
    use tfl_types::Decimal;

    fn account(org: &str, balance: i64) -> BankAccount {
        BankAccount::new(org.into(), "Bank", Decimal::from(balance))
    }

    #[test]
    fn open_lookup_update_close() {
        let store = InMemoryDocumentStore::new();
        let mut txn = Transaction::new(&store);
        let owner = OrganizationId::from("ImporterOrgMSP");

        BankAccountLedger::open(&mut txn, &account("ImporterOrgMSP", 100)).unwrap();
        let mut found = BankAccountLedger::lookup(&mut txn, &owner).unwrap();
        assert_eq!(found.balance, Decimal::from(100));

        found.debit(Decimal::from(40));
        BankAccountLedger::update(&mut txn, &found).unwrap();
        assert_eq!(
            BankAccountLedger::lookup(&mut txn, &owner).unwrap().balance,
            Decimal::from(60)
        );

        assert!(BankAccountLedger::close(&mut txn, &owner).unwrap());
        assert!(!BankAccountLedger::close(&mut txn, &owner).unwrap());
        assert!(BankAccountLedger::find(&mut txn, &owner).unwrap().is_none());
    }

    #[test]
    fn missing_account_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let mut txn = Transaction::new(&store);
        let err = BankAccountLedger::lookup(&mut txn, &"ExporterOrgMSP".into()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "not found: No account recorded for organization 'ExporterOrgMSP'"
        );
    }

    #[test]
    fn persisted_form_uses_owner_msp() {
        let store = InMemoryDocumentStore::new();
        let mut txn = Transaction::new(&store);
        BankAccountLedger::open(&mut txn, &account("ExporterOrgMSP", 5)).unwrap();
        txn.commit().unwrap();

        let key = StateKey::composite(Namespace::Account, "ExporterOrgMSP");
        let raw = store.get(&key).unwrap().unwrap().value;
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["ownerMSP"], "ExporterOrgMSP");
        assert_eq!(value["balance"], 5.0);
    }
}
