use std::collections::BTreeMap;

use tfl_types::TradeId;

use crate::context::InvocationContext;
use crate::error::{ContractError, ContractResult};
use crate::{export_license, letter_of_credit, payment};

/// Operation names as they appear in access tables and on the wire.
pub mod ops {
    pub const INIT: &str = "init";

    pub const REQUEST_EXPORT_LICENSE: &str = "requestExportLicense";
    pub const ISSUE_EXPORT_LICENSE: &str = "issueExportLicense";
    pub const EXISTS_EXPORT_LICENSE: &str = "existsExportLicense";
    pub const GET_EXPORT_LICENSE: &str = "getExportLicense";
    pub const GET_EXPORT_LICENSE_STATUS: &str = "getExportLicenseStatus";

    pub const REQUEST_LETTER_OF_CREDIT: &str = "requestLetterOfCredit";
    pub const ISSUE_LETTER_OF_CREDIT: &str = "issueLetterOfCredit";
    pub const ACCEPT_LETTER_OF_CREDIT: &str = "acceptLetterOfCredit";
    pub const EXISTS_LETTER_OF_CREDIT: &str = "existsLetterOfCredit";
    pub const GET_LETTER_OF_CREDIT: &str = "getLetterOfCredit";
    pub const GET_LETTER_OF_CREDIT_STATUS: &str = "getLetterOfCreditStatus";

    pub const REQUEST_PAYMENT: &str = "requestPayment";
    pub const MAKE_PAYMENT: &str = "makePayment";
    pub const GET_ACCOUNT_BALANCE: &str = "getAccountBalance";
}

/// A string-dispatched operation. Returns the response payload.
pub type Handler = fn(&mut InvocationContext<'_>, &[&str]) -> ContractResult<Vec<u8>>;

/// Exactly `N` arguments, or a `Validation` error naming the operation.
pub(crate) fn exact<'a, const N: usize>(operation: &str, args: &[&'a str]) -> ContractResult<[&'a str; N]> {
    <[&str; N]>::try_from(args).map_err(|_| {
        ContractError::Validation(format!(
            "'{operation}' expects {N} argument(s), got {}",
            args.len()
        ))
    })
}

pub(crate) fn trade_id(raw: &str) -> ContractResult<TradeId> {
    Ok(TradeId::parse(raw)?)
}

/// Explicit operation-name to handler table, built once per host.
#[derive(Clone)]
pub struct OperationRegistry {
    contract: &'static str,
    handlers: BTreeMap<&'static str, Handler>,
}

impl OperationRegistry {
    pub fn new(contract: &'static str) -> Self {
        Self {
            contract,
            handlers: BTreeMap::new(),
        }
    }

    /// Register `handler` under `operation`, replacing any previous entry.
    pub fn register(mut self, operation: &'static str, handler: Handler) -> Self {
        self.handlers.insert(operation, handler);
        self
    }

    pub fn contract(&self) -> &'static str {
        self.contract
    }

    pub fn get(&self, operation: &str) -> Option<Handler> {
        self.handlers.get(operation).copied()
    }

    /// Registered operation names in sorted order.
    pub fn operations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    pub fn export_license() -> Self {
        Self::new("ExportLicenseContract")
            .register(ops::INIT, export_license::handle_init)
            .register(ops::EXISTS_EXPORT_LICENSE, export_license::handle_exists)
            .register(ops::REQUEST_EXPORT_LICENSE, export_license::handle_request)
            .register(ops::ISSUE_EXPORT_LICENSE, export_license::handle_issue)
            .register(ops::GET_EXPORT_LICENSE, export_license::handle_get)
            .register(ops::GET_EXPORT_LICENSE_STATUS, export_license::handle_status)
    }

    pub fn letter_of_credit() -> Self {
        Self::new("LetterOfCreditContract")
            .register(ops::INIT, letter_of_credit::handle_init)
            .register(ops::EXISTS_LETTER_OF_CREDIT, letter_of_credit::handle_exists)
            .register(ops::REQUEST_LETTER_OF_CREDIT, letter_of_credit::handle_request)
            .register(ops::ISSUE_LETTER_OF_CREDIT, letter_of_credit::handle_issue)
            .register(ops::ACCEPT_LETTER_OF_CREDIT, letter_of_credit::handle_accept)
            .register(ops::GET_LETTER_OF_CREDIT, letter_of_credit::handle_get)
            .register(ops::GET_LETTER_OF_CREDIT_STATUS, letter_of_credit::handle_status)
            .register(ops::REQUEST_PAYMENT, payment::handle_request_payment)
            .register(ops::MAKE_PAYMENT, payment::handle_make_payment)
            .register(ops::GET_ACCOUNT_BALANCE, letter_of_credit::handle_account_balance)
    }
}

impl std::fmt::Debug for OperationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationRegistry")
            .field("contract", &self.contract)
            .field("operations", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl;
    use crate::error::ErrorKind;

    #[test]
    fn exact_checks_arity() {
        let [a, b] = exact::<2>("op", &["x", "y"]).unwrap();
        assert_eq!((a, b), ("x", "y"));
        let err = exact::<1>("op", &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("'op' expects 1 argument(s), got 0"));
    }

    #[test]
    fn blank_trade_id_is_validation() {
        assert_eq!(trade_id("  ").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(trade_id("trade-1").unwrap().as_str(), "trade-1");
    }

    #[test]
    fn every_acl_operation_has_a_handler() {
        let pairs = [
            (OperationRegistry::export_license(), acl::export_license_table()),
            (OperationRegistry::letter_of_credit(), acl::letter_of_credit_table()),
        ];
        for (registry, table) in pairs {
            for rule in table.rules() {
                for op in rule.operations {
                    assert!(registry.get(&op).is_some(), "{} lacks {op}", registry.contract());
                }
            }
        }
    }

    #[test]
    fn registries_are_disjoint_except_init() {
        let el: Vec<_> = OperationRegistry::export_license().operations().collect();
        let lc = OperationRegistry::letter_of_credit();
        let shared: Vec<_> = el.into_iter().filter(|op| lc.get(op).is_some()).collect();
        assert_eq!(shared, vec![ops::INIT]);
    }
}
