//! Ready-made hosts and sibling-contract facts for tests.

use std::sync::Arc;

use serde_json::{json, Value};
use tfl_federation::{StaticInvoker, GET_BILL_OF_LADING, GET_SHIPMENT_LOCATION, GET_TRADE};
use tfl_store::{InMemoryDocumentStore, Transaction};
use tfl_types::{roles, BankAccount, Decimal, Identity, TradeId};

use crate::accounts::BankAccountLedger;
use crate::acl::{CARRIER_ORG, EXPORTER_ORG, IMPORTER_ORG, REGULATOR_ORG};
use crate::host::{ContractHost, Response};
use crate::payment::PaymentSettlementEngine;
use crate::registry::ops;
use crate::ContractResult;

pub const TRADE: &str = "trade-1";
pub const TRADE_CONTRACT: &str = "trade";
pub const SHIPMENT_CONTRACT: &str = "shipment";
pub const TRADE_CHANNEL: &str = "tradechannel";
pub const SHIPPING_CHANNEL: &str = "shippingchannel";
pub const GOODS: &str = "Wood for Toys";

pub fn importer() -> Identity {
    Identity::new(IMPORTER_ORG, Some(roles::IMPORTER))
}

pub fn importer_banker() -> Identity {
    Identity::new(IMPORTER_ORG, Some(roles::IMPORTER_BANKER))
}

pub fn exporter() -> Identity {
    Identity::new(EXPORTER_ORG, Some(roles::EXPORTER))
}

pub fn exporter_banker() -> Identity {
    Identity::new(EXPORTER_ORG, Some(roles::EXPORTER_BANKER))
}

pub fn regulator() -> Identity {
    Identity::new(REGULATOR_ORG, Some(roles::REGULATOR))
}

/// Organization-level identity without a business role.
pub fn admin(org: &str) -> Identity {
    Identity::new(org, None)
}

pub fn trade_payload(amount: f64, status: &str) -> Value {
    json!({
        "tradeID": TRADE,
        "exporterMSP": EXPORTER_ORG,
        "importerMSP": IMPORTER_ORG,
        "amount": amount,
        "descriptionOfGoods": GOODS,
        "status": status
    })
}

pub fn bill_of_lading_payload(amount: f64) -> Value {
    json!({
        "id": "bl-1",
        "expirationDate": "12/31/2030",
        "exporterMSP": EXPORTER_ORG,
        "carrierMSP": CARRIER_ORG,
        "descriptionOfGoods": GOODS,
        "amount": amount,
        "beneficiary": IMPORTER_ORG,
        "sourcePort": "Mumbai",
        "destinationPort": "Rotterdam"
    })
}

/// Both contracts, each with its own state, sharing one set of siblings.
pub struct Fixture {
    pub invoker: Arc<StaticInvoker>,
    pub el_store: Arc<InMemoryDocumentStore>,
    pub lc_store: Arc<InMemoryDocumentStore>,
    pub el: ContractHost,
    pub lc: ContractHost,
}

impl Fixture {
    /// Hosts with no `init` run and no sibling facts registered.
    pub fn bare() -> Self {
        let invoker = Arc::new(StaticInvoker::new());
        let el_store = Arc::new(InMemoryDocumentStore::new());
        let lc_store = Arc::new(InMemoryDocumentStore::new());
        let el = ContractHost::export_license(el_store.clone(), invoker.clone());
        let lc = ContractHost::letter_of_credit(lc_store.clone(), invoker.clone());
        Self {
            invoker,
            el_store,
            lc_store,
            el,
            lc,
        }
    }

    /// Initialized hosts, an accepted trade of 50000.50, goods at the source,
    /// and a matching bill of lading. Importer balance 200000, exporter 100000.
    pub fn new() -> Self {
        let fixture = Self::bare();
        fixture
            .el
            .invoke(
                &admin(EXPORTER_ORG),
                ops::INIT,
                &[TRADE_CHANNEL, TRADE_CONTRACT, CARRIER_ORG, REGULATOR_ORG],
            )
            .unwrap();
        fixture
            .lc
            .invoke(
                &admin(IMPORTER_ORG),
                ops::INIT,
                &[
                    TRADE_CONTRACT,
                    SHIPPING_CHANNEL,
                    SHIPMENT_CONTRACT,
                    EXPORTER_ORG,
                    "ExporterBank",
                    "100000",
                    IMPORTER_ORG,
                    "ImporterBank",
                    "200000",
                ],
            )
            .unwrap();
        fixture.set_trade(50000.50, "ACCEPTED");
        fixture.set_location("SOURCE");
        fixture.set_bill_of_lading(bill_of_lading_payload(50000.50));
        fixture
    }

    pub fn set_trade(&self, amount: f64, status: &str) {
        self.invoker
            .respond_json(TRADE_CONTRACT, GET_TRADE, TRADE, &trade_payload(amount, status))
            .unwrap();
    }

    pub fn set_location(&self, location: &str) {
        self.invoker
            .respond_json(SHIPMENT_CONTRACT, GET_SHIPMENT_LOCATION, TRADE, &json!({ "Location": location }))
            .unwrap();
    }

    pub fn set_bill_of_lading(&self, payload: Value) {
        self.invoker
            .respond_json(SHIPMENT_CONTRACT, GET_BILL_OF_LADING, TRADE, &payload)
            .unwrap();
    }

    pub fn lc(&self, who: &Identity, operation: &str, args: &[&str]) -> ContractResult<Response> {
        self.lc.invoke(who, operation, args)
    }

    pub fn el(&self, who: &Identity, operation: &str, args: &[&str]) -> ContractResult<Response> {
        self.el.invoke(who, operation, args)
    }

    /// Request, issue, and accept the letter of credit.
    pub fn open_letter_of_credit(&self) {
        self.lc(&importer(), ops::REQUEST_LETTER_OF_CREDIT, &[TRADE]).unwrap();
        self.lc(
            &importer_banker(),
            ops::ISSUE_LETTER_OF_CREDIT,
            &[TRADE, "lc-1", "12/31/2030", "B/L", "E/L"],
        )
        .unwrap();
        self.lc(&exporter_banker(), ops::ACCEPT_LETTER_OF_CREDIT, &[TRADE]).unwrap();
    }

    pub fn balance(&self, who: &Identity) -> Decimal {
        self.lc(who, ops::GET_ACCOUNT_BALANCE, &[])
            .unwrap()
            .json::<crate::BalanceView>()
            .unwrap()
            .balance
    }

    /// Overwrite an account's balance directly in the letter-of-credit state.
    pub fn set_balance(&self, org: &str, bank: &str, balance: Decimal) {
        let mut txn = Transaction::new(self.lc_store.as_ref());
        BankAccountLedger::update(&mut txn, &BankAccount::new(org.into(), bank, balance)).unwrap();
        txn.commit().unwrap();
    }

    /// Cumulative amount paid for [`TRADE`], read straight from the store.
    pub fn paid(&self) -> Decimal {
        let mut txn = Transaction::new(self.lc_store.as_ref());
        PaymentSettlementEngine::paid_to_date(&mut txn, &TradeId::parse(TRADE).unwrap()).unwrap()
    }
}
