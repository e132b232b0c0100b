//! In-memory bank and ledger used by the sync tests.

use crate::bank::{Account, Balance, BankSource, Requisition, Transaction, Transactions};
use crate::error::Error;
use crate::ledger::{self, Asset, AssetUpdate, Ledger};

use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Default)]
pub struct FakeBank {
    pub accounts: HashMap<String, Account>,
    pub balances: HashMap<String, Vec<Balance>>,
    pub transactions: HashMap<String, Transactions>,
    pub requisitions: HashMap<String, Requisition>,
}

fn not_found(what: &str, id: &str) -> Error {
    Error::new_remote(Some(404), format!("{what} {id} not found"))
}

impl BankSource for FakeBank {
    fn account_details(&self, account_id: &str) -> Result<Account, Error> {
        self.accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| not_found("account", account_id))
    }

    fn account_balances(&self, account_id: &str) -> Result<Vec<Balance>, Error> {
        self.balances
            .get(account_id)
            .cloned()
            .ok_or_else(|| not_found("balances", account_id))
    }

    fn transactions(&self, account_id: &str) -> Result<Transactions, Error> {
        self.transactions
            .get(account_id)
            .cloned()
            .ok_or_else(|| not_found("transactions", account_id))
    }

    fn requisition(&self, requisition_id: &str) -> Result<Requisition, Error> {
        self.requisitions
            .get(requisition_id)
            .cloned()
            .ok_or_else(|| not_found("requisition", requisition_id))
    }
}

#[derive(Default)]
pub struct FakeLedger {
    pub assets: Vec<Asset>,
    /// Ledger side duplicate detection on the external id.
    pub known_ids: RefCell<Vec<String>>,
    pub inserted: RefCell<Vec<Vec<ledger::Transaction>>>,
    pub updates: RefCell<Vec<(i64, AssetUpdate)>>,
    /// Insert call (0 based) that fails with an error list.
    pub fail_on_insert: Option<usize>,
}

impl Ledger for FakeLedger {
    fn assets(&self) -> Result<Vec<Asset>, Error> {
        Ok(self.assets.clone())
    }

    fn update_asset(&self, asset_id: i64, update: &AssetUpdate) -> Result<(), Error> {
        self.updates.borrow_mut().push((asset_id, update.clone()));
        Ok(())
    }

    fn insert_transactions(&self, transactions: &[ledger::Transaction]) -> Result<usize, Error> {
        let call = self.inserted.borrow().len();
        self.inserted.borrow_mut().push(transactions.to_vec());
        if self.fail_on_insert == Some(call) {
            return Err(Error::new_remote(
                Some(200),
                "insert transactions: received 1 errors: \"Invalid asset_id\"",
            ));
        }
        let mut known_ids = self.known_ids.borrow_mut();
        let mut inserted = 0;
        for transaction in transactions {
            if !known_ids.contains(&transaction.external_id) {
                known_ids.push(transaction.external_id.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

pub fn make_transaction_(id: &str, amount: &str) -> Transaction {
    serde_json::from_value(json!({
        "transactionId": id,
        "transactionAmount": {"amount": amount, "currency": "EUR"},
        "debtorName": "Acme",
        "valueDate": "2024-01-05"
    }))
    .unwrap()
}

pub fn make_balance_(balance_type: &str, amount: &str, currency: &str) -> Balance {
    serde_json::from_value(json!({
        "balanceAmount": {"amount": amount, "currency": currency},
        "balanceType": balance_type,
        "referenceDate": "2024-01-05"
    }))
    .unwrap()
}

pub fn make_asset_(id: i64, currency: &str, balance: Decimal) -> Asset {
    let value: Value = json!({
        "id": id,
        "name": format!("asset {id}"),
        "balance": balance.to_string(),
        "currency": currency,
    });
    serde_json::from_value(value).unwrap()
}
