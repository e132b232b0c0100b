//! Payee resolution as an ordered list of rules, the first non-empty
//! answer wins.

use crate::bank::{Account, Transaction};

pub struct PayeeRule {
    pub name: &'static str,
    resolve: fn(&Transaction, &Account) -> Option<String>,
}

impl PayeeRule {
    pub fn apply(&self, transaction: &Transaction, account: &Account) -> Option<String> {
        (self.resolve)(transaction, account).filter(|payee| !payee.trim().is_empty())
    }
}

pub const PAYEE_RULES: [PayeeRule; 4] = [
    PayeeRule {
        name: "creditor",
        resolve: creditor,
    },
    PayeeRule {
        name: "debtor",
        resolve: debtor,
    },
    PayeeRule {
        name: "wallet owner",
        resolve: wallet_owner,
    },
    PayeeRule {
        name: "bank code",
        resolve: bank_code,
    },
];

fn creditor(transaction: &Transaction, _account: &Account) -> Option<String> {
    Some(transaction.creditor_name.clone())
}

fn debtor(transaction: &Transaction, _account: &Account) -> Option<String> {
    Some(transaction.debtor_name.clone())
}

// Top ups and transfers from e-wallets (PayPal and alike) move money
// between accounts of the same owner.
fn wallet_owner(transaction: &Transaction, account: &Account) -> Option<String> {
    let is_wallet_transfer = transaction.additional_information == "MONEY_TRANSFER"
        || transaction.proprietary_bank_transaction_code == "TOPUP";
    is_wallet_transfer.then(|| account.owner_name.clone())
}

fn bank_code(transaction: &Transaction, _account: &Account) -> Option<String> {
    let code = transaction.proprietary_bank_transaction_code.as_str();
    matches!(code, "EXCHANGE" | "TRANSFER").then(|| title_case(code))
}

fn title_case(value: &str) -> String {
    let lower = value.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn resolve_payee(transaction: &Transaction, account: &Account) -> Option<String> {
    PAYEE_RULES
        .iter()
        .find_map(|rule| rule.apply(transaction, account))
}
