use crate::bank::Transaction;

use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use rust_decimal::RoundingStrategy;
use sha2::{Digest, Sha256};

// Midnight UTC rendering of a date, an unset date renders as year 1. Keys
// already stored in the ledger were built with this layout.
const UNSET_VALUE_DATE: &str = "0001-01-01 00:00:00 +0000 UTC";

fn key_date(transaction: &Transaction) -> String {
    transaction
        .value_date
        .map(|date| date.format("%Y-%m-%d 00:00:00 +0000 UTC").to_string())
        .unwrap_or_else(|| UNSET_VALUE_DATE.to_string())
}

/// Stable identifier for a source transaction that carries none. Hashes the
/// value date, amount, currency, counterparties and notes.
pub fn external_id(transaction: &Transaction, notes: &str) -> String {
    let amount = transaction
        .transaction_amount
        .amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let key = format!(
        "{}|{:.2}{}|{}|{}|{}",
        key_date(transaction),
        amount,
        transaction.transaction_amount.currency,
        transaction.creditor_name,
        transaction.debtor_name,
        notes
    );
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    URL_SAFE.encode(hasher.finalize())
}
