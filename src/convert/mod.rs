//! Conversion of bank transactions into ledger transactions.

mod external_id;
mod payee;

pub use external_id::*;
pub use payee::*;

use crate::bank::{Account, Transaction};
use crate::error::Error;
use crate::ledger::{self, SYNC_TAG, TransactionStatus};

fn notes(transaction: &Transaction) -> String {
    if !transaction.remittance_information_unstructured.is_empty() {
        transaction.remittance_information_unstructured.clone()
    } else {
        transaction
            .remittance_information_unstructured_array
            .join("; ")
    }
}

/// Converts one bank transaction. The result is either fully valid or
/// rejected with the offending field, it is never patched up.
pub fn map_transaction(
    transaction: &Transaction,
    account: &Account,
    asset_id: i64,
    status: TransactionStatus,
) -> Result<ledger::Transaction, Error> {
    let payee = resolve_payee(transaction, account).unwrap_or_default();
    let date = transaction.value_date.or(transaction.booking_date);
    let notes = notes(transaction);
    let currency = transaction.transaction_amount.currency.trim().to_lowercase();
    let external_id = match transaction.id() {
        Some(id) => id.to_string(),
        None => external_id(transaction, &notes),
    };
    let amount = transaction.transaction_amount.amount;

    let reject = |field: &'static str| Error::new_validation(field, external_id.as_str());
    if asset_id <= 0 {
        return Err(reject("asset_id"));
    }
    if amount.is_zero() {
        return Err(reject("amount"));
    }
    if currency.is_empty() {
        return Err(reject("currency"));
    }
    let date = date.ok_or_else(|| reject("date"))?;
    if payee.is_empty() {
        return Err(reject("payee"));
    }
    if external_id.is_empty() {
        return Err(reject("external_id"));
    }

    Ok(ledger::Transaction {
        date,
        amount,
        payee,
        currency,
        asset_id,
        notes,
        status,
        external_id,
        tags: vec![SYNC_TAG.to_string()],
    })
}
