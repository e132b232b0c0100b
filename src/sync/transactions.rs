use crate::bank::{Account, BankSource, Transactions};
use crate::chunk::{MAX_TRANSACTIONS_PER_REQUEST, chunk};
use crate::convert::map_transaction;
use crate::error::Error;
use crate::ledger::{self, Ledger, TransactionStatus};

use log::{debug, info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransactionSyncReport {
    pub fetched: usize,
    pub submitted: usize,
    pub inserted: usize,
    pub chunks: usize,
}

/// Booked transactions are cleared, pending ones uncleared. The first
/// record that fails to convert aborts the whole list.
pub fn map_transactions(
    account: &Account,
    transactions: &Transactions,
    asset_id: i64,
) -> Result<Vec<ledger::Transaction>, Error> {
    let booked = transactions
        .booked
        .iter()
        .map(|transaction| (transaction, TransactionStatus::Cleared));
    let pending = transactions
        .pending
        .iter()
        .map(|transaction| (transaction, TransactionStatus::Uncleared));

    booked
        .chain(pending)
        .map(|(transaction, status)| {
            map_transaction(transaction, account, asset_id, status).map_err(|error| {
                error.context(format!(
                    "convert {} transaction {}",
                    status,
                    transaction.id().unwrap_or("without id")
                ))
            })
        })
        .collect()
}

pub fn sync_transactions(
    bank: &dyn BankSource,
    ledger: &dyn Ledger,
    account_id: &str,
    asset_id: i64,
) -> Result<TransactionSyncReport, Error> {
    let context = format!("sync transactions of account {account_id} to asset {asset_id}");

    let account = bank
        .account_details(account_id)
        .map_err(|error| error.context(&context))?;
    let transactions = bank
        .transactions(account_id)
        .map_err(|error| error.context(&context))?;
    info!(
        "fetched {} transactions ({} booked, {} pending) for account {}",
        transactions.len(),
        transactions.booked.len(),
        transactions.pending.len(),
        account_id
    );

    let prepared = map_transactions(&account, &transactions, asset_id)
        .map_err(|error| error.context(&context))?;
    for transaction in prepared.iter() {
        debug!("prepared transaction {:?}", transaction);
    }

    let mut report = TransactionSyncReport {
        fetched: transactions.len(),
        ..Default::default()
    };
    for batch in chunk(&prepared, MAX_TRANSACTIONS_PER_REQUEST) {
        let inserted = ledger
            .insert_transactions(batch)
            .map_err(|error| error.context(&context))?;
        if inserted < batch.len() {
            warn!(
                "ledger skipped {} of {} transactions as duplicates for account {}",
                batch.len() - inserted,
                batch.len(),
                account_id
            );
        }
        info!(
            "inserted {} transactions out of {} for account {} into asset {}",
            inserted,
            batch.len(),
            account_id,
            asset_id
        );
        report.chunks += 1;
        report.submitted += batch.len();
        report.inserted += inserted;
    }

    Ok(report)
}
