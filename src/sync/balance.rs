use crate::bank::{Balance, BankSource};
use crate::error::Error;
use crate::ledger::{AssetUpdate, Ledger};

use log::info;
use rust_decimal::Decimal;

pub const SYNCED_BALANCE_TYPE: &str = "expected";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSyncReport {
    pub previous: Decimal,
    pub balance: Decimal,
    pub currency: String,
}

/// First `expected` balance in the asset currency. A balance in another
/// currency is never picked.
pub fn select_balance<'a>(balances: &'a [Balance], currency: &str) -> Option<&'a Balance> {
    balances.iter().find(|balance| {
        balance.balance_type == SYNCED_BALANCE_TYPE
            && balance
                .balance_amount
                .currency
                .eq_ignore_ascii_case(currency.trim())
    })
}

pub fn sync_balance(
    bank: &dyn BankSource,
    ledger: &dyn Ledger,
    account_id: &str,
    asset_id: i64,
) -> Result<BalanceSyncReport, Error> {
    let context = format!("sync balance of account {account_id} to asset {asset_id}");

    let assets = ledger.assets().map_err(|error| error.context(&context))?;
    let asset = assets
        .iter()
        .find(|asset| asset.id == asset_id)
        .ok_or_else(|| {
            Error::new_not_found(format!("unable to find asset {asset_id} in the ledger"))
                .context(&context)
        })?;

    let balances = bank
        .account_balances(account_id)
        .map_err(|error| error.context(&context))?;
    let balance = select_balance(&balances, &asset.currency).ok_or_else(|| {
        Error::new_not_found(format!(
            "no {} balance in {} among {} balances",
            SYNCED_BALANCE_TYPE,
            asset.currency,
            balances.len()
        ))
        .context(&context)
    })?;

    let amount = balance.balance_amount.amount;
    ledger
        .update_asset(asset_id, &AssetUpdate::balance(amount))
        .map_err(|error| error.context(&context))?;

    info!(
        "synced balance {} {} for account {} into asset {} (was {})",
        amount, balance.balance_amount.currency, account_id, asset_id, asset.balance
    );

    Ok(BalanceSyncReport {
        previous: asset.balance,
        balance: amount,
        currency: balance.balance_amount.currency.clone(),
    })
}
