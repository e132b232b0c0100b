use crate::bank::BankSource;
use crate::error::Error;
use crate::ledger::{Asset, Ledger};

use log::{info, warn};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAccountEntry {
    pub requisition_id: String,
    pub id: String,
    pub name: String,
    pub product: String,
    pub status: String,
    pub currency: String,
    /// Balance type to `"{amount} {currency}"`.
    pub balances: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct AccountReport {
    pub bank_accounts: Vec<BankAccountEntry>,
    pub assets: Vec<Asset>,
}

impl AccountReport {
    pub fn log(&self) {
        for account in self.bank_accounts.iter() {
            info!(
                "bank account id:{} name:{} product:{} status:{} currency:{} requisition:{} balances:{:?}",
                account.id,
                account.name,
                account.product,
                account.status,
                account.currency,
                account.requisition_id,
                account.balances
            );
        }
        for asset in self.assets.iter() {
            info!(
                "ledger asset id:{} name:{} institution:{} type:{} subtype:{} balance:{} currency:{}",
                asset.id,
                asset.display_name.as_deref().unwrap_or(&asset.name),
                asset.institution_name.as_deref().unwrap_or_default(),
                asset.type_name.as_deref().unwrap_or_default(),
                asset.subtype_name.as_deref().unwrap_or_default(),
                asset.balance,
                asset.currency
            );
        }
    }
}

/// Lists bank accounts of the requisitions and ledger assets, to help
/// writing the account mapping. Accounts whose details cannot be fetched
/// are skipped.
pub fn list_accounts(
    bank: &dyn BankSource,
    ledger: &dyn Ledger,
    requisition_ids: &[String],
) -> Result<AccountReport, Error> {
    let mut report = AccountReport::default();

    for requisition_id in requisition_ids {
        let requisition = bank
            .requisition(requisition_id)
            .map_err(|error| error.context(format!("list accounts of requisition {requisition_id}")))?;

        for account_id in requisition.accounts.iter() {
            let details = match bank.account_details(account_id) {
                Ok(details) => details,
                Err(error) => {
                    warn!("failed to fetch details for account {} : {}", account_id, error);
                    continue;
                }
            };
            let balances = match bank.account_balances(account_id) {
                Ok(balances) => balances,
                Err(error) => {
                    warn!("failed to fetch balances for account {} : {}", account_id, error);
                    continue;
                }
            };

            report.bank_accounts.push(BankAccountEntry {
                requisition_id: requisition_id.clone(),
                id: account_id.clone(),
                name: details.name,
                product: details.product,
                status: details.status,
                currency: details.currency,
                balances: balances
                    .iter()
                    .map(|balance| {
                        (
                            balance.balance_type.clone(),
                            format!(
                                "{:.2} {}",
                                balance.balance_amount.amount, balance.balance_amount.currency
                            ),
                        )
                    })
                    .collect(),
            });
        }
    }

    report.assets = ledger
        .assets()
        .map_err(|error| error.context("list ledger assets"))?;
    Ok(report)
}
