use clap::{Parser, ValueEnum};
use env_logger::Builder;
use log::LevelFilter;
use log::{error, info};
use std::time::Duration;

mod alias;
mod bank;
mod chunk;
mod config;
mod convert;
mod error;
mod ledger;
mod normalize;
mod sync;

use bank::{BankSource, NORDIGEN_BASE_URL, NordigenClient};
use config::{AccountMapping, parse_mapping};
use ledger::{LUNCHMONEY_BASE_URL, Ledger, LunchmoneyClient};
use sync::{list_accounts, sync_balance, sync_transactions};

use error::Error;

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum RunMode {
    Auto,
    Sync,
    Report,
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_possible_value()
            .expect("no values are skipped")
            .get_name()
            .fmt(f)
    }
}

/// Sync bank transactions and balances into a personal finance ledger
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Nordigen secret id
    #[clap(long, env = "NORDIGEN_SECRET_ID", hide_env_values = true)]
    nordigen_secret_id: String,

    /// Nordigen secret key
    #[clap(long, env = "NORDIGEN_SECRET_KEY", hide_env_values = true)]
    nordigen_secret_key: String,

    /// Requisitions whose accounts are listed by the report
    #[clap(short, long, env = "NORDIGEN_REQUISITION_IDS", value_delimiter = ',')]
    requisition_ids: Vec<String>,

    /// Lunch Money access token
    #[clap(long, env = "LUNCHMONEY_ACCESS_TOKEN", hide_env_values = true)]
    lunchmoney_access_token: String,

    /// account:asset pairs to sync transactions for
    #[clap(short, long, env = "MAPPING", value_delimiter = ',', value_parser = parse_mapping)]
    mapping: Vec<AccountMapping>,

    /// account:asset pairs to sync the balance for
    #[clap(short, long, env = "BALANCE_MAPPING", value_delimiter = ',', value_parser = parse_mapping)]
    balance_mapping: Vec<AccountMapping>,

    /// request timeout in seconds
    #[clap(default_value_t = 60, short, long, env = "SYNC_TIMEOUT")]
    timeout: u64,

    /// run mode, auto prints the report when no mapping is set
    #[clap(default_value_t = RunMode::Auto, long, value_parser)]
    mode: RunMode,

    /// Nordigen api url
    #[clap(default_value = NORDIGEN_BASE_URL, long, env = "NORDIGEN_URL")]
    nordigen_url: String,

    /// Lunch Money api url
    #[clap(default_value = LUNCHMONEY_BASE_URL, long, env = "LUNCHMONEY_URL")]
    lunchmoney_url: String,
}

/// Syncs every mapped account. A failing account is logged and the next one
/// is processed; the first failure is returned at the end.
fn run_sync(
    bank: &dyn BankSource,
    ledger: &dyn Ledger,
    mapping: &[AccountMapping],
    balance_mapping: &[AccountMapping],
) -> Result<(), Error> {
    let mut failures = Vec::new();

    for item in mapping {
        match sync_transactions(bank, ledger, &item.account_id, item.asset_id) {
            Ok(report) => info!(
                "account {} done: fetched:{} submitted:{} inserted:{} chunks:{}",
                item.account_id, report.fetched, report.submitted, report.inserted, report.chunks
            ),
            Err(err) => {
                error!("{}", err);
                failures.push(err);
            }
        }
    }

    for item in balance_mapping {
        match sync_balance(bank, ledger, &item.account_id, item.asset_id) {
            Ok(report) => info!(
                "balance of account {} done: {} {}",
                item.account_id, report.balance, report.currency
            ),
            Err(err) => {
                error!("{}", err);
                failures.push(err);
            }
        }
    }

    let count = failures.len();
    match failures.into_iter().next() {
        Some(first) => Err(first.context(format!("{count} account sync(s) failed, first"))),
        None => Ok(()),
    }
}

fn main() -> Result<(), Error> {
    //
    // cli arg
    let args = Args::parse();

    //
    // logger
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Info);
    builder.parse_default_env();
    builder.init();

    //
    // clients
    let timeout = Duration::from_secs(args.timeout);
    let bank = NordigenClient::new(
        &args.nordigen_url,
        &args.nordigen_secret_id,
        &args.nordigen_secret_key,
        timeout,
    )?;
    let ledger = LunchmoneyClient::new(&args.lunchmoney_url, &args.lunchmoney_access_token, timeout)?;

    let report_only = match args.mode {
        RunMode::Auto => args.mapping.is_empty() && args.balance_mapping.is_empty(),
        RunMode::Report => true,
        RunMode::Sync => false,
    };

    //
    // account report
    if report_only {
        info!("no mapping requested, listing accounts");
        let report = list_accounts(&bank, &ledger, &args.requisition_ids)?;
        report.log();
        return Ok(());
    }

    //
    // sync
    run_sync(&bank, &ledger, &args.mapping, &args.balance_mapping)?;
    info!("sync done");

    Ok(())
}
