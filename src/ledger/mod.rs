//! Personal finance ledger, the destination side of a sync.

use crate::alias::Date;
use crate::error::Error;
use crate::normalize::{deserialize_amount, deserialize_null_default, serialize_option_balance};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

mod lunchmoney;
pub use lunchmoney::*;

/// Tag attached to every transaction pushed by this tool.
pub const SYNC_TAG: &str = "bank-ledger-sync";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Cleared,
    Uncleared,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Cleared => write!(f, "cleared"),
            TransactionStatus::Uncleared => write!(f, "uncleared"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub date: Date,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub payee: String,
    pub currency: String,
    pub asset_id: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    pub status: TransactionStatus,
    pub external_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub subtype_name: Option<String>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub balance: Decimal,
    #[serde(default)]
    pub balance_as_of: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub currency: String,
    #[serde(default)]
    pub institution_name: Option<String>,
}

/// Partial asset body, only the fields set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssetUpdate {
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_option_balance"
    )]
    pub balance: Option<Decimal>,
}

impl AssetUpdate {
    pub fn balance(amount: Decimal) -> Self {
        Self {
            balance: Some(amount),
        }
    }
}

pub trait Ledger {
    fn assets(&self) -> Result<Vec<Asset>, Error>;
    fn update_asset(&self, asset_id: i64, update: &AssetUpdate) -> Result<(), Error>;
    /// Returns the number of transactions actually inserted, duplicates are
    /// skipped by the ledger and not counted.
    fn insert_transactions(&self, transactions: &[Transaction]) -> Result<usize, Error>;
}
