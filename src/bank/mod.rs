//! Bank account data, the source side of a sync.

use crate::alias::Date;
use crate::error::Error;
use crate::normalize::{
    deserialize_amount, deserialize_null_default, deserialize_one_or_many,
    deserialize_option_amount, deserialize_option_date,
};

use rust_decimal::Decimal;
use serde::Deserialize;

mod nordigen;
pub use nordigen::*;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub resource_id: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub currency: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub owner_name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub product: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub cash_account_type: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub iban: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Amount {
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub balance_amount: Amount,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub balance_type: String,
    #[serde(default)]
    pub last_change_date_time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_date")]
    pub reference_date: Option<Date>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyExchange {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub source_currency: String,
    #[serde(default, deserialize_with = "deserialize_option_amount")]
    pub exchange_rate: Option<Decimal>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub unit_currency: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub target_currency: String,
    #[serde(default)]
    pub quotation_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub transaction_amount: Amount,
    #[serde(default, deserialize_with = "deserialize_one_or_many")]
    pub currency_exchange: Vec<CurrencyExchange>,
    #[serde(default, deserialize_with = "deserialize_option_date")]
    pub booking_date: Option<Date>,
    #[serde(default, deserialize_with = "deserialize_option_date")]
    pub value_date: Option<Date>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub creditor_name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub debtor_name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub remittance_information_unstructured: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub remittance_information_unstructured_array: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub bank_transaction_code: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub proprietary_bank_transaction_code: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub additional_information: String,
}

impl Transaction {
    /// Source identifier, `None` when absent or blank.
    pub fn id(&self) -> Option<&str> {
        self.transaction_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Transactions {
    pub booked: Vec<Transaction>,
    pub pending: Vec<Transaction>,
}

impl Transactions {
    pub fn len(&self) -> usize {
        self.booked.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Requisition {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub institution_id: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub accounts: Vec<String>,
}

pub trait BankSource {
    fn account_details(&self, account_id: &str) -> Result<Account, Error>;
    fn account_balances(&self, account_id: &str) -> Result<Vec<Balance>, Error>;
    fn transactions(&self, account_id: &str) -> Result<Transactions, Error>;
    fn requisition(&self, requisition_id: &str) -> Result<Requisition, Error>;
}

/// Decodes raw transaction records one by one so a malformed record is
/// reported with its identifier.
pub fn decode_transactions(values: Vec<serde_json::Value>) -> Result<Vec<Transaction>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            let id = value
                .get("transactionId")
                .and_then(|id| id.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{position}"));
            serde_json::from_value(value)
                .map_err(|error| Error::from(error).context(format!("transaction {id}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn transaction_full_record() {
        let value = json!({
            "transactionId": "2024010500001",
            "bookingDate": "2024-01-06",
            "valueDate": "2024-01-05",
            "transactionAmount": {"amount": "-42.50", "currency": "EUR"},
            "currencyExchange": {
                "sourceCurrency": "USD",
                "exchangeRate": "1.0925",
                "targetCurrency": "EUR"
            },
            "creditorName": "Coffee Shop",
            "remittanceInformationUnstructuredArray": ["card 1234", "berlin"],
            "proprietaryBankTransactionCode": "CARD_PAYMENT"
        });
        let transaction: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(transaction.id(), Some("2024010500001"));
        assert_eq!(transaction.transaction_amount.amount, dec!(-42.50));
        assert_eq!(transaction.currency_exchange.len(), 1);
        assert_eq!(
            transaction.currency_exchange[0].exchange_rate,
            Some(dec!(1.0925))
        );
        assert_eq!(transaction.value_date, Date::from_ymd_opt(2024, 1, 5));
        assert_eq!(transaction.remittance_information_unstructured_array.len(), 2);
        assert!(transaction.debtor_name.is_empty());
    }

    #[test]
    fn transaction_exchange_array_and_bare_amount() {
        let value = json!({
            "transactionAmount": {"amount": 12.5, "currency": "EUR"},
            "currencyExchange": [
                {"sourceCurrency": "USD", "targetCurrency": "EUR"},
                {"sourceCurrency": "GBP", "targetCurrency": "EUR"}
            ]
        });
        let transaction: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(transaction.id(), None);
        assert_eq!(transaction.transaction_amount.amount, dec!(12.5));
        assert_eq!(transaction.currency_exchange.len(), 2);
        assert!(transaction.value_date.is_none());
    }

    #[test]
    fn null_fields_read_as_empty() {
        let value = json!({
            "transactionId": "x",
            "transactionAmount": {"amount": "-3", "currency": "EUR"},
            "valueDate": "2024-01-05",
            "creditorName": null,
            "debtorName": "Acme",
            "remittanceInformationUnstructured": null,
            "remittanceInformationUnstructuredArray": null,
            "proprietaryBankTransactionCode": null,
            "additionalInformation": null
        });
        let transaction = decode_transactions(vec![value]).unwrap().remove(0);
        assert!(transaction.creditor_name.is_empty());
        assert_eq!(transaction.debtor_name, "Acme");
        assert!(transaction.remittance_information_unstructured_array.is_empty());
        assert!(transaction.proprietary_bank_transaction_code.is_empty());
    }

    #[test]
    fn null_account_and_requisition_fields() {
        let account: Account = serde_json::from_value(json!({
            "resourceId": "r",
            "currency": "EUR",
            "name": null,
            "ownerName": null,
            "iban": null
        }))
        .unwrap();
        assert!(account.owner_name.is_empty());
        assert!(account.name.is_empty());

        let requisition: Requisition =
            serde_json::from_value(json!({"id": "req", "accounts": null, "status": null}))
                .unwrap();
        assert!(requisition.accounts.is_empty());
    }

    #[test]
    fn blank_id_is_absent() {
        let value = json!({
            "transactionId": "  ",
            "transactionAmount": {"amount": "1", "currency": "EUR"}
        });
        let transaction: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(transaction.id(), None);
    }

    #[test]
    fn decode_reports_offending_record() {
        let values = vec![
            json!({"transactionId": "ok", "transactionAmount": {"amount": "1", "currency": "EUR"}}),
            json!({"transactionId": "bad", "transactionAmount": {"amount": "one", "currency": "EUR"}}),
        ];
        let error = decode_transactions(values).unwrap_err();
        assert_eq!(error.kind, ErrorKind::Parse);
        assert!(error.message.starts_with("transaction bad"));
    }

    #[test]
    fn decode_unnamed_record_uses_position() {
        let values = vec![json!({"transactionAmount": {"amount": "1", "currency": "EUR"}, "valueDate": "2024-13-01"})];
        let error = decode_transactions(values).unwrap_err();
        assert!(error.message.starts_with("transaction #0"));
    }
}
