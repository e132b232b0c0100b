use super::{Asset, AssetUpdate, Ledger, Transaction};
use crate::error::Error;
use crate::normalize::deserialize_one_or_many;

use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const LUNCHMONEY_BASE_URL: &str = "https://dev.lunchmoney.app";

#[derive(Default, Deserialize)]
struct AssetsResponse {
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Default, Deserialize)]
struct UpdateAssetResponse {
    #[serde(default, deserialize_with = "deserialize_one_or_many")]
    errors: Vec<String>,
}

#[derive(Serialize)]
struct InsertTransactionsRequest<'a> {
    transactions: &'a [Transaction],
    apply_rules: bool,
    skip_duplicates: bool,
    check_for_recurring: bool,
    debit_as_negative: bool,
    skip_balance_update: bool,
}

impl<'a> InsertTransactionsRequest<'a> {
    fn new(transactions: &'a [Transaction]) -> Self {
        Self {
            transactions,
            apply_rules: true,
            skip_duplicates: true,
            check_for_recurring: true,
            debit_as_negative: true,
            skip_balance_update: false,
        }
    }
}

#[derive(Default, Deserialize)]
struct InsertTransactionsResponse {
    #[serde(default, deserialize_with = "deserialize_one_or_many")]
    error: Vec<String>,
    #[serde(default)]
    ids: Vec<i64>,
}

fn errors_message(errors: &[String]) -> String {
    format!("received {} errors: {:?}", errors.len(), errors.join("; "))
}

pub struct LunchmoneyClient {
    reqwest_client: Client,
    base_url: String,
    access_token: String,
}

impl LunchmoneyClient {
    pub fn new(base_url: &str, access_token: &str, timeout: Duration) -> Result<Self, Error> {
        if access_token.is_empty() {
            return Err(Error::new_config("lunchmoney access token is mandatory"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        let reqwest_client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|error| Error::new_config(format!("failed to init reqwest : {error}")))?;

        Ok(Self {
            reqwest_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        })
    }

    fn send(&self, operation: &str, request: RequestBuilder) -> Result<(StatusCode, String), Error> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|error| Error::from(error).context(operation))?;
        let status = response.status();
        let output = response
            .text()
            .map_err(|error| Error::from(error).context(operation))?;
        debug!("{} result: {} {}", operation, status, output);
        Ok((status, output))
    }

    fn decode<T: DeserializeOwned>(
        operation: &str,
        status: StatusCode,
        output: &str,
    ) -> Result<T, Error> {
        if status.is_success() {
            return serde_json::from_str(output)
                .map_err(|error| Error::from(error).context(operation));
        }
        Err(Error::new_remote(
            Some(status.as_u16()),
            format!("{operation} received unexpected status {status}: {output}"),
        ))
    }
}

impl Ledger for LunchmoneyClient {
    fn assets(&self) -> Result<Vec<Asset>, Error> {
        let url = format!("{}/v1/assets", self.base_url);
        debug!("request assets from url {}", url);
        let (status, output) = self.send("fetch assets", self.reqwest_client.get(url))?;
        let response: AssetsResponse = Self::decode("fetch assets", status, &output)?;
        Ok(response.assets)
    }

    fn update_asset(&self, asset_id: i64, update: &AssetUpdate) -> Result<(), Error> {
        let url = format!("{}/v1/assets/{}", self.base_url, asset_id);
        debug!("update asset at url {}", url);
        let body = serde_json::to_string(update)?;
        let (status, output) =
            self.send("update asset", self.reqwest_client.put(url).body(body))?;
        let response: UpdateAssetResponse = Self::decode("update asset", status, &output)?;
        if !response.errors.is_empty() {
            return Err(Error::new_remote(
                Some(status.as_u16()),
                format!("update asset {asset_id}: {}", errors_message(&response.errors)),
            ));
        }
        Ok(())
    }

    fn insert_transactions(&self, transactions: &[Transaction]) -> Result<usize, Error> {
        let url = format!("{}/v1/transactions", self.base_url);
        debug!("insert {} transactions at url {}", transactions.len(), url);
        let body = serde_json::to_string(&InsertTransactionsRequest::new(transactions))?;
        let (status, output) =
            self.send("insert transactions", self.reqwest_client.post(url).body(body))?;
        let response: InsertTransactionsResponse =
            Self::decode("insert transactions", status, &output)?;
        if !response.error.is_empty() {
            if !response.ids.is_empty() {
                warn!(
                    "{} transactions inserted before the ledger reported errors",
                    response.ids.len()
                );
            }
            return Err(Error::new_remote(
                Some(status.as_u16()),
                format!("insert transactions: {}", errors_message(&response.error)),
            ));
        }
        Ok(response.ids.len())
    }
}
