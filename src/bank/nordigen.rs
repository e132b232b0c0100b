use super::{Account, Balance, BankSource, Requisition, Transactions, decode_transactions};
use crate::error::Error;

use log::{debug, info};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const NORDIGEN_BASE_URL: &str = "https://bankaccountdata.gocardless.com/api/v2";

#[derive(Debug, Default, Deserialize)]
struct NordigenApiError {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    detail: String,
    #[serde(default)]
    status_code: u16,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    secret_id: &'a str,
    secret_key: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access: String,
}

#[derive(Deserialize)]
struct AccountDetailsResponse {
    account: Account,
}

#[derive(Deserialize)]
struct BalancesResponse {
    #[serde(default)]
    balances: Vec<Balance>,
}

#[derive(Deserialize)]
struct TransactionsResponse {
    transactions: RawTransactions,
}

#[derive(Deserialize)]
struct RawTransactions {
    #[serde(default)]
    booked: Vec<serde_json::Value>,
    #[serde(default)]
    pending: Vec<serde_json::Value>,
}

fn nordigen_error(operation: &str, status: StatusCode, body: &str) -> Error {
    let detail = serde_json::from_str::<NordigenApiError>(body).unwrap_or_default();
    if detail.status_code != 0 && !detail.summary.is_empty() && !detail.detail.is_empty() {
        Error::new_remote(
            Some(detail.status_code),
            format!(
                "{operation} failed with status {}: {} ({})",
                detail.status_code, detail.summary, detail.detail
            ),
        )
    } else {
        Error::new_remote(
            Some(status.as_u16()),
            format!("{operation} received unexpected status {status}"),
        )
    }
}

pub struct NordigenClient {
    reqwest_client: Client,
    base_url: String,
    access_token: String,
}

impl NordigenClient {
    /// Builds the client and exchanges the secret pair for an access token.
    pub fn new(
        base_url: &str,
        secret_id: &str,
        secret_key: &str,
        timeout: Duration,
    ) -> Result<Self, Error> {
        if secret_id.is_empty() || secret_key.is_empty() {
            return Err(Error::new_config("nordigen secret id and key are mandatory"));
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

        let mut client = Self {
            reqwest_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: String::new(),
        };
        client.access_token = client.authenticate(secret_id, secret_key)?;
        info!("authenticated against nordigen");
        Ok(client)
    }

    fn authenticate(&self, secret_id: &str, secret_key: &str) -> Result<String, Error> {
        let url = format!("{}/token/new/", self.base_url);
        debug!("request token from url {}", url);
        let body = serde_json::to_string(&TokenRequest {
            secret_id,
            secret_key,
        })?;
        let response = self
            .reqwest_client
            .post(url)
            .body(body)
            .send()
            .map_err(|error| Error::from(error).context("authenticate"))?;
        let status = response.status();
        let output = response
            .text()
            .map_err(|error| Error::from(error).context("authenticate"))?;
        if !status.is_success() {
            return Err(nordigen_error("authenticate", status, &output));
        }
        let token: TokenResponse = serde_json::from_str(&output)
            .map_err(|error| Error::from(error).context("authenticate"))?;
        Ok(token.access)
    }

    fn get<T: DeserializeOwned>(&self, operation: &str, path: &str) -> Result<T, Error> {
        let url = format!("{}{}", self.base_url, path);
        debug!("request {} from url {}", operation, url);
        let response = self
            .reqwest_client
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .map_err(|error| Error::from(error).context(operation))?;
        let status = response.status();
        let output = response
            .text()
            .map_err(|error| Error::from(error).context(operation))?;
        if !status.is_success() {
            return Err(nordigen_error(operation, status, &output));
        }
        debug!("request result: {}", output);
        serde_json::from_str(&output).map_err(|error| Error::from(error).context(operation))
    }
}

impl BankSource for NordigenClient {
    fn account_details(&self, account_id: &str) -> Result<Account, Error> {
        let response: AccountDetailsResponse = self.get(
            "fetch account details",
            &format!("/accounts/{account_id}/details/"),
        )?;
        Ok(response.account)
    }

    fn account_balances(&self, account_id: &str) -> Result<Vec<Balance>, Error> {
        let response: BalancesResponse = self.get(
            "fetch account balances",
            &format!("/accounts/{account_id}/balances/"),
        )?;
        Ok(response.balances)
    }

    fn transactions(&self, account_id: &str) -> Result<Transactions, Error> {
        let response: TransactionsResponse = self.get(
            "fetch transactions",
            &format!("/accounts/{account_id}/transactions/"),
        )?;
        Ok(Transactions {
            booked: decode_transactions(response.transactions.booked)?,
            pending: decode_transactions(response.transactions.pending)?,
        })
    }

    fn requisition(&self, requisition_id: &str) -> Result<Requisition, Error> {
        self.get(
            "fetch requisition",
            &format!("/requisitions/{requisition_id}/"),
        )
    }
}
