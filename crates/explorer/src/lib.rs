//! Client for the L2 block explorer API.
//!
//! Only the etherscan-compatible `account/txlist` endpoint is used: it lists
//! every transaction sent by an address, which is where past withdrawals are
//! discovered.

mod types;

pub use types::ExplorerTransaction;

use alloy_primitives::Address;
use reqwest::header::ACCEPT;
use std::future::Future;
use thiserror::Error;
use tracing::debug;
use types::ApiResponse;

#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Error parsing the API base url
    #[error("Invalid explorer URL: {0}")]
    InvalidUrl(String),

    /// Transport failure
    #[error("Explorer request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("Explorer returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The API answered with an error message instead of a result list
    #[error("Explorer API error: {message} ({result})")]
    Api { message: String, result: String },

    /// The body did not have the expected shape
    #[error("Unparseable explorer response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of an account's transaction history.
pub trait TransactionSource: Send + Sync {
    /// All transactions sent by `address`, in the order the source returns them.
    fn transactions_from(
        &self,
        address: Address,
    ) -> impl Future<Output = Result<Vec<ExplorerTransaction>, ExplorerError>> + Send;
}

/// HTTP client for an etherscan-compatible explorer API.
#[derive(Debug, Clone)]
pub struct ExplorerClient {
    client: reqwest::Client,
    api_url: reqwest::Url,
}

impl ExplorerClient {
    /// Creates a client for the API rooted at `api_url` (e.g. `https://explorer/api`).
    pub fn new(api_url: &str) -> Result<Self, ExplorerError> {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Creates a client with a custom HTTP client.
    pub fn with_client(client: reqwest::Client, api_url: &str) -> Result<Self, ExplorerError> {
        let api_url =
            reqwest::Url::parse(api_url).map_err(|e| ExplorerError::InvalidUrl(format!("{}", e)))?;
        Ok(Self { client, api_url })
    }

    /// Fetches the full transaction list of `address`, starting at block 0.
    pub async fn fetch_transactions(
        &self,
        address: Address,
    ) -> Result<Vec<ExplorerTransaction>, ExplorerError> {
        let address = address.to_string();
        let response = self
            .client
            .get(self.api_url.clone())
            .query(&[
                ("address", address.as_str()),
                ("action", "txlist"),
                ("module", "account"),
                ("filterby", "from"),
                ("startblock", "0"),
            ])
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(ExplorerError::Status { status, body });
        }

        let body = response.text().await?;
        let transactions = parse_response(&body)?;

        debug!(
            address = %address,
            count = transactions.len(),
            "Fetched transaction history"
        );

        Ok(transactions)
    }
}

impl TransactionSource for ExplorerClient {
    async fn transactions_from(
        &self,
        address: Address,
    ) -> Result<Vec<ExplorerTransaction>, ExplorerError> {
        self.fetch_transactions(address).await
    }
}

/// Parses a `txlist` body.
///
/// An array `result` is a (possibly empty) transaction list regardless of
/// `status`; anything else is the API reporting an error.
pub fn parse_response(body: &str) -> Result<Vec<ExplorerTransaction>, ExplorerError> {
    let response: ApiResponse = serde_json::from_str(body)?;

    match response.result {
        serde_json::Value::Array(entries) => {
            Ok(serde_json::from_value(serde_json::Value::Array(entries))?)
        }
        other => Err(ExplorerError::Api {
            message: response
                .message
                .or(response.status)
                .unwrap_or_else(|| "unknown".to_string()),
            result: match other {
                serde_json::Value::String(s) => s,
                value => value.to_string(),
            },
        }),
    }
}
