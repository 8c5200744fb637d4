//! Faucet client for test networks.

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use reqwest::Url;
use tracing::info;

use crate::error::{Error, RestError};
use crate::types::{AccountAddress, Octas, TransactionInfo};

use super::query::{DEFAULT_WAIT_TIMEOUT, WaitForTransaction};
use super::rest::{RestClient, with_retry_if};

/// Client for the faucet of a test network.
///
/// Funding mints coins through `POST /mint` and then waits for every
/// transaction the faucet submitted, so the balance is visible once
/// [`fund_account`](FaucetClient::fund_account) returns.
///
/// # Example
///
/// ```rust,no_run
/// # use aptos_kit::*;
/// # async fn example() -> Result<(), aptos_kit::Error> {
/// let aptos = Aptos::devnet().build();
/// let account = LocalAccount::generate();
///
/// aptos.fund_account(account.address(), Octas::apt(1)).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FaucetClient {
    url: String,
    client: reqwest::Client,
    rest: Arc<RestClient>,
    wait_timeout: Duration,
}

impl FaucetClient {
    /// Create a faucet client that waits on `rest` for minted transactions.
    pub fn new(url: impl Into<String>, rest: Arc<RestClient>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            rest,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }

    /// Change how long to wait for each minted transaction.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// The faucet URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Mint `amount` to `address` and wait for the resulting transactions.
    ///
    /// The account is created on chain if it does not exist yet.
    pub async fn fund_account(
        &self,
        address: AccountAddress,
        amount: Octas,
    ) -> Result<Vec<TransactionInfo>, Error> {
        let hashes = self.mint(address, amount).await?;
        info!(%address, %amount, transactions = hashes.len(), "Faucet accepted mint");

        let committed = try_join_all(hashes.into_iter().map(|hash| {
            WaitForTransaction::new(self.rest.clone(), hash)
                .timeout(self.wait_timeout)
                .into_future()
        }))
        .await?;

        info!(%address, %amount, "Account funded");
        Ok(committed)
    }

    /// Ask the faucet to mint; returns the hashes it submitted.
    ///
    /// Minting is not idempotent: only requests that never reached the
    /// faucet (connection failures) are retried. Any HTTP error, including
    /// 5xx and timeouts, is returned as is.
    pub async fn mint(&self, address: AccountAddress, amount: Octas) -> Result<Vec<String>, Error> {
        let mut url = Url::parse(&format!("{}/mint", self.url))
            .map_err(|e| RestError::InvalidUrl(format!("{}: {e}", self.url)))?;
        url.query_pairs_mut()
            .append_pair("amount", &amount.as_octas().to_string())
            .append_pair("address", &address.to_hex());

        let hashes = with_retry_if(self.rest.retry_config(), never_reached_faucet, || {
            self.try_mint(url.clone())
        })
        .await?;
        Ok(hashes)
    }

    async fn try_mint(&self, url: Url) -> Result<Vec<String>, RestError> {
        let response = self.client.post(url).send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        if !(200..300).contains(&status) {
            return Err(RestError::network(
                format!("Faucet returned HTTP {status}: {text}"),
                Some(status),
                false,
            ));
        }

        serde_json::from_str(&text).map_err(RestError::Json)
    }
}

fn never_reached_faucet(err: &RestError) -> bool {
    matches!(err, RestError::Http(e) if e.is_connect())
}

impl std::fmt::Debug for FaucetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaucetClient")
            .field("url", &self.url)
            .field("wait_timeout", &self.wait_timeout)
            .finish()
    }
}
