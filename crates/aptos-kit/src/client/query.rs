//! Query builders for fluent read operations.
//!
//! All query builders implement `IntoFuture` so they can be `.await`ed directly.

use std::future::{Future, IntoFuture};
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::error::{Error, ParseAddressError, RestError};
use crate::types::{AccountAddress, CoinStore, MoveResource, Octas, TransactionInfo};

use super::rest::RestClient;

/// The native coin type.
pub const APTOS_COIN: &str = "0x1::aptos_coin::AptosCoin";

/// Default time [`WaitForTransaction`] waits before giving up.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default delay between two polls of [`WaitForTransaction`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Struct tag of the coin store for `coin_type`.
pub fn coin_store_type(coin_type: &str) -> String {
    format!("0x1::coin::CoinStore<{coin_type}>")
}

// ============================================================================
// BalanceQuery
// ============================================================================

/// Query builder for a coin balance.
///
/// Reads `0x1::coin::CoinStore<T>` under the account. An account that has
/// never registered the coin has no store and the query fails with a
/// "resource not found" error.
///
/// # Example
///
/// ```rust,no_run
/// # use aptos_kit::*;
/// # async fn example() -> Result<(), aptos_kit::Error> {
/// let aptos = Aptos::testnet().build();
///
/// // APT balance
/// let balance = aptos.coin_balance("0x1").await?;
/// println!("{balance}");
///
/// // Another coin, at a past ledger version
/// let balance = aptos
///     .coin_balance("0x1")
///     .coin_type("0xf22b::asset::USDT")
///     .at_version(1_000_000)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct BalanceQuery {
    rest: Arc<RestClient>,
    address: Result<AccountAddress, ParseAddressError>,
    coin_type: String,
    ledger_version: Option<u64>,
}

impl BalanceQuery {
    pub(crate) fn new(
        rest: Arc<RestClient>,
        address: Result<AccountAddress, ParseAddressError>,
    ) -> Self {
        Self {
            rest,
            address,
            coin_type: APTOS_COIN.to_string(),
            ledger_version: None,
        }
    }

    /// Query another coin than APT.
    pub fn coin_type(mut self, coin_type: impl Into<String>) -> Self {
        self.coin_type = coin_type.into();
        self
    }

    /// Query at a specific ledger version.
    pub fn at_version(mut self, version: u64) -> Self {
        self.ledger_version = Some(version);
        self
    }
}

impl IntoFuture for BalanceQuery {
    type Output = Result<Octas, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let address = self.address?;
            let store: MoveResource<CoinStore> = self
                .rest
                .account_resource(
                    &address,
                    &coin_store_type(&self.coin_type),
                    self.ledger_version,
                )
                .await?;
            Ok(store.data.coin.value)
        })
    }
}

// ============================================================================
// ResourceQuery
// ============================================================================

/// Query builder for an arbitrary resource, decoded into `T`.
///
/// # Example
///
/// ```rust,no_run
/// # use aptos_kit::*;
/// # async fn example() -> Result<(), aptos_kit::Error> {
/// let aptos = Aptos::testnet().build();
///
/// let account: serde_json::Value = aptos
///     .resource("0x1", "0x1::account::Account")
///     .await?;
/// println!("sequence number: {}", account["sequence_number"]);
/// # Ok(())
/// # }
/// ```
pub struct ResourceQuery<T> {
    rest: Arc<RestClient>,
    address: Result<AccountAddress, ParseAddressError>,
    resource_type: String,
    ledger_version: Option<u64>,
    _phantom: PhantomData<T>,
}

impl<T> ResourceQuery<T> {
    pub(crate) fn new(
        rest: Arc<RestClient>,
        address: Result<AccountAddress, ParseAddressError>,
        resource_type: impl Into<String>,
    ) -> Self {
        Self {
            rest,
            address,
            resource_type: resource_type.into(),
            ledger_version: None,
            _phantom: PhantomData,
        }
    }

    /// Query at a specific ledger version.
    pub fn at_version(mut self, version: u64) -> Self {
        self.ledger_version = Some(version);
        self
    }
}

impl<T: DeserializeOwned + Send + 'static> IntoFuture for ResourceQuery<T> {
    type Output = Result<T, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let address = self.address?;
            let resource: MoveResource<T> = self
                .rest
                .account_resource(&address, &self.resource_type, self.ledger_version)
                .await?;
            Ok(resource.data)
        })
    }
}

// ============================================================================
// WaitForTransaction
// ============================================================================

/// Polls a transaction until it leaves the mempool.
///
/// A transaction the node has not indexed yet (404) counts as pending.
/// By default a committed transaction whose VM status is not a success is
/// turned into [`Error::TransactionFailed`].
///
/// # Example
///
/// ```rust,no_run
/// # use std::time::Duration;
/// # use aptos_kit::*;
/// # async fn example() -> Result<(), aptos_kit::Error> {
/// let aptos = Aptos::testnet().build();
///
/// let tx = aptos
///     .wait_for_transaction("0xabc...")
///     .timeout(Duration::from_secs(60))
///     .await?;
/// println!("committed at version {:?}", tx.version);
/// # Ok(())
/// # }
/// ```
pub struct WaitForTransaction {
    rest: Arc<RestClient>,
    hash: String,
    timeout: Duration,
    poll_interval: Duration,
    check_success: bool,
}

impl WaitForTransaction {
    pub(crate) fn new(rest: Arc<RestClient>, hash: impl Into<String>) -> Self {
        Self {
            rest,
            hash: hash.into(),
            timeout: DEFAULT_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            check_success: true,
        }
    }

    /// Give up after this long.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delay between two polls.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Return failed transactions as `Ok` instead of an error.
    pub fn allow_failure(mut self) -> Self {
        self.check_success = false;
        self
    }
}

impl IntoFuture for WaitForTransaction {
    type Output = Result<TransactionInfo, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let started = Instant::now();

            loop {
                match self.rest.transaction_by_hash(&self.hash).await {
                    Ok(tx) if !tx.is_pending() => {
                        if self.check_success && !tx.is_success() {
                            return Err(Error::TransactionFailed {
                                hash: self.hash,
                                vm_status: tx.vm_status.unwrap_or_default(),
                            });
                        }
                        info!(hash = %self.hash, version = ?tx.version, "Transaction committed");
                        return Ok(tx);
                    }
                    Ok(_) | Err(RestError::TransactionNotFound(_)) => {
                        debug!(hash = %self.hash, "Transaction pending");
                    }
                    Err(e) => return Err(e.into()),
                }

                let elapsed = started.elapsed();
                if elapsed >= self.timeout {
                    return Err(Error::WaitTimeout {
                        hash: self.hash,
                        secs: self.timeout.as_secs(),
                    });
                }
                tokio::time::sleep(self.poll_interval.min(self.timeout - elapsed)).await;
            }
        })
    }
}
