//! The main Aptos client.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::tokens::TokenClient;
use crate::types::{
    AccountAddress, IntoAccountAddress, LedgerInfo, LocalAccount, Network, Octas, TransactionInfo,
};

use super::faucet::FaucetClient;
use super::query::{BalanceQuery, ResourceQuery, WaitForTransaction};
use super::rest::{RestClient, RetryConfig};

/// The main client for reading from an Aptos network.
///
/// The `Aptos` client is the single entry point: token lookups, coin
/// balances, raw resources, transaction waits and faucet funding all hang
/// off it. It is cheap to clone; clones share one HTTP connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use aptos_kit::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), aptos_kit::Error> {
///     let aptos = Aptos::testnet().build();
///
///     let ledger = aptos.ledger_info().await?;
///     println!("chain {} at version {}", ledger.chain_id, ledger.ledger_version);
///
///     let balance = aptos.coin_balance("0x1").await?;
///     println!("Balance: {}", balance);
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Aptos {
    rest: Arc<RestClient>,
    faucet: Option<FaucetClient>,
    account: Option<LocalAccount>,
    network: Network,
}

impl Aptos {
    /// Create a builder for mainnet.
    pub fn mainnet() -> AptosBuilder {
        AptosBuilder::for_network(Network::Mainnet)
    }

    /// Create a builder for testnet.
    pub fn testnet() -> AptosBuilder {
        AptosBuilder::for_network(Network::Testnet)
    }

    /// Create a builder for devnet.
    pub fn devnet() -> AptosBuilder {
        AptosBuilder::for_network(Network::Devnet)
    }

    /// Create a builder for a local testnet (`aptos node run-local-testnet`).
    pub fn local() -> AptosBuilder {
        AptosBuilder::for_network(Network::Local)
    }

    /// Create a builder with a custom node URL and no faucet.
    pub fn custom(node_url: impl Into<String>) -> AptosBuilder {
        AptosBuilder::new(node_url, Network::Custom)
    }

    /// Create a configured client from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `APTOS_NETWORK` (optional): `"mainnet"`, `"testnet"`, `"devnet"`,
    ///   `"local"`, or a custom node URL. Defaults to `"testnet"`.
    /// - `APTOS_FAUCET_URL` (optional): overrides the preset faucet.
    /// - `APTOS_PRIVATE_KEY` (optional): hex Ed25519 private key.
    /// - `APTOS_ACCOUNT_ADDRESS` (optional): account address, for accounts
    ///   that rotated their key. Derived from the key when absent.
    ///
    /// # Example
    ///
    /// ```bash
    /// export APTOS_NETWORK=devnet
    /// export APTOS_PRIVATE_KEY=0x...
    /// ```
    ///
    /// ```rust,no_run
    /// # use aptos_kit::*;
    /// # fn example() -> Result<(), aptos_kit::Error> {
    /// let aptos = Aptos::from_env()?;
    /// if let Some(account) = aptos.account() {
    ///     println!("Configured for {}", account.address());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `APTOS_ACCOUNT_ADDRESS` is set without `APTOS_PRIVATE_KEY`
    /// - the key or the address cannot be parsed
    pub fn from_env() -> Result<Aptos, Error> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Aptos, Error> {
        let mut builder = match var("APTOS_NETWORK") {
            None => Aptos::testnet(),
            Some(network) => Aptos::builder(&network)?,
        };

        if let Some(faucet) = var("APTOS_FAUCET_URL") {
            builder = builder.faucet_url(faucet);
        }

        match (var("APTOS_PRIVATE_KEY"), var("APTOS_ACCOUNT_ADDRESS")) {
            (Some(key), address) => {
                builder = builder.account(LocalAccount::from_hex(&key, address.as_deref())?);
            }
            (None, Some(_)) => {
                return Err(Error::Config(
                    "APTOS_ACCOUNT_ADDRESS is set but APTOS_PRIVATE_KEY is missing".into(),
                ));
            }
            (None, None) => {
                // Read-only client
            }
        }

        Ok(builder.build())
    }

    /// Create a builder from a preset name (`"mainnet"`, `"testnet"`,
    /// `"devnet"`, `"local"`) or a node URL.
    ///
    /// ```
    /// use aptos_kit::{Aptos, Network};
    ///
    /// let aptos = Aptos::builder("devnet").unwrap().build();
    /// assert_eq!(aptos.network(), Network::Devnet);
    ///
    /// let aptos = Aptos::builder("http://10.0.0.5:8080").unwrap().build();
    /// assert_eq!(aptos.node_url(), "http://10.0.0.5:8080/v1");
    /// ```
    pub fn builder(network: &str) -> Result<AptosBuilder, Error> {
        match network.parse::<Network>() {
            Ok(Network::Custom) => Err(Error::Config(
                "network 'custom' needs a node URL instead".into(),
            )),
            Ok(network) => Ok(AptosBuilder::for_network(network)),
            Err(_) if network.contains("://") => Ok(Aptos::custom(network)),
            Err(e) => Err(Error::Config(e)),
        }
    }

    /// Get the underlying REST client.
    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    /// Get the node URL (ending in `/v1`).
    pub fn node_url(&self) -> &str {
        self.rest.url()
    }

    /// Get the network this client is connected to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// The configured account, if any.
    pub fn account(&self) -> Option<&LocalAccount> {
        self.account.as_ref()
    }

    /// The configured account's address, if any.
    pub fn account_address(&self) -> Option<AccountAddress> {
        self.account.as_ref().map(LocalAccount::address)
    }

    // ========================================================================
    // Read Operations
    // ========================================================================

    /// Ledger summary: chain id, latest version, block height.
    pub async fn ledger_info(&self) -> Result<LedgerInfo, Error> {
        Ok(self.rest.ledger_info().await?)
    }

    /// Coin balance of an account, APT unless `.coin_type(..)` says otherwise.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use aptos_kit::*;
    /// # async fn example() -> Result<(), aptos_kit::Error> {
    /// let aptos = Aptos::testnet().build();
    ///
    /// let balance = aptos.coin_balance("0x1").await?;
    /// let earlier = aptos.coin_balance("0x1").at_version(1_000).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn coin_balance(&self, address: impl IntoAccountAddress) -> BalanceQuery {
        BalanceQuery::new(self.rest.clone(), address.into_account_address())
    }

    /// A resource under an account, decoded into `T`.
    pub fn resource<T: DeserializeOwned + Send + 'static>(
        &self,
        address: impl IntoAccountAddress,
        resource_type: impl Into<String>,
    ) -> ResourceQuery<T> {
        ResourceQuery::new(
            self.rest.clone(),
            address.into_account_address(),
            resource_type,
        )
    }

    /// Wait for a transaction to be committed.
    pub fn wait_for_transaction(&self, hash: impl Into<String>) -> WaitForTransaction {
        WaitForTransaction::new(self.rest.clone(), hash)
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    /// Client for the token standard (`0x3::token`).
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use aptos_kit::*;
    /// # async fn example() -> Result<(), aptos_kit::Error> {
    /// let aptos = Aptos::testnet().build();
    /// let creator = "0xaef92afd9bcce9a48a66ec4088b19624ebb5b3658e3d5669b3fa58412edec093";
    ///
    /// let data = aptos
    ///     .tokens()
    ///     .token_data(creator, "LifeMining Profile Collection V1", "LMProfileV1: 0x000001's Profile")
    ///     .await?;
    /// println!("{}", data.uri);
    /// # Ok(())
    /// # }
    /// ```
    pub fn tokens(&self) -> TokenClient {
        TokenClient::new(self.rest.clone())
    }

    // ========================================================================
    // Faucet
    // ========================================================================

    /// The faucet client, if this network has one.
    pub fn faucet(&self) -> Result<&FaucetClient, Error> {
        self.faucet.as_ref().ok_or(Error::NoFaucet)
    }

    /// Fund an account from the faucet and wait until the coins arrive.
    ///
    /// Fails with [`Error::NoFaucet`] on networks without a faucet.
    pub async fn fund_account(
        &self,
        address: impl IntoAccountAddress,
        amount: Octas,
    ) -> Result<Vec<TransactionInfo>, Error> {
        let address = address.into_account_address()?;
        self.faucet()?.fund_account(address, amount).await
    }
}

impl std::fmt::Debug for Aptos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aptos")
            .field("rest", &self.rest.url())
            .field("faucet", &self.faucet.as_ref().map(FaucetClient::url))
            .field("network", &self.network)
            .field("account", &self.account_address())
            .finish()
    }
}

/// Builder for creating an [`Aptos`] client.
///
/// # Example
///
/// ```rust,ignore
/// use aptos_kit::*;
///
/// // Read-only client
/// let aptos = Aptos::testnet().build();
///
/// // Local node with an account and no retries
/// let aptos = Aptos::local()
///     .account(LocalAccount::from_hex("0x...", None)?)
///     .retry_config(RetryConfig::none())
///     .build();
/// ```
pub struct AptosBuilder {
    node_url: String,
    faucet_url: Option<String>,
    account: Option<LocalAccount>,
    retry_config: RetryConfig,
    network: Network,
}

impl AptosBuilder {
    /// Create a new builder with the given node URL.
    fn new(node_url: impl Into<String>, network: Network) -> Self {
        Self {
            node_url: node_url.into(),
            faucet_url: network.faucet_url().map(str::to_string),
            account: None,
            retry_config: RetryConfig::default(),
            network,
        }
    }

    fn for_network(network: Network) -> Self {
        Self::new(network.node_url().unwrap_or_default(), network)
    }

    /// Set or override the faucet URL.
    pub fn faucet_url(mut self, url: impl Into<String>) -> Self {
        self.faucet_url = Some(url.into());
        self
    }

    /// Attach an account.
    pub fn account(mut self, account: LocalAccount) -> Self {
        self.account = Some(account);
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Build the client.
    pub fn build(self) -> Aptos {
        let rest = Arc::new(RestClient::with_retry_config(
            self.node_url,
            self.retry_config,
        ));
        let faucet = self
            .faucet_url
            .map(|url| FaucetClient::new(url, rest.clone()));
        Aptos {
            rest,
            faucet,
            account: self.account,
            network: self.network,
        }
    }
}

impl From<AptosBuilder> for Aptos {
    fn from(builder: AptosBuilder) -> Self {
        builder.build()
    }
}
