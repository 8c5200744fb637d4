//! A small, typed, read-only Rust client for the Aptos REST API.
//!
//! **aptos-kit** covers the read side of an Aptos full node: ledger info,
//! account resources, the token standard's collections and tokens, coin
//! balances, and transaction status. On test networks it can also fund
//! accounts through the faucet.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aptos_kit::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), aptos_kit::Error> {
//!     // Configure once
//!     let aptos = Aptos::testnet().build();
//!
//!     // Look up a collection
//!     let creator = "0xaef92afd9bcce9a48a66ec4088b19624ebb5b3658e3d5669b3fa58412edec093";
//!     let collection = aptos
//!         .tokens()
//!         .collection_data(creator, "LifeMining Profile Collection V1")
//!         .await?;
//!     println!("{} tokens minted", collection.supply);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Design Principles
//!
//! 1. **Single entry point**: Everything hangs off the [`Aptos`] client
//! 2. **Configure once**: Network, faucet and account set at client creation
//! 3. **Typed responses**: REST JSON (with its stringified `u64`s) decodes into plain Rust types
//! 4. **Explicit units**: No ambiguous amounts - write `"1.5 APT"` or `"150000000 octas"`
//!
//! # Core Types
//!
//! - [`AccountAddress`] - 32-byte account address
//! - [`Octas`] - APT amount with octa precision
//! - [`Ed25519PrivateKey`], [`Ed25519PublicKey`], [`AuthenticationKey`] - Keys
//! - [`LocalAccount`] - An address with its key pair
//! - [`CollectionData`], [`TokenData`], [`Token`] - Token standard records
//!
//! # String Parsing
//!
//! ```
//! use aptos_kit::{AccountAddress, Network, Octas};
//!
//! let amount: Octas = "1.5 APT".parse().unwrap();
//! let address: AccountAddress = "0x1".parse().unwrap();
//! let network: Network = "devnet".parse().unwrap();
//! assert_eq!(amount.as_octas(), 150_000_000);
//! assert_eq!(address, AccountAddress::ONE);
//! assert!(network.faucet_url().is_some());
//! ```

pub mod client;
pub mod error;
pub mod tokens;
pub mod types;

// Mock node - only available with "mock-node" feature
#[cfg(any(test, feature = "mock-node"))]
pub mod mock;

// Re-export commonly used types at crate root
pub use error::{Error, ParseAddressError, ParseAmountError, ParseKeyError, RestError};
pub use types::*;

// Re-export client types
pub use client::{
    APTOS_COIN, Aptos, AptosBuilder, BalanceQuery, FaucetClient, ResourceQuery, RestClient,
    RetryConfig, WaitForTransaction,
};

// Re-export token types
pub use tokens::{
    CollectionData, CollectionMutabilityConfig, Property, PropertyMap, PropertyValue, Royalty,
    Token, TokenClient, TokenData, TokenDataId, TokenId, TokenMutabilityConfig,
};
