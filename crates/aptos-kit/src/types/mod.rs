//! Core types for Aptos.
//!
//! Hand-rolled types based on the full node REST API responses,
//! designed for ergonomic use in client applications.

mod account;
mod address;
mod key;
mod network;
mod rest;
mod units;

pub use account::LocalAccount;
pub use address::{AccountAddress, IntoAccountAddress};
pub use key::{AuthenticationKey, Ed25519PrivateKey, Ed25519PublicKey, Scheme};
pub use network::Network;
pub use rest::{
    Coin, CoinStore, LedgerInfo, MoveResource, TableHandle, TableItemRequest, TransactionInfo,
};
pub use units::Octas;
