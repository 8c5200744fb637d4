//! Client module for reading from an Aptos network.
//!
//! This module provides the core client infrastructure:
//!
//! - [`Aptos`] — The main client, the single entry point for all operations
//! - [`AptosBuilder`] — Fluent builder for configuring the client
//! - [`RestClient`] — Low-level REST client with retry logic
//! - [`FaucetClient`] — Funds accounts on test networks
//!
//! # Query Builders
//!
//! Query builders provide a fluent API for read operations:
//!
//! - [`BalanceQuery`] — Get a coin balance
//! - [`ResourceQuery`] — Get any resource under an account
//! - [`WaitForTransaction`] — Poll a transaction until it is committed

mod aptos;
mod faucet;
mod query;
mod rest;

pub use aptos::{Aptos, AptosBuilder};
pub use faucet::FaucetClient;
pub use query::{
    APTOS_COIN, BalanceQuery, DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT, ResourceQuery,
    WaitForTransaction, coin_store_type,
};
pub use rest::{RestClient, RetryConfig};
