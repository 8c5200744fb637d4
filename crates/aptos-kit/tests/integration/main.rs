//! Integration tests for aptos-kit.
//!
//! These tests run against the in-process mock node and require the
//! `mock-node` feature.
//!
//! Run with: `cargo test --features mock-node --test integration`

#![cfg(feature = "mock-node")]

mod error_handling_integration;
mod faucet_integration;
mod token_integration;
