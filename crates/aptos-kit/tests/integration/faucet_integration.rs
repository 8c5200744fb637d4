//! Integration tests for faucet funding and transaction waits.
//!
//! Run with: `cargo test --features mock-node --test integration faucet_integration`

use std::time::Duration;

use aptos_kit::mock::{self, MockNode};
use aptos_kit::*;

#[tokio::test]
async fn test_fund_new_account() {
    let node = MockNode::start().await;
    let aptos = node.client();
    let account = LocalAccount::generate();

    let committed = aptos
        .fund_account(account.address(), "0.5 APT".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(committed.len(), 1);
    assert!(committed[0].version.is_some());

    let balance = aptos.coin_balance(account.address()).await.unwrap();
    assert_eq!(balance, Octas::octas(50_000_000));
    assert_eq!(balance.to_string(), "0.5 APT");
}

#[tokio::test]
async fn test_funding_accumulates() {
    let node = MockNode::start().await;
    let aptos = node.client();
    let address = LocalAccount::generate().address();

    aptos.fund_account(address, Octas::apt(1)).await.unwrap();
    aptos.fund_account(address, Octas::apt(2)).await.unwrap();

    let balance = aptos.coin_balance(address).await.unwrap();
    assert_eq!(balance, Octas::apt(3));
}

#[tokio::test]
async fn test_balance_at_version() {
    let node = MockNode::start().await;
    node.set_coin_balance(AccountAddress::ONE, 42);

    let balance = node
        .client()
        .coin_balance("0x1")
        .at_version(1000)
        .await
        .unwrap();
    assert_eq!(balance.as_octas(), 42);
    assert!(node.requests()[0].ends_with("?ledger_version=1000"));
}

#[tokio::test]
async fn test_wait_for_seeded_transaction() {
    let node = MockNode::start().await;
    let hash = "0x01";
    node.add_transaction(
        hash,
        vec![
            mock::pending_transaction(hash),
            mock::committed_transaction(hash, 10, true, "Executed successfully"),
        ],
    );

    let tx = node
        .client()
        .wait_for_transaction(hash)
        .poll_interval(Duration::from_millis(5))
        .await
        .unwrap();
    assert!(tx.is_success());
    assert_eq!(tx.version, Some(10));
}
