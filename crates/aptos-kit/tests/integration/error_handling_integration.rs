//! Integration tests for error handling against the mock node.
//!
//! Run with: `cargo test --features mock-node --test integration error_handling`

use aptos_kit::mock::MockNode;
use aptos_kit::*;

// =============================================================================
// Not Found Errors
// =============================================================================

#[tokio::test]
async fn test_error_collection_of_unknown_creator() {
    let node = MockNode::start().await;
    let aptos = node.client();

    let err = aptos
        .tokens()
        .collection_data("0xbeef", "Nothing Here")
        .await
        .unwrap_err();

    match err {
        Error::CollectionNotFound {
            creator,
            collection,
        } => {
            assert_eq!(creator.to_short_string(), "0xbeef");
            assert_eq!(collection, "Nothing Here");
        }
        other => panic!("Expected CollectionNotFound, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_coin_balance_without_store() {
    let node = MockNode::start().await;

    let err = node.client().coin_balance("0x1").await.unwrap_err();
    match err {
        Error::Rest(RestError::ResourceNotFound {
            address,
            resource_type,
        }) => {
            assert_eq!(address, AccountAddress::ONE);
            assert!(resource_type.starts_with("0x1::coin::CoinStore<"));
        }
        other => panic!("Expected ResourceNotFound, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_error_unknown_transaction_times_out() {
    let node = MockNode::start().await;

    let err = node
        .client()
        .wait_for_transaction("0xdead")
        .timeout(std::time::Duration::from_millis(30))
        .poll_interval(std::time::Duration::from_millis(10))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::WaitTimeout { .. }));
}

// =============================================================================
// Transport Errors
// =============================================================================

#[tokio::test]
async fn test_error_server_failure_without_retries() {
    let node = MockNode::start().await;
    node.fail_next(1, 503);

    let err = node.client().ledger_info().await.unwrap_err();
    match &err {
        Error::Rest(rest) => {
            assert!(rest.is_retryable());
            assert_eq!(rest.status_code(), Some(503));
        }
        other => panic!("Expected Rest error, got: {:?}", other),
    }
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn test_retry_config_recovers() {
    let node = MockNode::start().await;
    node.fail_next(2, 429);

    let aptos = Aptos::custom(node.node_url())
        .retry_config(RetryConfig {
            max_retries: 3,
            initial_delay_ms: 1,
            max_delay_ms: 2,
        })
        .build();
    let ledger = aptos.ledger_info().await.unwrap();
    assert_eq!(ledger.chain_id, aptos_kit::mock::CHAIN_ID);
    assert_eq!(node.request_count(), 3);
}

#[tokio::test]
async fn test_error_unreachable_node() {
    let node = MockNode::start().await;
    let url = node.node_url();
    drop(node);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let aptos = Aptos::custom(url).retry_config(RetryConfig::none()).build();
    let err = aptos.ledger_info().await.unwrap_err();
    assert!(matches!(err, Error::Rest(RestError::Http(_))));
}

#[tokio::test]
async fn test_error_mainnet_has_no_faucet() {
    let aptos = Aptos::mainnet().build();
    let err = aptos
        .fund_account("0x1", Octas::apt(1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoFaucet));
}
