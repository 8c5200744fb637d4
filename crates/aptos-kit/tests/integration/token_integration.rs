//! Integration tests for collection and token lookups.
//!
//! Run with: `cargo test --features mock-node --test integration token_integration`

use aptos_kit::mock::{self, MockNode};
use aptos_kit::*;

const CREATOR: &str = "0xaef92afd9bcce9a48a66ec4088b19624ebb5b3658e3d5669b3fa58412edec093";
const COLLECTION: &str = "LifeMining Profile Collection V1";
const TOKEN: &str = "LMProfileV1: 0x000001's Profile";

fn creator() -> AccountAddress {
    CREATOR.parse().unwrap()
}

/// Seed the mock with the profile collection and its first token.
fn seed_profile(node: &MockNode) {
    node.add_collection(creator(), &mock::collection(COLLECTION));

    let mut data = mock::token_data(TOKEN);
    data.default_properties = PropertyMap::new(vec![
        Property {
            key: "TOKEN_BURNABLE_BY_OWNER".to_string(),
            value: PropertyValue {
                type_tag: "bool".to_string(),
                value: vec![1],
            },
        },
        Property {
            key: "nickname".to_string(),
            value: PropertyValue {
                type_tag: "0x1::string::String".to_string(),
                value: bcs::to_bytes("lunar").unwrap(),
            },
        },
    ]);
    node.add_token_data(&TokenDataId::new(creator(), COLLECTION, TOKEN), &data);
}

// =============================================================================
// Creator-side lookups
// =============================================================================

#[tokio::test]
async fn test_collection_then_token_lookup() {
    let node = MockNode::start().await;
    seed_profile(&node);
    let aptos = node.client();

    let collection = aptos
        .tokens()
        .collection_data(CREATOR, COLLECTION)
        .await
        .unwrap();
    assert_eq!(collection.name, COLLECTION);
    assert!(collection.is_unlimited());

    let token = aptos
        .tokens()
        .token_data(CREATOR, COLLECTION, TOKEN)
        .await
        .unwrap();
    assert_eq!(token.name, TOKEN);
    assert_eq!(
        token.default_properties.get_bool("TOKEN_BURNABLE_BY_OWNER").unwrap(),
        Some(true)
    );
    assert_eq!(
        token.default_properties.get_string("nickname").unwrap(),
        Some("lunar".to_string())
    );
}

#[tokio::test]
async fn test_short_and_long_creator_forms_agree() {
    let node = MockNode::start().await;
    node.add_collection(AccountAddress::ONE, &mock::collection("Framework"));
    let tokens = node.client().tokens();

    let short = tokens.collection_data("0x1", "Framework").await.unwrap();
    let long = tokens
        .collection_data(AccountAddress::ONE.to_string(), "Framework")
        .await
        .unwrap();
    assert_eq!(short, long);
}

#[tokio::test]
async fn test_token_data_json_keeps_api_shape() {
    let node = MockNode::start().await;
    seed_profile(&node);

    let token = node
        .client()
        .tokens()
        .token_data(CREATOR, COLLECTION, TOKEN)
        .await
        .unwrap();
    let json = serde_json::to_value(&token).unwrap();
    assert_eq!(json["name"], TOKEN);
    assert_eq!(json["supply"], "1");
    assert_eq!(json["royalty"]["payee_address"], AccountAddress::ZERO.to_string());
    assert_eq!(
        json["default_properties"]["map"]["data"][0]["value"]["value"],
        "0x01"
    );
}

// =============================================================================
// Holder-side lookups
// =============================================================================

#[tokio::test]
async fn test_token_balance_for_holder_and_stranger() {
    let node = MockNode::start().await;
    seed_profile(&node);
    let holder = LocalAccount::generate().address();
    let id = TokenId::new(TokenDataId::new(creator(), COLLECTION, TOKEN), 0);
    node.set_token_balance(holder, &id, 1);
    let tokens = node.client().tokens();

    let held = tokens.token_for_account(holder, id.clone()).await.unwrap();
    assert_eq!(held.amount, 1);

    let stranger = LocalAccount::generate().address();
    let none = tokens.token_for_account(stranger, id).await.unwrap();
    assert_eq!(none.amount, 0);
}
