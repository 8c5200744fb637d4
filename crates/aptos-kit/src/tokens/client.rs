//! Token client for the `0x3::token` standard.

use std::sync::Arc;

use tracing::debug;

use crate::client::RestClient;
use crate::error::{Error, RestError};
use crate::types::{AccountAddress, IntoAccountAddress};

use super::types::{
    CollectionData, CollectionsResource, Token, TokenData, TokenDataId, TokenId,
    TokenStoreResource,
};

/// Creator-side resource holding the collection and token data tables.
pub const COLLECTIONS_RESOURCE: &str = "0x3::token::Collections";
/// Holder-side resource holding token balances.
pub const TOKEN_STORE_RESOURCE: &str = "0x3::token::TokenStore";

const STRING_TYPE: &str = "0x1::string::String";
const COLLECTION_DATA_TYPE: &str = "0x3::token::CollectionData";
const TOKEN_DATA_ID_TYPE: &str = "0x3::token::TokenDataId";
const TOKEN_DATA_TYPE: &str = "0x3::token::TokenData";
const TOKEN_ID_TYPE: &str = "0x3::token::TokenId";
const TOKEN_TYPE: &str = "0x3::token::Token";

// =============================================================================
// TokenClient
// =============================================================================

/// Read-only client for collections and tokens.
///
/// Create via [`Aptos::tokens()`](crate::Aptos::tokens).
///
/// Every lookup first reads a resource under an account to find the table
/// handle, then reads the table item, so one lookup is two requests.
///
/// # Example
///
/// ```rust,no_run
/// use aptos_kit::*;
///
/// # async fn example() -> Result<(), aptos_kit::Error> {
/// let aptos = Aptos::testnet().build();
/// let tokens = aptos.tokens();
///
/// let collection = tokens
///     .collection_data("0xaef92afd9bcce9a48a66ec4088b19624ebb5b3658e3d5669b3fa58412edec093", "My Collection")
///     .await?;
/// println!("{} minted", collection.supply);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TokenClient {
    rest: Arc<RestClient>,
    ledger_version: Option<u64>,
}

impl TokenClient {
    pub(crate) fn new(rest: Arc<RestClient>) -> Self {
        Self {
            rest,
            ledger_version: None,
        }
    }

    /// Pin every lookup of this client to a ledger version.
    pub fn at_version(mut self, ledger_version: u64) -> Self {
        self.ledger_version = Some(ledger_version);
        self
    }

    // =========================================================================
    // Creator-side lookups
    // =========================================================================

    /// Metadata of a collection created by `creator`.
    ///
    /// Returns [`Error::CollectionNotFound`] when the creator has never
    /// created a collection or has none with this name.
    pub async fn collection_data(
        &self,
        creator: impl IntoAccountAddress,
        collection_name: &str,
    ) -> Result<CollectionData, Error> {
        let creator = creator.into_account_address()?;
        let not_found = || Error::CollectionNotFound {
            creator,
            collection: collection_name.to_string(),
        };
        debug!(%creator, collection = collection_name, "Fetching collection data");

        let collections = self
            .collections(&creator)
            .await
            .map_err(|e| not_found_or(e, not_found))?;

        self.rest
            .table_item(
                &collections.collection_data.handle,
                STRING_TYPE,
                COLLECTION_DATA_TYPE,
                collection_name,
                self.ledger_version,
            )
            .await
            .map_err(|e| not_found_or(e, not_found))
    }

    /// Metadata of the token `token_name` in a creator's collection.
    ///
    /// Returns [`Error::TokenDataNotFound`] when either the collection table
    /// or the token is missing.
    pub async fn token_data(
        &self,
        creator: impl IntoAccountAddress,
        collection_name: &str,
        token_name: &str,
    ) -> Result<TokenData, Error> {
        let creator = creator.into_account_address()?;
        let id = TokenDataId::new(creator, collection_name, token_name);
        let not_found = || Error::TokenDataNotFound {
            creator,
            collection: collection_name.to_string(),
            name: token_name.to_string(),
        };
        debug!(%creator, collection = collection_name, token = token_name, "Fetching token data");

        let collections = self
            .collections(&creator)
            .await
            .map_err(|e| not_found_or(e, not_found))?;

        self.rest
            .table_item(
                &collections.token_data.handle,
                TOKEN_DATA_ID_TYPE,
                TOKEN_DATA_TYPE,
                &id,
                self.ledger_version,
            )
            .await
            .map_err(|e| not_found_or(e, not_found))
    }

    // =========================================================================
    // Holder-side lookups
    // =========================================================================

    /// The creator's own balance of a token.
    pub async fn token(
        &self,
        creator: impl IntoAccountAddress,
        collection_name: &str,
        token_name: &str,
        property_version: u64,
    ) -> Result<Token, Error> {
        let creator = creator.into_account_address()?;
        let id = TokenId::new(
            TokenDataId::new(creator, collection_name, token_name),
            property_version,
        );
        self.token_for_account(creator, id).await
    }

    /// Balance of `token_id` held by `owner`.
    ///
    /// An owner without a token store, or one that does not hold the token,
    /// has a zero balance rather than an error.
    pub async fn token_for_account(
        &self,
        owner: impl IntoAccountAddress,
        token_id: TokenId,
    ) -> Result<Token, Error> {
        let owner = owner.into_account_address()?;
        debug!(%owner, token = %token_id.token_data_id.name, "Fetching token balance");

        let store = match self
            .rest
            .account_resource::<TokenStoreResource>(
                &owner,
                TOKEN_STORE_RESOURCE,
                self.ledger_version,
            )
            .await
        {
            Ok(resource) => resource.data,
            Err(e) if e.is_not_found() => return Ok(Token::zero(token_id)),
            Err(e) => return Err(e.into()),
        };

        match self
            .rest
            .table_item(
                &store.tokens.handle,
                TOKEN_ID_TYPE,
                TOKEN_TYPE,
                &token_id,
                self.ledger_version,
            )
            .await
        {
            Ok(token) => Ok(token),
            Err(e) if e.is_not_found() => Ok(Token::zero(token_id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn collections(&self, creator: &AccountAddress) -> Result<CollectionsResource, RestError> {
        self.rest
            .account_resource::<CollectionsResource>(
                creator,
                COLLECTIONS_RESOURCE,
                self.ledger_version,
            )
            .await
            .map(|resource| resource.data)
    }
}

impl std::fmt::Debug for TokenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenClient")
            .field("url", &self.rest.url())
            .field("ledger_version", &self.ledger_version)
            .finish()
    }
}

/// Collapse "does not exist" REST errors into a domain-specific error.
fn not_found_or(err: RestError, not_found: impl FnOnce() -> Error) -> Error {
    if err.is_not_found() {
        not_found()
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RetryConfig;
    use crate::mock::{self, MockNode};

    const CREATOR: &str = "0xaef92afd9bcce9a48a66ec4088b19624ebb5b3658e3d5669b3fa58412edec093";
    const COLLECTION: &str = "LifeMining Profile Collection V1";
    const TOKEN: &str = "LMProfileV1: 0x000001's Profile";

    fn client(node: &MockNode) -> TokenClient {
        TokenClient::new(Arc::new(RestClient::with_retry_config(
            node.node_url(),
            RetryConfig::none(),
        )))
    }

    fn creator() -> AccountAddress {
        CREATOR.parse().unwrap()
    }

    #[tokio::test]
    async fn test_collection_data_found() {
        let node = MockNode::start().await;
        node.add_collection(creator(), &mock::collection(COLLECTION));

        let data = client(&node)
            .collection_data(CREATOR, COLLECTION)
            .await
            .unwrap();
        assert_eq!(data.name, COLLECTION);
        assert_eq!(node.request_count(), 2);
    }

    #[tokio::test]
    async fn test_collection_data_creator_without_collections() {
        let node = MockNode::start().await;

        let err = client(&node)
            .collection_data(CREATOR, COLLECTION)
            .await
            .unwrap_err();
        match err {
            Error::CollectionNotFound {
                creator: c,
                collection,
            } => {
                assert_eq!(c, creator());
                assert_eq!(collection, COLLECTION);
            }
            other => panic!("Expected CollectionNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_collection_data_unknown_name() {
        let node = MockNode::start().await;
        node.add_collection(creator(), &mock::collection(COLLECTION));

        let err = client(&node)
            .collection_data(CREATOR, "Some Other Collection")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::CollectionNotFound { ref collection, .. } if collection == "Some Other Collection"));
    }

    #[tokio::test]
    async fn test_token_data_found() {
        let node = MockNode::start().await;
        node.add_collection(creator(), &mock::collection(COLLECTION));
        node.add_token_data(
            &TokenDataId::new(creator(), COLLECTION, TOKEN),
            &mock::token_data(TOKEN),
        );

        let data = client(&node)
            .token_data(CREATOR, COLLECTION, TOKEN)
            .await
            .unwrap();
        assert_eq!(data.name, TOKEN);
    }

    #[tokio::test]
    async fn test_token_data_missing() {
        let node = MockNode::start().await;
        node.add_collection(creator(), &mock::collection(COLLECTION));

        let err = client(&node)
            .token_data(CREATOR, COLLECTION, TOKEN)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TokenDataNotFound { ref name, .. } if name == TOKEN));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_invalid_creator_is_parse_error() {
        let node = MockNode::start().await;

        let err = client(&node)
            .collection_data("0xnot-an-address", COLLECTION)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ParseAddress(_)));
        assert_eq!(node.request_count(), 0);
    }

    #[tokio::test]
    async fn test_token_balance_without_store_is_zero() {
        let node = MockNode::start().await;

        let token = client(&node)
            .token(CREATOR, COLLECTION, TOKEN, 0)
            .await
            .unwrap();
        assert_eq!(token.amount, 0);
        assert_eq!(token.id.token_data_id.name, TOKEN);
    }

    #[tokio::test]
    async fn test_token_balance_held() {
        let node = MockNode::start().await;
        let id = TokenId::new(TokenDataId::new(creator(), COLLECTION, TOKEN), 0);
        let owner = AccountAddress::ONE;
        node.set_token_balance(owner, &id, 2);

        let token = client(&node)
            .token_for_account(owner, id.clone())
            .await
            .unwrap();
        assert_eq!(token.amount, 2);
        assert_eq!(token.id, id);

        let other = TokenId::new(TokenDataId::new(creator(), COLLECTION, "other"), 0);
        let token = client(&node).token_for_account(owner, other).await.unwrap();
        assert_eq!(token.amount, 0);
    }

    #[tokio::test]
    async fn test_server_errors_are_not_masked() {
        let node = MockNode::start().await;
        node.fail_next(1, 500);

        let err = client(&node)
            .collection_data(CREATOR, COLLECTION)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Rest(_)));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_at_version_pins_requests() {
        let node = MockNode::start().await;
        node.add_collection(creator(), &mock::collection(COLLECTION));

        client(&node)
            .at_version(42)
            .collection_data(CREATOR, COLLECTION)
            .await
            .unwrap();
        let requests = node.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.contains("ledger_version=42")));
    }
}
