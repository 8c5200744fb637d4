//! Low-level REST client for an Aptos full node.

use std::future::Future;
use std::time::Duration;

use reqwest::{Method, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::{RestError, is_retryable_status};
use crate::types::{AccountAddress, LedgerInfo, MoveResource, TableItemRequest, TransactionInfo};

/// Retry configuration for REST calls.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Initial delay in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Exponential backoff for the given (zero-based) attempt, capped.
    pub(crate) fn delay_for(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or runs out
/// of attempts.
pub(crate) async fn with_retry<T, F, Fut>(config: &RetryConfig, op: F) -> Result<T, RestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RestError>>,
{
    with_retry_if(config, RestError::is_retryable, op).await
}

/// [`with_retry`] with a caller-chosen notion of "retryable".
pub(crate) async fn with_retry_if<T, F, Fut>(
    config: &RetryConfig,
    should_retry: impl Fn(&RestError) -> bool,
    mut op: F,
) -> Result<T, RestError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RestError>>,
{
    let total_attempts = config.max_retries + 1;

    for attempt in 0..total_attempts {
        match op().await {
            Ok(result) => return Ok(result),
            Err(e) if should_retry(&e) && attempt < total_attempts - 1 => {
                let delay = config.delay_for(attempt);
                debug!(attempt, delay_ms = delay.as_millis() as u64, error = %e, "Retrying request");
                tokio::time::sleep(delay).await;
                continue;
            }
            Err(e) => return Err(e),
        }
    }

    Err(RestError::Timeout(total_attempts))
}

/// Error body returned by the REST API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct AptosErrorBody {
    message: String,
    error_code: String,
    #[serde(default)]
    vm_error_code: Option<u64>,
}

/// What a request was looking up, used to type "not found" errors.
#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Other,
    Resource {
        address: &'a AccountAddress,
        resource_type: &'a str,
    },
    TableItem {
        handle: &'a str,
    },
    Transaction {
        hash: &'a str,
    },
}

/// Low-level REST client for an Aptos full node.
///
/// The base URL always ends in `/v1`; it is appended when missing.
pub struct RestClient {
    url: String,
    client: reqwest::Client,
    retry_config: RetryConfig,
}

impl RestClient {
    /// Create a new REST client with the given node URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_retry_config(url, RetryConfig::default())
    }

    /// Create a new REST client with custom retry configuration.
    pub fn with_retry_config(url: impl Into<String>, retry_config: RetryConfig) -> Self {
        Self {
            url: normalize_node_url(&url.into()),
            client: reqwest::Client::new(),
            retry_config,
        }
    }

    /// Get the node URL (ending in `/v1`).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The retry policy in use.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }

    fn endpoint(&self, path: &str, ledger_version: Option<u64>) -> Result<Url, RestError> {
        let raw = format!("{}{}", self.url, path);
        let mut url = Url::parse(&raw).map_err(|e| RestError::InvalidUrl(format!("{raw}: {e}")))?;
        if let Some(version) = ledger_version {
            url.query_pairs_mut()
                .append_pair("ledger_version", &version.to_string());
        }
        Ok(url)
    }

    /// Make a request with retries and decode the JSON response.
    async fn request<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        target: Target<'_>,
    ) -> Result<R, RestError> {
        with_retry(&self.retry_config, || {
            self.try_request(method.clone(), url.clone(), body, target)
        })
        .await
    }

    /// Single attempt at a request.
    async fn try_request<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
        target: Target<'_>,
    ) -> Result<R, RestError> {
        debug!(%method, %url, "REST request");

        let mut request = self
            .client
            .request(method, url)
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        if !(200..300).contains(&status) {
            return Err(parse_error_response(status, &text, target));
        }

        serde_json::from_str(&text).map_err(RestError::Json)
    }

    // ========================================================================
    // High-level REST methods
    // ========================================================================

    /// `GET {url}{path}` and decode the JSON body.
    ///
    /// Error bodies decode into [`RestError::Api`]; only the typed methods
    /// below produce the `*NotFound` variants.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, RestError> {
        let url = self.endpoint(path, None)?;
        self.request::<(), _>(Method::GET, url, None, Target::Other)
            .await
    }

    /// `POST {url}{path}` with a JSON body and decode the JSON response.
    pub async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, RestError> {
        let url = self.endpoint(path, None)?;
        self.request(Method::POST, url, Some(body), Target::Other)
            .await
    }

    /// Ledger summary (`GET /v1`).
    pub async fn ledger_info(&self) -> Result<LedgerInfo, RestError> {
        self.get_json("").await
    }

    /// Read a resource stored under an account.
    ///
    /// `ledger_version` pins the read to a historical version.
    pub async fn account_resource<T: DeserializeOwned>(
        &self,
        address: &AccountAddress,
        resource_type: &str,
        ledger_version: Option<u64>,
    ) -> Result<MoveResource<T>, RestError> {
        let url = self.endpoint(
            &format!("/accounts/{}/resource/{}", address, resource_type),
            ledger_version,
        )?;
        self.request::<(), _>(
            Method::GET,
            url,
            None,
            Target::Resource {
                address,
                resource_type,
            },
        )
        .await
    }

    /// Read one item of an on-chain table.
    pub async fn table_item<K: Serialize, V: DeserializeOwned>(
        &self,
        handle: &str,
        key_type: &str,
        value_type: &str,
        key: K,
        ledger_version: Option<u64>,
    ) -> Result<V, RestError> {
        let url = self.endpoint(&format!("/tables/{}/item", handle), ledger_version)?;
        let body = TableItemRequest {
            key_type: key_type.to_string(),
            value_type: value_type.to_string(),
            key,
        };
        self.request(Method::POST, url, Some(&body), Target::TableItem { handle })
            .await
    }

    /// Look up a transaction, pending or committed, by hash.
    pub async fn transaction_by_hash(&self, hash: &str) -> Result<TransactionInfo, RestError> {
        let url = self.endpoint(&format!("/transactions/by_hash/{}", hash), None)?;
        self.request::<(), _>(Method::GET, url, None, Target::Transaction { hash })
            .await
    }
}

/// Append `/v1` unless the URL already ends with it.
fn normalize_node_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.ends_with("/v1") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v1")
    }
}

/// Turn a non-2xx response into a typed error.
fn parse_error_response(status: u16, body: &str, target: Target<'_>) -> RestError {
    let Ok(error) = serde_json::from_str::<AptosErrorBody>(body) else {
        return RestError::network(
            format!("HTTP {}: {}", status, body),
            Some(status),
            is_retryable_status(status),
        );
    };

    match (error.error_code.as_str(), target) {
        ("account_not_found", Target::Resource { address, .. }) => {
            RestError::AccountNotFound(*address)
        }
        (
            "resource_not_found",
            Target::Resource {
                address,
                resource_type,
            },
        ) => RestError::ResourceNotFound {
            address: *address,
            resource_type: resource_type.to_string(),
        },
        ("table_item_not_found", Target::TableItem { handle }) => RestError::TableItemNotFound {
            handle: handle.to_string(),
            message: error.message,
        },
        ("transaction_not_found", Target::Transaction { hash }) => {
            RestError::TransactionNotFound(hash.to_string())
        }
        _ => RestError::Api {
            status,
            error_code: error.error_code,
            message: error.message,
            vm_error_code: error.vm_error_code,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockNode;

    fn error_body(code: &str, message: &str) -> String {
        serde_json::json!({
            "message": message,
            "error_code": code,
            "vm_error_code": null
        })
        .to_string()
    }

    #[test]
    fn test_normalize_node_url() {
        assert_eq!(
            normalize_node_url("https://fullnode.testnet.aptoslabs.com"),
            "https://fullnode.testnet.aptoslabs.com/v1"
        );
        assert_eq!(
            normalize_node_url("https://fullnode.testnet.aptoslabs.com/v1/"),
            "https://fullnode.testnet.aptoslabs.com/v1"
        );
        assert_eq!(normalize_node_url("http://127.0.0.1:8080/"), "http://127.0.0.1:8080/v1");
    }

    #[test]
    fn test_retry_delay_is_capped() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for(0), Duration::from_millis(500));
        assert_eq!(config.delay_for(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for(10), Duration::from_millis(5000));
    }

    #[test]
    fn test_endpoint_with_ledger_version() {
        let client = RestClient::new("https://example.com");
        let url = client
            .endpoint("/accounts/0x1/resource/0x1::account::Account", Some(7))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/v1/accounts/0x1/resource/0x1::account::Account?ledger_version=7"
        );
    }

    #[test]
    fn test_parse_error_resource_not_found() {
        let address = AccountAddress::ONE;
        let err = parse_error_response(
            404,
            &error_body("resource_not_found", "Resource not found"),
            Target::Resource {
                address: &address,
                resource_type: "0x3::token::Collections",
            },
        );
        match err {
            RestError::ResourceNotFound {
                address: a,
                resource_type,
            } => {
                assert_eq!(a, address);
                assert_eq!(resource_type, "0x3::token::Collections");
            }
            other => panic!("Expected ResourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_account_not_found() {
        let address = AccountAddress::THREE;
        let err = parse_error_response(
            404,
            &error_body("account_not_found", "Account not found"),
            Target::Resource {
                address: &address,
                resource_type: "0x1::account::Account",
            },
        );
        assert!(matches!(err, RestError::AccountNotFound(a) if a == address));
    }

    #[test]
    fn test_parse_error_table_item_not_found() {
        let err = parse_error_response(
            404,
            &error_body("table_item_not_found", "Table Item not found by Table handle(0xab)"),
            Target::TableItem { handle: "0xab" },
        );
        assert!(matches!(err, RestError::TableItemNotFound { ref handle, .. } if handle == "0xab"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_error_transaction_not_found() {
        let err = parse_error_response(
            404,
            &error_body("transaction_not_found", "Transaction not found"),
            Target::Transaction { hash: "0xfeed" },
        );
        assert!(matches!(err, RestError::TransactionNotFound(ref h) if h == "0xfeed"));
    }

    #[test]
    fn test_parse_error_mismatched_target_falls_back_to_api() {
        let err = parse_error_response(
            404,
            &error_body("table_item_not_found", "nope"),
            Target::Other,
        );
        match err {
            RestError::Api {
                status, error_code, ..
            } => {
                assert_eq!(status, 404);
                assert_eq!(error_code, "table_item_not_found");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_non_json_body() {
        let err = parse_error_response(502, "Bad Gateway", Target::Other);
        match &err {
            RestError::Network {
                status_code,
                retryable,
                message,
            } => {
                assert_eq!(*status_code, Some(502));
                assert!(*retryable);
                assert!(message.contains("Bad Gateway"));
            }
            other => panic!("Expected Network error, got {other:?}"),
        }
        assert!(err.is_retryable());

        let err = parse_error_response(400, "bad", Target::Other);
        assert!(!err.is_retryable());
    }

    // ========================================================================
    // Against the in-process mock node
    // ========================================================================

    fn fast_retries() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            initial_delay_ms: 1,
            max_delay_ms: 5,
        }
    }

    #[tokio::test]
    async fn test_ledger_info() {
        let node = MockNode::start().await;
        let client = RestClient::new(node.node_url());
        let info = client.ledger_info().await.unwrap();
        assert_eq!(info.chain_id, 4);
        assert_eq!(info.node_role, "full_node");
    }

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let node = MockNode::start().await;
        node.fail_next(2, 503);
        let client = RestClient::with_retry_config(node.node_url(), fast_retries());

        let info = client.ledger_info().await.unwrap();
        assert_eq!(info.chain_id, 4);
        assert_eq!(node.request_count(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let node = MockNode::start().await;
        node.fail_next(10, 503);
        let client = RestClient::with_retry_config(node.node_url(), fast_retries());

        let err = client.ledger_info().await.unwrap_err();
        assert_eq!(err.status_code(), Some(503));
        assert_eq!(node.request_count(), 4);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let node = MockNode::start().await;
        let client = RestClient::with_retry_config(node.node_url(), fast_retries());

        let err = client
            .transaction_by_hash("0xdeadbeef")
            .await
            .unwrap_err();
        assert!(matches!(err, RestError::TransactionNotFound(_)));
        assert_eq!(node.request_count(), 1);
    }

    #[tokio::test]
    async fn test_account_resource_roundtrip() {
        let node = MockNode::start().await;
        let address = AccountAddress::ONE;
        node.set_resource(
            address,
            "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>",
            serde_json::json!({ "coin": { "value": "7" }, "frozen": false }),
        );
        let client = RestClient::new(node.node_url());

        let resource: MoveResource<serde_json::Value> = client
            .account_resource(
                &address,
                "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>",
                None,
            )
            .await
            .unwrap();
        assert_eq!(
            resource.resource_type,
            "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>"
        );
        assert_eq!(resource.data["coin"]["value"], "7");
    }

    #[tokio::test]
    async fn test_get_json_untyped_not_found_is_api_error() {
        let node = MockNode::start().await;
        let client = RestClient::new(node.node_url());

        let raw: serde_json::Value = client.get_json("").await.unwrap();
        assert_eq!(raw["chain_id"], 4);

        let err = client
            .get_json::<serde_json::Value>("/accounts/0x1/resource/0x1::missing::Thing")
            .await
            .unwrap_err();
        match err {
            RestError::Api { status, error_code, .. } => {
                assert_eq!(status, 404);
                assert_eq!(error_code, "resource_not_found");
            }
            other => panic!("Expected API error, got {other:?}"),
        }
    }
}
