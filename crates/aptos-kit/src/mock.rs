//! In-process fake full node and faucet for tests.
//!
//! [`MockNode`] serves the subset of the REST API this crate reads, plus
//! the faucet's `/mint`, from a local port. State is seeded directly:
//! resources, table items and transaction histories. Requests can be made
//! to fail and are counted.
//!
//! # Example
//!
//! ```rust,ignore
//! use aptos_kit::mock::{self, MockNode};
//!
//! #[tokio::test]
//! async fn test_lookup() {
//!     let node = MockNode::start().await;
//!     node.add_collection(creator, &mock::collection("Alice's"));
//!
//!     let aptos = node.client();
//!     let data = aptos.tokens().collection_data(creator, "Alice's").await.unwrap();
//! }
//! ```

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::debug;

use crate::client::{APTOS_COIN, Aptos, RetryConfig, coin_store_type};
use crate::tokens::{
    COLLECTIONS_RESOURCE, CollectionData, CollectionMutabilityConfig, PropertyMap, Royalty,
    TOKEN_STORE_RESOURCE, Token, TokenData, TokenDataId, TokenId, TokenMutabilityConfig,
};
use crate::types::AccountAddress;

/// Chain id reported by the mock ledger.
pub const CHAIN_ID: u8 = 4;

type Shared = Arc<Mutex<NodeState>>;

#[derive(Default)]
struct NodeState {
    resources: HashMap<(AccountAddress, String), Value>,
    tables: HashMap<String, Vec<(Value, Value)>>,
    /// Responses served in order; the last one repeats.
    transactions: HashMap<String, VecDeque<Value>>,
    fail_remaining: u32,
    fail_status: u16,
    requests: Vec<String>,
    ledger_version: u64,
    next_handle: u64,
    next_hash: u64,
}

impl NodeState {
    fn new_handle(&mut self) -> String {
        self.next_handle += 1;
        format!("0x{:x}", 0xa11ce000 + self.next_handle)
    }

    fn commit(&mut self) -> u64 {
        self.ledger_version += 1;
        self.ledger_version
    }

    fn insert_item(&mut self, handle: &str, key: Value, value: Value) {
        let items = self.tables.entry(handle.to_string()).or_default();
        match items.iter_mut().find(|(k, _)| *k == key) {
            Some(item) => item.1 = value,
            None => items.push((key, value)),
        }
    }

    /// Table handle stored at `field` of a resource, creating the resource
    /// with fresh handles when absent.
    fn handle_of(&mut self, address: AccountAddress, resource_type: &str, field: &str) -> String {
        let key = (address, resource_type.to_string());
        if let Some(handle) = self
            .resources
            .get(&key)
            .and_then(|data| data[field]["handle"].as_str())
        {
            return handle.to_string();
        }

        let data = if resource_type == COLLECTIONS_RESOURCE {
            json!({
                "collection_data": { "handle": self.new_handle() },
                "token_data": { "handle": self.new_handle() },
                "create_collection_events": { "counter": "0" },
                "create_token_data_events": { "counter": "0" },
                "mint_token_events": { "counter": "0" }
            })
        } else {
            json!({
                "tokens": { "handle": self.new_handle() },
                "direct_transfer": false,
                "deposit_events": { "counter": "0" },
                "withdraw_events": { "counter": "0" }
            })
        };
        let handle = data[field]["handle"].as_str().unwrap_or_default().to_string();
        self.resources.insert(key, data);
        handle
    }
}

fn lock(state: &Mutex<NodeState>) -> MutexGuard<'_, NodeState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// MockNode
// ============================================================================

/// A fake full node and faucet listening on `127.0.0.1`.
///
/// The server stops when the value is dropped.
pub struct MockNode {
    addr: SocketAddr,
    state: Shared,
    shutdown: Option<oneshot::Sender<()>>,
}

impl MockNode {
    /// Bind an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(NodeState {
            ledger_version: 1000,
            ..NodeState::default()
        }));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock node");
        let addr = listener.local_addr().expect("Mock node has no address");
        let (shutdown, rx) = oneshot::channel::<()>();

        let app = router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = rx.await;
                })
                .await;
        });

        debug!(%addr, "Mock node listening");

        Self {
            addr,
            state,
            shutdown: Some(shutdown),
        }
    }

    /// REST endpoint, ending in `/v1`.
    pub fn node_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Faucet endpoint.
    pub fn faucet_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client wired to this node and its faucet, without retries.
    pub fn client(&self) -> Aptos {
        Aptos::custom(self.node_url())
            .faucet_url(self.faucet_url())
            .retry_config(RetryConfig::none())
            .build()
    }

    /// Answer the next `count` requests with `status` and a plain-text body.
    pub fn fail_next(&self, count: u32, status: u16) {
        let mut state = lock(&self.state);
        state.fail_remaining = count;
        state.fail_status = status;
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        lock(&self.state).requests.len()
    }

    /// Received requests as `METHOD /path?query`, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        lock(&self.state).requests.clone()
    }

    // ========================================================================
    // Seeding
    // ========================================================================

    /// Store a resource under an account.
    pub fn set_resource(&self, address: AccountAddress, resource_type: &str, data: Value) {
        lock(&self.state)
            .resources
            .insert((address, resource_type.to_string()), data);
    }

    /// Store an item in a table.
    pub fn set_table_item(&self, handle: &str, key: Value, value: Value) {
        lock(&self.state).insert_item(handle, key, value);
    }

    /// Register a collection under `creator`.
    pub fn add_collection(&self, creator: AccountAddress, data: &CollectionData) {
        let mut state = lock(&self.state);
        let handle = state.handle_of(creator, COLLECTIONS_RESOURCE, "collection_data");
        state.insert_item(&handle, json!(data.name), to_json(data));
    }

    /// Register token metadata under its creator.
    pub fn add_token_data(&self, id: &TokenDataId, data: &TokenData) {
        let mut state = lock(&self.state);
        let handle = state.handle_of(id.creator, COLLECTIONS_RESOURCE, "token_data");
        state.insert_item(&handle, to_json(id), to_json(data));
    }

    /// Give `owner` `amount` of a token.
    pub fn set_token_balance(&self, owner: AccountAddress, id: &TokenId, amount: u64) {
        let mut state = lock(&self.state);
        let handle = state.handle_of(owner, TOKEN_STORE_RESOURCE, "tokens");
        let token = Token {
            id: id.clone(),
            amount,
            token_properties: PropertyMap::default(),
        };
        state.insert_item(&handle, to_json(id), to_json(&token));
    }

    /// Set the APT balance of an account, in octas.
    pub fn set_coin_balance(&self, owner: AccountAddress, octas: u64) {
        self.set_resource(owner, &coin_store_type(APTOS_COIN), coin_store(octas));
    }

    /// Serve `responses` for a transaction hash, one per poll; the last
    /// one keeps being served.
    pub fn add_transaction(&self, hash: &str, responses: Vec<Value>) {
        lock(&self.state)
            .transactions
            .insert(hash.to_string(), responses.into());
    }
}

impl Drop for MockNode {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

impl std::fmt::Debug for MockNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockNode").field("addr", &self.addr).finish()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// An unlimited collection with placeholder metadata.
pub fn collection(name: &str) -> CollectionData {
    CollectionData {
        description: format!("{name} description"),
        name: name.to_string(),
        uri: "https://example.com/collection.json".to_string(),
        supply: 1,
        maximum: 0,
        mutability_config: CollectionMutabilityConfig::default(),
    }
}

/// A one-of-one token with placeholder metadata and no properties.
pub fn token_data(name: &str) -> TokenData {
    TokenData {
        name: name.to_string(),
        description: format!("{name} description"),
        uri: "https://example.com/token.json".to_string(),
        supply: 1,
        maximum: 1,
        largest_property_version: 0,
        royalty: Royalty {
            payee_address: AccountAddress::ZERO,
            royalty_points_denominator: 0,
            royalty_points_numerator: 0,
        },
        mutability_config: TokenMutabilityConfig::default(),
        default_properties: PropertyMap::default(),
    }
}

/// A transaction still in the mempool.
pub fn pending_transaction(hash: &str) -> Value {
    json!({ "type": "pending_transaction", "hash": hash })
}

/// A committed user transaction.
pub fn committed_transaction(hash: &str, version: u64, success: bool, vm_status: &str) -> Value {
    json!({
        "type": "user_transaction",
        "hash": hash,
        "version": version.to_string(),
        "success": success,
        "vm_status": vm_status
    })
}

fn coin_store(octas: u64) -> Value {
    json!({
        "coin": { "value": octas.to_string() },
        "frozen": false,
        "deposit_events": { "counter": "0" },
        "withdraw_events": { "counter": "0" }
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// ============================================================================
// Routes
// ============================================================================

fn router(state: Shared) -> Router {
    Router::new()
        .route("/v1", get(ledger_info))
        .route(
            "/v1/accounts/{address}/resource/{resource_type}",
            get(account_resource),
        )
        .route("/v1/tables/{handle}/item", post(table_item))
        .route("/v1/transactions/by_hash/{hash}", get(transaction_by_hash))
        .route("/mint", post(mint))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

/// Log every request and apply injected failures.
async fn record(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let injected = {
        let mut state = lock(&state);
        state
            .requests
            .push(format!("{} {}", request.method(), request.uri()));
        if state.fail_remaining > 0 {
            state.fail_remaining -= 1;
            Some(state.fail_status)
        } else {
            None
        }
    };

    if let Some(status) = injected {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::SERVICE_UNAVAILABLE);
        let body = status.canonical_reason().unwrap_or("Injected failure");
        return (status, body.to_string()).into_response();
    }
    next.run(request).await
}

fn api_error(status: StatusCode, error_code: &str, message: impl Into<String>) -> Response {
    let body = json!({
        "message": message.into(),
        "error_code": error_code,
        "vm_error_code": null
    });
    (status, Json(body)).into_response()
}

async fn ledger_info(State(state): State<Shared>) -> Json<Value> {
    let version = lock(&state).ledger_version;
    Json(json!({
        "chain_id": CHAIN_ID,
        "epoch": "1",
        "ledger_version": version.to_string(),
        "oldest_ledger_version": "0",
        "ledger_timestamp": "1700000000000000",
        "node_role": "full_node",
        "oldest_block_height": "0",
        "block_height": (version / 2).to_string(),
        "git_hash": "mock"
    }))
}

async fn account_resource(
    State(state): State<Shared>,
    Path((address, resource_type)): Path<(String, String)>,
) -> Response {
    let Ok(address) = address.parse::<AccountAddress>() else {
        return api_error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            format!("Invalid account address: {address}"),
        );
    };

    let state = lock(&state);
    match state.resources.get(&(address, resource_type.clone())) {
        Some(data) => Json(json!({ "type": resource_type, "data": data })).into_response(),
        None => api_error(
            StatusCode::NOT_FOUND,
            "resource_not_found",
            format!(
                "Resource not found by Address({address}), Struct tag({resource_type}) and Ledger version({})",
                state.ledger_version
            ),
        ),
    }
}

#[derive(Deserialize)]
struct TableItemBody {
    key: Value,
}

async fn table_item(
    State(state): State<Shared>,
    Path(handle): Path<String>,
    Json(body): Json<TableItemBody>,
) -> Response {
    let state = lock(&state);
    let value = state
        .tables
        .get(&handle)
        .and_then(|items| items.iter().find(|(k, _)| *k == body.key))
        .map(|(_, v)| v.clone());

    match value {
        Some(value) => Json(value).into_response(),
        None => api_error(
            StatusCode::NOT_FOUND,
            "table_item_not_found",
            format!(
                "Table Item not found by Table handle({handle}), Table key({}) and Ledger version({})",
                body.key, state.ledger_version
            ),
        ),
    }
}

async fn transaction_by_hash(State(state): State<Shared>, Path(hash): Path<String>) -> Response {
    let mut state = lock(&state);
    let Some(responses) = state.transactions.get_mut(&hash) else {
        return api_error(
            StatusCode::NOT_FOUND,
            "transaction_not_found",
            format!("Transaction not found by Transaction hash({hash})"),
        );
    };

    let response = if responses.len() > 1 {
        responses.pop_front()
    } else {
        responses.front().cloned()
    };
    match response {
        Some(tx) => Json(tx).into_response(),
        None => api_error(
            StatusCode::NOT_FOUND,
            "transaction_not_found",
            format!("Transaction not found by Transaction hash({hash})"),
        ),
    }
}

#[derive(Deserialize)]
struct MintParams {
    amount: u64,
    address: String,
}

/// Credit the account and answer with one transaction hash that is pending
/// on the first poll and committed afterwards.
async fn mint(State(state): State<Shared>, Query(params): Query<MintParams>) -> Response {
    let Ok(address) = params.address.parse::<AccountAddress>() else {
        return (StatusCode::BAD_REQUEST, "invalid address").into_response();
    };

    let mut state = lock(&state);
    let coin_type = coin_store_type(APTOS_COIN);
    let balance = state
        .resources
        .get(&(address, coin_type.clone()))
        .and_then(|data| data["coin"]["value"].as_str())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);
    state.resources.insert(
        (address, coin_type),
        coin_store(balance.saturating_add(params.amount)),
    );

    state.next_hash += 1;
    let hash = format!("0x{:064x}", 0xfa0c_e700 + state.next_hash);
    let version = state.commit();
    state.transactions.insert(
        hash.clone(),
        VecDeque::from([
            pending_transaction(&hash),
            committed_transaction(&hash, version, true, "Executed successfully"),
        ]),
    );

    debug!(%address, amount = params.amount, %hash, "Mock faucet minted");
    Json(json!([hash])).into_response()
}
