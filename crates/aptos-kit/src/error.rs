//! Error types for aptos-kit.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) — Main error type, returned by most operations
//!   - [`RestError`] — REST API errors (network, resource not found, etc.)
//!   - [`ParseAddressError`] — Invalid account address
//!   - [`ParseKeyError`] — Invalid key encoding
//!   - [`ParseAmountError`] — Invalid APT amount
//!
//! # Error Handling Examples
//!
//! ## Pattern Matching on Lookup Errors
//!
//! ```rust,no_run
//! use aptos_kit::*;
//!
//! # async fn example() -> Result<(), Error> {
//! let aptos = Aptos::testnet().build();
//! let tokens = aptos.tokens();
//!
//! match tokens.collection_data("0x1", "Missing Collection").await {
//!     Ok(collection) => println!("Supply: {}", collection.supply),
//!     Err(Error::CollectionNotFound { collection, .. }) => {
//!         println!("Collection {} doesn't exist", collection);
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Checking Retryable Errors
//!
//! ```rust,no_run
//! use aptos_kit::RestError;
//!
//! fn should_retry(err: &RestError) -> bool {
//!     err.is_retryable()
//! }
//! ```

use thiserror::Error;

use crate::types::AccountAddress;

/// Error parsing an account address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("Account address is empty")]
    Empty,

    #[error("Account address '{0}' is too long (max 64 hex characters)")]
    TooLong(String),

    #[error("Account address '{0}' is not valid hex")]
    InvalidHex(String),
}

/// Error parsing a public or private key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid curve point: key bytes do not represent a valid point on the curve")]
    InvalidCurvePoint,
}

/// Error parsing an APT amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("Ambiguous amount '{0}'. Use explicit units like '1 APT' or '1000 octas'")]
    AmbiguousAmount(String),

    #[error("Invalid amount format: '{0}'")]
    InvalidFormat(String),

    #[error("Invalid number in amount: '{0}'")]
    InvalidNumber(String),

    #[error("Amount overflow: value too large")]
    Overflow,
}

// ============================================================================
// REST Errors
// ============================================================================

/// Errors returned by the full node REST API or the faucet.
#[derive(Debug, Error)]
pub enum RestError {
    // ─── Network/Transport ───
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        retryable: bool,
    },

    #[error("Timeout after {0} retries")]
    Timeout(u32),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // ─── Generic API Error ───
    #[error("API error ({status}, {error_code}): {message}")]
    Api {
        status: u16,
        error_code: String,
        message: String,
        vm_error_code: Option<u64>,
    },

    // ─── Not Found ───
    #[error("Account not found: {0}")]
    AccountNotFound(AccountAddress),

    #[error("Resource {resource_type} not found on {address}")]
    ResourceNotFound {
        address: AccountAddress,
        resource_type: String,
    },

    #[error("Table item not found in {handle}: {message}")]
    TableItemNotFound { handle: String, message: String },

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),
}

impl RestError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            RestError::Http(e) => e.is_timeout() || e.is_connect(),
            RestError::Timeout(_) => true,
            RestError::Network { retryable, .. } => *retryable,
            RestError::Api { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>, status_code: Option<u16>, retryable: bool) -> Self {
        RestError::Network {
            message: message.into(),
            status_code,
            retryable,
        }
    }

    /// Returns true if the requested thing (account, resource, table item,
    /// transaction) does not exist on chain.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RestError::AccountNotFound(_)
                | RestError::ResourceNotFound { .. }
                | RestError::TableItemNotFound { .. }
                | RestError::TransactionNotFound(_)
        )
    }

    /// The HTTP status code, when the error came from an HTTP response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RestError::Http(e) => e.status().map(|s| s.as_u16()),
            RestError::Network { status_code, .. } => *status_code,
            RestError::Api { status, .. } => Some(*status),
            RestError::AccountNotFound(_)
            | RestError::ResourceNotFound { .. }
            | RestError::TableItemNotFound { .. }
            | RestError::TransactionNotFound(_) => Some(404),
            _ => None,
        }
    }
}

/// Request timeout, rate limiting and server-side failures are transient.
pub(crate) fn is_retryable_status(status: u16) -> bool {
    status == 408 || status == 429 || (500..600).contains(&status)
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for aptos-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No faucet configured for this network. Call .faucet_url() on AptosBuilder.")]
    NoFaucet,

    // ─── Parsing ───
    #[error(transparent)]
    ParseAddress(#[from] ParseAddressError),

    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),

    #[error(transparent)]
    ParseAmount(#[from] ParseAmountError),

    // ─── REST ───
    #[error(transparent)]
    Rest(#[from] RestError),

    // ─── Tokens ───
    #[error("Collection '{collection}' not found for creator {creator}")]
    CollectionNotFound {
        creator: AccountAddress,
        collection: String,
    },

    #[error("Token '{name}' not found in collection '{collection}' of creator {creator}")]
    TokenDataNotFound {
        creator: AccountAddress,
        collection: String,
        name: String,
    },

    #[error("Invalid property '{key}': {message}")]
    Property { key: String, message: String },

    // ─── Transactions ───
    #[error("Transaction {hash} failed: {vm_status}")]
    TransactionFailed { hash: String, vm_status: String },

    #[error("Timed out after {secs}s waiting for transaction {hash}")]
    WaitTimeout { hash: String, secs: u64 },

    // ─── Serialization ───
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if the lookup failed because the entity does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::CollectionNotFound { .. } | Error::TokenDataNotFound { .. } => true,
            Error::Rest(e) => e.is_not_found(),
            _ => false,
        }
    }
}
