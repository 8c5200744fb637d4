//! Views of full node REST API responses.
//!
//! The REST API encodes every `u64` as a decimal string; fields here are
//! exposed as numbers via `serde_with::DisplayFromStr`.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use super::Octas;

/// Ledger summary returned by `GET /v1`.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerInfo {
    pub chain_id: u8,
    #[serde_as(as = "DisplayFromStr")]
    pub epoch: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub ledger_version: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub oldest_ledger_version: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub ledger_timestamp: u64,
    pub node_role: String,
    #[serde_as(as = "DisplayFromStr")]
    pub oldest_block_height: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub block_height: u64,
    #[serde(default)]
    pub git_hash: Option<String>,
}

/// A Move resource stored under an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResource<T> {
    /// Fully qualified struct tag, e.g. `0x3::token::Collections`.
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: T,
}

/// Reference to an on-chain table, as embedded in resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableHandle {
    pub handle: String,
}

/// Body of `POST /v1/tables/{handle}/item`.
#[derive(Debug, Clone, Serialize)]
pub struct TableItemRequest<K> {
    pub key_type: String,
    pub value_type: String,
    pub key: K,
}

/// `0x1::coin::CoinStore<T>` resource data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinStore {
    pub coin: Coin,
    #[serde(default)]
    pub frozen: bool,
}

/// `0x1::coin::Coin<T>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub value: Octas,
}

/// The parts of a transaction the waiter inspects.
///
/// Pending transactions carry neither `version` nor `success`.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInfo {
    /// `pending_transaction`, `user_transaction`, `genesis_transaction`, ...
    #[serde(rename = "type")]
    pub kind: String,
    pub hash: String,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
}

impl TransactionInfo {
    /// True while the transaction sits in the mempool.
    pub fn is_pending(&self) -> bool {
        self.kind == "pending_transaction"
    }

    /// True once committed with a successful VM status.
    pub fn is_success(&self) -> bool {
        !self.is_pending() && self.success.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_info_from_api_json() {
        let json = serde_json::json!({
            "chain_id": 2,
            "epoch": "7800",
            "ledger_version": "1234567",
            "oldest_ledger_version": "0",
            "ledger_timestamp": "1700000000000000",
            "node_role": "full_node",
            "oldest_block_height": "0",
            "block_height": "98765",
            "git_hash": "abc"
        });
        let info: LedgerInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.chain_id, 2);
        assert_eq!(info.ledger_version, 1_234_567);
        assert_eq!(info.block_height, 98_765);
    }

    #[test]
    fn test_transaction_info_pending_and_committed() {
        let pending: TransactionInfo = serde_json::from_value(serde_json::json!({
            "type": "pending_transaction",
            "hash": "0xabc"
        }))
        .unwrap();
        assert!(pending.is_pending());
        assert!(!pending.is_success());
        assert_eq!(pending.version, None);

        let committed: TransactionInfo = serde_json::from_value(serde_json::json!({
            "type": "user_transaction",
            "hash": "0xabc",
            "version": "42",
            "success": true,
            "vm_status": "Executed successfully"
        }))
        .unwrap();
        assert!(!committed.is_pending());
        assert!(committed.is_success());
        assert_eq!(committed.version, Some(42));
    }

    #[test]
    fn test_coin_store() {
        let resource: MoveResource<CoinStore> = serde_json::from_value(serde_json::json!({
            "type": "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>",
            "data": {
                "coin": { "value": "150000000" },
                "frozen": false,
                "deposit_events": { "counter": "1" }
            }
        }))
        .unwrap();
        assert_eq!(resource.data.coin.value, Octas::octas(150_000_000));
    }
}
