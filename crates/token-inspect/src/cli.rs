//! Command-line argument parsing with clap.

use aptos_kit::{AccountAddress, Aptos, AptosBuilder, LocalAccount};
use clap::{Parser, Subcommand};

use crate::error::InspectError;
use crate::lookup::LookupTarget;

/// Account that created the profile collection.
pub const DEFAULT_CREATOR: &str =
    "0xaef92afd9bcce9a48a66ec4088b19624ebb5b3658e3d5669b3fa58412edec093";
/// Collection looked up by default.
pub const DEFAULT_COLLECTION: &str = "LifeMining Profile Collection V1";
/// Token looked up by default.
pub const DEFAULT_TOKEN: &str = "LMProfileV1: 0x000001's Profile";

/// Inspect token collections and tokens on Aptos.
#[derive(Parser, Debug, Clone)]
#[command(name = "token-inspect")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Network preset (mainnet, testnet, devnet, local) or node URL.
    #[arg(short, long, env = "APTOS_NETWORK", default_value = "testnet")]
    pub network: String,

    /// Faucet URL, overriding the network preset.
    #[arg(long, env = "APTOS_FAUCET_URL")]
    pub faucet_url: Option<String>,

    /// Hex Ed25519 private key of the account used by `fund`.
    #[arg(long, env = "APTOS_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Address of a rotated account; derived from the key when omitted.
    #[arg(long, env = "APTOS_ACCOUNT_ADDRESS")]
    pub account_address: Option<String>,

    /// Address of the collection creator.
    #[arg(long, env = "TOKEN_CREATOR", default_value = DEFAULT_CREATOR)]
    pub creator: String,

    /// Collection name.
    #[arg(long, env = "TOKEN_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Token name.
    #[arg(long = "token", env = "TOKEN_NAME", default_value = DEFAULT_TOKEN)]
    pub token: String,

    /// Subcommand to execute; `lookup` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Look up the collection, then the token, and print both outcomes.
    Lookup,

    /// Show how many of the token an account holds.
    TokenBalance {
        /// Holder address; the creator when omitted.
        owner: Option<String>,

        /// Property version of the token.
        #[arg(long, default_value_t = 0)]
        property_version: u64,
    },

    /// Show the APT balance of an account.
    CoinBalance {
        /// Account address.
        address: String,
    },

    /// Fund an account from the faucet.
    Fund {
        /// Account address; the `--private-key` account when omitted.
        address: Option<String>,

        /// Amount with units, e.g. "1 APT" or "5000 octas".
        #[arg(long, default_value = "1 APT")]
        amount: String,
    },

    /// Show the ledger summary.
    Ledger,
}

impl Cli {
    /// Read-only client from the network and faucet options.
    ///
    /// The key options are ignored, so a bad key never blocks a read.
    pub fn read_client(&self) -> Result<Aptos, InspectError> {
        Ok(self.builder()?.build())
    }

    /// Client carrying the `--private-key` account, for `fund`.
    pub fn funding_client(&self) -> Result<Aptos, InspectError> {
        let mut builder = self.builder()?;
        match (&self.private_key, &self.account_address) {
            (Some(key), address) => {
                let account = LocalAccount::from_hex(key, address.as_deref())?;
                builder = builder.account(account);
            }
            (None, Some(_)) => {
                return Err(InspectError::Config(
                    "--account-address needs --private-key".into(),
                ));
            }
            (None, None) => {}
        }
        Ok(builder.build())
    }

    fn builder(&self) -> Result<AptosBuilder, InspectError> {
        let mut builder = Aptos::builder(&self.network)?;
        if let Some(url) = &self.faucet_url {
            builder = builder.faucet_url(url);
        }
        Ok(builder)
    }

    /// The creator, collection and token to look up.
    pub fn target(&self) -> Result<LookupTarget, InspectError> {
        Ok(LookupTarget {
            creator: parse_address("--creator", &self.creator)?,
            collection: self.collection.clone(),
            token: self.token.clone(),
        })
    }
}

/// Parse an address argument, naming the argument on failure.
pub fn parse_address(arg: &str, value: &str) -> Result<AccountAddress, InspectError> {
    value
        .parse()
        .map_err(|e| InspectError::Config(format!("invalid {arg}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_lookup_of_profile_token() {
        let cli = Cli::parse_from(["token-inspect", "--network", "testnet"]);
        assert_eq!(cli.command, None);

        let target = cli.target().unwrap();
        assert_eq!(target.creator.to_string(), DEFAULT_CREATOR);
        assert_eq!(target.collection, DEFAULT_COLLECTION);
        assert_eq!(target.token, DEFAULT_TOKEN);
    }

    #[test]
    fn cli_parses_token_balance() {
        let cli = Cli::parse_from([
            "token-inspect",
            "token-balance",
            "0x1",
            "--property-version",
            "2",
        ]);
        assert_eq!(
            cli.command,
            Some(Commands::TokenBalance {
                owner: Some("0x1".to_string()),
                property_version: 2,
            })
        );
    }

    #[test]
    fn cli_parses_fund_with_default_amount() {
        let cli = Cli::parse_from(["token-inspect", "fund", "0x1"]);
        match cli.command {
            Some(Commands::Fund { address, amount }) => {
                assert_eq!(address.as_deref(), Some("0x1"));
                assert_eq!(amount, "1 APT");
            }
            other => panic!("expected fund command, got {other:?}"),
        }
    }

    #[test]
    fn cli_client_for_url_network() {
        let cli = Cli::parse_from([
            "token-inspect",
            "--network",
            "http://127.0.0.1:9999",
            "--faucet-url",
            "http://127.0.0.1:9998",
        ]);
        let aptos = cli.read_client().unwrap();
        assert_eq!(aptos.node_url(), "http://127.0.0.1:9999/v1");
        assert_eq!(aptos.faucet().unwrap().url(), "http://127.0.0.1:9998");
    }

    #[test]
    fn cli_rejects_bad_creator() {
        let cli = Cli::parse_from(["token-inspect", "--creator", "alice.testnet"]);
        let err = cli.target().unwrap_err();
        assert!(err.to_string().contains("invalid --creator"));
    }

    #[test]
    fn cli_rejects_unknown_network() {
        let cli = Cli::parse_from(["token-inspect", "--network", "moonnet"]);
        assert!(cli.read_client().is_err());
    }

    #[test]
    fn cli_read_client_ignores_bad_key() {
        let cli = Cli::parse_from(["token-inspect", "--private-key", "not-hex"]);
        assert!(cli.read_client().unwrap().account().is_none());
        assert!(cli.funding_client().is_err());
    }

    #[test]
    fn cli_funding_client_rejects_address_without_key() {
        let cli = Cli::parse_from(["token-inspect", "--account-address", "0x1"]);
        assert!(cli.read_client().is_ok());
        let err = cli.funding_client().unwrap_err();
        assert!(matches!(err, InspectError::Config(_)));
    }

    #[test]
    fn cli_funding_client_uses_rotated_address() {
        let key = LocalAccount::generate().private_key().to_hex();
        let cli = Cli::parse_from([
            "token-inspect",
            "--private-key",
            key.as_str(),
            "--account-address",
            "0x1",
        ]);
        let aptos = cli.funding_client().unwrap();
        assert_eq!(aptos.account_address(), Some(AccountAddress::ONE));
    }
}
