//! Network identification for Aptos.

use std::fmt;
use std::str::FromStr;

/// The Aptos network the client is connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Aptos mainnet (production network).
    Mainnet,
    /// Aptos testnet.
    #[default]
    Testnet,
    /// Aptos devnet (reset weekly).
    Devnet,
    /// A local node started with `aptos node run-local-testnet`.
    Local,
    /// Custom endpoint with no known faucet.
    Custom,
}

impl Network {
    /// Full node REST endpoint for the preset, `None` for [`Network::Custom`].
    pub fn node_url(&self) -> Option<&'static str> {
        match self {
            Network::Mainnet => Some("https://fullnode.mainnet.aptoslabs.com/v1"),
            Network::Testnet => Some("https://fullnode.testnet.aptoslabs.com/v1"),
            Network::Devnet => Some("https://fullnode.devnet.aptoslabs.com/v1"),
            Network::Local => Some("http://127.0.0.1:8080/v1"),
            Network::Custom => None,
        }
    }

    /// Faucet endpoint for the preset. Mainnet has none.
    pub fn faucet_url(&self) -> Option<&'static str> {
        match self {
            Network::Testnet => Some("https://faucet.testnet.aptoslabs.com"),
            Network::Devnet => Some("https://faucet.devnet.aptoslabs.com"),
            Network::Local => Some("http://127.0.0.1:8081"),
            Network::Mainnet | Network::Custom => None,
        }
    }

    /// Returns true if this is mainnet.
    pub fn is_mainnet(&self) -> bool {
        matches!(self, Network::Mainnet)
    }

    /// Returns the network identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
            Network::Local => "local",
            Network::Custom => "custom",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            "local" | "localnet" => Ok(Network::Local),
            "custom" => Ok(Network::Custom),
            other => Err(format!("unknown network '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_display() {
        assert_eq!(Network::Mainnet.to_string(), "mainnet");
        assert_eq!(Network::Testnet.to_string(), "testnet");
        assert_eq!(Network::Devnet.to_string(), "devnet");
        assert_eq!(Network::Local.to_string(), "local");
        assert_eq!(Network::Custom.to_string(), "custom");
    }

    #[test]
    fn test_network_parse() {
        assert_eq!("Testnet".parse::<Network>(), Ok(Network::Testnet));
        assert_eq!("localnet".parse::<Network>(), Ok(Network::Local));
        assert!("moonnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_faucets() {
        assert!(Network::Mainnet.faucet_url().is_none());
        assert_eq!(
            Network::Testnet.faucet_url(),
            Some("https://faucet.testnet.aptoslabs.com")
        );
        assert!(Network::Custom.node_url().is_none());
    }

    #[test]
    fn test_default_is_testnet() {
        assert_eq!(Network::default(), Network::Testnet);
    }
}
