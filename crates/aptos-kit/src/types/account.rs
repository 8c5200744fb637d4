//! Local accounts built from an Ed25519 key pair.

use std::fmt;

use super::{AccountAddress, AuthenticationKey, Ed25519PrivateKey, Ed25519PublicKey};

/// An account whose private key is held in memory.
///
/// The address defaults to the one derived from the key's authentication
/// key. Accounts that rotated their key keep their original address, so
/// pass it explicitly.
///
/// ```
/// use aptos_kit::{Ed25519PrivateKey, LocalAccount};
///
/// let key = Ed25519PrivateKey::generate();
/// let account = LocalAccount::from_private_key(key, None);
/// assert_eq!(
///     account.address(),
///     account.authentication_key().account_address()
/// );
/// ```
#[derive(Clone)]
pub struct LocalAccount {
    address: AccountAddress,
    private_key: Ed25519PrivateKey,
    public_key: Ed25519PublicKey,
}

impl LocalAccount {
    /// Build an account from a key and an optional explicit address.
    pub fn from_private_key(
        private_key: Ed25519PrivateKey,
        address: Option<AccountAddress>,
    ) -> Self {
        let public_key = private_key.public_key();
        let address =
            address.unwrap_or_else(|| public_key.authentication_key().account_address());
        Self {
            address,
            private_key,
            public_key,
        }
    }

    /// Build an account from a hex key, and optionally a hex address.
    pub fn from_hex(
        private_key: &str,
        address: Option<&str>,
    ) -> Result<Self, crate::error::Error> {
        let private_key: Ed25519PrivateKey = private_key.parse()?;
        let address = address.map(str::parse::<AccountAddress>).transpose()?;
        Ok(Self::from_private_key(private_key, address))
    }

    /// Generate an account with a fresh random key.
    pub fn generate() -> Self {
        Self::from_private_key(Ed25519PrivateKey::generate(), None)
    }

    /// The account address.
    pub fn address(&self) -> AccountAddress {
        self.address
    }

    /// The public key.
    pub fn public_key(&self) -> &Ed25519PublicKey {
        &self.public_key
    }

    /// The private key.
    pub fn private_key(&self) -> &Ed25519PrivateKey {
        &self.private_key
    }

    /// Authentication key of the current key pair.
    pub fn authentication_key(&self) -> AuthenticationKey {
        self.public_key.authentication_key()
    }
}

impl fmt::Debug for LocalAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalAccount")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}
