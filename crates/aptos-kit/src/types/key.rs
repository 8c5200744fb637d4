//! Ed25519 key types and authentication keys for Aptos accounts.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};

use crate::error::ParseKeyError;

use super::AccountAddress;

/// Signature scheme identifiers appended when deriving authentication keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Scheme {
    /// Single Ed25519 key.
    Ed25519 = 0,
    /// K-of-N Ed25519 multisig.
    MultiEd25519 = 1,
}

/// Decode `0x`-prefixed or bare hex.
fn decode_hex(s: &str) -> Result<Vec<u8>, ParseKeyError> {
    let digits = s.trim().strip_prefix("0x").unwrap_or(s.trim());
    hex::decode(digits).map_err(|e| ParseKeyError::InvalidHex(e.to_string()))
}

// ============================================================================
// Public Key
// ============================================================================

/// Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

impl Ed25519PublicKey {
    /// Key length in bytes.
    pub const LENGTH: usize = 32;

    /// Create a public key from raw bytes, checking it is a curve point.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, ParseKeyError> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| ParseKeyError::InvalidCurvePoint)?;
        Ok(Self(bytes))
    }

    /// Get the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive the single-key authentication key for this public key.
    pub fn authentication_key(&self) -> AuthenticationKey {
        AuthenticationKey::ed25519(self)
    }
}

impl FromStr for Ed25519PublicKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = decode_hex(s)?;
        let bytes: [u8; 32] = data
            .as_slice()
            .try_into()
            .map_err(|_| ParseKeyError::InvalidLength {
                expected: Self::LENGTH,
                actual: data.len(),
            })?;
        Self::from_bytes(bytes)
    }
}

impl Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", self)
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Private Key
// ============================================================================

/// Ed25519 private key (32-byte seed).
///
/// Accepts hex with or without `0x`. A 64-byte expanded key (seed followed by
/// public key, as some wallets export) is reduced to its seed.
#[derive(Clone)]
pub struct Ed25519PrivateKey([u8; 32]);

impl Ed25519PrivateKey {
    /// Seed length in bytes.
    pub const LENGTH: usize = 32;

    /// Generate a new random key.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self(signing_key.to_bytes())
    }

    /// Create a private key from a raw 32-byte seed.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw seed bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        let signing_key = SigningKey::from_bytes(&self.0);
        Ed25519PublicKey(signing_key.verifying_key().to_bytes())
    }

    /// Hex encoding of the seed, `0x`-prefixed.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Ed25519PrivateKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let data = decode_hex(s)?;
        if data.len() != 32 && data.len() != 64 {
            return Err(ParseKeyError::InvalidLength {
                expected: Self::LENGTH,
                actual: data.len(),
            });
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&data[..32]);
        Ok(Self(seed))
    }
}

impl TryFrom<&str> for Ed25519PrivateKey {
    type Error = ParseKeyError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ed25519PrivateKey(***)")
    }
}

// ============================================================================
// Authentication Key
// ============================================================================

/// Authentication key: `sha3_256(public_key || scheme)`.
///
/// For an account that never rotated its key, the authentication key bytes
/// are the account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthenticationKey([u8; 32]);

impl AuthenticationKey {
    /// Derive the authentication key of a single Ed25519 key.
    pub fn ed25519(public_key: &Ed25519PublicKey) -> Self {
        Self::from_preimage(public_key.as_bytes(), Scheme::Ed25519)
    }

    fn from_preimage(key_bytes: &[u8], scheme: Scheme) -> Self {
        let mut hasher = Sha3_256::new();
        hasher.update(key_bytes);
        hasher.update([scheme as u8]);
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The account address this key derives.
    pub fn account_address(&self) -> AccountAddress {
        AccountAddress::new(self.0)
    }
}

impl Display for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationKey({})", self)
    }
}
