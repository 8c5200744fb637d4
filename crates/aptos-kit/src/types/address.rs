//! Aptos account address.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseAddressError;

/// A 32-byte Aptos account address.
///
/// Parses with or without the `0x` prefix; short forms are left-padded with
/// zeros, so `"0x1"` and `"0x000…001"` are the same address.
///
/// ```
/// use aptos_kit::AccountAddress;
///
/// let addr: AccountAddress = "0x3".parse().unwrap();
/// assert_eq!(addr.to_short_string(), "0x3");
/// assert_eq!(addr.to_string().len(), 66);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountAddress([u8; AccountAddress::LENGTH]);

impl AccountAddress {
    /// Address length in bytes.
    pub const LENGTH: usize = 32;

    /// The zero address.
    pub const ZERO: Self = Self([0; Self::LENGTH]);

    /// The core framework address (`0x1`).
    pub const ONE: Self = Self::from_u8(1);

    /// The token standard address (`0x3`).
    pub const THREE: Self = Self::from_u8(3);

    const fn from_u8(last: u8) -> Self {
        let mut bytes = [0; Self::LENGTH];
        bytes[Self::LENGTH - 1] = last;
        Self(bytes)
    }

    /// Create an address from raw bytes.
    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    /// Get the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    /// Hex without the `0x` prefix, full 64 characters.
    ///
    /// This is the form the faucet expects.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// `0x`-prefixed hex with leading zeros trimmed (`0x1`, `0x3`, ...).
    pub fn to_short_string(&self) -> String {
        let hex = self.to_hex();
        let trimmed = hex.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{trimmed}")
        }
    }
}

impl FromStr for AccountAddress {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() {
            return Err(ParseAddressError::Empty);
        }
        if digits.len() > Self::LENGTH * 2 {
            return Err(ParseAddressError::TooLong(s.to_string()));
        }

        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; Self::LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| ParseAddressError::InvalidHex(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<&str> for AccountAddress {
    type Error = ParseAddressError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<[u8; AccountAddress::LENGTH]> for AccountAddress {
    fn from(bytes: [u8; AccountAddress::LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<AccountAddress> for AccountAddress {
    fn as_ref(&self) -> &AccountAddress {
        self
    }
}

impl Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self.to_short_string())
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Anything that can name an account: an [`AccountAddress`] or a hex string.
///
/// Lets query methods accept `"0x1"`, `String` and `AccountAddress` alike,
/// reporting a parse error when the operation runs.
pub trait IntoAccountAddress {
    /// Resolve into an address.
    fn into_account_address(self) -> Result<AccountAddress, ParseAddressError>;
}

impl IntoAccountAddress for AccountAddress {
    fn into_account_address(self) -> Result<AccountAddress, ParseAddressError> {
        Ok(self)
    }
}

impl IntoAccountAddress for &AccountAddress {
    fn into_account_address(self) -> Result<AccountAddress, ParseAddressError> {
        Ok(*self)
    }
}

impl IntoAccountAddress for &str {
    fn into_account_address(self) -> Result<AccountAddress, ParseAddressError> {
        self.parse()
    }
}

impl IntoAccountAddress for String {
    fn into_account_address(self) -> Result<AccountAddress, ParseAddressError> {
        self.parse()
    }
}

impl IntoAccountAddress for &String {
    fn into_account_address(self) -> Result<AccountAddress, ParseAddressError> {
        self.parse()
    }
}
