//! Types for the Aptos token standard (`0x3::token`).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::error::Error;
use crate::types::{AccountAddress, TableHandle};

// =============================================================================
// Identifiers
// =============================================================================

/// Identifies a token type: `0x3::token::TokenDataId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenDataId {
    pub creator: AccountAddress,
    pub collection: String,
    pub name: String,
}

impl TokenDataId {
    /// Create a token data id.
    pub fn new(
        creator: AccountAddress,
        collection: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            creator,
            collection: collection.into(),
            name: name.into(),
        }
    }
}

/// Identifies a token instance: `0x3::token::TokenId`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId {
    pub token_data_id: TokenDataId,
    #[serde_as(as = "DisplayFromStr")]
    pub property_version: u64,
}

impl TokenId {
    /// Create a token id.
    pub fn new(token_data_id: TokenDataId, property_version: u64) -> Self {
        Self {
            token_data_id,
            property_version,
        }
    }
}

// =============================================================================
// Collection and Token Data
// =============================================================================

/// `0x3::token::CollectionData`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionData {
    pub description: String,
    pub name: String,
    pub uri: String,
    /// Tokens minted so far.
    #[serde_as(as = "DisplayFromStr")]
    pub supply: u64,
    /// Cap on distinct tokens; 0 means unlimited.
    #[serde_as(as = "DisplayFromStr")]
    pub maximum: u64,
    pub mutability_config: CollectionMutabilityConfig,
}

impl CollectionData {
    /// True when the collection has no supply cap.
    pub fn is_unlimited(&self) -> bool {
        self.maximum == 0
    }
}

/// Which collection fields the creator may still change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollectionMutabilityConfig {
    pub description: bool,
    pub maximum: bool,
    pub uri: bool,
}

/// `0x3::token::TokenData`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub name: String,
    pub description: String,
    pub uri: String,
    #[serde_as(as = "DisplayFromStr")]
    pub supply: u64,
    /// 0 means unlimited.
    #[serde_as(as = "DisplayFromStr")]
    pub maximum: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub largest_property_version: u64,
    pub royalty: Royalty,
    pub mutability_config: TokenMutabilityConfig,
    #[serde(default)]
    pub default_properties: PropertyMap,
}

impl TokenData {
    /// True when the token has no supply cap.
    pub fn is_unlimited(&self) -> bool {
        self.maximum == 0
    }
}

/// Royalty owed to `payee_address` on secondary sales.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Royalty {
    pub payee_address: AccountAddress,
    #[serde_as(as = "DisplayFromStr")]
    pub royalty_points_denominator: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub royalty_points_numerator: u64,
}

impl Royalty {
    /// Royalty as a percentage, `None` when the denominator is zero.
    pub fn percentage(&self) -> Option<f64> {
        if self.royalty_points_denominator == 0 {
            return None;
        }
        Some(self.royalty_points_numerator as f64 * 100.0 / self.royalty_points_denominator as f64)
    }
}

/// Which token fields the creator may still change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenMutabilityConfig {
    pub description: bool,
    pub maximum: bool,
    pub properties: bool,
    pub royalty: bool,
    pub uri: bool,
}

/// `0x3::token::Token`: an amount of one token held by an account.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: u64,
    #[serde(default)]
    pub token_properties: PropertyMap,
}

impl Token {
    /// A zero balance of `id`.
    pub fn zero(id: TokenId) -> Self {
        Self {
            id,
            amount: 0,
            token_properties: PropertyMap::default(),
        }
    }
}

// =============================================================================
// Resources
// =============================================================================

/// `0x3::token::Collections`: the creator-side tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionsResource {
    pub collection_data: TableHandle,
    pub token_data: TableHandle,
}

/// `0x3::token::TokenStore`: the holder-side table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenStoreResource {
    pub tokens: TableHandle,
}

// =============================================================================
// Property Map
// =============================================================================

/// A BCS-encoded property value with its Move type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// Move type, e.g. `0x1::string::String`, `u64`, `bool`, `address`.
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(with = "prefixed_hex")]
    pub value: Vec<u8>,
}

/// One key of a [`PropertyMap`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: PropertyValue,
}

/// `0x3::property_map::PropertyMap`, in insertion order.
///
/// On the wire this is `{"map": {"data": [{"key", "value"}...]}}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawPropertyMap", into = "RawPropertyMap")]
pub struct PropertyMap(Vec<Property>);

#[derive(Serialize, Deserialize)]
struct RawPropertyMap {
    map: RawSimpleMap,
}

#[derive(Serialize, Deserialize)]
struct RawSimpleMap {
    data: Vec<Property>,
}

impl From<RawPropertyMap> for PropertyMap {
    fn from(raw: RawPropertyMap) -> Self {
        PropertyMap(raw.map.data)
    }
}

impl From<PropertyMap> for RawPropertyMap {
    fn from(map: PropertyMap) -> Self {
        RawPropertyMap {
            map: RawSimpleMap { data: map.0 },
        }
    }
}

impl PropertyMap {
    /// Build a map from entries.
    pub fn new(entries: Vec<Property>) -> Self {
        PropertyMap(entries)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over properties in order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.0.iter()
    }

    /// Raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|p| p.key == key).map(|p| &p.value)
    }

    /// `0x1::string::String` value of `key`.
    pub fn get_string(&self, key: &str) -> Result<Option<String>, Error> {
        self.decode(key, "0x1::string::String")
    }

    /// `u64` value of `key`.
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, Error> {
        self.decode(key, "u64")
    }

    /// `bool` value of `key`.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, Error> {
        self.decode(key, "bool")
    }

    /// `address` value of `key`.
    pub fn get_address(&self, key: &str) -> Result<Option<AccountAddress>, Error> {
        let bytes: Option<[u8; 32]> = self.decode(key, "address")?;
        Ok(bytes.map(AccountAddress::new))
    }

    fn decode<T: DeserializeOwned>(&self, key: &str, expected: &str) -> Result<Option<T>, Error> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        if value.type_tag != expected {
            return Err(Error::Property {
                key: key.to_string(),
                message: format!("expected {expected}, found {}", value.type_tag),
            });
        }
        bcs::from_bytes(&value.value)
            .map(Some)
            .map_err(|e| Error::Property {
                key: key.to_string(),
                message: e.to_string(),
            })
    }
}

mod prefixed_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(d)?;
        hex::decode(s.strip_prefix("0x").unwrap_or(&s)).map_err(serde::de::Error::custom)
    }
}
