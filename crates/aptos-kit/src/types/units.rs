//! APT amounts in octas.

use std::fmt::{self, Display};
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseAmountError;

/// Octas per APT (10^8).
const OCTAS_PER_APT: u64 = 100_000_000;
/// Decimal places of APT.
const APT_DECIMALS: usize = 8;

/// An APT amount with octa precision (10^-8 APT).
///
/// # Parsing from Strings
///
/// - `"5 APT"` or `"1.5 apt"` - APT, up to 8 decimals
/// - `"1000 octas"` or `"1000 octa"` - raw octas
///
/// Raw numbers are NOT accepted to prevent unit confusion.
///
/// ```
/// use aptos_kit::Octas;
///
/// let amount: Octas = "1.5 APT".parse().unwrap();
/// assert_eq!(amount.as_octas(), 150_000_000);
/// assert_eq!(amount.to_string(), "1.5 APT");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Octas(u64);

impl Octas {
    /// Zero APT.
    pub const ZERO: Self = Self(0);
    /// One APT.
    pub const ONE_APT: Self = Self(OCTAS_PER_APT);

    /// Create from raw octas.
    pub const fn octas(value: u64) -> Self {
        Self(value)
    }

    /// Create from whole APT.
    pub const fn apt(value: u64) -> Self {
        Self(value * OCTAS_PER_APT)
    }

    /// Get the raw octa value.
    pub const fn as_octas(&self) -> u64 {
        self.0
    }

    /// Checked addition.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Check if zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    fn from_apt_decimal(s: &str) -> Result<Self, ParseAmountError> {
        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if fraction.len() > APT_DECIMALS
            || (whole.is_empty() && fraction.is_empty())
            || !digits(whole)
            || !digits(fraction)
        {
            return Err(ParseAmountError::InvalidNumber(s.to_string()));
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| ParseAmountError::InvalidNumber(s.to_string()))?
        };
        let fraction: u64 = if fraction.is_empty() {
            0
        } else {
            format!("{:0<8}", fraction)
                .parse()
                .map_err(|_| ParseAmountError::InvalidNumber(s.to_string()))?
        };

        whole
            .checked_mul(OCTAS_PER_APT)
            .and_then(|v| v.checked_add(fraction))
            .map(Self)
            .ok_or(ParseAmountError::Overflow)
    }
}

impl FromStr for Octas {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(value) = s.strip_suffix(" APT").or_else(|| s.strip_suffix(" apt")) {
            return Self::from_apt_decimal(value.trim());
        }

        if let Some(value) = s
            .strip_suffix(" octas")
            .or_else(|| s.strip_suffix(" octa"))
        {
            let value = value.trim();
            if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseAmountError::InvalidNumber(s.to_string()));
            }
            let v: u64 = value
                .parse()
                .map_err(|_| ParseAmountError::Overflow)?;
            return Ok(Self(v));
        }

        // Bare number = error (ambiguous)
        if s.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(ParseAmountError::AmbiguousAmount(s.to_string()));
        }

        Err(ParseAmountError::InvalidFormat(s.to_string()))
    }
}

impl Display for Octas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let apt = self.0 / OCTAS_PER_APT;
        let remainder = self.0 % OCTAS_PER_APT;

        if remainder == 0 {
            write!(f, "{} APT", apt)
        } else {
            let decimal = format!("{:08}", remainder);
            write!(f, "{}.{} APT", apt, decimal.trim_end_matches('0'))
        }
    }
}

impl Add for Octas {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for Octas {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

// The REST API carries u64 values as decimal strings.
impl Serialize for Octas {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Octas {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse::<u64>().map(Self).map_err(serde::de::Error::custom)
    }
}
