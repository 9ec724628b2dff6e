//! Implementation of `UInt160`, a 160-bit unsigned integer used for script hashes.

use crate::error::{PrimitiveError, PrimitiveResult};
use ripemd::Ripemd160;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The length of `UInt160` values in bytes.
pub const UINT160_SIZE: usize = 20;

/// Represents a 160-bit unsigned integer stored little-endian.
///
/// Textual form is big-endian hex with a `0x` prefix, as printed by Neo tooling.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct UInt160([u8; UINT160_SIZE]);

impl UInt160 {
    /// Alias matching C# `UInt160.Length`.
    pub const LENGTH: usize = UINT160_SIZE;

    /// Returns a zero `UInt160`.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; UINT160_SIZE])
    }

    /// Checks if this `UInt160` is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Creates a new `UInt160` from little-endian bytes.
    ///
    /// # Errors
    ///
    /// Returns `PrimitiveError::InvalidFormat` if the input length is not exactly 20 bytes.
    pub fn from_bytes(value: &[u8]) -> PrimitiveResult<Self> {
        let array: [u8; UINT160_SIZE] = value.try_into().map_err(|_| {
            PrimitiveError::invalid_format(format!("Invalid length: {}", value.len()))
        })?;
        Ok(Self(array))
    }

    /// Gets the little-endian byte representation.
    #[inline]
    #[must_use]
    pub fn to_array(&self) -> [u8; UINT160_SIZE] {
        self.0
    }

    /// Borrows the little-endian bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; UINT160_SIZE] {
        &self.0
    }

    /// Parses a `UInt160` from a big-endian hexadecimal string, `0x` prefix optional.
    ///
    /// # Errors
    ///
    /// Returns `PrimitiveError::InvalidFormat` if the input string is not a valid
    /// 40-character hexadecimal string.
    pub fn parse(s: &str) -> PrimitiveResult<Self> {
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        if s.len() != UINT160_SIZE * 2 {
            return Err(PrimitiveError::invalid_format(format!(
                "expected {} hex characters, got {}",
                UINT160_SIZE * 2,
                s.len()
            )));
        }

        let mut bytes =
            hex::decode(s).map_err(|e| PrimitiveError::invalid_format(e.to_string()))?;
        bytes.reverse();
        Self::from_bytes(&bytes)
    }

    /// Converts the `UInt160` to a big-endian hexadecimal string.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        let mut bytes = self.0;
        bytes.reverse();
        format!("0x{}", hex::encode(bytes))
    }

    /// Creates a `UInt160` from a script by computing `ripemd160(sha256(script))`.
    #[must_use]
    pub fn from_script(script: &[u8]) -> Self {
        let sha256_hash = Sha256::digest(script);
        let hash160 = Ripemd160::digest(sha256_hash);
        Self(hash160.into())
    }
}

impl FromStr for UInt160 {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UInt160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex_string())
    }
}

impl fmt::Debug for UInt160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UInt160({})", self.to_hex_string())
    }
}

impl PartialOrd for UInt160 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UInt160 {
    // Compares as a number: most significant byte last.
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl From<[u8; UINT160_SIZE]> for UInt160 {
    fn from(data: [u8; UINT160_SIZE]) -> Self {
        Self(data)
    }
}

impl Serialize for UInt160 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex_string())
    }
}

impl<'de> Deserialize<'de> for UInt160 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        UInt160::parse(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let text = "0xef4073a0f2b305a38ec4050e4d3d28bc40ea63f5";
        let hash = UInt160::parse(text).unwrap();
        assert_eq!(hash.to_string(), text);
        // Stored little-endian.
        assert_eq!(hash.to_array()[0], 0xf5);
        assert_eq!(hash.to_array()[19], 0xef);
    }

    #[test]
    fn parse_without_prefix() {
        let a = UInt160::parse("d2a4cff31913016155e38e474a2c06d08be276cf").unwrap();
        let b: UInt160 = "0xd2a4cff31913016155e38e474a2c06d08be276cf".parse().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(UInt160::parse("0x1234").is_err());
        assert!(UInt160::parse("zz4073a0f2b305a38ec4050e4d3d28bc40ea63f5").is_err());
        assert!(UInt160::from_bytes(&[0u8; 19]).is_err());
    }

    #[test]
    fn ordering_is_numeric() {
        let low = UInt160::parse("0x0000000000000000000000000000000000000001").unwrap();
        let high = UInt160::parse("0x1000000000000000000000000000000000000000").unwrap();
        assert!(low < high);
        assert!(UInt160::zero() < low);
        assert!(UInt160::zero().is_zero());
    }

    #[test]
    fn serde_uses_hex_string() {
        let hash = UInt160::parse("0xcc5e4edd9f5f8dba8bb65734541df7a1c081c67b").unwrap();
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, "\"0xcc5e4edd9f5f8dba8bb65734541df7a1c081c67b\"");
        let back: UInt160 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
