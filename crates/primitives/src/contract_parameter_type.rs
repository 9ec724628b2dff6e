//! ABI types of native method parameters, return values and event fields.

use crate::error::PrimitiveError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContractParameterType {
    #[default]
    Any = 0x00,
    Boolean = 0x10,
    Integer = 0x11,
    ByteArray = 0x12,
    String = 0x13,
    Hash160 = 0x14,
    Hash256 = 0x15,
    /// Compressed secp256r1 point.
    PublicKey = 0x16,
    Signature = 0x17,
    Array = 0x20,
    Map = 0x22,
    InteropInterface = 0x30,
    /// Return type of methods that return nothing.
    Void = 0xff,
}

impl ContractParameterType {
    const ALL: [ContractParameterType; 13] = [
        Self::Any,
        Self::Boolean,
        Self::Integer,
        Self::ByteArray,
        Self::String,
        Self::Hash160,
        Self::Hash256,
        Self::PublicKey,
        Self::Signature,
        Self::Array,
        Self::Map,
        Self::InteropInterface,
        Self::Void,
    ];

    /// Name used in manifests and method listings.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::ByteArray => "ByteArray",
            Self::String => "String",
            Self::Hash160 => "Hash160",
            Self::Hash256 => "Hash256",
            Self::PublicKey => "PublicKey",
            Self::Signature => "Signature",
            Self::Array => "Array",
            Self::Map => "Map",
            Self::InteropInterface => "InteropInterface",
            Self::Void => "Void",
        }
    }
}

impl fmt::Display for ContractParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContractParameterType {
    type Err = PrimitiveError;

    /// Case-insensitive manifest name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PrimitiveError::UnknownParameterType {
                name: s.to_string(),
            })
    }
}

impl Serialize for ContractParameterType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ContractParameterType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::ContractParameterType as T;
    use crate::error::PrimitiveError;

    #[test]
    fn parses_manifest_names_only() {
        assert_eq!("publickey".parse::<T>().unwrap(), T::PublicKey);
        assert_eq!("Hash160".parse::<T>().unwrap(), T::Hash160);
        assert_eq!(
            "bool".parse::<T>(),
            Err(PrimitiveError::UnknownParameterType {
                name: "bool".to_string()
            })
        );
    }

    #[test]
    fn json_uses_manifest_name() {
        assert_eq!(serde_json::to_string(&T::Void).unwrap(), "\"Void\"");
        let back: T = serde_json::from_str("\"InteropInterface\"").unwrap();
        assert_eq!(back, T::InteropInterface);
        assert_eq!(T::PublicKey as u8, 0x16);
    }
}
