//! Argument and return values exchanged with native contract handlers.

use neo_primitives::{ContractParameterType, UInt160, PUBLIC_KEY_SIZE};
use serde::{Serialize, Serializer};

/// A value passed to or returned from a native method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    #[serde(rename = "Any")]
    Null,
    #[serde(rename = "Boolean")]
    Bool(bool),
    #[serde(rename = "Integer")]
    Int(i64),
    #[serde(rename = "ByteString", serialize_with = "serialize_hex")]
    Bytes(Vec<u8>),
    String(String),
    Hash160(UInt160),
    Array(Vec<Value>),
}

impl Value {
    /// Whether the value can bind to a parameter of type `kind`.
    ///
    /// `Null` binds to every reference-like type but not to `Boolean` or
    /// `Integer`. Fixed-size types accept byte strings of the right length.
    pub fn is_compatible(&self, kind: ContractParameterType) -> bool {
        use ContractParameterType as T;
        match (self, kind) {
            (_, T::Any) => true,
            (Value::Null, T::Boolean | T::Integer | T::Void) => false,
            (Value::Null, _) => true,
            (Value::Bool(_), T::Boolean) => true,
            (Value::Int(_), T::Integer) => true,
            (Value::Bytes(_), T::ByteArray) => true,
            (Value::String(_), T::String) => true,
            (Value::Hash160(_), T::Hash160) => true,
            (Value::Bytes(bytes), T::Hash160) => bytes.len() == UInt160::LENGTH,
            (Value::Bytes(bytes), T::Hash256) => bytes.len() == 32,
            (Value::Bytes(bytes), T::PublicKey) => bytes.len() == PUBLIC_KEY_SIZE,
            (Value::Bytes(bytes), T::Signature) => bytes.len() == 64,
            (Value::Array(_), T::Array) => true,
            _ => false,
        }
    }

    /// Parameter type this value naturally carries.
    pub fn kind(&self) -> ContractParameterType {
        match self {
            Value::Null => ContractParameterType::Any,
            Value::Bool(_) => ContractParameterType::Boolean,
            Value::Int(_) => ContractParameterType::Integer,
            Value::Bytes(_) => ContractParameterType::ByteArray,
            Value::String(_) => ContractParameterType::String,
            Value::Hash160(_) => ContractParameterType::Hash160,
            Value::Array(_) => ContractParameterType::Array,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Reads a script hash from either a `Hash160` or a 20-byte byte string.
    pub fn as_hash160(&self) -> Option<UInt160> {
        match self {
            Value::Hash160(hash) => Some(*hash),
            Value::Bytes(bytes) => UInt160::from_bytes(bytes).ok(),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<UInt160> for Value {
    fn from(value: UInt160) -> Self {
        Value::Hash160(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[allow(clippy::ptr_arg)]
fn serialize_hex<S>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}
