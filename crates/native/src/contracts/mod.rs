//! Native contracts compiled into the node.

mod fungible;
mod gas_token;
mod neo_token;
mod policy_contract;

pub use fungible::{AccountState, FungibleToken, PREFIX_ACCOUNT, PREFIX_TOTAL_SUPPLY};
pub use gas_token::GasToken;
pub use neo_token::NeoToken;
pub use policy_contract::PolicyContract;

use crate::descriptor::MethodDescriptor;
use crate::error::{NativeError, NativeResult};
use crate::runtime::{ExecutionContext, StorageKey};
use crate::value::Value;
use neo_primitives::UInt160;

/// Base price of simple storage reads and writes, in datoshi.
pub(crate) const CPU_FEE: i64 = 1 << 15;

fn arg<'a>(method: &MethodDescriptor, args: &'a [Value], index: usize) -> NativeResult<&'a Value> {
    args.get(index)
        .ok_or_else(|| NativeError::invalid_argument(method.name.clone(), index, "missing"))
}

pub(crate) fn int_arg(method: &MethodDescriptor, args: &[Value], index: usize) -> NativeResult<i64> {
    arg(method, args, index)?
        .as_int()
        .ok_or_else(|| NativeError::invalid_argument(method.name.clone(), index, "expected Integer"))
}

pub(crate) fn hash_arg(
    method: &MethodDescriptor,
    args: &[Value],
    index: usize,
) -> NativeResult<UInt160> {
    arg(method, args, index)?
        .as_hash160()
        .ok_or_else(|| NativeError::invalid_argument(method.name.clone(), index, "expected Hash160"))
}

pub(crate) fn bytes_arg<'a>(
    method: &MethodDescriptor,
    args: &'a [Value],
    index: usize,
) -> NativeResult<&'a [u8]> {
    arg(method, args, index)?
        .as_bytes()
        .ok_or_else(|| NativeError::invalid_argument(method.name.clone(), index, "expected ByteString"))
}

/// Like `bytes_arg`, with `Null` read as absent.
pub(crate) fn optional_bytes_arg<'a>(
    method: &MethodDescriptor,
    args: &'a [Value],
    index: usize,
) -> NativeResult<Option<&'a [u8]>> {
    if arg(method, args, index)?.is_null() {
        return Ok(None);
    }
    bytes_arg(method, args, index).map(Some)
}

pub(crate) fn decode_i64(bytes: &[u8]) -> NativeResult<i64> {
    let array: [u8; 8] = bytes.try_into().map_err(|_| {
        NativeError::storage(format!("expected an 8-byte integer, found {} bytes", bytes.len()))
    })?;
    Ok(i64::from_le_bytes(array))
}

pub(crate) fn get_i64(ctx: &ExecutionContext<'_>, key: &StorageKey) -> NativeResult<Option<i64>> {
    ctx.store()
        .get(key)?
        .map(|bytes| decode_i64(&bytes))
        .transpose()
}

pub(crate) fn put_i64(ctx: &mut ExecutionContext<'_>, key: StorageKey, value: i64) -> NativeResult<()> {
    ctx.store_mut().put(key, value.to_le_bytes().to_vec())
}

/// Fails unless the committee witnessed the transaction.
pub(crate) fn require_committee(ctx: &ExecutionContext<'_>, contract: &str) -> NativeResult<()> {
    if ctx.check_committee() {
        Ok(())
    } else {
        Err(NativeError::handler(contract, "committee witness required"))
    }
}

pub(crate) fn no_handler(contract: &str, method: &MethodDescriptor) -> NativeError {
    NativeError::handler(contract, format!("no handler for {}", method.signature()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MemoryStore;

    #[test]
    fn integers_round_trip_through_storage() {
        let mut store = MemoryStore::new();
        let mut ctx = ExecutionContext::new(&mut store, 0, 0);
        let key = StorageKey::create(-7, 10);
        assert_eq!(get_i64(&ctx, &key).unwrap(), None);
        put_i64(&mut ctx, key.clone(), -42).unwrap();
        assert_eq!(get_i64(&ctx, &key).unwrap(), Some(-42));
    }

    #[test]
    fn malformed_integer_is_a_storage_error() {
        assert!(matches!(decode_i64(&[1, 2, 3]), Err(NativeError::Storage { .. })));
    }

    #[test]
    fn null_is_an_absent_byte_string() {
        let method = MethodDescriptor::safe(
            "vote",
            0,
            Vec::new(),
            neo_primitives::ContractParameterType::Boolean,
        );
        let args = [Value::Null, Value::Bytes(vec![1, 2])];
        assert_eq!(optional_bytes_arg(&method, &args, 0).unwrap(), None);
        assert_eq!(optional_bytes_arg(&method, &args, 1).unwrap(), Some(&[1u8, 2][..]));
        assert!(int_arg(&method, &args, 1).is_err());
        assert!(int_arg(&method, &args, 5).is_err());
    }
}
