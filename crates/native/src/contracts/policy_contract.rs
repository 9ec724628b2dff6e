//! The Policy native contract: network-wide fee and block parameters.

use super::{get_i64, hash_arg, int_arg, no_handler, put_i64, require_committee, CPU_FEE};
use crate::contract::NativeContract;
use crate::descriptor::{params, EventDescriptor, MethodDescriptor};
use crate::dispatcher::Dispatcher;
use crate::error::{NativeError, NativeResult};
use crate::metadata::ContractMetadata;
use crate::runtime::{ExecutionContext, StorageKey};
use crate::value::Value;
use neo_primitives::{CallFlags, ContractParameterType as T, Hardfork, UInt160};

/// Transaction attribute types with a configurable fee.
const HIGH_PRIORITY: u8 = 0x01;
const ORACLE_RESPONSE: u8 = 0x11;
const NOT_VALID_BEFORE: u8 = 0x20;
const CONFLICTS: u8 = 0x21;
const NOTARY_ASSISTED: u8 = 0x22;

/// Committee-controlled fee and block parameters.
#[derive(Debug, Clone)]
pub struct PolicyContract {
    metadata: ContractMetadata,
}

impl PolicyContract {
    pub const ID: i32 = -7;
    pub const NAME: &'static str = "PolicyContract";

    /// The default execution fee factor.
    pub const DEFAULT_EXEC_FEE_FACTOR: i64 = 30;

    /// The default storage price.
    pub const DEFAULT_STORAGE_PRICE: i64 = 100_000;

    /// The default network fee per byte of transactions.
    /// In the unit of datoshi, 1 datoshi = 1e-8 GAS.
    pub const DEFAULT_FEE_PER_BYTE: i64 = 1_000;

    /// The default fee for attributes.
    pub const DEFAULT_ATTRIBUTE_FEE: i64 = 0;

    /// The default fee for `NotaryAssisted` attribute after Echidna.
    pub const DEFAULT_NOTARY_ASSISTED_ATTRIBUTE_FEE: i64 = 1000_0000;

    /// The default block generation time in milliseconds.
    pub const DEFAULT_MILLISECONDS_PER_BLOCK: i64 = 15_000;

    /// Maximum execution fee factor committee can set.
    pub const MAX_EXEC_FEE_FACTOR: i64 = 100;

    /// Maximum attribute fee committee can set.
    pub const MAX_ATTRIBUTE_FEE: i64 = 10_0000_0000;

    /// Maximum storage price committee can set.
    pub const MAX_STORAGE_PRICE: i64 = 10_000_000;

    /// Maximum block generation time committee can set in milliseconds.
    pub const MAX_MILLISECONDS_PER_BLOCK: i64 = 30_000;

    const MAX_FEE_PER_BYTE: i64 = 1_0000_0000;

    const PREFIX_FEE_PER_BYTE: u8 = 10;
    const PREFIX_BLOCKED_ACCOUNT: u8 = 15;
    const PREFIX_EXEC_FEE_FACTOR: u8 = 18;
    const PREFIX_STORAGE_PRICE: u8 = 19;
    const PREFIX_ATTRIBUTE_FEE: u8 = 20;
    const PREFIX_MILLISECONDS_PER_BLOCK: u8 = 21;

    const MILLISECONDS_PER_BLOCK_CHANGED_EVENT_NAME: &'static str = "MillisecondsPerBlockChanged";

    pub fn new() -> Self {
        let value = || params(&[("value", T::Integer)]);
        let account = || params(&[("account", T::Hash160)]);
        let setter = |name: &str| {
            MethodDescriptor::unsafe_method(name, CPU_FEE, CallFlags::STATES, value(), T::Void)
        };

        let get_attribute_fee = MethodDescriptor::safe(
            "getAttributeFee",
            CPU_FEE,
            params(&[("attributeType", T::Integer)]),
            T::Integer,
        );
        let set_attribute_fee = MethodDescriptor::unsafe_method(
            "setAttributeFee",
            CPU_FEE,
            CallFlags::STATES,
            params(&[("attributeType", T::Integer), ("value", T::Integer)]),
            T::Void,
        );

        let methods = vec![
            MethodDescriptor::safe("getFeePerByte", CPU_FEE, Vec::new(), T::Integer),
            MethodDescriptor::safe("getExecFeeFactor", CPU_FEE, Vec::new(), T::Integer)
                .with_price_schedule(vec![(None, CPU_FEE), (Some(Hardfork::HfEchidna), 1 << 10)]),
            MethodDescriptor::safe("getStoragePrice", CPU_FEE, Vec::new(), T::Integer),
            MethodDescriptor::safe("getMillisecondsPerBlock", CPU_FEE, Vec::new(), T::Integer)
                .with_active_in(Hardfork::HfEchidna),
            MethodDescriptor::unsafe_method(
                "setMillisecondsPerBlock",
                CPU_FEE,
                CallFlags::STATES | CallFlags::ALLOW_NOTIFY,
                value(),
                T::Void,
            )
            .with_active_in(Hardfork::HfEchidna),
            get_attribute_fee
                .clone()
                .with_deprecated_in(Hardfork::HfEchidna),
            get_attribute_fee.with_active_in(Hardfork::HfEchidna),
            set_attribute_fee
                .clone()
                .with_deprecated_in(Hardfork::HfEchidna),
            set_attribute_fee.with_active_in(Hardfork::HfEchidna),
            setter("setFeePerByte"),
            setter("setExecFeeFactor"),
            setter("setStoragePrice"),
            MethodDescriptor::safe("isBlocked", CPU_FEE, account(), T::Boolean),
            MethodDescriptor::unsafe_method(
                "blockAccount",
                CPU_FEE,
                CallFlags::STATES,
                account(),
                T::Boolean,
            ),
            MethodDescriptor::unsafe_method(
                "unblockAccount",
                CPU_FEE,
                CallFlags::STATES,
                account(),
                T::Boolean,
            ),
        ];

        let metadata = ContractMetadata::new(Self::ID, Self::NAME)
            .with_methods(methods)
            .with_event(
                EventDescriptor::new(
                    Self::MILLISECONDS_PER_BLOCK_CHANGED_EVENT_NAME,
                    params(&[("old", T::Integer), ("new", T::Integer)]),
                )
                .with_active_in(Hardfork::HfEchidna),
            );
        Self { metadata }
    }

    pub fn fee_per_byte(&self, ctx: &ExecutionContext<'_>) -> NativeResult<i64> {
        self.read(ctx, Self::PREFIX_FEE_PER_BYTE, Self::DEFAULT_FEE_PER_BYTE)
    }

    pub fn exec_fee_factor(&self, ctx: &ExecutionContext<'_>) -> NativeResult<i64> {
        self.read(ctx, Self::PREFIX_EXEC_FEE_FACTOR, Self::DEFAULT_EXEC_FEE_FACTOR)
    }

    pub fn storage_price(&self, ctx: &ExecutionContext<'_>) -> NativeResult<i64> {
        self.read(ctx, Self::PREFIX_STORAGE_PRICE, Self::DEFAULT_STORAGE_PRICE)
    }

    pub fn milliseconds_per_block(&self, ctx: &ExecutionContext<'_>) -> NativeResult<i64> {
        self.read(
            ctx,
            Self::PREFIX_MILLISECONDS_PER_BLOCK,
            Self::DEFAULT_MILLISECONDS_PER_BLOCK,
        )
    }

    pub fn is_blocked(&self, ctx: &ExecutionContext<'_>, account: &UInt160) -> NativeResult<bool> {
        Ok(ctx.store().get(&blocked_key(account))?.is_some())
    }

    fn read(&self, ctx: &ExecutionContext<'_>, prefix: u8, default: i64) -> NativeResult<i64> {
        Ok(get_i64(ctx, &StorageKey::create(Self::ID, prefix))?.unwrap_or(default))
    }

    /// Validates `value` against `range`, checks the committee witness and
    /// stores it under `prefix`.
    fn write(
        &self,
        ctx: &mut ExecutionContext<'_>,
        prefix: u8,
        name: &str,
        range: std::ops::RangeInclusive<i64>,
        value: i64,
    ) -> NativeResult<()> {
        if !range.contains(&value) {
            return Err(self.fail(format!(
                "{name} must be between [{}, {}], got {value}",
                range.start(),
                range.end()
            )));
        }
        require_committee(ctx, Self::NAME)?;
        put_i64(ctx, StorageKey::create(Self::ID, prefix), value)
    }

    /// `NotaryAssisted` only exists from Echidna on; the redeclared
    /// attribute-fee methods accept it.
    fn attribute_type(&self, method: &MethodDescriptor, args: &[Value]) -> NativeResult<u8> {
        let raw = int_arg(method, args, 0)?;
        let notary = method.active_in >= Some(Hardfork::HfEchidna);
        match u8::try_from(raw) {
            Ok(kind @ (HIGH_PRIORITY | ORACLE_RESPONSE | NOT_VALID_BEFORE | CONFLICTS)) => Ok(kind),
            Ok(NOTARY_ASSISTED) if notary => Ok(NOTARY_ASSISTED),
            _ => Err(NativeError::invalid_argument(
                method.name.clone(),
                0,
                format!("unsupported attribute type {raw}"),
            )),
        }
    }

    fn attribute_fee(&self, ctx: &ExecutionContext<'_>, kind: u8) -> NativeResult<i64> {
        let default = if kind == NOTARY_ASSISTED {
            Self::DEFAULT_NOTARY_ASSISTED_ATTRIBUTE_FEE
        } else {
            Self::DEFAULT_ATTRIBUTE_FEE
        };
        let key = StorageKey::create_with_bytes(Self::ID, Self::PREFIX_ATTRIBUTE_FEE, &[kind]);
        Ok(get_i64(ctx, &key)?.unwrap_or(default))
    }

    fn set_blocked(
        &self,
        engine: &Dispatcher,
        ctx: &mut ExecutionContext<'_>,
        account: &UInt160,
        blocked: bool,
    ) -> NativeResult<bool> {
        require_committee(ctx, Self::NAME)?;
        if blocked && engine.registry().is_native(account) {
            return Err(self.fail("cannot block a native contract"));
        }
        if self.is_blocked(ctx, account)? == blocked {
            return Ok(false);
        }
        let key = blocked_key(account);
        if blocked {
            ctx.store_mut().put(key, Vec::new())?;
        } else {
            ctx.store_mut().delete(&key)?;
        }
        Ok(true)
    }

    fn fail(&self, message: impl Into<String>) -> NativeError {
        NativeError::handler(Self::NAME, message)
    }
}

impl Default for PolicyContract {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeContract for PolicyContract {
    fn metadata(&self) -> &ContractMetadata {
        &self.metadata
    }

    fn invoke(
        &self,
        engine: &Dispatcher,
        ctx: &mut ExecutionContext<'_>,
        method: &MethodDescriptor,
        args: &[Value],
    ) -> NativeResult<Value> {
        let value = match method.name.as_str() {
            "getFeePerByte" => Value::Int(self.fee_per_byte(ctx)?),
            "getExecFeeFactor" => Value::Int(self.exec_fee_factor(ctx)?),
            "getStoragePrice" => Value::Int(self.storage_price(ctx)?),
            "getMillisecondsPerBlock" => Value::Int(self.milliseconds_per_block(ctx)?),
            "getAttributeFee" => {
                let kind = self.attribute_type(method, args)?;
                Value::Int(self.attribute_fee(ctx, kind)?)
            }
            "isBlocked" => Value::Bool(self.is_blocked(ctx, &hash_arg(method, args, 0)?)?),
            "setFeePerByte" => {
                let value = int_arg(method, args, 0)?;
                self.write(
                    ctx,
                    Self::PREFIX_FEE_PER_BYTE,
                    "FeePerByte",
                    0..=Self::MAX_FEE_PER_BYTE,
                    value,
                )?;
                Value::Null
            }
            "setExecFeeFactor" => {
                let value = int_arg(method, args, 0)?;
                self.write(
                    ctx,
                    Self::PREFIX_EXEC_FEE_FACTOR,
                    "ExecFeeFactor",
                    1..=Self::MAX_EXEC_FEE_FACTOR,
                    value,
                )?;
                Value::Null
            }
            "setStoragePrice" => {
                let value = int_arg(method, args, 0)?;
                self.write(
                    ctx,
                    Self::PREFIX_STORAGE_PRICE,
                    "StoragePrice",
                    1..=Self::MAX_STORAGE_PRICE,
                    value,
                )?;
                Value::Null
            }
            "setMillisecondsPerBlock" => {
                let value = int_arg(method, args, 0)?;
                let old = self.milliseconds_per_block(ctx)?;
                self.write(
                    ctx,
                    Self::PREFIX_MILLISECONDS_PER_BLOCK,
                    "MillisecondsPerBlock",
                    1..=Self::MAX_MILLISECONDS_PER_BLOCK,
                    value,
                )?;
                ctx.notify(
                    Self::MILLISECONDS_PER_BLOCK_CHANGED_EVENT_NAME,
                    vec![Value::Int(old), Value::Int(value)],
                )?;
                Value::Null
            }
            "setAttributeFee" => {
                let kind = self.attribute_type(method, args)?;
                let value = int_arg(method, args, 1)?;
                if !(0..=Self::MAX_ATTRIBUTE_FEE).contains(&value) {
                    return Err(self.fail(format!(
                        "AttributeFee must be between [0, {}], got {value}",
                        Self::MAX_ATTRIBUTE_FEE
                    )));
                }
                require_committee(ctx, Self::NAME)?;
                let key =
                    StorageKey::create_with_bytes(Self::ID, Self::PREFIX_ATTRIBUTE_FEE, &[kind]);
                put_i64(ctx, key, value)?;
                Value::Null
            }
            "blockAccount" => {
                let account = hash_arg(method, args, 0)?;
                Value::Bool(self.set_blocked(engine, ctx, &account, true)?)
            }
            "unblockAccount" => {
                let account = hash_arg(method, args, 0)?;
                Value::Bool(self.set_blocked(engine, ctx, &account, false)?)
            }
            _ => return Err(no_handler(Self::NAME, method)),
        };
        Ok(value)
    }
}

fn blocked_key(account: &UInt160) -> StorageKey {
    StorageKey::create_with_uint160(
        PolicyContract::ID,
        PolicyContract::PREFIX_BLOCKED_ACCOUNT,
        account,
    )
}
