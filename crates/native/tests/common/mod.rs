#![allow(dead_code)]

use neo_config::{ProtocolSettings, PRIVATE_MAGIC};
use neo_native::{
    params, ContractMetadata, Dispatcher, EventDescriptor, ExecutionContext, MethodDescriptor,
    NativeContract, NativeError, NativeRegistry, NativeResult, StorageKey, Value,
};
use neo_primitives::{signature_account, CallFlags, ContractParameterType as T, Hardfork, UInt160};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const PUBKEY: &str = "03b209fd4f53a7170ea4444e0cb0a6bb6a53c2bd016926989cf85f9b0fba17a70c";

pub fn pubkey() -> Vec<u8> {
    hex::decode(PUBKEY).unwrap()
}

pub fn candidate_account() -> UInt160 {
    signature_account(&pubkey()).unwrap()
}

pub fn committee() -> UInt160 {
    UInt160::from([0xcc; 20])
}

/// Each hardfork activates ten blocks after the previous one, Aspidochelone at 10.
pub fn staggered_settings() -> ProtocolSettings {
    let heights: BTreeMap<Hardfork, u32> = Hardfork::all()
        .into_iter()
        .map(|hf| (hf, (u32::from(hf.ordinal()) + 1) * 10))
        .collect();
    ProtocolSettings::new(PRIVATE_MAGIC, heights).unwrap()
}

/// First height at which `hardfork` is in effect under `staggered_settings`.
pub fn height_of(hardfork: Option<Hardfork>) -> u32 {
    hardfork.map_or(0, |hf| (u32::from(hf.ordinal()) + 1) * 10)
}

pub fn standard_dispatcher(settings: ProtocolSettings) -> Dispatcher {
    Dispatcher::new(Arc::new(NativeRegistry::standard().unwrap()), settings)
}

/// Test contract that counts handler invocations.
pub struct Probe {
    metadata: ContractMetadata,
    calls: AtomicUsize,
}

impl Probe {
    pub const ID: i32 = -100;

    pub fn new() -> Self {
        let metadata = ContractMetadata::new(Self::ID, "Probe")
            .with_methods([
                MethodDescriptor::safe("read", 100, Vec::new(), T::Integer),
                MethodDescriptor::unsafe_method(
                    "write",
                    1000,
                    CallFlags::STATES,
                    params(&[("value", T::Integer)]),
                    T::Void,
                ),
                MethodDescriptor::unsafe_method(
                    "emit",
                    10,
                    CallFlags::ALLOW_NOTIFY,
                    Vec::new(),
                    T::Void,
                ),
                MethodDescriptor::unsafe_method(
                    "fail",
                    10,
                    CallFlags::ALLOW_NOTIFY,
                    Vec::new(),
                    T::Void,
                ),
                MethodDescriptor::unsafe_method(
                    "undeclared",
                    0,
                    CallFlags::ALLOW_NOTIFY,
                    Vec::new(),
                    T::Void,
                ),
                MethodDescriptor::unsafe_method(
                    "relay",
                    0,
                    CallFlags::ALLOW_CALL,
                    params(&[("flags", T::Integer)]),
                    T::Any,
                ),
                MethodDescriptor::safe("charge", 0, params(&[("amount", T::Integer)]), T::Void),
            ])
            .with_event(EventDescriptor::new("Ping", params(&[("n", T::Integer)])));
        Self {
            metadata,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn hash(&self) -> UInt160 {
        self.metadata.hash()
    }
}

impl NativeContract for Probe {
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
        self.calls.fetch_add(1, Ordering::SeqCst);
        match method.name.as_str() {
            "read" => Ok(Value::Int(1)),
            "write" => {
                let value = args[0].as_int().unwrap_or_default();
                ctx.store_mut()
                    .put(StorageKey::create(Self::ID, 1), value.to_le_bytes().to_vec())?;
                Ok(Value::Null)
            }
            "emit" => {
                ctx.notify("Ping", vec![Value::Int(1)])?;
                Ok(Value::Null)
            }
            "fail" => {
                ctx.notify("Ping", vec![Value::Int(2)])?;
                Err(NativeError::handler("Probe", "boom"))
            }
            "undeclared" => {
                ctx.notify("Pong", Vec::new())?;
                Ok(Value::Null)
            }
            "relay" => {
                let bits = args[0].as_int().unwrap_or_default() as u8;
                let flags = CallFlags::from_bits_truncate(bits);
                engine.call_contract(ctx, &self.hash(), "emit", &[], flags)
            }
            "charge" => {
                ctx.charge(args[0].as_int().unwrap_or_default())?;
                Ok(Value::Null)
            }
            _ => Err(NativeError::handler("Probe", "unknown method")),
        }
    }
}

/// Standard contracts plus a `Probe`, returned alongside for inspection.
pub fn probe_dispatcher(settings: ProtocolSettings) -> (Dispatcher, Arc<Probe>) {
    let probe = Arc::new(Probe::new());
    let mut registry = NativeRegistry::standard().unwrap();
    registry
        .register_arc(Arc::clone(&probe) as Arc<dyn NativeContract>)
        .unwrap();
    (Dispatcher::new(Arc::new(registry), settings), probe)
}
