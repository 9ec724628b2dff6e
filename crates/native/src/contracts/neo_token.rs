//! The NEO governance token.

use super::fungible::{nep17_methods, transfer_event, AccountState, FungibleToken};
use super::gas_token::GasToken;
use super::{
    bytes_arg, decode_i64, get_i64, int_arg, hash_arg, no_handler, optional_bytes_arg, put_i64,
    require_committee, CPU_FEE,
};
use crate::contract::NativeContract;
use crate::descriptor::{params, ContractParameterDefinition, EventDescriptor, MethodDescriptor};
use crate::dispatcher::Dispatcher;
use crate::error::{NativeError, NativeResult};
use crate::metadata::ContractMetadata;
use crate::runtime::{ExecutionContext, StorageKey};
use crate::value::Value;
use neo_primitives::{signature_account, CallFlags, ContractParameterType as T, Hardfork, UInt160};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CandidateState {
    registered: bool,
    votes: i64,
}

impl CandidateState {
    fn decode(bytes: &[u8]) -> NativeResult<Self> {
        match bytes.split_first() {
            Some((registered, votes)) => Ok(Self {
                registered: *registered != 0,
                votes: decode_i64(votes)?,
            }),
            None => Err(NativeError::storage("empty candidate state")),
        }
    }

    fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(9);
        bytes.push(u8::from(self.registered));
        bytes.extend_from_slice(&self.votes.to_le_bytes());
        bytes
    }
}

/// The NEO token: NEP-17 plus candidate registration and voting.
#[derive(Debug, Clone)]
pub struct NeoToken {
    metadata: ContractMetadata,
    gas: GasToken,
}

impl NeoToken {
    pub const ID: i32 = -5;
    pub const NAME: &'static str = "NeoToken";
    pub const SYMBOL: &'static str = "NEO";
    pub const DECIMALS: u8 = 0;
    pub const TOTAL_SUPPLY: i64 = 100_000_000;
    pub const DEFAULT_REGISTER_PRICE: i64 = 1000_00000000;
    pub const DEFAULT_GAS_PER_BLOCK: i64 = 5_00000000;
    pub const MAX_GAS_PER_BLOCK: i64 = 10_00000000;

    const PREFIX_REGISTER_PRICE: u8 = 13;
    const PREFIX_GAS_PER_BLOCK: u8 = 29;
    const PREFIX_CANDIDATE: u8 = 33;

    pub fn new() -> Self {
        let pubkey = || params(&[("pubkey", T::PublicKey)]);
        let mut methods = nep17_methods();
        methods.extend(governance_pair("registerCandidate", 0, pubkey()));
        methods.extend(governance_pair("unregisterCandidate", 1 << 16, pubkey()));
        methods.extend(governance_pair(
            "vote",
            1 << 16,
            params(&[("account", T::Hash160), ("voteTo", T::PublicKey)]),
        ));
        methods.extend([
            MethodDescriptor::safe("getCandidates", 1 << 22, Vec::new(), T::Array),
            MethodDescriptor::safe("getCandidateVote", CPU_FEE, pubkey(), T::Integer),
            MethodDescriptor::safe("getRegisterPrice", CPU_FEE, Vec::new(), T::Integer),
            MethodDescriptor::unsafe_method(
                "setRegisterPrice",
                CPU_FEE,
                CallFlags::STATES,
                params(&[("registerPrice", T::Integer)]),
                T::Void,
            ),
            MethodDescriptor::safe("getGasPerBlock", CPU_FEE, Vec::new(), T::Integer),
            MethodDescriptor::unsafe_method(
                "setGasPerBlock",
                CPU_FEE,
                CallFlags::STATES,
                params(&[("gasPerBlock", T::Integer)]),
                T::Void,
            ),
            MethodDescriptor::safe("getCommitteeAddress", 1 << 16, Vec::new(), T::Hash160)
                .with_active_in(Hardfork::HfCockatrice),
            MethodDescriptor::unsafe_method(
                "onNEP17Payment",
                0,
                CallFlags::STATES | CallFlags::ALLOW_NOTIFY,
                params(&[("from", T::Hash160), ("amount", T::Integer), ("data", T::Any)]),
                T::Void,
            )
            .with_active_in(Hardfork::HfEchidna),
        ]);

        let metadata = ContractMetadata::new(Self::ID, Self::NAME)
            .with_methods(methods)
            .with_events([
                transfer_event(),
                EventDescriptor::new(
                    "CandidateStateChanged",
                    params(&[
                        ("pubkey", T::PublicKey),
                        ("registered", T::Boolean),
                        ("votes", T::Integer),
                    ]),
                ),
                EventDescriptor::new(
                    "Vote",
                    params(&[
                        ("account", T::Hash160),
                        ("from", T::PublicKey),
                        ("to", T::PublicKey),
                        ("amount", T::Integer),
                    ]),
                ),
                EventDescriptor::new(
                    "CommitteeChanged",
                    params(&[("old", T::Array), ("new", T::Array)]),
                )
                .with_active_in(Hardfork::HfCockatrice),
            ]);

        Self {
            metadata,
            gas: GasToken::new(),
        }
    }

    pub fn register_price(&self, ctx: &ExecutionContext<'_>) -> NativeResult<i64> {
        let key = StorageKey::create(Self::ID, Self::PREFIX_REGISTER_PRICE);
        Ok(get_i64(ctx, &key)?.unwrap_or(Self::DEFAULT_REGISTER_PRICE))
    }

    pub fn gas_per_block(&self, ctx: &ExecutionContext<'_>) -> NativeResult<i64> {
        let key = StorageKey::create(Self::ID, Self::PREFIX_GAS_PER_BLOCK);
        Ok(get_i64(ctx, &key)?.unwrap_or(Self::DEFAULT_GAS_PER_BLOCK))
    }

    /// Registered candidates with their votes, in key order.
    pub fn candidates(&self, ctx: &ExecutionContext<'_>) -> NativeResult<Vec<(Vec<u8>, i64)>> {
        let prefix = StorageKey::create(Self::ID, Self::PREFIX_CANDIDATE);
        let mut candidates = Vec::new();
        for (key, value) in ctx.store().find(&prefix)? {
            let state = CandidateState::decode(&value)?;
            if state.registered {
                candidates.push((key.suffix().to_vec(), state.votes));
            }
        }
        Ok(candidates)
    }

    fn candidate(&self, ctx: &ExecutionContext<'_>, pubkey: &[u8]) -> NativeResult<Option<CandidateState>> {
        ctx.store()
            .get(&candidate_key(pubkey))?
            .map(|bytes| CandidateState::decode(&bytes))
            .transpose()
    }

    fn put_candidate(
        &self,
        ctx: &mut ExecutionContext<'_>,
        pubkey: &[u8],
        state: CandidateState,
    ) -> NativeResult<()> {
        let key = candidate_key(pubkey);
        if !state.registered && state.votes == 0 {
            ctx.store_mut().delete(&key)
        } else {
            ctx.store_mut().put(key, state.encode())
        }
    }

    fn adjust_votes(&self, ctx: &mut ExecutionContext<'_>, pubkey: &[u8], delta: i64) -> NativeResult<()> {
        let mut state = self.candidate(ctx, pubkey)?.unwrap_or_default();
        state.votes = state
            .votes
            .checked_add(delta)
            .ok_or_else(|| self.fail("vote count overflow"))?;
        self.put_candidate(ctx, pubkey, state)
    }

    fn candidate_account(
        &self,
        method: &MethodDescriptor,
        index: usize,
        pubkey: &[u8],
    ) -> NativeResult<UInt160> {
        signature_account(pubkey)
            .map_err(|err| NativeError::invalid_argument(method.name.clone(), index, err.to_string()))
    }

    fn register_internal(
        &self,
        ctx: &mut ExecutionContext<'_>,
        method: &MethodDescriptor,
        index: usize,
        pubkey: &[u8],
    ) -> NativeResult<bool> {
        let account = self.candidate_account(method, index, pubkey)?;
        if !ctx.check_witness(&account) {
            return Ok(false);
        }
        let mut state = self.candidate(ctx, pubkey)?.unwrap_or_default();
        if state.registered {
            return Ok(true);
        }
        state.registered = true;
        self.put_candidate(ctx, pubkey, state)?;
        ctx.notify(
            "CandidateStateChanged",
            vec![
                Value::Bytes(pubkey.to_vec()),
                Value::Bool(true),
                Value::Int(state.votes),
            ],
        )?;
        debug!(account = %account, "candidate registered");
        Ok(true)
    }

    fn register_candidate(
        &self,
        ctx: &mut ExecutionContext<'_>,
        method: &MethodDescriptor,
        pubkey: &[u8],
    ) -> NativeResult<bool> {
        let account = self.candidate_account(method, 0, pubkey)?;
        if !ctx.check_witness(&account) {
            return Ok(false);
        }
        let price = self.register_price(ctx)?;
        ctx.charge(price)?;
        self.register_internal(ctx, method, 0, pubkey)
    }

    fn unregister_candidate(
        &self,
        ctx: &mut ExecutionContext<'_>,
        method: &MethodDescriptor,
        pubkey: &[u8],
    ) -> NativeResult<bool> {
        let account = self.candidate_account(method, 0, pubkey)?;
        if !ctx.check_witness(&account) {
            return Ok(false);
        }
        let Some(mut state) = self.candidate(ctx, pubkey)? else {
            return Ok(true);
        };
        if !state.registered {
            return Ok(true);
        }
        state.registered = false;
        self.put_candidate(ctx, pubkey, state)?;
        ctx.notify(
            "CandidateStateChanged",
            vec![
                Value::Bytes(pubkey.to_vec()),
                Value::Bool(false),
                Value::Int(state.votes),
            ],
        )?;
        Ok(true)
    }

    fn vote(
        &self,
        ctx: &mut ExecutionContext<'_>,
        account: &UInt160,
        vote_to: Option<&[u8]>,
    ) -> NativeResult<bool> {
        if !ctx.check_witness(account) {
            return Ok(false);
        }
        let Some(mut state) = self.account_state(ctx, account)? else {
            return Ok(false);
        };
        if let Some(pubkey) = vote_to {
            if !self.candidate(ctx, pubkey)?.map_or(false, |c| c.registered) {
                return Ok(false);
            }
        }

        let previous = (!state.extra.is_empty()).then(|| state.extra.clone());
        if let Some(previous) = &previous {
            self.adjust_votes(ctx, previous, -state.balance)?;
        }
        if let Some(pubkey) = vote_to {
            self.adjust_votes(ctx, pubkey, state.balance)?;
        }
        state.extra = vote_to.map(<[u8]>::to_vec).unwrap_or_default();
        self.put_account_state(ctx, account, &state)?;

        ctx.notify(
            "Vote",
            vec![
                Value::Hash160(*account),
                Value::from(previous),
                Value::from(vote_to.map(<[u8]>::to_vec)),
                Value::Int(state.balance),
            ],
        )?;
        Ok(true)
    }

    /// Candidate registration paid for by a GAS transfer of exactly the
    /// register price, with the public key as transfer data.
    fn on_payment(
        &self,
        engine: &Dispatcher,
        ctx: &mut ExecutionContext<'_>,
        method: &MethodDescriptor,
        args: &[Value],
    ) -> NativeResult<Value> {
        let gas = self.gas.metadata().hash();
        if ctx.calling_script_hash() != Some(gas) {
            return Err(self.fail("only GAS is accepted"));
        }
        let amount = int_arg(method, args, 1)?;
        if amount != self.register_price(ctx)? {
            return Err(self.fail("incorrect GAS amount for registration"));
        }
        let pubkey = bytes_arg(method, args, 2)?;
        if !self.register_internal(ctx, method, 2, pubkey)? {
            return Err(self.fail("failed to register candidate"));
        }
        let neo = self.metadata.hash();
        engine.run_as(ctx, &gas, "burn", |ctx| self.gas.burn(engine, ctx, &neo, amount))?;
        Ok(Value::Null)
    }
}

impl Default for NeoToken {
    fn default() -> Self {
        Self::new()
    }
}

impl FungibleToken for NeoToken {
    fn symbol(&self) -> &'static str {
        Self::SYMBOL
    }

    fn decimals(&self) -> u8 {
        Self::DECIMALS
    }

    /// Moves the holder's voting weight along with its balance.
    fn on_balance_changing(
        &self,
        ctx: &mut ExecutionContext<'_>,
        _account: &UInt160,
        state: &AccountState,
        delta: i64,
    ) -> NativeResult<()> {
        if delta == 0 || state.extra.is_empty() {
            return Ok(());
        }
        self.adjust_votes(ctx, &state.extra, delta)
    }
}

impl NativeContract for NeoToken {
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
        if let Some(value) = self.invoke_nep17(engine, ctx, method, args)? {
            return Ok(value);
        }
        match method.name.as_str() {
            "registerCandidate" => {
                let pubkey = bytes_arg(method, args, 0)?;
                Ok(Value::Bool(self.register_candidate(ctx, method, pubkey)?))
            }
            "unregisterCandidate" => {
                let pubkey = bytes_arg(method, args, 0)?;
                Ok(Value::Bool(self.unregister_candidate(ctx, method, pubkey)?))
            }
            "vote" => {
                let account = hash_arg(method, args, 0)?;
                let vote_to = optional_bytes_arg(method, args, 1)?;
                Ok(Value::Bool(self.vote(ctx, &account, vote_to)?))
            }
            "getCandidates" => Ok(Value::Array(
                self.candidates(ctx)?
                    .into_iter()
                    .map(|(pubkey, votes)| Value::Array(vec![Value::Bytes(pubkey), Value::Int(votes)]))
                    .collect(),
            )),
            "getCandidateVote" => {
                let pubkey = bytes_arg(method, args, 0)?;
                let votes = self
                    .candidate(ctx, pubkey)?
                    .filter(|state| state.registered)
                    .map_or(-1, |state| state.votes);
                Ok(Value::Int(votes))
            }
            "getRegisterPrice" => Ok(Value::Int(self.register_price(ctx)?)),
            "setRegisterPrice" => {
                let price = int_arg(method, args, 0)?;
                if price <= 0 {
                    return Err(self.fail("register price must be positive"));
                }
                require_committee(ctx, Self::NAME)?;
                put_i64(ctx, StorageKey::create(Self::ID, Self::PREFIX_REGISTER_PRICE), price)?;
                Ok(Value::Null)
            }
            "getGasPerBlock" => Ok(Value::Int(self.gas_per_block(ctx)?)),
            "setGasPerBlock" => {
                let amount = int_arg(method, args, 0)?;
                if !(0..=Self::MAX_GAS_PER_BLOCK).contains(&amount) {
                    return Err(self.fail(format!(
                        "gas per block must be between 0 and {}",
                        Self::MAX_GAS_PER_BLOCK
                    )));
                }
                require_committee(ctx, Self::NAME)?;
                put_i64(ctx, StorageKey::create(Self::ID, Self::PREFIX_GAS_PER_BLOCK), amount)?;
                Ok(Value::Null)
            }
            "getCommitteeAddress" => Ok(Value::from(ctx.committee_address())),
            "onNEP17Payment" => self.on_payment(engine, ctx, method, args),
            _ => Err(no_handler(Self::NAME, method)),
        }
    }

    fn initialize(&self, engine: &Dispatcher, ctx: &mut ExecutionContext<'_>) -> NativeResult<()> {
        let committee = ctx
            .committee_address()
            .ok_or_else(|| self.fail("committee address is not configured"))?;
        put_i64(
            ctx,
            StorageKey::create(Self::ID, Self::PREFIX_REGISTER_PRICE),
            Self::DEFAULT_REGISTER_PRICE,
        )?;
        put_i64(
            ctx,
            StorageKey::create(Self::ID, Self::PREFIX_GAS_PER_BLOCK),
            Self::DEFAULT_GAS_PER_BLOCK,
        )?;
        self.mint(engine, ctx, &committee, Self::TOTAL_SUPPLY, false)
    }
}

/// A governance method declared with `States` until Echidna and redeclared
/// there with `AllowNotify` added, since it emits events.
fn governance_pair(
    name: &str,
    price: i64,
    parameters: Vec<ContractParameterDefinition>,
) -> [MethodDescriptor; 2] {
    let before = MethodDescriptor::unsafe_method(name, price, CallFlags::STATES, parameters, T::Boolean);
    let after = before
        .clone()
        .with_active_in(Hardfork::HfEchidna)
        .with_required_call_flags(CallFlags::STATES | CallFlags::ALLOW_NOTIFY);
    [before.with_deprecated_in(Hardfork::HfEchidna), after]
}

fn candidate_key(pubkey: &[u8]) -> StorageKey {
    StorageKey::create_with_bytes(NeoToken::ID, NeoToken::PREFIX_CANDIDATE, pubkey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::HardforkActivable;

    #[test]
    fn governance_methods_swap_flags_at_echidna() {
        let neo = NeoToken::new();
        let register: Vec<_> = neo
            .metadata()
            .methods()
            .iter()
            .filter(|m| m.name == "registerCandidate")
            .collect();
        assert_eq!(register.len(), 2);
        assert!(register[0].is_active_for(Some(Hardfork::HfDomovoi)));
        assert!(!register[0].is_active_for(Some(Hardfork::HfEchidna)));
        assert_eq!(register[0].required_call_flags, CallFlags::STATES);
        assert!(register[1].is_active_for(Some(Hardfork::HfEchidna)));
        assert!(register[1]
            .required_call_flags
            .contains(CallFlags::ALLOW_NOTIFY));
        neo.metadata().validate().unwrap();
    }

    #[test]
    fn candidate_state_encoding() {
        let state = CandidateState {
            registered: true,
            votes: 42,
        };
        assert_eq!(CandidateState::decode(&state.encode()).unwrap(), state);
        assert!(CandidateState::decode(&[]).is_err());
    }
}
