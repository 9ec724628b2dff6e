//! NEP-17 behaviour shared by `NeoToken` and `GasToken`.

use super::{get_i64, hash_arg, int_arg, put_i64, CPU_FEE};
use crate::contract::NativeContract;
use crate::descriptor::{params, EventDescriptor, MethodDescriptor};
use crate::dispatcher::Dispatcher;
use crate::error::{NativeError, NativeResult};
use crate::runtime::{ExecutionContext, StorageKey};
use crate::value::Value;
use neo_primitives::{CallFlags, ContractParameterType as T, UInt160};

/// Prefix for storing total supply in storage.
pub const PREFIX_TOTAL_SUPPLY: u8 = 11;

/// Prefix for storing account states in storage.
pub const PREFIX_ACCOUNT: u8 = 20;

/// Balance of one holder followed by token-specific state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountState {
    pub balance: i64,
    pub extra: Vec<u8>,
}

impl AccountState {
    fn decode(bytes: &[u8]) -> NativeResult<Self> {
        if bytes.len() < 8 {
            return Err(NativeError::storage(format!(
                "account state too short: {} bytes",
                bytes.len()
            )));
        }
        let (balance, extra) = bytes.split_at(8);
        Ok(Self {
            balance: super::decode_i64(balance)?,
            extra: extra.to_vec(),
        })
    }

    fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.extra.len());
        bytes.extend_from_slice(&self.balance.to_le_bytes());
        bytes.extend_from_slice(&self.extra);
        bytes
    }
}

/// The five NEP-17 methods every token exposes.
pub(crate) fn nep17_methods() -> Vec<MethodDescriptor> {
    vec![
        MethodDescriptor::new("symbol", 0, CallFlags::NONE, true, Vec::new(), T::String),
        MethodDescriptor::new("decimals", 0, CallFlags::NONE, true, Vec::new(), T::Integer),
        MethodDescriptor::safe("totalSupply", CPU_FEE, Vec::new(), T::Integer),
        MethodDescriptor::safe(
            "balanceOf",
            CPU_FEE,
            params(&[("account", T::Hash160)]),
            T::Integer,
        ),
        MethodDescriptor::unsafe_method(
            "transfer",
            1 << 17,
            CallFlags::STATES | CallFlags::ALLOW_CALL | CallFlags::ALLOW_NOTIFY,
            params(&[
                ("from", T::Hash160),
                ("to", T::Hash160),
                ("amount", T::Integer),
                ("data", T::Any),
            ]),
            T::Boolean,
        ),
    ]
}

pub(crate) fn transfer_event() -> EventDescriptor {
    EventDescriptor::new(
        "Transfer",
        params(&[
            ("from", T::Hash160),
            ("to", T::Hash160),
            ("amount", T::Integer),
        ]),
    )
}

/// NEP-17 token backed by the contract's own storage.
///
/// Implementors supply the token constants and may react to balance changes;
/// storage layout, events and the `onNEP17Payment` callback are shared.
pub trait FungibleToken: NativeContract {
    fn symbol(&self) -> &'static str;

    fn decimals(&self) -> u8;

    /// Called before the balance of `account` changes by `delta`.
    fn on_balance_changing(
        &self,
        _ctx: &mut ExecutionContext<'_>,
        _account: &UInt160,
        _state: &AccountState,
        _delta: i64,
    ) -> NativeResult<()> {
        Ok(())
    }

    fn total_supply(&self, ctx: &ExecutionContext<'_>) -> NativeResult<i64> {
        let key = StorageKey::create(self.metadata().id(), PREFIX_TOTAL_SUPPLY);
        Ok(get_i64(ctx, &key)?.unwrap_or(0))
    }

    fn account_state(
        &self,
        ctx: &ExecutionContext<'_>,
        account: &UInt160,
    ) -> NativeResult<Option<AccountState>> {
        let key = account_key(self.metadata().id(), account);
        ctx.store()
            .get(&key)?
            .map(|bytes| AccountState::decode(&bytes))
            .transpose()
    }

    fn put_account_state(
        &self,
        ctx: &mut ExecutionContext<'_>,
        account: &UInt160,
        state: &AccountState,
    ) -> NativeResult<()> {
        let key = account_key(self.metadata().id(), account);
        if state.balance == 0 {
            ctx.store_mut().delete(&key)
        } else {
            ctx.store_mut().put(key, state.encode())
        }
    }

    fn balance_of(&self, ctx: &ExecutionContext<'_>, account: &UInt160) -> NativeResult<i64> {
        Ok(self
            .account_state(ctx, account)?
            .map_or(0, |state| state.balance))
    }

    /// Creates `amount` tokens on `account`.
    fn mint(
        &self,
        engine: &Dispatcher,
        ctx: &mut ExecutionContext<'_>,
        account: &UInt160,
        amount: i64,
        call_on_payment: bool,
    ) -> NativeResult<()> {
        if amount < 0 {
            return Err(self.fail("mint amount cannot be negative"));
        }
        if amount == 0 {
            return Ok(());
        }
        let mut state = self.account_state(ctx, account)?.unwrap_or_default();
        self.on_balance_changing(ctx, account, &state, amount)?;
        state.balance = self.add(state.balance, amount)?;
        self.put_account_state(ctx, account, &state)?;
        let supply = self.add(self.total_supply(ctx)?, amount)?;
        self.put_total_supply(ctx, supply)?;
        self.post_transfer(engine, ctx, None, Some(account), amount, Value::Null, call_on_payment)
    }

    /// Destroys `amount` tokens held by `account`.
    fn burn(
        &self,
        engine: &Dispatcher,
        ctx: &mut ExecutionContext<'_>,
        account: &UInt160,
        amount: i64,
    ) -> NativeResult<()> {
        if amount < 0 {
            return Err(self.fail("burn amount cannot be negative"));
        }
        if amount == 0 {
            return Ok(());
        }
        let mut state = self
            .account_state(ctx, account)?
            .filter(|state| state.balance >= amount)
            .ok_or_else(|| self.fail(format!("insufficient balance to burn {amount}")))?;
        self.on_balance_changing(ctx, account, &state, -amount)?;
        state.balance -= amount;
        self.put_account_state(ctx, account, &state)?;
        let supply = self.total_supply(ctx)? - amount;
        self.put_total_supply(ctx, supply)?;
        self.post_transfer(engine, ctx, Some(account), None, amount, Value::Null, false)
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// Returns `false` without effects when `from` did not witness the call or
    /// cannot cover the amount.
    fn transfer(
        &self,
        engine: &Dispatcher,
        ctx: &mut ExecutionContext<'_>,
        from: &UInt160,
        to: &UInt160,
        amount: i64,
        data: Value,
    ) -> NativeResult<bool> {
        if amount < 0 {
            return Err(self.fail("transfer amount cannot be negative"));
        }
        if !ctx.check_witness(from) {
            return Ok(false);
        }

        match self.account_state(ctx, from)? {
            None if amount > 0 => return Ok(false),
            None => {}
            Some(state) if state.balance < amount => return Ok(false),
            Some(state) if amount == 0 || from == to => {
                self.on_balance_changing(ctx, from, &state, 0)?;
            }
            Some(mut state) => {
                self.on_balance_changing(ctx, from, &state, -amount)?;
                state.balance -= amount;
                self.put_account_state(ctx, from, &state)?;

                let mut receiver = self.account_state(ctx, to)?.unwrap_or_default();
                self.on_balance_changing(ctx, to, &receiver, amount)?;
                receiver.balance = self.add(receiver.balance, amount)?;
                self.put_account_state(ctx, to, &receiver)?;
            }
        }

        self.post_transfer(engine, ctx, Some(from), Some(to), amount, data, true)?;
        Ok(true)
    }

    /// Handles the shared NEP-17 methods; `None` for any other method.
    fn invoke_nep17(
        &self,
        engine: &Dispatcher,
        ctx: &mut ExecutionContext<'_>,
        method: &MethodDescriptor,
        args: &[Value],
    ) -> NativeResult<Option<Value>> {
        let value = match method.name.as_str() {
            "symbol" => Value::from(self.symbol()),
            "decimals" => Value::Int(i64::from(self.decimals())),
            "totalSupply" => Value::Int(self.total_supply(ctx)?),
            "balanceOf" => Value::Int(self.balance_of(ctx, &hash_arg(method, args, 0)?)?),
            "transfer" => {
                let from = hash_arg(method, args, 0)?;
                let to = hash_arg(method, args, 1)?;
                let amount = int_arg(method, args, 2)?;
                let data = args.get(3).cloned().unwrap_or(Value::Null);
                Value::Bool(self.transfer(engine, ctx, &from, &to, amount, data)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    #[doc(hidden)]
    fn put_total_supply(&self, ctx: &mut ExecutionContext<'_>, supply: i64) -> NativeResult<()> {
        let key = StorageKey::create(self.metadata().id(), PREFIX_TOTAL_SUPPLY);
        put_i64(ctx, key, supply)
    }

    /// Emits `Transfer` and, for a native receiver exposing
    /// `onNEP17Payment` at this height, calls it.
    #[doc(hidden)]
    #[allow(clippy::too_many_arguments)]
    fn post_transfer(
        &self,
        engine: &Dispatcher,
        ctx: &mut ExecutionContext<'_>,
        from: Option<&UInt160>,
        to: Option<&UInt160>,
        amount: i64,
        data: Value,
        call_on_payment: bool,
    ) -> NativeResult<()> {
        ctx.notify(
            "Transfer",
            vec![
                Value::from(from.copied()),
                Value::from(to.copied()),
                Value::Int(amount),
            ],
        )?;

        let Some(to) = to else {
            return Ok(());
        };
        if !call_on_payment
            || !engine.registry().is_native(to)
            || engine
                .resolve(to, "onNEP17Payment", 3, ctx.block_height())
                .is_err()
        {
            return Ok(());
        }
        engine.call_contract(
            ctx,
            to,
            "onNEP17Payment",
            &[Value::from(from.copied()), Value::Int(amount), data],
            CallFlags::ALL,
        )?;
        Ok(())
    }

    #[doc(hidden)]
    fn add(&self, left: i64, right: i64) -> NativeResult<i64> {
        left.checked_add(right)
            .ok_or_else(|| self.fail("token amount overflow"))
    }

    #[doc(hidden)]
    fn fail(&self, message: impl Into<String>) -> NativeError {
        NativeError::handler(self.metadata().name(), message)
    }
}

fn account_key(id: i32, account: &UInt160) -> StorageKey {
    StorageKey::create_with_uint160(id, PREFIX_ACCOUNT, account)
}
