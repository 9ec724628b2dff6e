use super::fungible::{nep17_methods, transfer_event, FungibleToken};
use super::no_handler;
use crate::contract::NativeContract;
use crate::descriptor::MethodDescriptor;
use crate::dispatcher::Dispatcher;
use crate::error::{NativeError, NativeResult};
use crate::metadata::ContractMetadata;
use crate::runtime::ExecutionContext;
use crate::value::Value;

/// The GAS utility token.
#[derive(Debug, Clone)]
pub struct GasToken {
    metadata: ContractMetadata,
}

impl GasToken {
    pub const ID: i32 = -6;
    pub const NAME: &'static str = "GasToken";
    pub const SYMBOL: &'static str = "GAS";
    pub const DECIMALS: u8 = 8;
    /// GAS minted to the committee when the chain starts, in datoshi.
    pub const INITIAL_GAS_DISTRIBUTION: i64 = 52_000_000_00000000;

    pub fn new() -> Self {
        let metadata = ContractMetadata::new(Self::ID, Self::NAME)
            .with_methods(nep17_methods())
            .with_event(transfer_event());
        Self { metadata }
    }
}

impl Default for GasToken {
    fn default() -> Self {
        Self::new()
    }
}

impl FungibleToken for GasToken {
    fn symbol(&self) -> &'static str {
        Self::SYMBOL
    }

    fn decimals(&self) -> u8 {
        Self::DECIMALS
    }
}

impl NativeContract for GasToken {
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
        self.invoke_nep17(engine, ctx, method, args)?
            .ok_or_else(|| no_handler(Self::NAME, method))
    }

    fn initialize(&self, engine: &Dispatcher, ctx: &mut ExecutionContext<'_>) -> NativeResult<()> {
        let committee = ctx
            .committee_address()
            .ok_or_else(|| NativeError::handler(Self::NAME, "committee address is not configured"))?;
        self.mint(engine, ctx, &committee, Self::INITIAL_GAS_DISTRIBUTION, false)
    }
}
