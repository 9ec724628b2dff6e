use crate::descriptor::MethodDescriptor;
use crate::dispatcher::Dispatcher;
use crate::error::NativeResult;
use crate::metadata::ContractMetadata;
use crate::runtime::ExecutionContext;
use crate::value::Value;

/// Trait implemented by each native contract so the dispatcher can route calls.
///
/// `invoke` receives the descriptor that was resolved for the caller's
/// hardfork; arity, argument types, call flags and the method price have
/// already been checked and charged.
pub trait NativeContract: Send + Sync {
    fn metadata(&self) -> &ContractMetadata;

    fn invoke(
        &self,
        engine: &Dispatcher,
        ctx: &mut ExecutionContext<'_>,
        method: &MethodDescriptor,
        args: &[Value],
    ) -> NativeResult<Value>;

    /// Seeds the contract's storage on a fresh chain.
    fn initialize(&self, _engine: &Dispatcher, _ctx: &mut ExecutionContext<'_>) -> NativeResult<()> {
        Ok(())
    }
}
