//! Hardfork-gated dispatch of native method calls.
//!
//! A call is resolved against the view of its contract at the hardfork in
//! effect at the block height, validated, charged and only then handed to the
//! contract. Every step before the handler is free of side effects.

use crate::cache::MetadataCache;
use crate::error::{NativeError, NativeResult};
use crate::notify::NotificationSink;
use crate::registry::{NativeEntry, NativeRegistry};
use crate::runtime::{CallState, ExecutionContext, Frame, NotifyEvent};
use crate::value::Value;
use crate::view::{EffectiveMetadata, ResolvedMethod};
use neo_config::ProtocolSettings;
use neo_primitives::{CallFlags, Hardfork, HardforkSelector, UInt160};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a successful top-level invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub value: Value,
    /// Gas consumed by the call, method price and dynamic fees included.
    pub gas_charged: i64,
    pub notifications: Vec<NotifyEvent>,
}

/// Routes calls to native contracts.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<NativeRegistry>,
    settings: ProtocolSettings,
    cache: MetadataCache,
}

impl Dispatcher {
    pub fn new(registry: Arc<NativeRegistry>, settings: ProtocolSettings) -> Self {
        Self {
            registry,
            settings,
            cache: MetadataCache::new(),
        }
    }

    pub fn registry(&self) -> &Arc<NativeRegistry> {
        &self.registry
    }

    pub fn settings(&self) -> &ProtocolSettings {
        &self.settings
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    /// Hardfork governing the block at `height`.
    pub fn hardfork_at(&self, height: u32) -> Option<Hardfork> {
        self.settings.hardfork_at(height)
    }

    /// The view of contract `hash` at `selector`.
    ///
    /// # Errors
    ///
    /// `ContractNotFound` if the hash is unknown or the contract does not exist
    /// yet at that hardfork.
    pub fn effective_metadata(
        &self,
        hash: &UInt160,
        selector: impl Into<HardforkSelector>,
    ) -> NativeResult<Arc<EffectiveMetadata>> {
        let entry = self.registry.lookup_by_hash(hash)?;
        self.view_at(entry, selector.into().resolve())
    }

    /// Resolves `name/parameter_count` on `hash` for a block at `height`.
    pub fn resolve(
        &self,
        hash: &UInt160,
        name: &str,
        parameter_count: usize,
        height: u32,
    ) -> NativeResult<ResolvedMethod> {
        let entry = self.registry.lookup_by_hash(hash)?;
        let view = self.view_at(entry, self.hardfork_at(height))?;
        ResolvedMethod::resolve(view, name, parameter_count)
    }

    /// Resolves and invokes a method at the context's block height.
    pub fn invoke(
        &self,
        ctx: &mut ExecutionContext<'_>,
        hash: &UInt160,
        name: &str,
        args: &[Value],
    ) -> NativeResult<InvocationResult> {
        let resolved = self.resolve(hash, name, args.len(), ctx.block_height())?;
        self.invoke_resolved(&resolved, ctx, args)
    }

    /// Invokes an already resolved method.
    ///
    /// Arguments, call flags and gas are checked in that order before the
    /// handler runs; a rejection leaves the context untouched. Once charged,
    /// the price is kept even if the handler fails. Events emitted by a
    /// failed call are dropped.
    pub fn invoke_resolved(
        &self,
        resolved: &ResolvedMethod,
        ctx: &mut ExecutionContext<'_>,
        args: &[Value],
    ) -> NativeResult<InvocationResult> {
        let gas_before = ctx.gas().consumed();
        let granted = ctx.call_flags();
        self.admit(resolved, granted, ctx, args)?;

        let mark = ctx.notifications().len();
        let state = CallState {
            frame: Some(frame(resolved)),
            call_flags: granted,
            calling_script_hash: ctx.calling_script_hash(),
        };
        match self.execute(resolved, ctx, args, state) {
            Ok(value) => {
                let notifications = ctx.take_notifications_from(mark);
                let gas_charged = ctx.gas().consumed() - gas_before;
                debug!(
                    contract = resolved.contract().name(),
                    method = %resolved.descriptor().signature(),
                    gas_charged,
                    notifications = notifications.len(),
                    "native call completed"
                );
                Ok(InvocationResult {
                    value,
                    gas_charged,
                    notifications,
                })
            }
            Err(err) => {
                ctx.discard_notifications_from(mark);
                debug!(
                    contract = resolved.contract().name(),
                    method = %resolved.descriptor().signature(),
                    error = %err,
                    "native call failed"
                );
                Err(err)
            }
        }
    }

    /// Calls another native contract from inside a handler.
    ///
    /// The callee runs with the caller's flags narrowed to `flags` and sees
    /// the calling contract as its caller. Its events stay in the context for
    /// the outer invocation to collect.
    pub fn call_contract(
        &self,
        ctx: &mut ExecutionContext<'_>,
        hash: &UInt160,
        name: &str,
        args: &[Value],
        flags: CallFlags,
    ) -> NativeResult<Value> {
        if !ctx.call_flags().contains(CallFlags::ALLOW_CALL) {
            warn!(method = name, "nested call without AllowCall");
            return Err(NativeError::PermissionDenied {
                operation: format!("call {name}"),
                missing: CallFlags::ALLOW_CALL,
            });
        }

        let resolved = self.resolve(hash, name, args.len(), ctx.block_height())?;
        let granted = ctx.call_flags() & flags;
        self.admit(&resolved, granted, ctx, args)?;

        let mark = ctx.notifications().len();
        let state = CallState {
            frame: Some(frame(&resolved)),
            call_flags: granted,
            calling_script_hash: ctx.current_script_hash().or(ctx.calling_script_hash()),
        };
        let result = self.execute(&resolved, ctx, args, state);
        if result.is_err() {
            ctx.discard_notifications_from(mark);
        }
        result
    }

    /// Runs every contract's `initialize`, in registration order, for the
    /// hardfork in effect at the context's height.
    pub fn initialize(&self, ctx: &mut ExecutionContext<'_>) -> NativeResult<()> {
        let hardfork = self.hardfork_at(ctx.block_height());
        for entry in self.registry.contracts() {
            if !entry.metadata().is_active_for(hardfork) {
                continue;
            }
            let previous = ctx.enter(CallState {
                frame: None,
                call_flags: CallFlags::ALL,
                calling_script_hash: None,
            });
            let result = self.run_as(ctx, &entry.metadata().hash(), "_initialize", |ctx| {
                entry.contract().initialize(self, ctx)
            });
            ctx.enter(previous);
            result?;
            debug!(contract = entry.metadata().name(), "initialized native contract");
        }
        Ok(())
    }

    /// Runs `f` in a frame of contract `hash`, so that events it emits are
    /// attributed to that contract. Used by contracts acting on another
    /// contract's state, such as NeoToken burning GAS.
    pub(crate) fn run_as<T, F>(
        &self,
        ctx: &mut ExecutionContext<'_>,
        hash: &UInt160,
        method: &str,
        f: F,
    ) -> NativeResult<T>
    where
        F: FnOnce(&mut ExecutionContext<'_>) -> NativeResult<T>,
    {
        let entry = self.registry.lookup_by_hash(hash)?;
        let view = self.view_at(entry, self.hardfork_at(ctx.block_height()))?;
        let previous = ctx.enter(CallState {
            frame: Some(Frame {
                view,
                method: method.to_string(),
            }),
            call_flags: ctx.call_flags(),
            calling_script_hash: ctx.current_script_hash(),
        });
        let result = f(ctx);
        ctx.enter(previous);
        result
    }

    /// Forwards the notifications of a committed invocation to `sink`.
    pub fn publish<S>(&self, result: &InvocationResult, sink: &S)
    where
        S: NotificationSink + ?Sized,
    {
        for event in &result.notifications {
            sink.publish(event.clone());
        }
    }

    fn view_at(
        &self,
        entry: &NativeEntry,
        hardfork: Option<Hardfork>,
    ) -> NativeResult<Arc<EffectiveMetadata>> {
        let metadata = entry.metadata();
        if !metadata.is_active_for(hardfork) {
            return Err(NativeError::contract_not_found(format!(
                "{} at {}",
                metadata.name(),
                HardforkSelector::At(hardfork)
            )));
        }
        Ok(self.cache.get_or_build(metadata, hardfork))
    }

    /// Arity, argument types, call flags, then gas.
    fn admit(
        &self,
        resolved: &ResolvedMethod,
        granted: CallFlags,
        ctx: &mut ExecutionContext<'_>,
        args: &[Value],
    ) -> NativeResult<()> {
        let method = resolved.descriptor();
        if args.len() != method.parameter_count() {
            return Err(NativeError::ArityMismatch {
                method: method.name.clone(),
                expected: method.parameter_count(),
                actual: args.len(),
            });
        }
        for (index, (parameter, arg)) in method.parameters.iter().zip(args).enumerate() {
            if !arg.is_compatible(parameter.kind) {
                return Err(NativeError::invalid_argument(
                    method.name.clone(),
                    index,
                    format!("expected {}, got {}", parameter.kind, arg.kind()),
                ));
            }
        }

        let missing = granted.missing(method.required_call_flags);
        if !missing.is_empty() {
            warn!(
                contract = resolved.contract().name(),
                method = %method.signature(),
                %missing,
                "call flags do not cover native method"
            );
            return Err(NativeError::PermissionDenied {
                operation: format!("{}.{}", resolved.contract().name(), method.name),
                missing,
            });
        }

        if let Err(err) = ctx.charge(resolved.price()) {
            warn!(
                contract = resolved.contract().name(),
                method = %method.signature(),
                price = resolved.price(),
                remaining = ctx.gas().remaining(),
                "gas budget exhausted"
            );
            return Err(err);
        }
        Ok(())
    }

    fn execute(
        &self,
        resolved: &ResolvedMethod,
        ctx: &mut ExecutionContext<'_>,
        args: &[Value],
        state: CallState,
    ) -> NativeResult<Value> {
        let entry = self.registry.lookup_by_hash(&resolved.view().hash())?;
        let previous = ctx.enter(state);
        let result = entry
            .contract()
            .invoke(self, ctx, resolved.descriptor(), args);
        ctx.enter(previous);
        result
    }
}

fn frame(resolved: &ResolvedMethod) -> Frame {
    Frame {
        view: Arc::clone(resolved.view()),
        method: resolved.descriptor().name.clone(),
    }
}
