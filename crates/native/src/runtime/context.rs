use super::gas::GasMeter;
use super::storage::Storage;
use crate::error::{NativeError, NativeResult};
use crate::value::Value;
use crate::view::EffectiveMetadata;
use neo_primitives::{CallFlags, Hardfork, UInt160};
use serde::Serialize;
use std::sync::Arc;

/// An event emitted by a native method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyEvent {
    pub script_hash: UInt160,
    pub contract: String,
    /// Method that was executing when the event was emitted.
    pub method: String,
    pub event_name: String,
    pub state: Vec<Value>,
}

/// The native method currently executing.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub(crate) view: Arc<EffectiveMetadata>,
    pub(crate) method: String,
}

/// Per-call state swapped in and out around a handler.
#[derive(Debug, Clone)]
pub(crate) struct CallState {
    pub(crate) frame: Option<Frame>,
    pub(crate) call_flags: CallFlags,
    pub(crate) calling_script_hash: Option<UInt160>,
}

/// State of the transaction a native call runs in.
///
/// Owned by the ledger/VM layer for the duration of one transaction; the
/// dispatcher borrows it mutably for each call.
pub struct ExecutionContext<'a> {
    store: &'a mut dyn Storage,
    gas: GasMeter,
    block_height: u32,
    call_flags: CallFlags,
    calling_script_hash: Option<UInt160>,
    witnesses: Vec<UInt160>,
    committee_address: Option<UInt160>,
    notifications: Vec<NotifyEvent>,
    frame: Option<Frame>,
}

impl<'a> ExecutionContext<'a> {
    /// Creates a context granting `CallFlags::ALL`.
    pub fn new(store: &'a mut dyn Storage, gas_limit: i64, block_height: u32) -> Self {
        Self {
            store,
            gas: GasMeter::new(gas_limit),
            block_height,
            call_flags: CallFlags::ALL,
            calling_script_hash: None,
            witnesses: Vec::new(),
            committee_address: None,
            notifications: Vec::new(),
            frame: None,
        }
    }

    pub fn with_call_flags(mut self, flags: CallFlags) -> Self {
        self.call_flags = flags;
        self
    }

    /// Accounts whose witnesses the transaction carries.
    pub fn with_witnesses(mut self, witnesses: impl IntoIterator<Item = UInt160>) -> Self {
        self.witnesses.extend(witnesses);
        self
    }

    /// Multi-signature address of the current committee.
    pub fn with_committee(mut self, address: UInt160) -> Self {
        self.committee_address = Some(address);
        self
    }

    pub fn with_calling_script_hash(mut self, hash: UInt160) -> Self {
        self.calling_script_hash = Some(hash);
        self
    }

    pub fn store(&self) -> &dyn Storage {
        &*self.store
    }

    pub fn store_mut(&mut self) -> &mut dyn Storage {
        &mut *self.store
    }

    pub fn gas(&self) -> &GasMeter {
        &self.gas
    }

    /// Charges a dynamic fee on top of the method price.
    pub fn charge(&mut self, amount: i64) -> NativeResult<()> {
        self.gas.charge(amount)
    }

    pub fn block_height(&self) -> u32 {
        self.block_height
    }

    pub fn call_flags(&self) -> CallFlags {
        self.call_flags
    }

    pub fn calling_script_hash(&self) -> Option<UInt160> {
        self.calling_script_hash
    }

    /// Hash of the native contract currently executing.
    pub fn current_script_hash(&self) -> Option<UInt160> {
        self.frame.as_ref().map(|frame| frame.view.hash())
    }

    /// Hardfork of the view the current call was resolved against.
    pub fn current_hardfork(&self) -> Option<Hardfork> {
        self.frame.as_ref().and_then(|frame| frame.view.hardfork())
    }

    pub fn committee_address(&self) -> Option<UInt160> {
        self.committee_address
    }

    /// Whether `hash` witnessed the transaction or is the calling contract.
    pub fn check_witness(&self, hash: &UInt160) -> bool {
        self.calling_script_hash.as_ref() == Some(hash) || self.witnesses.contains(hash)
    }

    /// Whether the committee witnessed the transaction.
    pub fn check_committee(&self) -> bool {
        self.committee_address
            .map_or(false, |address| self.check_witness(&address))
    }

    /// Emits `event` from the executing contract.
    ///
    /// # Errors
    ///
    /// * `PermissionDenied` if the call was not granted `ALLOW_NOTIFY` and the
    ///   executing view is at Echidna or later. Native events were not gated
    ///   on the flag before Echidna.
    /// * `UndeclaredEvent` if the contract does not declare the event at the
    ///   current hardfork.
    pub fn notify(&mut self, event: &str, state: Vec<Value>) -> NativeResult<()> {
        let Some(frame) = &self.frame else {
            return Err(NativeError::handler(
                "ExecutionContext",
                format!("{event} emitted outside a native call"),
            ));
        };
        if frame.view.hardfork() >= Some(Hardfork::HfEchidna)
            && !self.call_flags.contains(CallFlags::ALLOW_NOTIFY)
        {
            return Err(NativeError::PermissionDenied {
                operation: format!("notify {event}"),
                missing: CallFlags::ALLOW_NOTIFY,
            });
        }
        let contract = frame.view.contract();
        if frame.view.event(event).is_none() {
            return Err(NativeError::UndeclaredEvent {
                contract: contract.name().to_string(),
                event: event.to_string(),
            });
        }
        self.notifications.push(NotifyEvent {
            script_hash: contract.hash(),
            contract: contract.name().to_string(),
            method: frame.method.clone(),
            event_name: event.to_string(),
            state,
        });
        Ok(())
    }

    /// Events emitted so far and not yet collected by an invocation.
    pub fn notifications(&self) -> &[NotifyEvent] {
        &self.notifications
    }

    pub(crate) fn enter(&mut self, state: CallState) -> CallState {
        CallState {
            frame: std::mem::replace(&mut self.frame, state.frame),
            call_flags: std::mem::replace(&mut self.call_flags, state.call_flags),
            calling_script_hash: std::mem::replace(
                &mut self.calling_script_hash,
                state.calling_script_hash,
            ),
        }
    }

    pub(crate) fn take_notifications_from(&mut self, start: usize) -> Vec<NotifyEvent> {
        self.notifications.split_off(start.min(self.notifications.len()))
    }

    pub(crate) fn discard_notifications_from(&mut self, start: usize) {
        self.notifications.truncate(start);
    }
}
