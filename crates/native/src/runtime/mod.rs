//! Execution-time state handed to native handlers by the ledger/VM layer.

mod context;
mod gas;
mod storage;

pub use context::{ExecutionContext, NotifyEvent};
pub(crate) use context::{CallState, Frame};
pub use gas::GasMeter;
pub use storage::{MemoryStore, Storage, StorageKey};
