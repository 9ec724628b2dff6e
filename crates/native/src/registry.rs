//! Registry of the native contracts compiled into the node.

use crate::contract::NativeContract;
use crate::contracts::{GasToken, NeoToken, PolicyContract};
use crate::error::{NativeError, NativeResult};
use crate::metadata::ContractMetadata;
use neo_primitives::UInt160;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// A registered contract: its validated metadata and its handler.
#[derive(Clone)]
pub struct NativeEntry {
    metadata: Arc<ContractMetadata>,
    contract: Arc<dyn NativeContract>,
}

impl NativeEntry {
    pub fn metadata(&self) -> &Arc<ContractMetadata> {
        &self.metadata
    }

    pub fn contract(&self) -> &Arc<dyn NativeContract> {
        &self.contract
    }
}

impl fmt::Debug for NativeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeEntry")
            .field("id", &self.metadata.id())
            .field("name", &self.metadata.name())
            .field("hash", &self.metadata.hash())
            .finish()
    }
}

/// Every native contract known to the node, keyed by hash and id.
///
/// Assembled once at startup through `register` and then shared read-only
/// behind an `Arc`.
#[derive(Debug, Default)]
pub struct NativeRegistry {
    entries: Vec<NativeEntry>,
    by_hash: HashMap<UInt160, usize>,
    by_id: HashMap<i32, usize>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The node's compiled-in contract set.
    pub fn standard() -> NativeResult<Self> {
        let mut registry = Self::new();
        registry.register(NeoToken::new())?;
        registry.register(GasToken::new())?;
        registry.register(PolicyContract::new())?;
        Ok(registry)
    }

    /// Validates and registers a contract.
    ///
    /// # Errors
    ///
    /// * `InvalidMetadata` / `AmbiguousMethod` if the descriptors break a
    ///   registration rule.
    /// * `DuplicateContract` if the id or the hash is already taken.
    pub fn register<C>(&mut self, contract: C) -> NativeResult<()>
    where
        C: NativeContract + 'static,
    {
        self.register_arc(Arc::new(contract))
    }

    pub fn register_arc(&mut self, contract: Arc<dyn NativeContract>) -> NativeResult<()> {
        let metadata = contract.metadata();
        metadata.validate()?;

        if self.by_id.contains_key(&metadata.id()) || self.by_hash.contains_key(&metadata.hash())
        {
            return Err(NativeError::DuplicateContract {
                name: metadata.name().to_string(),
                id: metadata.id(),
                hash: metadata.hash(),
            });
        }

        let metadata = Arc::new(metadata.clone());
        let index = self.entries.len();
        self.by_hash.insert(metadata.hash(), index);
        self.by_id.insert(metadata.id(), index);
        info!(
            id = metadata.id(),
            name = metadata.name(),
            hash = %metadata.hash(),
            methods = metadata.methods().len(),
            events = metadata.events().len(),
            "registered native contract"
        );
        self.entries.push(NativeEntry { metadata, contract });
        Ok(())
    }

    pub fn lookup_by_hash(&self, hash: &UInt160) -> NativeResult<&NativeEntry> {
        self.by_hash
            .get(hash)
            .map(|index| &self.entries[*index])
            .ok_or_else(|| NativeError::contract_not_found(hash.to_string()))
    }

    pub fn lookup_by_id(&self, id: i32) -> NativeResult<&NativeEntry> {
        self.by_id
            .get(&id)
            .map(|index| &self.entries[*index])
            .ok_or_else(|| NativeError::contract_not_found(id.to_string()))
    }

    /// Case-insensitive lookup by contract name.
    pub fn lookup_by_name(&self, name: &str) -> NativeResult<&NativeEntry> {
        self.entries
            .iter()
            .find(|entry| entry.metadata.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| NativeError::contract_not_found(name))
    }

    /// Registered contracts in registration order.
    pub fn contracts(&self) -> impl Iterator<Item = &NativeEntry> + '_ {
        self.entries.iter()
    }

    pub fn is_native(&self, hash: &UInt160) -> bool {
        self.by_hash.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
