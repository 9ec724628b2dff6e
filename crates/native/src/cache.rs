//! Lazily populated cache of hardfork views, mirroring the C# NativeContractsCache.

use crate::metadata::ContractMetadata;
use crate::view::EffectiveMetadata;
use dashmap::DashMap;
use neo_primitives::Hardfork;
use std::sync::Arc;
use tracing::debug;

/// Views keyed by `(contract id, hardfork)`.
///
/// Views are built outside any lock and published with `entry().or_insert`.
/// Two threads racing on the same key build equal views and both end up
/// holding whichever was published first.
#[derive(Debug, Default)]
pub struct MetadataCache {
    views: DashMap<(i32, Option<Hardfork>), Arc<EffectiveMetadata>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the view of `contract` at `hardfork`, building it on first use.
    pub fn get_or_build(
        &self,
        contract: &Arc<ContractMetadata>,
        hardfork: Option<Hardfork>,
    ) -> Arc<EffectiveMetadata> {
        let key = (contract.id(), hardfork);
        if let Some(view) = self.views.get(&key) {
            return Arc::clone(view.value());
        }

        let built = Arc::new(EffectiveMetadata::build(Arc::clone(contract), hardfork));
        let published = self.views.entry(key).or_insert(built);
        debug!(
            contract = contract.name(),
            hardfork = ?hardfork,
            methods = published.method_count(),
            "published effective metadata"
        );
        Arc::clone(published.value())
    }

    /// Number of cached views.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
