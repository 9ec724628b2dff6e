//! Hardfork-specific views over contract metadata and method resolution.

use crate::descriptor::{EventDescriptor, HardforkActivable, MethodDescriptor};
use crate::error::{NativeError, NativeResult};
use crate::metadata::ContractMetadata;
use neo_primitives::{Hardfork, HardforkSelector, UInt160};
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    index: usize,
    price: i64,
}

/// The methods and events of one contract as they exist at one hardfork.
///
/// Methods are ordered by `(name, parameter_count)`; this ordering is the
/// resolution index. Built once per `(contract, hardfork)` and shared
/// immutably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveMetadata {
    contract: Arc<ContractMetadata>,
    hardfork: Option<Hardfork>,
    methods: Vec<Slot>,
    events: Vec<usize>,
}

/// A method visible in a view together with its price at that hardfork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MethodEntry<'a> {
    #[serde(flatten)]
    pub descriptor: &'a MethodDescriptor,
    /// Position in the contract's method arena.
    #[serde(skip)]
    pub index: usize,
    /// Price in effect at the view's hardfork.
    #[serde(rename = "effectivePrice")]
    pub price: i64,
}

impl EffectiveMetadata {
    /// Filters the contract's descriptors down to those visible at `hardfork`
    /// and resolves each method's price.
    pub fn build(contract: Arc<ContractMetadata>, hardfork: Option<Hardfork>) -> Self {
        let mut methods: Vec<Slot> = contract
            .methods()
            .iter()
            .enumerate()
            .filter(|(_, method)| method.is_active_for(hardfork))
            .map(|(index, method)| Slot {
                index,
                price: method.price_at(hardfork),
            })
            .collect();
        // Stable: equal keys keep declaration order.
        methods.sort_by(|a, b| {
            let (a, b) = (&contract.methods()[a.index], &contract.methods()[b.index]);
            compare_key(a, &b.name, b.parameter_count())
        });

        let events = contract
            .events()
            .iter()
            .enumerate()
            .filter(|(_, event)| event.is_active_for(hardfork))
            .map(|(index, _)| index)
            .collect();

        Self {
            contract,
            hardfork,
            methods,
            events,
        }
    }

    pub fn contract(&self) -> &Arc<ContractMetadata> {
        &self.contract
    }

    pub fn hash(&self) -> UInt160 {
        self.contract.hash()
    }

    /// The hardfork this view was built for; `None` is genesis.
    pub fn hardfork(&self) -> Option<Hardfork> {
        self.hardfork
    }

    /// Looks up the unique method with this name and parameter count.
    ///
    /// # Errors
    ///
    /// * `MethodNotFound` if no visible method matches.
    /// * `AmbiguousMethod` if more than one does.
    pub fn resolve(&self, name: &str, parameter_count: usize) -> NativeResult<MethodEntry<'_>> {
        let start = self.methods.partition_point(|slot| {
            compare_key(self.descriptor(slot), name, parameter_count) == Ordering::Less
        });
        let mut matching = self.methods[start..].iter().take_while(|slot| {
            compare_key(self.descriptor(slot), name, parameter_count) == Ordering::Equal
        });

        match (matching.next(), matching.next()) {
            (Some(slot), None) => {
                trace!(
                    contract = self.contract.name(),
                    method = name,
                    parameter_count,
                    index = slot.index,
                    "resolved native method"
                );
                Ok(self.entry(slot))
            }
            (None, _) => Err(NativeError::MethodNotFound {
                contract: self.contract.name().to_string(),
                method: name.to_string(),
                parameter_count,
                hardfork: HardforkSelector::At(self.hardfork),
            }),
            (Some(_), Some(_)) => Err(NativeError::AmbiguousMethod {
                contract: self.contract.name().to_string(),
                method: name.to_string(),
                parameter_count,
            }),
        }
    }

    /// Every visible method, ordered by name then parameter count.
    pub fn methods(&self) -> impl Iterator<Item = MethodEntry<'_>> + '_ {
        self.methods.iter().map(move |slot| self.entry(slot))
    }

    /// Every visible overload of `name`.
    pub fn methods_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = MethodEntry<'a>> + 'a {
        let start = self
            .methods
            .partition_point(|slot| self.descriptor(slot).name.as_str() < name);
        self.methods[start..]
            .iter()
            .take_while(move |slot| self.descriptor(slot).name == name)
            .map(move |slot| self.entry(slot))
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Every visible event, in declaration order.
    pub fn events(&self) -> impl Iterator<Item = &EventDescriptor> + '_ {
        self.events
            .iter()
            .map(move |index| &self.contract.events()[*index])
    }

    /// The visible event called `name`, if any.
    pub fn event(&self, name: &str) -> Option<&EventDescriptor> {
        self.events().find(|event| event.name == name)
    }

    fn descriptor(&self, slot: &Slot) -> &MethodDescriptor {
        &self.contract.methods()[slot.index]
    }

    fn entry(&self, slot: &Slot) -> MethodEntry<'_> {
        MethodEntry {
            descriptor: self.descriptor(slot),
            index: slot.index,
            price: slot.price,
        }
    }
}

fn compare_key(method: &MethodDescriptor, name: &str, parameter_count: usize) -> Ordering {
    method
        .name
        .as_str()
        .cmp(name)
        .then(method.parameter_count().cmp(&parameter_count))
}

/// An owned handle to a resolved method, ready for invocation.
#[derive(Debug, Clone)]
pub struct ResolvedMethod {
    view: Arc<EffectiveMetadata>,
    index: usize,
    price: i64,
}

impl ResolvedMethod {
    /// Resolves `name/parameter_count` in `view`.
    pub fn resolve(
        view: Arc<EffectiveMetadata>,
        name: &str,
        parameter_count: usize,
    ) -> NativeResult<Self> {
        let (index, price) = {
            let entry = view.resolve(name, parameter_count)?;
            (entry.index, entry.price)
        };
        Ok(Self { view, index, price })
    }

    pub fn descriptor(&self) -> &MethodDescriptor {
        &self.view.contract().methods()[self.index]
    }

    /// Position of the descriptor in the contract's method arena.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Price in effect at the hardfork the method was resolved for.
    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn view(&self) -> &Arc<EffectiveMetadata> {
        &self.view
    }

    pub fn contract(&self) -> &ContractMetadata {
        self.view.contract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{params, EventDescriptor, MethodDescriptor};
    use neo_primitives::{CallFlags, ContractParameterType as T};

    fn sample() -> Arc<ContractMetadata> {
        Arc::new(
            ContractMetadata::new(-9, "Sample")
                .with_method(MethodDescriptor::safe("b", 10, Vec::new(), T::Integer))
                .with_method(MethodDescriptor::safe(
                    "a",
                    20,
                    params(&[("x", T::Integer)]),
                    T::Integer,
                ))
                .with_method(
                    MethodDescriptor::safe("a", 30, Vec::new(), T::Integer)
                        .with_deprecated_in(Hardfork::HfCockatrice),
                )
                .with_method(
                    MethodDescriptor::unsafe_method(
                        "a",
                        40,
                        CallFlags::STATES,
                        Vec::new(),
                        T::Void,
                    )
                    .with_active_in(Hardfork::HfCockatrice),
                )
                .with_method(
                    MethodDescriptor::safe("c", 0, Vec::new(), T::Integer).with_price_schedule(
                        vec![(None, 1), (Some(Hardfork::HfDomovoi), 2)],
                    ),
                )
                .with_event(
                    EventDescriptor::new("Old", Vec::new())
                        .with_deprecated_in(Hardfork::HfBasilisk),
                )
                .with_event(
                    EventDescriptor::new("New", Vec::new()).with_active_in(Hardfork::HfBasilisk),
                ),
        )
    }

    #[test]
    fn methods_are_sorted_by_name_and_arity() {
        let view = EffectiveMetadata::build(sample(), None);
        let keys: Vec<_> = view
            .methods()
            .map(|entry| (entry.descriptor.name.clone(), entry.descriptor.parameter_count()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("a".to_string(), 0),
                ("a".to_string(), 1),
                ("b".to_string(), 0),
                ("c".to_string(), 0)
            ]
        );
    }

    #[test]
    fn replacement_swaps_at_hardfork() {
        let before = EffectiveMetadata::build(sample(), Some(Hardfork::HfBasilisk));
        let after = EffectiveMetadata::build(sample(), Some(Hardfork::HfCockatrice));
        assert_eq!(before.resolve("a", 0).unwrap().index, 2);
        assert_eq!(after.resolve("a", 0).unwrap().index, 3);
        assert_eq!(after.resolve("a", 0).unwrap().price, 40);
    }

    #[test]
    fn missing_key_reports_hardfork() {
        let view = EffectiveMetadata::build(sample(), Some(Hardfork::HfEchidna));
        let err = view.resolve("a", 2).unwrap_err();
        assert_eq!(
            err,
            NativeError::MethodNotFound {
                contract: "Sample".to_string(),
                method: "a".to_string(),
                parameter_count: 2,
                hardfork: HardforkSelector::At(Some(Hardfork::HfEchidna)),
            }
        );
        assert!(matches!(view.resolve("z", 0), Err(NativeError::MethodNotFound { .. })));
    }

    #[test]
    fn duplicate_keys_fail_fast() {
        // Unvalidated metadata: two identical descriptors visible together.
        let metadata = Arc::new(
            ContractMetadata::new(-9, "Broken")
                .with_method(MethodDescriptor::safe("x", 1, Vec::new(), T::Integer))
                .with_method(MethodDescriptor::safe("x", 2, Vec::new(), T::Integer)),
        );
        let view = EffectiveMetadata::build(metadata, None);
        assert!(matches!(view.resolve("x", 0), Err(NativeError::AmbiguousMethod { .. })));
    }

    #[test]
    fn overloads_and_events() {
        let view = EffectiveMetadata::build(sample(), Some(Hardfork::HfCockatrice));
        let overloads: Vec<_> = view.methods_named("a").map(|e| e.index).collect();
        assert_eq!(overloads, vec![3, 1]);
        assert_eq!(view.methods_named("nothing").count(), 0);
        assert!(view.event("New").is_some());
        assert!(view.event("Old").is_none());

        let genesis = EffectiveMetadata::build(sample(), None);
        assert!(genesis.event("Old").is_some());
        assert!(genesis.event("New").is_none());
    }

    #[test]
    fn schedule_price_per_view() {
        let early = EffectiveMetadata::build(sample(), Some(Hardfork::HfCockatrice));
        let late = EffectiveMetadata::build(sample(), Some(Hardfork::HfDomovoi));
        assert_eq!(early.resolve("c", 0).unwrap().price, 1);
        assert_eq!(late.resolve("c", 0).unwrap().price, 2);
    }

    #[test]
    fn resolved_method_owns_its_view() {
        let view = Arc::new(EffectiveMetadata::build(sample(), None));
        let resolved = ResolvedMethod::resolve(view, "b", 0).unwrap();
        assert_eq!(resolved.descriptor().name, "b");
        assert_eq!(resolved.price(), 10);
        assert_eq!(resolved.contract().id(), -9);
    }
}
