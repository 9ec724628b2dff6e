//! Property tests over generated method tables.

use neo_native::{
    ContractMetadata, ContractParameterDefinition, EffectiveMetadata, HardforkActivable,
    MethodDescriptor, NativeError,
};
use neo_primitives::{ContractParameterType, Hardfork};
use proptest::prelude::*;
use std::sync::Arc;

const NAMES: [&str; 3] = ["alpha", "beta", "gamma"];

/// Position on the timeline: 0 is genesis, `n` the n-th hardfork.
fn at(position: usize) -> Option<Hardfork> {
    position.checked_sub(1).map(|i| Hardfork::all()[i])
}

fn parameters(count: usize) -> Vec<ContractParameterDefinition> {
    (0..count)
        .map(|i| ContractParameterDefinition::new(format!("p{i}"), ContractParameterType::Integer))
        .collect()
}

/// Consecutive, non-overlapping ranges for one `(name, argc)` key. Each cut is
/// a timeline position; the last range stays open unless `closed`.
fn descriptors_for(
    name: &str,
    argc: usize,
    cuts: &[usize],
    closed: bool,
    price: i64,
) -> Vec<MethodDescriptor> {
    let mut methods = Vec::new();
    for (i, start) in cuts.iter().enumerate() {
        let end = cuts.get(i + 1).copied();
        if end.is_none() && closed {
            break;
        }
        let mut method = MethodDescriptor::safe(
            name,
            price + i as i64,
            parameters(argc),
            ContractParameterType::Integer,
        );
        if let Some(hardfork) = at(*start) {
            method = method.with_active_in(hardfork);
        }
        if let Some(hardfork) = end.and_then(at) {
            method = method.with_deprecated_in(hardfork);
        }
        methods.push(method);
    }
    methods
}

fn method_table() -> impl Strategy<Value = Vec<MethodDescriptor>> {
    let key = (
        0..NAMES.len(),
        0usize..3,
        proptest::collection::btree_set(0usize..=Hardfork::all().len(), 1..4),
        any::<bool>(),
        0i64..1_000,
    );
    proptest::collection::vec(key, 1..6).prop_map(|keys| {
        let mut seen = std::collections::BTreeSet::new();
        keys.into_iter()
            .filter(|(name, argc, ..)| seen.insert((*name, *argc)))
            .flat_map(|(name, argc, cuts, closed, price)| {
                let cuts: Vec<usize> = cuts.into_iter().collect();
                descriptors_for(NAMES[name], argc, &cuts, closed, price)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn views_list_exactly_the_active_descriptors(methods in method_table()) {
        let metadata = Arc::new(ContractMetadata::new(-80, "Generated").with_methods(methods));
        prop_assert!(metadata.validate().is_ok());

        for hardfork in Hardfork::timeline() {
            let view = EffectiveMetadata::build(Arc::clone(&metadata), hardfork);
            let listed: Vec<usize> = {
                let mut indexes: Vec<usize> = view.methods().map(|entry| entry.index).collect();
                indexes.sort_unstable();
                indexes
            };
            let expected: Vec<usize> = metadata
                .methods()
                .iter()
                .enumerate()
                .filter(|(_, method)| method.is_active_for(hardfork))
                .map(|(index, _)| index)
                .collect();
            prop_assert_eq!(listed, expected);

            for entry in view.methods() {
                let resolved = view
                    .resolve(&entry.descriptor.name, entry.descriptor.parameter_count())
                    .unwrap();
                prop_assert_eq!(resolved.index, entry.index);
                prop_assert_eq!(resolved.price, entry.descriptor.price_at(hardfork));
            }
        }
    }

    #[test]
    fn overlapping_redeclaration_is_rejected(
        methods in method_table(),
        position in 0usize..=Hardfork::all().len(),
    ) {
        let Some(victim) = methods
            .iter()
            .find(|method| method.is_active_for(at(position)))
            .cloned()
        else {
            return Ok(());
        };
        let mut duplicate = MethodDescriptor::safe(
            victim.name.clone(),
            0,
            victim.parameters.clone(),
            ContractParameterType::Integer,
        );
        if let Some(hardfork) = at(position) {
            duplicate = duplicate.with_active_in(hardfork);
        }
        let metadata = ContractMetadata::new(-81, "Clashing")
            .with_methods(methods)
            .with_method(duplicate);
        let is_ambiguous = matches!(
            metadata.validate(),
            Err(NativeError::AmbiguousMethod { .. })
        );
        prop_assert!(is_ambiguous);
    }
}
