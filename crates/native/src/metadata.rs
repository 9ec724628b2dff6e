//! Static metadata of a native contract: identity plus the append-only arenas
//! of every method and event descriptor it has ever declared.

use crate::descriptor::{EventDescriptor, HardforkActivable, MethodDescriptor, MethodPrice};
use crate::error::{NativeError, NativeResult};
use neo_primitives::{native_contract_hash, Hardfork, UInt160};
use serde::Serialize;

/// Identity and descriptor arenas of one native contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMetadata {
    id: i32,
    name: String,
    hash: UInt160,
    active_in: Option<Hardfork>,
    methods: Vec<MethodDescriptor>,
    events: Vec<EventDescriptor>,
}

impl ContractMetadata {
    /// Creates metadata for a contract; the hash is derived from the name.
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            hash: native_contract_hash(&name),
            name,
            active_in: None,
            methods: Vec::new(),
            events: Vec::new(),
        }
    }

    /// The contract itself only exists from `hardfork` on.
    pub fn with_active_in(mut self, hardfork: Hardfork) -> Self {
        self.active_in = Some(hardfork);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = MethodDescriptor>) -> Self {
        self.methods.extend(methods);
        self
    }

    pub fn with_event(mut self, event: EventDescriptor) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = EventDescriptor>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hash(&self) -> UInt160 {
        self.hash
    }

    pub fn active_in(&self) -> Option<Hardfork> {
        self.active_in
    }

    /// Every method descriptor ever declared, in declaration order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Every event descriptor ever declared, in declaration order.
    pub fn events(&self) -> &[EventDescriptor] {
        &self.events
    }

    /// Whether the contract exists at `hardfork`.
    pub fn is_active_for(&self, hardfork: Option<Hardfork>) -> bool {
        self.active_in <= hardfork
    }

    /// Checks the registration rules. Any failure is fatal at startup.
    ///
    /// # Errors
    ///
    /// * `InvalidMetadata` for an empty active range, a malformed price or two
    ///   overlapping events with the same name.
    /// * `AmbiguousMethod` for two methods with the same name and parameter
    ///   count whose active ranges overlap.
    pub fn validate(&self) -> NativeResult<()> {
        for method in &self.methods {
            if !method.has_active_range() {
                return Err(self.invalid(format!(
                    "method {} has an empty active range",
                    method.signature()
                )));
            }
            self.validate_price(method)?;
        }

        for (i, first) in self.methods.iter().enumerate() {
            for second in &self.methods[i + 1..] {
                if first.name == second.name
                    && first.parameter_count() == second.parameter_count()
                    && first.overlaps(second)
                {
                    return Err(NativeError::AmbiguousMethod {
                        contract: self.name.clone(),
                        method: first.name.clone(),
                        parameter_count: first.parameter_count(),
                    });
                }
            }
        }

        for (i, first) in self.events.iter().enumerate() {
            if !first.has_active_range() {
                return Err(self.invalid(format!(
                    "event {} has an empty active range",
                    first.name
                )));
            }
            if self.events[i + 1..]
                .iter()
                .any(|second| first.name == second.name && first.overlaps(second))
            {
                return Err(self.invalid(format!(
                    "event {} is declared twice over overlapping ranges",
                    first.name
                )));
            }
        }

        Ok(())
    }

    fn validate_price(&self, method: &MethodDescriptor) -> NativeResult<()> {
        match &method.price {
            MethodPrice::Fixed(price) if *price < 0 => Err(self.invalid(format!(
                "method {} has a negative price",
                method.signature()
            ))),
            MethodPrice::Fixed(_) => Ok(()),
            MethodPrice::Schedule(entries) => {
                let Some((first_key, _)) = entries.first() else {
                    return Err(self.invalid(format!(
                        "method {} has an empty price schedule",
                        method.signature()
                    )));
                };
                if *first_key > method.active_in {
                    return Err(self.invalid(format!(
                        "price of {} is undefined before {}",
                        method.signature(),
                        describe(*first_key)
                    )));
                }
                if entries.windows(2).any(|pair| pair[0].0 >= pair[1].0) {
                    return Err(self.invalid(format!(
                        "price schedule of {} is not strictly increasing",
                        method.signature()
                    )));
                }
                if entries.iter().any(|(_, price)| *price < 0) {
                    return Err(self.invalid(format!(
                        "method {} has a negative price",
                        method.signature()
                    )));
                }
                Ok(())
            }
        }
    }

    fn invalid(&self, message: String) -> NativeError {
        NativeError::invalid_metadata(self.name.clone(), message)
    }
}

fn describe(hardfork: Option<Hardfork>) -> String {
    hardfork.map_or_else(|| "genesis".to_string(), |hf| hf.to_string())
}
