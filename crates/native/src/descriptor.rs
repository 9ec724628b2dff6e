//! Method and event descriptors of native contracts.
//!
//! Descriptors are declared once, in code, and never deleted: a method that
//! changes shape at a hardfork is deprecated there and redeclared with
//! `active_in` set to the same hardfork.

use neo_primitives::{CallFlags, ContractParameterType, Hardfork};
use serde::Serialize;

/// Anything with a `[active_in, deprecated_in)` range on the hardfork timeline.
pub trait HardforkActivable {
    /// First hardfork where the item exists; `None` is genesis.
    fn active_in(&self) -> Option<Hardfork>;

    /// First hardfork where the item no longer exists; `None` is never.
    fn deprecated_in(&self) -> Option<Hardfork>;

    /// Visible at `hardfork` iff `active_in <= hardfork < deprecated_in`.
    fn is_active_for(&self, hardfork: Option<Hardfork>) -> bool {
        self.active_in() <= hardfork && precedes_end(hardfork, self.deprecated_in())
    }

    /// Whether the range contains at least one point.
    fn has_active_range(&self) -> bool {
        precedes_end(self.active_in(), self.deprecated_in())
    }

    /// Whether both ranges share at least one point.
    fn overlaps<T: HardforkActivable + ?Sized>(&self, other: &T) -> bool {
        precedes_end(self.active_in(), other.deprecated_in())
            && precedes_end(other.active_in(), self.deprecated_in())
    }
}

/// `point < end` where an absent end is unbounded.
fn precedes_end(point: Option<Hardfork>, end: Option<Hardfork>) -> bool {
    end.map_or(true, |end| point < Some(end))
}

/// Named, typed parameter of a method or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractParameterDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ContractParameterType,
}

impl ContractParameterDefinition {
    pub fn new(name: impl Into<String>, kind: ContractParameterType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Builds a parameter list from `(name, type)` pairs.
pub fn params(definitions: &[(&str, ContractParameterType)]) -> Vec<ContractParameterDefinition> {
    definitions
        .iter()
        .map(|(name, kind)| ContractParameterDefinition::new(*name, *kind))
        .collect()
}

/// Gas price of a method, in datoshi.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodPrice {
    /// Same price at every hardfork.
    Fixed(i64),
    /// Price entries keyed by the hardfork they take effect at, strictly
    /// increasing. The first key must not be later than the method's
    /// `active_in`.
    Schedule(Vec<(Option<Hardfork>, i64)>),
}

impl MethodPrice {
    /// Price in effect at `hardfork`: the entry with the greatest key not
    /// after it. A point before the first entry reads the first entry, which
    /// registration rules out for visible methods.
    pub fn at(&self, hardfork: Option<Hardfork>) -> i64 {
        match self {
            MethodPrice::Fixed(price) => *price,
            MethodPrice::Schedule(entries) => entries
                .iter()
                .rev()
                .find(|(since, _)| *since <= hardfork)
                .or_else(|| entries.first())
                .map_or(0, |(_, price)| *price),
        }
    }
}

/// A native method as declared by its contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    pub name: String,
    pub parameters: Vec<ContractParameterDefinition>,
    pub return_type: ContractParameterType,
    pub required_call_flags: CallFlags,
    pub safe: bool,
    pub active_in: Option<Hardfork>,
    pub deprecated_in: Option<Hardfork>,
    pub price: MethodPrice,
}

impl MethodDescriptor {
    /// Creates a new method descriptor.
    pub fn new(
        name: impl Into<String>,
        price: i64,
        required_call_flags: CallFlags,
        safe: bool,
        parameters: Vec<ContractParameterDefinition>,
        return_type: ContractParameterType,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            required_call_flags,
            safe,
            active_in: None,
            deprecated_in: None,
            price: MethodPrice::Fixed(price),
        }
    }

    /// Creates a new safe (read-only) method requiring `READ_STATES`.
    pub fn safe(
        name: impl Into<String>,
        price: i64,
        parameters: Vec<ContractParameterDefinition>,
        return_type: ContractParameterType,
    ) -> Self {
        Self::new(
            name,
            price,
            CallFlags::READ_STATES,
            true,
            parameters,
            return_type,
        )
    }

    /// Creates a new unsafe (state-changing) method.
    pub fn unsafe_method(
        name: impl Into<String>,
        price: i64,
        required_call_flags: CallFlags,
        parameters: Vec<ContractParameterDefinition>,
        return_type: ContractParameterType,
    ) -> Self {
        Self::new(
            name,
            price,
            required_call_flags,
            false,
            parameters,
            return_type,
        )
    }

    pub fn with_active_in(mut self, hardfork: Hardfork) -> Self {
        self.active_in = Some(hardfork);
        self
    }

    pub fn with_deprecated_in(mut self, hardfork: Hardfork) -> Self {
        self.deprecated_in = Some(hardfork);
        self
    }

    pub fn with_required_call_flags(mut self, flags: CallFlags) -> Self {
        self.required_call_flags = flags;
        self
    }

    pub fn with_price_schedule(mut self, schedule: Vec<(Option<Hardfork>, i64)>) -> Self {
        self.price = MethodPrice::Schedule(schedule);
        self
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Price in effect at `hardfork`.
    pub fn price_at(&self, hardfork: Option<Hardfork>) -> i64 {
        self.price.at(hardfork)
    }

    /// `name/argc`, as used in log lines and CLI output.
    pub fn signature(&self) -> String {
        format!("{}/{}", self.name, self.parameter_count())
    }
}

impl HardforkActivable for MethodDescriptor {
    fn active_in(&self) -> Option<Hardfork> {
        self.active_in
    }

    fn deprecated_in(&self) -> Option<Hardfork> {
        self.deprecated_in
    }
}

/// A native event as declared by its contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDescriptor {
    pub name: String,
    pub parameters: Vec<ContractParameterDefinition>,
    pub active_in: Option<Hardfork>,
    pub deprecated_in: Option<Hardfork>,
}

impl EventDescriptor {
    pub fn new(name: impl Into<String>, parameters: Vec<ContractParameterDefinition>) -> Self {
        Self {
            name: name.into(),
            parameters,
            active_in: None,
            deprecated_in: None,
        }
    }

    pub fn with_active_in(mut self, hardfork: Hardfork) -> Self {
        self.active_in = Some(hardfork);
        self
    }

    pub fn with_deprecated_in(mut self, hardfork: Hardfork) -> Self {
        self.deprecated_in = Some(hardfork);
        self
    }
}

impl HardforkActivable for EventDescriptor {
    fn active_in(&self) -> Option<Hardfork> {
        self.active_in
    }

    fn deprecated_in(&self) -> Option<Hardfork> {
        self.deprecated_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ContractParameterType as T;

    fn method() -> MethodDescriptor {
        MethodDescriptor::safe("getThing", 1 << 15, params(&[("key", T::Integer)]), T::Integer)
    }

    #[test]
    fn genesis_method_is_always_visible() {
        let m = method();
        assert!(m.is_active_for(None));
        assert!(Hardfork::timeline().all(|hf| m.is_active_for(hf)));
    }

    #[test]
    fn visibility_is_half_open() {
        let m = method()
            .with_active_in(Hardfork::HfBasilisk)
            .with_deprecated_in(Hardfork::HfDomovoi);
        assert!(!m.is_active_for(None));
        assert!(!m.is_active_for(Some(Hardfork::HfAspidochelone)));
        assert!(m.is_active_for(Some(Hardfork::HfBasilisk)));
        assert!(m.is_active_for(Some(Hardfork::HfCockatrice)));
        assert!(!m.is_active_for(Some(Hardfork::HfDomovoi)));
    }

    #[test]
    fn empty_range_detected() {
        let m = method()
            .with_active_in(Hardfork::HfEchidna)
            .with_deprecated_in(Hardfork::HfEchidna);
        assert!(!m.has_active_range());
        assert!(method().with_deprecated_in(Hardfork::HfAspidochelone).has_active_range());
    }

    #[test]
    fn deprecated_and_replacement_do_not_overlap() {
        let old = method().with_deprecated_in(Hardfork::HfEchidna);
        let new = method().with_active_in(Hardfork::HfEchidna);
        assert!(!old.overlaps(&new));
        assert!(!new.overlaps(&old));
        let open = method();
        assert!(open.overlaps(&new));
        assert!(open.overlaps(&old));
    }

    #[test]
    fn schedule_picks_greatest_key_not_after() {
        let price = MethodPrice::Schedule(vec![
            (None, 100),
            (Some(Hardfork::HfCockatrice), 200),
            (Some(Hardfork::HfEchidna), 50),
        ]);
        assert_eq!(price.at(None), 100);
        assert_eq!(price.at(Some(Hardfork::HfBasilisk)), 100);
        assert_eq!(price.at(Some(Hardfork::HfCockatrice)), 200);
        assert_eq!(price.at(Some(Hardfork::HfDomovoi)), 200);
        assert_eq!(price.at(Some(Hardfork::HfGorgon)), 50);
        assert_eq!(MethodPrice::Fixed(7).at(None), 7);
    }

    #[test]
    fn serializes_like_an_abi_entry() {
        let json = serde_json::to_value(method().with_active_in(Hardfork::HfEchidna)).unwrap();
        assert_eq!(json["name"], "getThing");
        assert_eq!(json["parameters"][0]["type"], "Integer");
        assert_eq!(json["returnType"], "Integer");
        assert_eq!(json["activeIn"], "Echidna");
        assert_eq!(json["safe"], true);
    }
}
