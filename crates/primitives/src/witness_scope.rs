//! Implementation of WitnessScope, the scope attached to a transaction signer.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Represents the scope of a witness (matches C# WitnessScope [Flags] enum).
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WitnessScope: u8 {
        /// Only sign the transaction; no contract is witnessed.
        const NONE = 0x00;
        /// The witness is valid only while the calling contract is the entry script.
        const CALLED_BY_ENTRY = 0x01;
        /// Custom hash for contract-specific.
        const CUSTOM_CONTRACTS = 0x10;
        /// Custom pubkey for group members.
        const CUSTOM_GROUPS = 0x20;
        /// The current context must satisfy the specified rules.
        const WITNESS_RULES = 0x40;
        /// Valid in all contexts. Cannot be combined with other flags.
        const GLOBAL = 0x80;
    }
}

impl WitnessScope {
    const NAMES: [(WitnessScope, &'static str); 5] = [
        (WitnessScope::CALLED_BY_ENTRY, "CalledByEntry"),
        (WitnessScope::CUSTOM_CONTRACTS, "CustomContracts"),
        (WitnessScope::CUSTOM_GROUPS, "CustomGroups"),
        (WitnessScope::WITNESS_RULES, "WitnessRules"),
        (WitnessScope::GLOBAL, "Global"),
    ];

    /// `Global` may not be mixed with any other scope.
    pub fn is_valid(self) -> bool {
        !self.contains(WitnessScope::GLOBAL) || self == WitnessScope::GLOBAL
    }

    /// Parses the comma separated form produced by `Display`.
    pub fn from_names(s: &str) -> Option<Self> {
        let mut scope = WitnessScope::NONE;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if part.eq_ignore_ascii_case("None") {
                continue;
            }
            let (flag, _) = Self::NAMES
                .iter()
                .find(|(_, name)| name.eq_ignore_ascii_case(part))?;
            scope |= *flag;
        }
        Some(scope)
    }
}

impl fmt::Display for WitnessScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let names: Vec<&str> = Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        f.write_str(&names.join(", "))
    }
}

impl Serialize for WitnessScope {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for WitnessScope {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        WitnessScope::from_names(&value)
            .filter(|scope| scope.is_valid())
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid witness scope: {value}")))
    }
}
