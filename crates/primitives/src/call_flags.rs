//! CallFlags bitflags mirroring Neo.SmartContract.CallFlags.
//! These flags describe the permissions granted to a contract call.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Represents the operations allowed when a contract is invoked.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CallFlags: u8 {
        /// No flag is set.
        const NONE = 0b0000_0000;
        /// Indicates that the called contract is allowed to read states.
        const READ_STATES = 0b0000_0001;
        /// Indicates that the called contract is allowed to write states.
        const WRITE_STATES = 0b0000_0010;
        /// Indicates that the called contract is allowed to invoke another contract.
        const ALLOW_CALL = 0b0000_0100;
        /// Indicates that the called contract is allowed to publish notifications.
        const ALLOW_NOTIFY = 0b0000_1000;
    }
}

impl CallFlags {
    /// Combination of `READ_STATES` and `WRITE_STATES` permissions.
    pub const STATES: CallFlags = CallFlags::READ_STATES.union(CallFlags::WRITE_STATES);
    /// Combination of `READ_STATES` and `ALLOW_CALL` permissions.
    pub const READ_ONLY: CallFlags = CallFlags::READ_STATES.union(CallFlags::ALLOW_CALL);
    /// All available permissions.
    pub const ALL: CallFlags = CallFlags::STATES
        .union(CallFlags::ALLOW_CALL)
        .union(CallFlags::ALLOW_NOTIFY);

    /// Flags in `required` that `self` does not grant.
    pub fn missing(self, required: CallFlags) -> CallFlags {
        required.difference(self)
    }
}

impl fmt::Display for CallFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = *self;
        if flags.is_empty() {
            return f.write_str("None");
        }
        if flags == CallFlags::ALL {
            return f.write_str("All");
        }
        if flags == CallFlags::READ_ONLY {
            return f.write_str("ReadOnly");
        }
        if flags == CallFlags::STATES {
            return f.write_str("States");
        }
        let names: Vec<&str> = [
            (CallFlags::READ_STATES, "ReadStates"),
            (CallFlags::WRITE_STATES, "WriteStates"),
            (CallFlags::ALLOW_CALL, "AllowCall"),
            (CallFlags::ALLOW_NOTIFY, "AllowNotify"),
        ]
        .into_iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, name)| name)
        .collect();
        f.write_str(&names.join(", "))
    }
}

impl Serialize for CallFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for CallFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u8::deserialize(deserializer)?;
        CallFlags::from_bits(value)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid CallFlags value: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::CallFlags;

    #[test]
    fn composite_flags() {
        assert_eq!(CallFlags::ALL.bits(), 0x0f);
        assert!(CallFlags::STATES.contains(CallFlags::READ_STATES));
        assert!(!CallFlags::READ_ONLY.contains(CallFlags::WRITE_STATES));
    }

    #[test]
    fn missing_reports_difference() {
        let missing = CallFlags::READ_ONLY.missing(CallFlags::STATES | CallFlags::ALLOW_NOTIFY);
        assert_eq!(missing, CallFlags::WRITE_STATES | CallFlags::ALLOW_NOTIFY);
        assert!(CallFlags::ALL.missing(CallFlags::STATES).is_empty());
    }

    #[test]
    fn display_names() {
        assert_eq!(CallFlags::NONE.to_string(), "None");
        assert_eq!(CallFlags::ALL.to_string(), "All");
        assert_eq!(
            (CallFlags::WRITE_STATES | CallFlags::ALLOW_NOTIFY).to_string(),
            "WriteStates, AllowNotify"
        );
    }

    #[test]
    fn serde_rejects_unknown_bits() {
        assert!(serde_json::from_str::<CallFlags>("255").is_err());
        let flags: CallFlags = serde_json::from_str("3").unwrap();
        assert_eq!(flags, CallFlags::STATES);
    }
}
