//! Hardfork identifiers for Neo N3.
//!
//! Neo N3 upgrades its protocol at named hardforks. They are totally ordered by
//! declaration; an `Option<Hardfork>` extends the order with `None` standing for
//! the protocol as launched at genesis, before any hardfork:
//!
//! | Hardfork | Ordinal |
//! |----------|---------|
//! | *(genesis)* `None` | - |
//! | `HfAspidochelone` | 0 |
//! | `HfBasilisk` | 1 |
//! | `HfCockatrice` | 2 |
//! | `HfDomovoi` | 3 |
//! | `HfEchidna` | 4 |
//! | `HfFaun` | 5 |
//! | `HfGorgon` | 6 |

use crate::error::PrimitiveError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Represents a hardfork in the Neo blockchain (matches C# Hardfork enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Hardfork {
    /// Aspidochelone hardfork
    HfAspidochelone = 0,
    /// Basilisk hardfork
    HfBasilisk = 1,
    /// Cockatrice hardfork
    HfCockatrice = 2,
    /// Domovoi hardfork
    HfDomovoi = 3,
    /// Echidna hardfork
    HfEchidna = 4,
    /// Faun hardfork
    HfFaun = 5,
    /// Gorgon hardfork
    HfGorgon = 6,
}

impl Hardfork {
    /// Returns every known hardfork in declaration order.
    pub const fn all() -> [Hardfork; 7] {
        [
            Hardfork::HfAspidochelone,
            Hardfork::HfBasilisk,
            Hardfork::HfCockatrice,
            Hardfork::HfDomovoi,
            Hardfork::HfEchidna,
            Hardfork::HfFaun,
            Hardfork::HfGorgon,
        ]
    }

    /// The highest hardfork this build knows about.
    pub const fn latest() -> Hardfork {
        Hardfork::HfGorgon
    }

    /// Every point a method table can be built for: genesis followed by each hardfork.
    pub fn timeline() -> impl Iterator<Item = Option<Hardfork>> {
        std::iter::once(None).chain(Self::all().into_iter().map(Some))
    }

    /// Short name without the `Hf` prefix, as used in configuration files.
    pub const fn name(&self) -> &'static str {
        match self {
            Hardfork::HfAspidochelone => "Aspidochelone",
            Hardfork::HfBasilisk => "Basilisk",
            Hardfork::HfCockatrice => "Cockatrice",
            Hardfork::HfDomovoi => "Domovoi",
            Hardfork::HfEchidna => "Echidna",
            Hardfork::HfFaun => "Faun",
            Hardfork::HfGorgon => "Gorgon",
        }
    }

    /// Position in declaration order.
    pub const fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// The hardfork declared immediately before this one.
    pub fn previous(&self) -> Option<Hardfork> {
        self.ordinal()
            .checked_sub(1)
            .map(|ordinal| Self::all()[ordinal as usize])
    }
}

impl fmt::Display for Hardfork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Hardfork {
    type Err = PrimitiveError;

    /// Accepts `Echidna`, `HfEchidna` and `HF_Echidna`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let bare = lowered
            .strip_prefix("hf_")
            .or_else(|| lowered.strip_prefix("hf"))
            .unwrap_or(&lowered);
        Self::all()
            .into_iter()
            .find(|hf| hf.name().eq_ignore_ascii_case(bare))
            .ok_or_else(|| PrimitiveError::UnknownHardfork {
                name: s.to_string(),
            })
    }
}

impl Serialize for Hardfork {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Hardfork {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Selects the hardfork a method table is built for.
///
/// `Latest` is resolved to [`Hardfork::latest`] before any table is built, so
/// downstream code only ever sees concrete values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HardforkSelector {
    /// Highest hardfork known to this build.
    #[default]
    Latest,
    /// Explicit point; `None` is genesis.
    At(Option<Hardfork>),
}

impl HardforkSelector {
    /// Resolves the selector to a concrete point on the hardfork timeline.
    pub fn resolve(self) -> Option<Hardfork> {
        match self {
            HardforkSelector::Latest => Some(Hardfork::latest()),
            HardforkSelector::At(hardfork) => hardfork,
        }
    }
}

impl From<Option<Hardfork>> for HardforkSelector {
    fn from(value: Option<Hardfork>) -> Self {
        HardforkSelector::At(value)
    }
}

impl From<Hardfork> for HardforkSelector {
    fn from(value: Hardfork) -> Self {
        HardforkSelector::At(Some(value))
    }
}

impl FromStr for HardforkSelector {
    type Err = PrimitiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(HardforkSelector::Latest),
            "genesis" | "none" | "default" => Ok(HardforkSelector::At(None)),
            _ => s.parse::<Hardfork>().map(HardforkSelector::from),
        }
    }
}

impl fmt::Display for HardforkSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardforkSelector::Latest => f.write_str("latest"),
            HardforkSelector::At(None) => f.write_str("genesis"),
            HardforkSelector::At(Some(hf)) => write!(f, "{hf}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_declaration() {
        let all = Hardfork::all();
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        // Genesis precedes every named hardfork.
        assert!(None < Some(Hardfork::HfAspidochelone));
    }

    #[test]
    fn timeline_starts_at_genesis() {
        let timeline: Vec<_> = Hardfork::timeline().collect();
        assert_eq!(timeline.len(), Hardfork::all().len() + 1);
        assert_eq!(timeline[0], None);
        assert_eq!(timeline.last().copied().flatten(), Some(Hardfork::latest()));
    }

    #[test]
    fn parse_accepts_prefixed_forms() {
        assert_eq!("Echidna".parse::<Hardfork>().unwrap(), Hardfork::HfEchidna);
        assert_eq!("HfEchidna".parse::<Hardfork>().unwrap(), Hardfork::HfEchidna);
        assert_eq!("HF_Basilisk".parse::<Hardfork>().unwrap(), Hardfork::HfBasilisk);
        assert_eq!("cockatrice".parse::<Hardfork>().unwrap(), Hardfork::HfCockatrice);
        assert!("Hydra".parse::<Hardfork>().is_err());
    }

    #[test]
    fn previous_walks_back() {
        assert_eq!(Hardfork::HfAspidochelone.previous(), None);
        assert_eq!(Hardfork::HfEchidna.previous(), Some(Hardfork::HfDomovoi));
    }

    #[test]
    fn selector_resolves_latest() {
        assert_eq!(HardforkSelector::Latest.resolve(), Some(Hardfork::latest()));
        assert_eq!(HardforkSelector::At(None).resolve(), None);
        assert_eq!(
            "latest".parse::<HardforkSelector>().unwrap(),
            HardforkSelector::Latest
        );
        assert_eq!(
            "genesis".parse::<HardforkSelector>().unwrap(),
            HardforkSelector::At(None)
        );
        assert_eq!(
            "Domovoi".parse::<HardforkSelector>().unwrap(),
            HardforkSelector::At(Some(Hardfork::HfDomovoi))
        );
    }

    #[test]
    fn serde_uses_short_name() {
        let json = serde_json::to_string(&Hardfork::HfFaun).unwrap();
        assert_eq!(json, "\"Faun\"");
        let back: Hardfork = serde_json::from_str("\"HF_Faun\"").unwrap();
        assert_eq!(back, Hardfork::HfFaun);
    }
}
