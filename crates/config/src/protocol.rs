//! Protocol settings for Neo N3
//!
//! Only the parameters the native contract layer depends on are kept here:
//! the network magic and the hardfork activation heights. They must match the
//! other nodes of the network for replay to resolve methods identically.

use crate::error::{ConfigError, ConfigResult};
use crate::{MAINNET_MAGIC, PRIVATE_MAGIC, TESTNET_MAGIC};
use neo_primitives::Hardfork;
use serde::Serialize;
use std::collections::BTreeMap;

/// Neo N3 protocol settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolSettings {
    /// Network identifier (magic number)
    pub network: u32,

    /// Activation height of every enabled hardfork. Hardforks missing from the
    /// map are not enabled at any height.
    pub hardforks: BTreeMap<Hardfork, u32>,
}

impl ProtocolSettings {
    /// Builds settings from configured heights.
    ///
    /// Hardforks declared before the first configured one are implicitly
    /// active from genesis (height 0).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHardforks` if the configured hardforks skip
    /// one or if an earlier hardfork activates after a later one.
    pub fn new(network: u32, hardforks: BTreeMap<Hardfork, u32>) -> ConfigResult<Self> {
        let hardforks = ensure_omitted_hardforks(hardforks);
        check_hardforks(&hardforks)?;
        Ok(Self { network, hardforks })
    }

    /// MainNet activation heights.
    pub fn mainnet() -> Self {
        Self {
            network: MAINNET_MAGIC,
            hardforks: BTreeMap::from([
                (Hardfork::HfAspidochelone, 1_730_000),
                (Hardfork::HfBasilisk, 4_120_000),
                (Hardfork::HfCockatrice, 5_450_000),
                (Hardfork::HfDomovoi, 5_570_000),
                (Hardfork::HfEchidna, 7_300_000),
            ]),
        }
    }

    /// TestNet activation heights.
    pub fn testnet() -> Self {
        Self {
            network: TESTNET_MAGIC,
            hardforks: BTreeMap::from([
                (Hardfork::HfAspidochelone, 210_000),
                (Hardfork::HfBasilisk, 2_680_000),
                (Hardfork::HfCockatrice, 3_967_000),
                (Hardfork::HfDomovoi, 4_144_000),
                (Hardfork::HfEchidna, 5_870_000),
            ]),
        }
    }

    /// Every known hardfork active from genesis (private networks and tests).
    pub fn all_enabled() -> Self {
        Self {
            network: PRIVATE_MAGIC,
            hardforks: Hardfork::all().into_iter().map(|hf| (hf, 0)).collect(),
        }
    }

    /// Check if the hardfork is enabled at `height`.
    pub fn is_hardfork_enabled(&self, hardfork: Hardfork, height: u32) -> bool {
        self.hardforks
            .get(&hardfork)
            .map_or(false, |&activation| height >= activation)
    }

    /// Activation height of `hardfork`, if it is configured.
    pub fn activation_height(&self, hardfork: Hardfork) -> Option<u32> {
        self.hardforks.get(&hardfork).copied()
    }

    /// The last hardfork the network schedules; `None` if it configures none.
    pub fn last_hardfork(&self) -> Option<Hardfork> {
        self.hardforks.keys().next_back().copied()
    }

    /// The latest hardfork in effect at `height`; `None` before the first one.
    pub fn hardfork_at(&self, height: u32) -> Option<Hardfork> {
        Hardfork::all()
            .into_iter()
            .take_while(|hf| self.is_hardfork_enabled(*hf, height))
            .last()
    }
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self::all_enabled()
    }
}

/// Fills in hardforks declared before the first configured one with height 0.
fn ensure_omitted_hardforks(mut hardforks: BTreeMap<Hardfork, u32>) -> BTreeMap<Hardfork, u32> {
    for hf in Hardfork::all() {
        if hardforks.contains_key(&hf) {
            break;
        }
        hardforks.insert(hf, 0);
    }
    hardforks
}

/// Configured hardforks must be continuous in declaration order with
/// non-decreasing heights.
pub fn check_hardforks(hardforks: &BTreeMap<Hardfork, u32>) -> ConfigResult<()> {
    let configured: Vec<(&Hardfork, &u32)> = hardforks.iter().collect();
    for window in configured.windows(2) {
        let (prev, prev_height) = window[0];
        let (next, next_height) = window[1];
        if next.ordinal() - prev.ordinal() > 1 {
            return Err(ConfigError::invalid_hardforks(format!(
                "hardfork configuration is not continuous: {prev} is followed by {next}"
            )));
        }
        if prev_height > next_height {
            return Err(ConfigError::invalid_hardforks(format!(
                "the height for {prev} ({prev_height}) is greater than for {next} ({next_height})"
            )));
        }
    }
    Ok(())
}
