//! Tunable constants for seeding, spawn rolls and tier pity.
//!
//! Settings are plain RON so a game can ship its own balance file:
//!
//! ```ron
//! (
//!     base_spawn_weight: 3,
//!     tier_weights: (common: 61, uncommon: 40, rare: 21, super_rare: 6, ultra_rare: 0),
//! )
//! ```
//!
//! Any field left out falls back to [`EncounterSettings::default`].

use crate::encounter::EncounterTier;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One weight per encounter tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
    pub super_rare: u32,
    pub ultra_rare: u32,
}

impl TierTable {
    pub fn get(&self, tier: EncounterTier) -> u32 {
        match tier {
            EncounterTier::Common => self.common,
            EncounterTier::Uncommon => self.uncommon,
            EncounterTier::Rare => self.rare,
            EncounterTier::SuperRare => self.super_rare,
            EncounterTier::UltraRare => self.ultra_rare,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterSettings {
    /// Seed offset of a fresh encounter instance is `wave_index * wave_seed_multiplier`.
    pub wave_seed_multiplier: u64,
    /// Added to the instance offset each time the option menu is re-entered.
    pub reentry_seed_step: u64,
    pub option_phase_seed_multiplier: u64,
    pub post_phase_seed_multiplier: u64,
    pub base_spawn_weight: u32,
    pub spawn_weight_increment_on_miss: u32,
    pub spawn_roll_range: u32,
    pub min_waves_between_encounters: u32,
    /// Inclusive `(first, last)` waves on which encounters may spawn.
    pub encounter_wave_range: (u32, u32),
    pub target_encounters_per_run: u32,
    pub spawn_rate_per_missing_encounter: u32,
    pub tier_weights: TierTable,
    pub tier_pity_decay: TierTable,
}

impl Default for EncounterSettings {
    fn default() -> Self {
        Self {
            wave_seed_multiplier: 1000,
            reentry_seed_step: 512,
            option_phase_seed_multiplier: 500,
            post_phase_seed_multiplier: 2000,
            base_spawn_weight: 3,
            spawn_weight_increment_on_miss: 3,
            spawn_roll_range: 256,
            min_waves_between_encounters: 3,
            encounter_wave_range: (10, 180),
            target_encounters_per_run: 15,
            spawn_rate_per_missing_encounter: 15,
            tier_weights: TierTable {
                common: 66,
                uncommon: 40,
                rare: 19,
                super_rare: 3,
                ultra_rare: 0,
            },
            tier_pity_decay: TierTable {
                common: 6,
                uncommon: 4,
                rare: 0,
                super_rare: 0,
                ultra_rare: 0,
            },
        }
    }
}

impl EncounterSettings {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let settings: EncounterSettings = ron::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_ron_str(&source)?;
        tracing::info!(path = %path.display(), "loaded encounter settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn_roll_range == 0 {
            return Err(ConfigError::InvalidValue {
                field: "spawn_roll_range",
                reason: "must be greater than zero".to_string(),
            });
        }
        let (first, last) = self.encounter_wave_range;
        if first > last {
            return Err(ConfigError::InvalidValue {
                field: "encounter_wave_range",
                reason: format!("first wave {first} is after last wave {last}"),
            });
        }
        let weights = self.tier_weights;
        if weights.common + weights.uncommon + weights.rare + weights.super_rare + weights.ultra_rare
            == 0
        {
            return Err(ConfigError::InvalidValue {
                field: "tier_weights",
                reason: "at least one tier needs a positive weight".to_string(),
            });
        }
        Ok(())
    }
}
