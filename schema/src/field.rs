use serde::{Deserialize, Serialize};
use strum::Display;

/// Non-volatile status conditions. `None` is a real value so requirements can
/// ask for "healthy" party members.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Default,
)]
pub enum StatusEffect {
    #[default]
    None,
    Poison,
    Toxic,
    Paralysis,
    Sleep,
    Freeze,
    Burn,
    Faint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum WeatherType {
    Sunny,
    Rain,
    Sandstorm,
    Hail,
    Snow,
    Fog,
    #[strum(to_string = "Heavy Rain")]
    HeavyRain,
    #[strum(to_string = "Harsh Sun")]
    HarshSun,
    #[strum(to_string = "Strong Winds")]
    StrongWinds,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Default,
)]
pub enum TimeOfDay {
    Dawn,
    #[default]
    Day,
    Dusk,
    Night,
}

/// Volatile tags that can be pre-applied to an enemy when it is summoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum BattlerTagType {
    /// Gates the encounter-specific post-summon effect.
    MysteryEncounterPostSummon,
    Confused,
    Seeded,
    Trapped,
    Protected,
    Endure,
    Substitute,
}
