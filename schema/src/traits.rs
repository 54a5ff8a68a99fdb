use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Nature {
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    pub fn all() -> Vec<Nature> {
        Self::iter().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Ability {
    Overgrow,
    Blaze,
    Torrent,
    Static,
    Chlorophyll,
    #[strum(to_string = "Run Away")]
    RunAway,
    Adaptability,
    #[strum(to_string = "Water Absorb")]
    WaterAbsorb,
    #[strum(to_string = "Volt Absorb")]
    VoltAbsorb,
    #[strum(to_string = "Flash Fire")]
    FlashFire,
    #[strum(to_string = "Shell Armor")]
    ShellArmor,
    #[strum(to_string = "Thick Fat")]
    ThickFat,
    Immunity,
    #[strum(to_string = "Vital Spirit")]
    VitalSpirit,
    Hustle,
    #[strum(to_string = "Keen Eye")]
    KeenEye,
    Drizzle,
    #[strum(to_string = "Swift Swim")]
    SwiftSwim,
    #[strum(to_string = "Water Veil")]
    WaterVeil,
    Intimidate,
    Levitate,
    Pressure,
    #[strum(to_string = "Air Lock")]
    AirLock,
    Multiscale,
}
