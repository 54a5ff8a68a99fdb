use crate::PokemonType;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EvolutionItem {
    #[strum(to_string = "Fire Stone")]
    FireStone,
    #[strum(to_string = "Water Stone")]
    WaterStone,
    #[strum(to_string = "Thunder Stone")]
    ThunderStone,
    #[strum(to_string = "Leaf Stone")]
    LeafStone,
    #[strum(to_string = "Moon Stone")]
    MoonStone,
    #[strum(to_string = "Sun Stone")]
    SunStone,
    #[strum(to_string = "Ice Stone")]
    IceStone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum FormChangeItem {
    #[strum(to_string = "Charizardite X")]
    CharizarditeX,
    #[strum(to_string = "Charizardite Y")]
    CharizarditeY,
    Gyaradosite,
    #[strum(to_string = "Mewtwonite X")]
    MewtwoniteX,
    #[strum(to_string = "Mewtwonite Y")]
    MewtwoniteY,
}

/// Items a single party member can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum HeldItemKind {
    Leftovers,
    #[strum(to_string = "Shell Bell")]
    ShellBell,
    #[strum(to_string = "Lucky Egg")]
    LuckyEgg,
    #[strum(to_string = "Soothe Bell")]
    SootheBell,
    #[strum(to_string = "Quick Claw")]
    QuickClaw,
    #[strum(to_string = "King's Rock")]
    KingsRock,
    #[strum(to_string = "Focus Band")]
    FocusBand,
    #[strum(to_string = "Grip Claw")]
    GripClaw,
    #[strum(to_string = "Reviver Seed")]
    ReviverSeed,
    #[strum(to_string = "Sitrus Berry")]
    SitrusBerry,
    #[strum(to_string = "Lum Berry")]
    LumBerry,
    #[strum(to_string = "Leppa Berry")]
    LeppaBerry,
    #[strum(to_string = "Silk Scarf")]
    SilkScarf,
    #[strum(to_string = "Black Belt")]
    BlackBelt,
    #[strum(to_string = "Sharp Beak")]
    SharpBeak,
    #[strum(to_string = "Poison Barb")]
    PoisonBarb,
    #[strum(to_string = "Soft Sand")]
    SoftSand,
    #[strum(to_string = "Hard Stone")]
    HardStone,
    #[strum(to_string = "Silver Powder")]
    SilverPowder,
    #[strum(to_string = "Spell Tag")]
    SpellTag,
    #[strum(to_string = "Metal Coat")]
    MetalCoat,
    Charcoal,
    #[strum(to_string = "Mystic Water")]
    MysticWater,
    #[strum(to_string = "Miracle Seed")]
    MiracleSeed,
    Magnet,
    #[strum(to_string = "Twisted Spoon")]
    TwistedSpoon,
    #[strum(to_string = "Never-Melt Ice")]
    NeverMeltIce,
    #[strum(to_string = "Dragon Fang")]
    DragonFang,
    #[strum(to_string = "Black Glasses")]
    BlackGlasses,
    #[strum(to_string = "Fairy Feather")]
    FairyFeather,
}

impl HeldItemKind {
    /// The attack type this item powers up, if it is a type booster.
    pub fn boosted_type(self) -> Option<PokemonType> {
        use HeldItemKind::*;
        let boosted = match self {
            SilkScarf => PokemonType::Normal,
            BlackBelt => PokemonType::Fighting,
            SharpBeak => PokemonType::Flying,
            PoisonBarb => PokemonType::Poison,
            SoftSand => PokemonType::Ground,
            HardStone => PokemonType::Rock,
            SilverPowder => PokemonType::Bug,
            SpellTag => PokemonType::Ghost,
            MetalCoat => PokemonType::Steel,
            Charcoal => PokemonType::Fire,
            MysticWater => PokemonType::Water,
            MiracleSeed => PokemonType::Grass,
            Magnet => PokemonType::Electric,
            TwistedSpoon => PokemonType::Psychic,
            NeverMeltIce => PokemonType::Ice,
            DragonFang => PokemonType::Dragon,
            BlackGlasses => PokemonType::Dark,
            FairyFeather => PokemonType::Fairy,
            _ => return None,
        };
        Some(boosted)
    }

    pub fn is_berry(self) -> bool {
        matches!(
            self,
            HeldItemKind::SitrusBerry | HeldItemKind::LumBerry | HeldItemKind::LeppaBerry
        )
    }

    pub fn berries() -> Vec<HeldItemKind> {
        Self::iter().filter(|kind| kind.is_berry()).collect()
    }

    pub fn non_berries() -> Vec<HeldItemKind> {
        Self::iter().filter(|kind| !kind.is_berry()).collect()
    }
}

/// Run-wide modifiers owned by the player rather than by a party member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ModifierKind {
    #[strum(to_string = "Amulet Coin")]
    AmuletCoin,
    #[strum(to_string = "Exp. Share")]
    ExpShare,
    #[strum(to_string = "Exp. Charm")]
    ExpCharm,
    #[strum(to_string = "Shiny Charm")]
    ShinyCharm,
    #[strum(to_string = "Ability Charm")]
    AbilityCharm,
    #[strum(to_string = "Berry Pouch")]
    BerryPouch,
    #[strum(to_string = "Healing Charm")]
    HealingCharm,
    #[strum(to_string = "Candy Jar")]
    CandyJar,
    Map,
    Lure,
    #[strum(to_string = "Super Lure")]
    SuperLure,
    #[strum(to_string = "Max Lure")]
    MaxLure,
}
