use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Move {
    Tackle,
    Scratch,
    Growl,
    #[strum(to_string = "Vine Whip")]
    VineWhip,
    Ember,
    #[strum(to_string = "Water Gun")]
    WaterGun,
    #[strum(to_string = "Thunder Shock")]
    ThunderShock,
    Thunderbolt,
    Flamethrower,
    #[strum(to_string = "Ice Beam")]
    IceBeam,
    Surf,
    Fly,
    Dive,
    Waterfall,
    Strength,
    Cut,
    Dig,
    #[strum(to_string = "Rock Smash")]
    RockSmash,
    Charm,
    Attract,
    #[strum(to_string = "Baby-Doll Eyes")]
    BabyDollEyes,
    Sing,
    Present,
    Protect,
    Rest,
    Splash,
    #[strum(to_string = "Hyper Beam")]
    HyperBeam,
    #[strum(to_string = "Dragon Dance")]
    DragonDance,
    Outrage,
    #[strum(to_string = "Body Slam")]
    BodySlam,
    Psychic,
    Recover,
}
