use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Identifies a mystery encounter definition across runs and save files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum EncounterType {
    Delibirdy,
    #[strum(to_string = "Training Session")]
    TrainingSession,
    #[strum(to_string = "Lost at Sea")]
    LostAtSea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum TrainerType {
    Youngster,
    Lass,
    #[strum(to_string = "Ace Trainer")]
    AceTrainer,
    Breeder,
    Swimmer,
    Fisherman,
    Veteran,
}
