//! Mystery Encounters
//!
//! A data-driven engine for the special, non-standard waves of a roguelike
//! Pokémon run. Encounters are declared with builders, gated by scene and
//! party requirements, and played through an async option flow whose every
//! random draw is reproducible from the run seed.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod catalog;
pub mod config;
pub mod dialogue;
pub mod encounter;
pub mod errors;
pub mod flow;
pub mod option;
pub mod pokemon;
pub mod requirements;
pub mod rewards;
pub mod rng;
pub mod scene;
pub mod services;

#[cfg(test)]
mod tests;

// --- PUBLIC API RE-EXPORTS ---

// Static game data from the `schema` crate.
pub use schema::{
    Ability, BattlerTagType, EncounterType, HeldItemKind, ModifierKind, Move, Nature,
    PokemonType, Species, StatusEffect, TimeOfDay, TrainerType, WeatherType,
};

// Encounter definitions and their runtime state.
pub use encounter::{
    roll_for_encounter, roll_tier, select_encounter, EncounterInstance, EncounterTier,
    EncounterVariant, MysteryEncounter, MysteryEncounterBuilder,
};
pub use flow::{EncounterSession, FlowOutcome, FlowStep};
pub use option::{
    phase_fn, EncounterOption, EncounterOptionBuilder, OptionMode, OptionPhase, PhaseContext,
    PhaseOutcome, RoleAssignment,
};
pub use requirements::{
    InclusiveRange, PartyCriterion, PartyRequirement, Requirement, SceneRequirement,
};

// Collaborators and run state.
pub use config::EncounterSettings;
pub use rng::{EncounterRng, SeedContext};
pub use scene::RunState;
pub use services::{
    BattleInitializer, DialogueProvider, EncounterServices, FieldService, Presentation,
    RewardService,
};

// Crate-specific error and result types.
pub use errors::{
    ConfigError, DefinitionError, DefinitionResult, EncounterError, EncounterResult, FlowError,
};
