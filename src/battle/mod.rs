//! Turning declarative enemy configs into live combatants.

pub mod config;
pub mod initializer;
pub mod materializer;

pub use config::{
    EnemyPartyConfig, EnemyPokemonConfig, EnemyStatus, PostSummonEffect, TrainerConfig,
    DEFAULT_SLEEP_TURNS,
};
pub use initializer::StandardBattleInitializer;
pub use materializer::materialize;

use crate::encounter::EncounterVariant;
use crate::pokemon::StatusCondition;
use schema::{BattlerTagType, HeldItemKind, Move, Nature, Species, TrainerType};
use std::fmt;

/// A concrete enemy handed to the field service.
#[derive(Clone)]
pub struct EnemyCombatant {
    pub slot: usize,
    pub species: Species,
    pub level: u32,
    pub form_index: u8,
    pub nickname: Option<String>,
    pub shiny: bool,
    pub nature: Option<Nature>,
    pub ability_index: Option<u8>,
    pub moveset: Option<Vec<Move>>,
    pub held_items: Vec<HeldItemKind>,
    pub status: Option<StatusCondition>,
    pub tags: Vec<BattlerTagType>,
    /// Zero for non-boss enemies.
    pub boss_segments: u32,
    /// Free-form notes left by post-summon effects for the battle layer.
    pub battle_effects: Vec<String>,
    post_summon_effect: Option<PostSummonEffect>,
}

impl fmt::Debug for EnemyCombatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnemyCombatant")
            .field("slot", &self.slot)
            .field("species", &self.species)
            .field("level", &self.level)
            .field("boss_segments", &self.boss_segments)
            .field("status", &self.status)
            .field("tags", &self.tags)
            .field("battle_effects", &self.battle_effects)
            .finish_non_exhaustive()
    }
}

impl EnemyCombatant {
    pub fn is_boss(&self) -> bool {
        self.boss_segments > 0
    }

    pub fn has_tag(&self, tag: BattlerTagType) -> bool {
        self.tags.contains(&tag)
    }

    /// Applies the configured post-summon effect. Without the
    /// `MysteryEncounterPostSummon` tag this does nothing. Returns whether
    /// an effect ran.
    pub fn apply_post_summon_effect(&mut self) -> bool {
        if !self.has_tag(BattlerTagType::MysteryEncounterPostSummon) {
            return false;
        }
        let Some(effect) = self.post_summon_effect.clone() else {
            return false;
        };
        effect(self);
        true
    }
}

/// How the battle itself should be set up once the enemies are on the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleSetup {
    pub variant: EncounterVariant,
    pub trainer: Option<TrainerType>,
    pub double_battle: bool,
    pub disable_switch: bool,
    pub count_as_seen: bool,
}
