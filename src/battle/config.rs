use crate::errors::{DefinitionError, DefinitionResult};
use schema::{BattlerTagType, HeldItemKind, Move, Nature, Species, StatusEffect, TrainerType};
use std::fmt;
use std::sync::Arc;

use super::EnemyCombatant;

/// Runs on an enemy right after it is summoned, if it carries the
/// `MysteryEncounterPostSummon` tag.
pub type PostSummonEffect = Arc<dyn Fn(&mut EnemyCombatant) + Send + Sync>;

/// Default sleep length when a config asks for sleep without a cure turn.
pub const DEFAULT_SLEEP_TURNS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyStatus {
    pub effect: StatusEffect,
    pub cure_turn: Option<u8>,
}

/// Declarative description of one enemy. Pure data until materialized.
#[derive(Clone)]
pub struct EnemyPokemonConfig {
    pub species: Species,
    pub is_boss: bool,
    /// Replaces the computed segment count when set.
    pub boss_segments: Option<u32>,
    /// Added to the segment count, explicit or computed.
    pub boss_segment_modifier: Option<i32>,
    pub level: Option<u32>,
    pub form_index: Option<u8>,
    pub nickname: Option<String>,
    pub shiny: bool,
    pub nature: Option<Nature>,
    pub ability_index: Option<u8>,
    pub moveset: Option<Vec<Move>>,
    pub held_items: Vec<HeldItemKind>,
    pub status: Option<EnemyStatus>,
    pub tags: Vec<BattlerTagType>,
    pub post_summon_effect: Option<PostSummonEffect>,
}

impl fmt::Debug for EnemyPokemonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnemyPokemonConfig")
            .field("species", &self.species)
            .field("is_boss", &self.is_boss)
            .field("boss_segments", &self.boss_segments)
            .field("boss_segment_modifier", &self.boss_segment_modifier)
            .field("level", &self.level)
            .field("status", &self.status)
            .field("tags", &self.tags)
            .field("has_post_summon_effect", &self.post_summon_effect.is_some())
            .finish_non_exhaustive()
    }
}

impl EnemyPokemonConfig {
    pub fn new(species: Species) -> Self {
        Self {
            species,
            is_boss: false,
            boss_segments: None,
            boss_segment_modifier: None,
            level: None,
            form_index: None,
            nickname: None,
            shiny: false,
            nature: None,
            ability_index: None,
            moveset: None,
            held_items: Vec::new(),
            status: None,
            tags: Vec::new(),
            post_summon_effect: None,
        }
    }

    pub fn boss(mut self) -> Self {
        self.is_boss = true;
        self
    }

    pub fn with_boss_segments(mut self, segments: u32) -> Self {
        self.is_boss = true;
        self.boss_segments = Some(segments);
        self
    }

    pub fn with_boss_segment_modifier(mut self, modifier: i32) -> Self {
        self.is_boss = true;
        self.boss_segment_modifier = Some(modifier);
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    pub fn with_nature(mut self, nature: Nature) -> Self {
        self.nature = Some(nature);
        self
    }

    pub fn with_moveset(mut self, moves: Vec<Move>) -> Self {
        self.moveset = Some(moves);
        self
    }

    pub fn with_held_item(mut self, item: HeldItemKind) -> Self {
        self.held_items.push(item);
        self
    }

    pub fn with_status(mut self, effect: StatusEffect, cure_turn: Option<u8>) -> Self {
        self.status = Some(EnemyStatus { effect, cure_turn });
        self
    }

    pub fn with_tag(mut self, tag: BattlerTagType) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_post_summon_effect(
        mut self,
        effect: impl Fn(&mut EnemyCombatant) + Send + Sync + 'static,
    ) -> Self {
        self.post_summon_effect = Some(Arc::new(effect));
        self
    }

    pub fn validate(&self) -> DefinitionResult<()> {
        if self.level == Some(0) {
            return Err(DefinitionError::ZeroLevel);
        }
        if let (Some(segments), Some(modifier)) = (self.boss_segments, self.boss_segment_modifier)
        {
            if segments as i64 + (modifier as i64) < 0 {
                return Err(DefinitionError::NegativeBossSegments { segments, modifier });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainerConfig {
    pub trainer_type: TrainerType,
    pub double_battle: bool,
}

/// The enemy side of an encounter battle.
#[derive(Debug, Clone, Default)]
pub struct EnemyPartyConfig {
    /// Adds `floor(wave_index / 10 * multiplier)` levels to every enemy.
    pub level_additive_multiplier: f64,
    pub double_battle: bool,
    pub trainer: Option<TrainerConfig>,
    pub pokemon_configs: Vec<EnemyPokemonConfig>,
    pub disable_switch: bool,
    pub count_as_seen: bool,
}

impl EnemyPartyConfig {
    pub fn wild(pokemon: Vec<EnemyPokemonConfig>) -> Self {
        Self {
            pokemon_configs: pokemon,
            count_as_seen: true,
            ..Self::default()
        }
    }

    pub fn trainer(trainer_type: TrainerType, pokemon: Vec<EnemyPokemonConfig>) -> Self {
        Self {
            trainer: Some(TrainerConfig {
                trainer_type,
                double_battle: false,
            }),
            pokemon_configs: pokemon,
            count_as_seen: true,
            ..Self::default()
        }
    }

    pub fn with_level_additive_multiplier(mut self, multiplier: f64) -> Self {
        self.level_additive_multiplier = multiplier;
        self
    }

    pub fn with_double_battle(mut self) -> Self {
        self.double_battle = true;
        self
    }

    pub fn with_switch_disabled(mut self) -> Self {
        self.disable_switch = true;
        self
    }

    /// Levels added on top of every enemy's level for this wave.
    pub fn level_additive(&self, wave_index: u32) -> u32 {
        if self.level_additive_multiplier <= 0.0 {
            return 0;
        }
        (wave_index as f64 / 10.0 * self.level_additive_multiplier).floor() as u32
    }

    pub fn is_double(&self) -> bool {
        self.double_battle || self.trainer.is_some_and(|t| t.double_battle)
    }

    pub fn has_boss(&self) -> bool {
        self.pokemon_configs.iter().any(|c| c.is_boss)
    }

    pub fn validate(&self) -> DefinitionResult<()> {
        if self.trainer.is_some() && self.pokemon_configs.len() > 6 {
            return Err(DefinitionError::TrainerPartyTooLarge(self.pokemon_configs.len()));
        }
        for config in &self.pokemon_configs {
            config.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(47, 0.75, 3)]
    #[case(47, 0.0, 0)]
    #[case(47, -1.0, 0)]
    #[case(100, 1.0, 10)]
    #[case(9, 1.0, 0)]
    #[case(180, 0.5, 9)]
    fn test_level_additive(#[case] wave: u32, #[case] multiplier: f64, #[case] expected: u32) {
        let config = EnemyPartyConfig::default().with_level_additive_multiplier(multiplier);
        assert_eq!(config.level_additive(wave), expected);
    }

    #[test]
    fn test_zero_level_is_rejected() {
        let config = EnemyPartyConfig::wild(vec![EnemyPokemonConfig::new(Species::Snorlax).with_level(0)]);
        assert_eq!(config.validate(), Err(DefinitionError::ZeroLevel));
    }

    #[test]
    fn test_explicit_segments_cannot_go_negative() {
        let config = EnemyPokemonConfig::new(Species::Mewtwo)
            .with_boss_segments(2)
            .with_boss_segment_modifier(-3);
        assert_eq!(
            config.validate(),
            Err(DefinitionError::NegativeBossSegments { segments: 2, modifier: -3 })
        );
    }

    #[test]
    fn test_oversized_trainer_party_is_rejected() {
        let configs = vec![EnemyPokemonConfig::new(Species::Magikarp); 7];
        let config = EnemyPartyConfig::trainer(TrainerType::Fisherman, configs);
        assert_eq!(config.validate(), Err(DefinitionError::TrainerPartyTooLarge(7)));
    }
}
