use super::{BattleSetup, EnemyCombatant, EnemyPartyConfig, EnemyPokemonConfig, DEFAULT_SLEEP_TURNS};
use crate::encounter::{EncounterInstance, EncounterVariant};
use crate::errors::{DefinitionError, DefinitionResult};
use crate::pokemon::StatusCondition;
use crate::rng::EncounterRng;
use crate::scene::RunState;
use crate::services::EncounterServices;
use schema::StatusEffect;

fn variant_for(config: &EnemyPartyConfig) -> EncounterVariant {
    if config.trainer.is_some() {
        EncounterVariant::TrainerBattle
    } else if config.has_boss() {
        EncounterVariant::BossBattle
    } else {
        EncounterVariant::WildBattle
    }
}

fn boss_segments(
    config: &EnemyPokemonConfig,
    wave_index: u32,
    level: u32,
    services: &mut EncounterServices,
) -> DefinitionResult<u32> {
    if !config.is_boss {
        return Ok(0);
    }
    let segments = match config.boss_segments {
        Some(segments) => segments,
        None => services
            .battle
            .default_boss_segments(wave_index, level, config.species),
    };
    let Some(modifier) = config.boss_segment_modifier else {
        return Ok(segments);
    };
    let adjusted = segments as i64 + modifier as i64;
    u32::try_from(adjusted).map_err(|_| DefinitionError::NegativeBossSegments { segments, modifier })
}

fn status_for(config: &EnemyPokemonConfig) -> Option<StatusCondition> {
    let status = config.status?;
    let cure_turn = match status.effect {
        StatusEffect::Sleep => Some(status.cure_turn.unwrap_or(DEFAULT_SLEEP_TURNS)),
        _ => status.cure_turn,
    };
    Some(StatusCondition {
        effect: status.effect,
        cure_turn,
    })
}

/// Builds the enemy side described by `config`, hands it to the field and
/// starts the battle. Records the resulting variant on the encounter.
///
/// Every enemy's level is its base level (explicit, or wave-scaled by the
/// battle initializer) plus `floor(wave / 10 * level_additive_multiplier)`.
#[tracing::instrument(skip_all, fields(wave = run.wave_index))]
pub fn materialize(
    config: &EnemyPartyConfig,
    run: &RunState,
    encounter: &mut EncounterInstance,
    rng: &mut EncounterRng,
    services: &mut EncounterServices,
) -> DefinitionResult<Vec<EnemyCombatant>> {
    config.validate()?;

    let wave_index = run.wave_index;
    let variant = variant_for(config);
    let double_battle = config.is_double();

    let base_levels: Vec<u32> = match config.trainer {
        Some(trainer) => {
            let mut levels =
                services
                    .battle
                    .trainer_party_levels(trainer.trainer_type, wave_index, rng);
            while levels.len() < config.pokemon_configs.len() {
                levels.push(services.battle.wave_level(wave_index, rng));
            }
            levels
        }
        None => {
            let count = if config.pokemon_configs.is_empty() {
                if double_battle {
                    2
                } else {
                    1
                }
            } else {
                config.pokemon_configs.len()
            };
            (0..count)
                .map(|_| services.battle.wave_level(wave_index, rng))
                .collect()
        }
    };

    let additive = config.level_additive(wave_index);
    let mut enemies = Vec::with_capacity(base_levels.len());

    for (slot, base_level) in base_levels.into_iter().enumerate() {
        let enemy = match config.pokemon_configs.get(slot) {
            Some(pokemon) => {
                let level = pokemon.level.unwrap_or(base_level) + additive;
                EnemyCombatant {
                    slot,
                    species: pokemon.species,
                    level,
                    form_index: pokemon.form_index.unwrap_or(0),
                    nickname: pokemon.nickname.clone(),
                    shiny: pokemon.shiny,
                    nature: pokemon.nature,
                    ability_index: pokemon.ability_index,
                    moveset: pokemon.moveset.clone(),
                    held_items: pokemon.held_items.clone(),
                    status: status_for(pokemon),
                    tags: pokemon.tags.clone(),
                    boss_segments: boss_segments(pokemon, wave_index, level, services)?,
                    battle_effects: Vec::new(),
                    post_summon_effect: pokemon.post_summon_effect.clone(),
                }
            }
            None => {
                let level = base_level + additive;
                let species = services.battle.random_species(wave_index, level, rng);
                EnemyCombatant {
                    slot,
                    species,
                    level,
                    form_index: 0,
                    nickname: None,
                    shiny: false,
                    nature: None,
                    ability_index: None,
                    moveset: None,
                    held_items: Vec::new(),
                    status: None,
                    tags: Vec::new(),
                    boss_segments: 0,
                    battle_effects: Vec::new(),
                    post_summon_effect: None,
                }
            }
        };
        tracing::debug!(
            slot,
            species = %enemy.species,
            level = enemy.level,
            boss_segments = enemy.boss_segments,
            "materialized enemy"
        );
        enemies.push(enemy);
    }

    services.field.clear_enemy_field();
    for enemy in &enemies {
        services.field.summon_enemy(enemy.clone());
    }
    services.field.start_battle(BattleSetup {
        variant,
        trainer: config.trainer.map(|t| t.trainer_type),
        double_battle,
        disable_switch: config.disable_switch,
        count_as_seen: config.count_as_seen,
    });

    encounter.variant = Some(variant);
    tracing::info!(?variant, enemies = enemies.len(), "encounter battle initialized");
    Ok(enemies)
}
