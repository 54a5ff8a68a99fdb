//! A trainer offers to spar against a copy of one of the player's Pokémon.
//! The original sits out the battle and comes back improved.

use crate::battle::{EnemyPartyConfig, EnemyPokemonConfig};
use crate::dialogue::DialogueLine;
use crate::encounter::{EncounterTier, MysteryEncounter};
use crate::errors::DefinitionResult;
use crate::option::{phase_fn, EncounterOption, OptionDialogue, OptionMode, PhaseContext, PhaseOutcome};
use crate::pokemon::PartyPokemon;
use crate::requirements::{InclusiveRange, PartyCriterion, PartyRequirement};
use crate::rewards::ShopConfig;
use crate::rng::EncounterRng;
use crate::scene::RunState;
use schema::{EncounterType, Nature};
use serde_json::json;

const NAMESPACE: &str = "mysteryEncounters/trainingSession";
const LIGHT_TRAINING_FRIENDSHIP: u8 = 10;

fn key(suffix: &str) -> String {
    format!("{NAMESPACE}:{suffix}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Training {
    /// Comes back healed and friendlier.
    Light,
    /// Comes back with a nature rolled by the trainer.
    Moderate,
}

impl Training {
    fn boss_segments(self, wave_index: u32) -> u32 {
        match self {
            Training::Light => (2 + wave_index / 50).min(5),
            Training::Moderate => (2 + wave_index / 40).min(6),
        }
    }
}

/// Any member still able to battle can train.
fn trainee_requirement() -> PartyRequirement {
    PartyRequirement::new(PartyCriterion::Level(InclusiveRange::new(1, 100))).exclude_fainted(true)
}

fn sparring_partner(trainee: &PartyPokemon, segments: u32) -> EnemyPokemonConfig {
    let mut config = EnemyPokemonConfig::new(trainee.species)
        .with_level(trainee.level)
        .with_boss_segments(segments)
        .with_nickname(&trainee.name())
        .with_nature(trainee.nature)
        .with_moveset(trainee.moveset.clone());
    for item in &trainee.held_items {
        config = config.with_held_item(item.kind);
    }
    config
}

fn start_training(ctx: &mut PhaseContext<'_>, training: Training) -> PhaseOutcome {
    let Some(id) = ctx.roles().and_then(|roles| roles.primary) else {
        return PhaseOutcome::Halt;
    };
    let wave_index = ctx.run.wave_index;
    let Some(trainee) = ctx.run.remove_party_member(id) else {
        return PhaseOutcome::Halt;
    };

    let mut party_config =
        EnemyPartyConfig::wild(vec![sparring_partner(&trainee, training.boss_segments(wave_index))]);
    // The partner is the player's own Pokémon, so it never counts as seen.
    party_config.count_as_seen = false;

    let new_nature = match training {
        Training::Light => None,
        Training::Moderate => {
            let natures = Nature::all();
            let nature = ctx.rng.pick(&natures, "training nature").copied();
            if let Some(nature) = nature {
                ctx.encounter.dialogue_tokens.set("nature", nature);
            }
            nature
        }
    };

    ctx.encounter.misc = json!({ "trainee": id });
    ctx.encounter.set_custom_encounter_rewards(
        Some(ShopConfig::fill_remaining()),
        None,
        Some(Box::new(move |run: &mut RunState, _rng: &mut EncounterRng| {
            let mut returning = trainee.clone();
            match new_nature {
                Some(nature) => returning.nature = nature,
                None => {
                    returning.hp = returning.max_hp;
                    returning.friendship = returning.friendship.saturating_add(LIGHT_TRAINING_FRIENDSHIP);
                }
            }
            run.party.push(returning);
        })),
    );

    match ctx.init_battle(&party_config) {
        Ok(_) => PhaseOutcome::Continue,
        Err(err) => {
            tracing::error!(%err, "training battle could not be set up");
            PhaseOutcome::Halt
        }
    }
}

fn training_option(number: u8, training: Training) -> DefinitionResult<EncounterOption> {
    EncounterOption::builder()
        .with_mode(OptionMode::Default)
        .with_dex_progress(true)
        .with_primary_pokemon_requirement(trainee_requirement())
        .with_dialogue(OptionDialogue {
            button_label: Some(key(&format!("option.{number}.label"))),
            button_tooltip: Some(key(&format!("option.{number}.tooltip"))),
            selected: vec![DialogueLine::new(&key("option.selected"))],
            ..OptionDialogue::default()
        })
        .with_option_phase(phase_fn(move |ctx| start_training(ctx, training)))
        .build()
}

pub fn training_session() -> DefinitionResult<MysteryEncounter> {
    let leave = EncounterOption::builder()
        .with_dialogue(OptionDialogue {
            button_label: Some(key("option.3.label")),
            button_tooltip: Some(key("option.3.tooltip")),
            selected: vec![DialogueLine::spoken_by(&key("speaker"), &key("option.3.selected"))],
            ..OptionDialogue::default()
        })
        .with_option_phase(phase_fn(|ctx| {
            ctx.leave_without_battle();
            PhaseOutcome::Continue
        }))
        .build()?;

    MysteryEncounter::builder(EncounterType::TrainingSession)
        .with_encounter_tier(EncounterTier::Rare)
        .with_scene_wave_range_requirement(10, 180)
        .with_scene_party_size_requirement(2, 6, true)
        .with_fleeing_allowed(false)
        .with_intro_visual("training_session_gear", false)
        .with_intro_dialogue(vec![DialogueLine::new(&key("intro"))])
        .with_title(&key("title"))
        .with_description(&key("description"))
        .with_query(&key("query"))
        .with_option(training_option(1, Training::Light)?)
        .with_option(training_option(2, Training::Moderate)?)
        .with_option(leave)
        .build()
}
