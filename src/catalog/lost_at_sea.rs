//! The party drifts off course at sea. A strong swimmer or flyer can guide
//! everyone back; otherwise the party wanders and gets worn down.

use crate::dialogue::DialogueLine;
use crate::encounter::{EncounterTier, MysteryEncounter};
use crate::errors::DefinitionResult;
use crate::option::{phase_fn, EncounterOption, OptionDialogue, OptionMode, PhaseContext, PhaseOutcome};
use crate::requirements::{PartyCriterion, PartyRequirement};
use schema::{EncounterType, Move, PokemonType};

const NAMESPACE: &str = "mysteryEncounters/lostAtSea";
/// Share of max HP every member loses while wandering.
const DAMAGE_PERCENTAGE: u32 = 25;
/// Exp is paid as if a Lapras had been defeated.
const GUIDE_BASE_EXP: u32 = 187;

fn key(suffix: &str) -> String {
    format!("{NAMESPACE}:{suffix}")
}

fn guide_dialogue(number: u8) -> OptionDialogue {
    OptionDialogue {
        button_label: Some(key(&format!("option.{number}.label"))),
        disabled_button_label: Some(key(&format!("option.{number}.labelDisabled"))),
        button_tooltip: Some(key(&format!("option.{number}.tooltip"))),
        disabled_button_tooltip: Some(key(&format!("option.{number}.tooltipDisabled"))),
        selected: vec![DialogueLine::new(&key(&format!("option.{number}.selected")))],
    }
}

fn guide_exp(wave_index: u32) -> u32 {
    GUIDE_BASE_EXP * wave_index / 5 + 1
}

/// The guide earns exp and the party sails on without a battle.
fn guide_party(ctx: &mut PhaseContext<'_>) -> PhaseOutcome {
    let Some(guide) = ctx.roles().and_then(|roles| roles.primary) else {
        return PhaseOutcome::Halt;
    };
    let exp = guide_exp(ctx.run.wave_index);
    ctx.encounter.set_encounter_exp(vec![guide], exp, false);
    ctx.leave_without_battle();
    PhaseOutcome::Continue
}

fn wander(ctx: &mut PhaseContext<'_>) -> PhaseOutcome {
    for pokemon in ctx.run.party.iter_mut().filter(|p| !p.is_fainted()) {
        let damage = pokemon.max_hp * DAMAGE_PERCENTAGE / 100;
        pokemon.apply_non_lethal_damage(damage);
    }
    ctx.leave_without_battle();
    PhaseOutcome::Continue
}

pub fn lost_at_sea() -> DefinitionResult<MysteryEncounter> {
    // Surfing needs a second Water-type to keep the party together, and the
    // surfer can't be both.
    let surf = EncounterOption::builder()
        .with_mode(OptionMode::DisabledOrDefault)
        .with_primary_pokemon_requirement(PartyRequirement::new(PartyCriterion::Move(vec![Move::Surf])))
        .with_secondary_pokemon_requirement(
            PartyRequirement::new(PartyCriterion::Type(vec![PokemonType::Water])),
            true,
        )
        .with_dialogue(guide_dialogue(1))
        .with_option_phase(phase_fn(guide_party))
        .build()?;

    let fly = EncounterOption::builder()
        .with_mode(OptionMode::DisabledOrDefault)
        .with_primary_pokemon_requirement(PartyRequirement::new(PartyCriterion::Move(vec![Move::Fly])))
        .with_dialogue(guide_dialogue(2))
        .with_option_phase(phase_fn(guide_party))
        .build()?;

    let wander_option = EncounterOption::builder()
        .with_dialogue(OptionDialogue {
            button_label: Some(key("option.3.label")),
            button_tooltip: Some(key("option.3.tooltip")),
            selected: vec![
                DialogueLine::new(&key("option.3.selected")),
                DialogueLine::new(&key("option.3.selected2")),
            ],
            ..OptionDialogue::default()
        })
        .with_option_phase(phase_fn(wander))
        .build()?;

    MysteryEncounter::builder(EncounterType::LostAtSea)
        .with_encounter_tier(EncounterTier::Common)
        .with_scene_wave_range_requirement(10, 180)
        .with_intro_visual("lost_at_sea_buoy", false)
        .with_intro_dialogue(vec![DialogueLine::new(&key("intro"))])
        .with_title(&key("title"))
        .with_description(&key("description"))
        .with_query(&key("query"))
        .with_on_init(|_run, encounter, _rng| {
            encounter
                .dialogue_tokens
                .set("damagePercentage", DAMAGE_PERCENTAGE);
        })
        .with_option(surf)
        .with_option(fly)
        .with_option(wander_option)
        .build()
}
