//! Three Delibird offer gifts in exchange for money or a held item.

use crate::dialogue::DialogueLine;
use crate::encounter::{EncounterTier, MysteryEncounter};
use crate::errors::DefinitionResult;
use crate::option::{
    phase_fn, EncounterOption, OptionDialogue, OptionMode, OptionPhase, PhaseContext, PhaseOutcome,
};
use crate::requirements::{PartyCriterion, PartyRequirement, SceneRequirement};
use crate::rewards::Reward;
use async_trait::async_trait;
use schema::{EncounterType, HeldItemKind, ModifierKind, Species};
use serde_json::json;

const NAMESPACE: &str = "mysteryEncounters/delibirdy";
const MONEY_PRICE_MULTIPLIER: f64 = 2.0;

const AMULET_COIN_MAX_STACKS: u32 = 5;
const CANDY_JAR_MAX_STACKS: u32 = 99;
const BERRY_POUCH_MAX_STACKS: u32 = 3;
const HEALING_CHARM_MAX_STACKS: u32 = 5;

fn key(suffix: &str) -> String {
    format!("{NAMESPACE}:{suffix}")
}

fn option_dialogue(number: u8) -> OptionDialogue {
    OptionDialogue {
        button_label: Some(key(&format!("option.{number}.label"))),
        button_tooltip: Some(key(&format!("option.{number}.tooltip"))),
        selected: vec![DialogueLine::new(&key(&format!("option.{number}.selected")))],
        ..OptionDialogue::default()
    }
}

/// Items Delibird swaps for a Candy Jar or Berry Pouch.
fn is_treat(kind: HeldItemKind) -> bool {
    kind.is_berry() || kind == HeldItemKind::ReviverSeed
}

fn treats() -> Vec<HeldItemKind> {
    let mut items = HeldItemKind::berries();
    items.push(HeldItemKind::ReviverSeed);
    items
}

fn non_treats() -> Vec<HeldItemKind> {
    HeldItemKind::non_berries()
        .into_iter()
        .filter(|kind| *kind != HeldItemKind::ReviverSeed)
        .collect()
}

/// Lets the player pick a member, then one of its held items that `accept`
/// allows. The pick is stored as the item being handed over.
struct ChooseHeldItem {
    option_number: u8,
    accept: fn(HeldItemKind) -> bool,
}

#[async_trait]
impl OptionPhase for ChooseHeldItem {
    async fn run(&self, ctx: &mut PhaseContext<'_>) -> PhaseOutcome {
        let Some(id) = ctx.select_primary_pokemon(&key("invalidSelection")).await else {
            return PhaseOutcome::Halt;
        };
        let items: Vec<HeldItemKind> = ctx
            .run
            .pokemon(id)
            .map(|pokemon| {
                pokemon
                    .held_items
                    .iter()
                    .map(|item| item.kind)
                    .filter(|kind| (self.accept)(*kind))
                    .collect()
            })
            .unwrap_or_default();

        let prompt = ctx.services.dialogue.resolve(
            &key(&format!("option.{}.selectPrompt", self.option_number)),
            &ctx.encounter.dialogue_tokens,
        );
        let labels = items.iter().map(ToString::to_string).collect();
        let picked = ctx.services.presentation.select_from_list(prompt, labels).await;
        let Some(item) = picked.and_then(|index| items.get(index).copied()) else {
            return PhaseOutcome::Halt;
        };

        ctx.encounter.dialogue_tokens.set("chosenItem", item);
        ctx.encounter.misc = json!({ "chosenPokemon": id, "chosenItem": item });
        PhaseOutcome::Continue
    }
}

/// What Delibird is paid with.
#[derive(Debug, Clone, Copy)]
enum Payment {
    Money,
    Treat,
    OtherItem,
}

impl Payment {
    /// The modifier handed back and its maximum stack.
    fn gift(self, item: Option<HeldItemKind>) -> (ModifierKind, u32) {
        match self {
            Payment::Money => (ModifierKind::AmuletCoin, AMULET_COIN_MAX_STACKS),
            Payment::Treat if item == Some(HeldItemKind::ReviverSeed) => {
                (ModifierKind::BerryPouch, BERRY_POUCH_MAX_STACKS)
            }
            Payment::Treat => (ModifierKind::CandyJar, CANDY_JAR_MAX_STACKS),
            Payment::OtherItem => (ModifierKind::HealingCharm, HEALING_CHARM_MAX_STACKS),
        }
    }
}

/// Delibird's gift: the modifier, or a Shell Bell once the modifier is
/// already at its maximum stack.
struct DelibirdGift(Payment);

#[async_trait]
impl OptionPhase for DelibirdGift {
    async fn run(&self, ctx: &mut PhaseContext<'_>) -> PhaseOutcome {
        let chosen: Option<HeldItemKind> = ctx
            .encounter
            .misc
            .get("chosenItem")
            .and_then(|value| serde_json::from_value(value.clone()).ok());
        if !matches!(self.0, Payment::Money) {
            if let (Some(item), Some(pokemon)) = (chosen, ctx.primary_pokemon_mut()) {
                pokemon.take_held_item(item);
            }
        }

        let (reward, max_stacks) = self.0.gift(chosen);
        if ctx.run.modifier_stack_count(reward) >= max_stacks {
            if let Some(pokemon) = ctx.run.party.iter_mut().find(|p| !p.is_fainted()) {
                pokemon.give_held_item(HeldItemKind::ShellBell, 1);
            }
            ctx.encounter
                .dialogue_tokens
                .set("modifierName", HeldItemKind::ShellBell);
            ctx.show_dialogue("battle:rewardGain").await;
        } else {
            ctx.encounter
                .set_custom_encounter_rewards(None, Some(vec![Reward::Modifier(reward)]), None);
        }

        ctx.leave_without_battle();
        PhaseOutcome::Continue
    }
}

pub fn delibirdy() -> DefinitionResult<MysteryEncounter> {
    let pay_money = EncounterOption::builder()
        .with_mode(OptionMode::DisabledOrDefault)
        .with_scene_money_requirement(0, MONEY_PRICE_MULTIPLIER)
        .with_dialogue(option_dialogue(1))
        .with_pre_option_phase(phase_fn(|ctx| {
            let price = SceneRequirement::money(0, MONEY_PRICE_MULTIPLIER)
                .required_money(ctx.run)
                .unwrap_or(0);
            ctx.run.spend_money(price);
            PhaseOutcome::Continue
        }))
        .with_option_phase(DelibirdGift(Payment::Money))
        .build()?;

    let give_treat = EncounterOption::builder()
        .with_mode(OptionMode::DisabledOrDefault)
        .with_primary_pokemon_requirement(PartyRequirement::new(PartyCriterion::HeldItem(treats())))
        .with_dialogue(option_dialogue(2))
        .with_pre_option_phase(ChooseHeldItem {
            option_number: 2,
            accept: is_treat,
        })
        .with_option_phase(DelibirdGift(Payment::Treat))
        .build()?;

    let give_item = EncounterOption::builder()
        .with_mode(OptionMode::DisabledOrDefault)
        .with_primary_pokemon_requirement(PartyRequirement::new(PartyCriterion::HeldItem(non_treats())))
        .with_dialogue(option_dialogue(3))
        .with_pre_option_phase(ChooseHeldItem {
            option_number: 3,
            accept: |kind| !is_treat(kind),
        })
        .with_option_phase(DelibirdGift(Payment::OtherItem))
        .build()?;

    MysteryEncounter::builder(EncounterType::Delibirdy)
        .with_encounter_tier(EncounterTier::Uncommon)
        .with_scene_wave_range_requirement(10, 180)
        .with_scene_requirement(SceneRequirement::money(0, MONEY_PRICE_MULTIPLIER))
        .with_intro_visual("delibird", true)
        .with_intro_dialogue(vec![DialogueLine::new(&key("intro"))])
        .with_title(&key("title"))
        .with_description(&key("description"))
        .with_query(&key("query"))
        .with_outro_dialogue(vec![DialogueLine::new(&key("outro"))])
        .with_on_init(|_run, encounter, _rng| {
            encounter
                .dialogue_tokens
                .set("delibirdName", Species::Delibird);
        })
        .with_option(pay_money)
        .with_option(give_treat)
        .with_option(give_item)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokemon::PartyPokemon;
    use crate::rng::SeedContext;
    use crate::scene::RunState;
    use pretty_assertions::assert_eq;

    fn run() -> RunState {
        let mut run = RunState::new(
            vec![
                PartyPokemon::new(1, Species::Snorlax, 40).with_held_item(HeldItemKind::SitrusBerry, 1),
                PartyPokemon::new(2, Species::Lapras, 40).with_held_item(HeldItemKind::MysticWater, 1),
            ],
            40,
        );
        run.add_money(10_000);
        run
    }

    #[test]
    fn test_definition_builds() {
        let encounter = delibirdy().unwrap();
        assert_eq!(encounter.options().len(), 3);
        assert_eq!(encounter.tier(), EncounterTier::Uncommon);
        assert!(encounter
            .options()
            .iter()
            .all(|option| option.mode() == OptionMode::DisabledOrDefault));
    }

    #[test]
    fn test_item_options_pick_matching_holders() {
        let encounter = delibirdy().unwrap();
        let state = run();
        let mut rng = SeedContext::new(11).at_offset(40_000).rng();

        let berry_roles = encounter.options()[1].resolve_roles(&state, &mut rng).unwrap();
        assert_eq!(berry_roles.primary, Some(crate::pokemon::PokemonId(1)));

        let item_roles = encounter.options()[2].resolve_roles(&state, &mut rng).unwrap();
        assert_eq!(item_roles.primary, Some(crate::pokemon::PokemonId(2)));
    }

    #[test]
    fn test_berry_holder_can_still_give_other_items() {
        let encounter = delibirdy().unwrap();
        let mut state = run();
        state.party[1].held_items.clear();
        state.party[0].give_held_item(HeldItemKind::Leftovers, 1);
        let mut rng = SeedContext::new(11).rng();

        let roles = encounter.options()[2].resolve_roles(&state, &mut rng).unwrap();

        assert_eq!(roles.primary, Some(crate::pokemon::PokemonId(1)));
    }

    #[test]
    fn test_reviver_seed_counts_as_treat_only() {
        let encounter = delibirdy().unwrap();
        let mut state = run();
        for pokemon in &mut state.party {
            pokemon.held_items.clear();
        }
        state.party[1].give_held_item(HeldItemKind::ReviverSeed, 1);
        let mut rng = SeedContext::new(11).rng();

        assert!(encounter.options()[1].meets_requirements(&state, &mut rng));
        assert!(!encounter.options()[2].meets_requirements(&state, &mut rng));
    }

    #[test]
    fn test_gift_depends_on_payment() {
        assert_eq!(Payment::Money.gift(None), (ModifierKind::AmuletCoin, 5));
        assert_eq!(
            Payment::Treat.gift(Some(HeldItemKind::LumBerry)),
            (ModifierKind::CandyJar, 99)
        );
        assert_eq!(
            Payment::Treat.gift(Some(HeldItemKind::ReviverSeed)),
            (ModifierKind::BerryPouch, 3)
        );
        assert_eq!(
            Payment::OtherItem.gift(Some(HeldItemKind::Leftovers)),
            (ModifierKind::HealingCharm, 5)
        );
    }

    #[test]
    fn test_broke_party_cannot_spawn() {
        let encounter = delibirdy().unwrap();
        let mut state = run();
        state.money = 0;
        let mut rng = SeedContext::new(11).rng();
        assert!(!encounter.can_spawn(&state, &mut rng));
    }
}
