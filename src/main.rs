use async_trait::async_trait;
use mystery_encounters::battle::{BattleSetup, EnemyCombatant, StandardBattleInitializer};
use mystery_encounters::catalog::all_encounters;
use mystery_encounters::dialogue::TemplateDialogue;
use mystery_encounters::pokemon::{PartyPokemon, PokemonId};
use mystery_encounters::rewards::{ExpAward, Reward, ShopConfig};
use mystery_encounters::services::{OptionView, PartyMemberView};
use mystery_encounters::{
    roll_tier, select_encounter, EncounterServices, EncounterSession, EncounterSettings,
    FieldService, FlowOutcome, HeldItemKind, Move, Presentation, RewardService, RunState,
    SeedContext, Species,
};
use std::error::Error;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const RUN_SEED: u64 = 0x5EED;

struct ConsolePresentation;

#[async_trait]
impl Presentation for ConsolePresentation {
    async fn show_text(&mut self, text: String) {
        println!("{text}");
    }

    async fn show_option_select(&mut self, options: Vec<OptionView>) {
        for view in options {
            let marker = if view.enabled { ' ' } else { 'x' };
            println!("  [{marker}] {}. {}", view.index + 1, view.label);
        }
    }

    async fn select_party_member(&mut self, members: Vec<PartyMemberView>) -> Option<PokemonId> {
        let picked = members.into_iter().find(|member| member.refusal.is_none())?;
        println!("  > {}", picked.name);
        Some(picked.id)
    }

    async fn select_from_list(&mut self, prompt: String, entries: Vec<String>) -> Option<usize> {
        println!("{prompt}");
        let first = entries.first()?;
        println!("  > {first}");
        Some(0)
    }
}

struct ConsoleField;

impl FieldService for ConsoleField {
    fn clear_enemy_field(&mut self) {}

    fn summon_enemy(&mut self, mut enemy: EnemyCombatant) {
        enemy.apply_post_summon_effect();
        println!("  A level {} {} appears!", enemy.level, enemy.species);
    }

    fn start_battle(&mut self, setup: BattleSetup) {
        println!("  Battle starts ({:?})", setup.variant);
    }
}

struct ConsoleRewards;

impl RewardService for ConsoleRewards {
    fn open_shop(&mut self, shop: &ShopConfig) {
        println!("  Shop opens: {shop:?}");
    }

    fn remove_pending_shop(&mut self) {}

    fn grant(&mut self, reward: &Reward) {
        println!("  Received {reward:?}");
    }

    fn clear_pending_grants(&mut self) {}

    fn grant_exp(&mut self, awards: &[ExpAward]) {
        for award in awards {
            println!("  Pokemon #{} gains {} exp", award.pokemon.0, award.exp);
        }
    }
}

fn demo_run() -> RunState {
    let mut run = RunState::new(
        vec![
            PartyPokemon::new(1, Species::Pikachu, 32)
                .with_nickname("Sparky")
                .with_held_item(HeldItemKind::SitrusBerry, 1),
            PartyPokemon::new(2, Species::Lapras, 35).with_moves(vec![Move::Surf, Move::IceBeam]),
            PartyPokemon::new(3, Species::Wingull, 30).with_moves(vec![Move::Fly]),
        ],
        42,
    );
    run.add_money(5_000);
    run
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings_path = Path::new("data/encounters.ron");
    let settings = if settings_path.exists() {
        EncounterSettings::load(settings_path)?
    } else {
        EncounterSettings::default()
    };

    let catalog = all_encounters()?;
    let mut run = demo_run();
    let mut rng = SeedContext::new(RUN_SEED).at_offset(run.wave_index as u64).rng();
    let tier = roll_tier(&run.encounters, &settings, &mut rng);
    let Some(definition) = select_encounter(&catalog, tier, &run, &mut rng) else {
        println!("No encounter can spawn on wave {}", run.wave_index);
        return Ok(());
    };

    let mut services = EncounterServices {
        presentation: Box::new(ConsolePresentation),
        dialogue: Box::new(TemplateDialogue::new()),
        field: Box::new(ConsoleField),
        battle: Box::new(StandardBattleInitializer),
        rewards: Box::new(ConsoleRewards),
    };

    println!("=== {} (wave {}) ===", definition.encounter_type(), run.wave_index);
    let mut session = EncounterSession::start(definition, &mut run, RUN_SEED, settings);
    session.show_intro(&mut services).await;
    let views = session.present_options(&run, &mut services).await;

    let Some(choice) = views.iter().find(|view| view.enabled) else {
        println!("No option is available");
        return Ok(());
    };
    println!("> {}", choice.label);
    match session.select_option(choice.index, &mut run, &mut services).await? {
        FlowOutcome::Completed => {
            session.conclude(&mut run, &mut services).await?;
        }
        FlowOutcome::Halted(step) => println!("Encounter stopped at {step:?}"),
    }

    println!("Money left: {}", run.money);
    Ok(())
}
