use crate::battle::{BattleSetup, EnemyCombatant, StandardBattleInitializer};
use crate::config::EncounterSettings;
use crate::dialogue::TemplateDialogue;
use crate::encounter::{EncounterInstance, MysteryEncounter};
use crate::flow::EncounterSession;
use crate::pokemon::PokemonId;
use crate::rewards::{ExpAward, Reward, ShopConfig};
use crate::scene::RunState;
use crate::services::{
    EncounterServices, FieldService, OptionView, PartyMemberView, Presentation, RewardService,
};
use async_trait::async_trait;
use schema::Species;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Everything the fake services observed, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Text(String),
    Menu(Vec<OptionView>),
    MemberPrompt(Vec<PartyMemberView>),
    ListPrompt(String, Vec<String>),
    FieldCleared,
    Summoned(EnemySummary),
    BattleStarted(BattleSetup),
    ShopOpened(ShopConfig),
    ShopRemoved,
    Granted(Reward),
    GrantsCleared,
    Exp(Vec<ExpAward>),
}

/// The parts of a summoned enemy tests assert on.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemySummary {
    pub species: Species,
    pub level: u32,
    pub boss_segments: u32,
    pub battle_effects: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn menus(&self) -> Vec<Vec<OptionView>> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Menu(views) => Some(views),
                _ => None,
            })
            .collect()
    }

    pub fn summoned(&self) -> Vec<EnemySummary> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Summoned(summary) => Some(summary),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|event| predicate(event)).count()
    }
}

/// Scripted answers for picker prompts. An empty queue picks the first
/// selectable member or the first entry.
#[derive(Debug, Clone, Default)]
pub struct Picks {
    members: Arc<Mutex<VecDeque<Option<PokemonId>>>>,
    entries: Arc<Mutex<VecDeque<Option<usize>>>>,
}

impl Picks {
    pub fn member(&self, pick: Option<PokemonId>) {
        self.members.lock().unwrap().push_back(pick);
    }

    pub fn entry(&self, pick: Option<usize>) {
        self.entries.lock().unwrap().push_back(pick);
    }
}

struct RecordingPresentation(EventLog, Picks);

#[async_trait]
impl Presentation for RecordingPresentation {
    async fn show_text(&mut self, text: String) {
        self.0.push(Event::Text(text));
    }

    async fn show_option_select(&mut self, options: Vec<OptionView>) {
        self.0.push(Event::Menu(options));
    }

    async fn select_party_member(&mut self, members: Vec<PartyMemberView>) -> Option<PokemonId> {
        let scripted = self.1.members.lock().unwrap().pop_front();
        let pick = scripted.unwrap_or_else(|| {
            members
                .iter()
                .find(|member| member.refusal.is_none())
                .map(|member| member.id)
        });
        self.0.push(Event::MemberPrompt(members));
        pick
    }

    async fn select_from_list(&mut self, prompt: String, entries: Vec<String>) -> Option<usize> {
        let scripted = self.1.entries.lock().unwrap().pop_front();
        let pick = scripted.unwrap_or_else(|| (!entries.is_empty()).then_some(0));
        self.0.push(Event::ListPrompt(prompt, entries));
        pick
    }
}

struct RecordingField(EventLog);

impl FieldService for RecordingField {
    fn clear_enemy_field(&mut self) {
        self.0.push(Event::FieldCleared);
    }

    fn summon_enemy(&mut self, mut enemy: EnemyCombatant) {
        enemy.apply_post_summon_effect();
        self.0.push(Event::Summoned(EnemySummary {
            species: enemy.species,
            level: enemy.level,
            boss_segments: enemy.boss_segments,
            battle_effects: enemy.battle_effects,
        }));
    }

    fn start_battle(&mut self, setup: BattleSetup) {
        self.0.push(Event::BattleStarted(setup));
    }
}

struct RecordingRewards(EventLog);

impl RewardService for RecordingRewards {
    fn open_shop(&mut self, shop: &ShopConfig) {
        self.0.push(Event::ShopOpened(shop.clone()));
    }

    fn remove_pending_shop(&mut self) {
        self.0.push(Event::ShopRemoved);
    }

    fn grant(&mut self, reward: &Reward) {
        self.0.push(Event::Granted(reward.clone()));
    }

    fn clear_pending_grants(&mut self) {
        self.0.push(Event::GrantsCleared);
    }

    fn grant_exp(&mut self, awards: &[ExpAward]) {
        self.0.push(Event::Exp(awards.to_vec()));
    }
}

pub struct Harness {
    pub services: EncounterServices,
    pub log: EventLog,
    pub picks: Picks,
}

/// Recording fakes around the standard dialogue provider and battle rules.
/// Dialogue keys without a template resolve to themselves.
pub fn harness() -> Harness {
    harness_with_dialogue(TemplateDialogue::new())
}

pub fn harness_with_dialogue(dialogue: TemplateDialogue) -> Harness {
    let log = EventLog::default();
    let picks = Picks::default();
    let services = EncounterServices {
        presentation: Box::new(RecordingPresentation(log.clone(), picks.clone())),
        dialogue: Box::new(dialogue),
        field: Box::new(RecordingField(log.clone())),
        battle: Box::new(StandardBattleInitializer),
        rewards: Box::new(RecordingRewards(log.clone())),
    };
    Harness { services, log, picks }
}

pub fn start(definition: MysteryEncounter, run: &mut RunState, run_seed: u64) -> EncounterSession {
    EncounterSession::start(Arc::new(definition), run, run_seed, EncounterSettings::default())
}

pub fn instance(definition: MysteryEncounter, wave_index: u32) -> EncounterInstance {
    EncounterInstance::new(
        Arc::new(definition),
        7,
        wave_index,
        &EncounterSettings::default(),
    )
}
