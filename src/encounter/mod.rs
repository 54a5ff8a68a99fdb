//! Encounter definitions: metadata, gating requirements and options.
//!
//! A [`MysteryEncounter`] is built once and shared behind an `Arc`. Anything
//! that changes while the player is inside an encounter lives on the
//! [`EncounterInstance`] created for that wave.

pub mod instance;
pub mod spawn;

pub use instance::EncounterInstance;
pub use spawn::{roll_for_encounter, roll_tier, select_encounter};

use crate::battle::EnemyPartyConfig;
use crate::dialogue::DialogueLine;
use crate::errors::{DefinitionError, DefinitionResult};
use crate::option::{resolve_roles, EncounterOption, Ineligibility, RoleAssignment};
use crate::requirements::{InclusiveRange, Requirement, SceneRequirement};
use crate::rng::EncounterRng;
use crate::scene::RunState;
use schema::EncounterType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Most options an encounter can present at once.
pub const MAX_OPTIONS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EncounterTier {
    Common,
    Uncommon,
    Rare,
    SuperRare,
    UltraRare,
}

impl EncounterTier {
    pub const ALL: [EncounterTier; 5] = [
        EncounterTier::Common,
        EncounterTier::Uncommon,
        EncounterTier::Rare,
        EncounterTier::SuperRare,
        EncounterTier::UltraRare,
    ];

    /// The next more common tier, used when a tier has nothing to spawn.
    pub fn lower(self) -> Option<EncounterTier> {
        match self {
            EncounterTier::Common => None,
            EncounterTier::Uncommon => Some(EncounterTier::Common),
            EncounterTier::Rare => Some(EncounterTier::Uncommon),
            EncounterTier::SuperRare => Some(EncounterTier::Rare),
            EncounterTier::UltraRare => Some(EncounterTier::SuperRare),
        }
    }
}

/// The kind of interaction an encounter ended up being.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterVariant {
    WildBattle,
    TrainerBattle,
    BossBattle,
    NoBattle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncounterDialogue {
    pub intro: Vec<DialogueLine>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub query: Option<String>,
    pub outro: Vec<DialogueLine>,
}

/// Sprite shown while the encounter is introduced. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntroVisual {
    pub sprite_key: String,
    pub is_pokemon: bool,
}

/// Runs once when an instance is created, under the instance's seed offset.
pub type InitHook = Box<dyn Fn(&mut RunState, &mut EncounterInstance, &mut EncounterRng) + Send + Sync>;

/// An option that currently passes its requirements, with the roles it
/// resolved to.
#[derive(Debug)]
pub struct EligibleOption<'a> {
    pub index: usize,
    pub option: &'a EncounterOption,
    pub roles: RoleAssignment,
}

pub struct MysteryEncounter {
    encounter_type: EncounterType,
    tier: EncounterTier,
    spawn_weight: u32,
    catch_allowed: bool,
    fleeing_allowed: bool,
    hide_intro_visuals: bool,
    max_allowed_encounters: Option<usize>,
    requirements: Vec<SceneRequirement>,
    primary_requirements: Vec<Requirement>,
    secondary_requirements: Vec<Requirement>,
    exclude_primary_from_secondary: bool,
    options: Vec<EncounterOption>,
    dialogue: EncounterDialogue,
    intro_visuals: Vec<IntroVisual>,
    enemy_party_configs: Vec<EnemyPartyConfig>,
    on_init: Option<InitHook>,
}

impl fmt::Debug for MysteryEncounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MysteryEncounter")
            .field("encounter_type", &self.encounter_type)
            .field("tier", &self.tier)
            .field("spawn_weight", &self.spawn_weight)
            .field("requirements", &self.requirements)
            .field("options", &self.options.len())
            .finish_non_exhaustive()
    }
}

impl MysteryEncounter {
    pub fn builder(encounter_type: EncounterType) -> MysteryEncounterBuilder {
        MysteryEncounterBuilder::new(encounter_type)
    }

    pub fn encounter_type(&self) -> EncounterType {
        self.encounter_type
    }

    pub fn tier(&self) -> EncounterTier {
        self.tier
    }

    pub fn spawn_weight(&self) -> u32 {
        self.spawn_weight
    }

    pub fn catch_allowed(&self) -> bool {
        self.catch_allowed
    }

    pub fn fleeing_allowed(&self) -> bool {
        self.fleeing_allowed
    }

    pub fn hide_intro_visuals(&self) -> bool {
        self.hide_intro_visuals
    }

    pub fn max_allowed_encounters(&self) -> Option<usize> {
        self.max_allowed_encounters
    }

    pub fn scene_requirements(&self) -> &[SceneRequirement] {
        &self.requirements
    }

    pub fn primary_requirements(&self) -> &[Requirement] {
        &self.primary_requirements
    }

    pub fn secondary_requirements(&self) -> &[Requirement] {
        &self.secondary_requirements
    }

    pub fn options(&self) -> &[EncounterOption] {
        &self.options
    }

    pub fn option(&self, index: usize) -> Option<&EncounterOption> {
        self.options.get(index)
    }

    pub fn dialogue(&self) -> &EncounterDialogue {
        &self.dialogue
    }

    pub fn intro_visuals(&self) -> &[IntroVisual] {
        &self.intro_visuals
    }

    pub fn enemy_party_configs(&self) -> &[EnemyPartyConfig] {
        &self.enemy_party_configs
    }

    pub(crate) fn on_init(&self) -> Option<&InitHook> {
        self.on_init.as_ref()
    }

    /// Whether this encounter may spawn: seen fewer times than allowed,
    /// every scene requirement met, then the encounter-level roles.
    pub fn meets_spawn_requirements(
        &self,
        state: &RunState,
        rng: &mut EncounterRng,
    ) -> Result<RoleAssignment, Ineligibility> {
        if let Some(max) = self.max_allowed_encounters {
            if state.encounters.times_seen(self.encounter_type) >= max {
                return Err(Ineligibility::AlreadyEncountered);
            }
        }
        if let Some(index) = self
            .requirements
            .iter()
            .position(|requirement| !requirement.meets_requirement(state))
        {
            tracing::debug!(encounter = %self.encounter_type, index, "scene requirement failed");
            return Err(Ineligibility::SceneRequirement { index });
        }
        resolve_roles(
            &self.primary_requirements,
            &self.secondary_requirements,
            self.exclude_primary_from_secondary,
            state,
            rng,
        )
    }

    pub fn can_spawn(&self, state: &RunState, rng: &mut EncounterRng) -> bool {
        self.meets_spawn_requirements(state, rng).is_ok()
    }

    /// Options whose requirements currently pass.
    pub fn eligible_options(&self, state: &RunState, rng: &mut EncounterRng) -> Vec<EligibleOption<'_>> {
        self.options
            .iter()
            .enumerate()
            .filter_map(|(index, option)| {
                let roles = option.resolve_roles(state, rng).ok()?;
                Some(EligibleOption {
                    index,
                    option,
                    roles,
                })
            })
            .collect()
    }

    fn validate(&self) -> DefinitionResult<()> {
        if self.options.is_empty() {
            return Err(DefinitionError::NoOptions(self.encounter_type));
        }
        if self.options.len() > MAX_OPTIONS {
            return Err(DefinitionError::TooManyOptions {
                encounter: self.encounter_type,
                count: self.options.len(),
            });
        }
        for requirement in &self.requirements {
            requirement.validate()?;
        }
        for requirement in self
            .primary_requirements
            .iter()
            .chain(&self.secondary_requirements)
        {
            requirement.validate()?;
        }
        for config in &self.enemy_party_configs {
            config.validate()?;
        }
        Ok(())
    }
}

pub struct MysteryEncounterBuilder {
    encounter: MysteryEncounter,
}

impl MysteryEncounterBuilder {
    fn new(encounter_type: EncounterType) -> Self {
        Self {
            encounter: MysteryEncounter {
                encounter_type,
                tier: EncounterTier::Common,
                spawn_weight: 1,
                catch_allowed: false,
                fleeing_allowed: true,
                hide_intro_visuals: true,
                max_allowed_encounters: Some(1),
                requirements: Vec::new(),
                primary_requirements: Vec::new(),
                secondary_requirements: Vec::new(),
                exclude_primary_from_secondary: false,
                options: Vec::new(),
                dialogue: EncounterDialogue::default(),
                intro_visuals: Vec::new(),
                enemy_party_configs: Vec::new(),
                on_init: None,
            },
        }
    }

    pub fn with_encounter_tier(mut self, tier: EncounterTier) -> Self {
        self.encounter.tier = tier;
        self
    }

    pub fn with_spawn_weight(mut self, weight: u32) -> Self {
        self.encounter.spawn_weight = weight;
        self
    }

    pub fn with_catch_allowed(mut self, allowed: bool) -> Self {
        self.encounter.catch_allowed = allowed;
        self
    }

    pub fn with_fleeing_allowed(mut self, allowed: bool) -> Self {
        self.encounter.fleeing_allowed = allowed;
        self
    }

    pub fn with_hide_intro_visuals(mut self, hide: bool) -> Self {
        self.encounter.hide_intro_visuals = hide;
        self
    }

    /// `None` lets the encounter spawn any number of times per run.
    pub fn with_max_allowed_encounters(mut self, max: Option<usize>) -> Self {
        self.encounter.max_allowed_encounters = max;
        self
    }

    pub fn with_scene_requirement(mut self, requirement: SceneRequirement) -> Self {
        self.encounter.requirements.push(requirement);
        self
    }

    pub fn with_scene_wave_range_requirement(self, min: u32, max: u32) -> Self {
        self.with_scene_requirement(SceneRequirement::WaveRange(InclusiveRange::new(min, max)))
    }

    pub fn with_scene_party_size_requirement(self, min: usize, max: usize, exclude_fainted: bool) -> Self {
        self.with_scene_requirement(SceneRequirement::party_size(min, max, exclude_fainted))
    }

    pub fn with_primary_pokemon_requirement(mut self, requirement: impl Into<Requirement>) -> Self {
        self.encounter.primary_requirements.push(requirement.into());
        self
    }

    pub fn with_secondary_pokemon_requirement(
        mut self,
        requirement: impl Into<Requirement>,
        exclude_primary: bool,
    ) -> Self {
        self.encounter.secondary_requirements.push(requirement.into());
        self.encounter.exclude_primary_from_secondary = exclude_primary;
        self
    }

    pub fn with_option(mut self, option: EncounterOption) -> Self {
        self.encounter.options.push(option);
        self
    }

    pub fn with_intro_dialogue(mut self, lines: Vec<DialogueLine>) -> Self {
        self.encounter.dialogue.intro = lines;
        self
    }

    pub fn with_title(mut self, key: &str) -> Self {
        self.encounter.dialogue.title = Some(key.to_string());
        self
    }

    pub fn with_description(mut self, key: &str) -> Self {
        self.encounter.dialogue.description = Some(key.to_string());
        self
    }

    pub fn with_query(mut self, key: &str) -> Self {
        self.encounter.dialogue.query = Some(key.to_string());
        self
    }

    pub fn with_outro_dialogue(mut self, lines: Vec<DialogueLine>) -> Self {
        self.encounter.dialogue.outro = lines;
        self
    }

    pub fn with_intro_visual(mut self, sprite_key: &str, is_pokemon: bool) -> Self {
        self.encounter.intro_visuals.push(IntroVisual {
            sprite_key: sprite_key.to_string(),
            is_pokemon,
        });
        self
    }

    pub fn with_enemy_party_config(mut self, config: EnemyPartyConfig) -> Self {
        self.encounter.enemy_party_configs.push(config);
        self
    }

    pub fn with_on_init(
        mut self,
        hook: impl Fn(&mut RunState, &mut EncounterInstance, &mut EncounterRng) + Send + Sync + 'static,
    ) -> Self {
        self.encounter.on_init = Some(Box::new(hook));
        self
    }

    pub fn build(self) -> DefinitionResult<MysteryEncounter> {
        self.encounter.validate()?;
        Ok(self.encounter)
    }
}
