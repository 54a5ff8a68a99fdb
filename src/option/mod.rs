//! A selectable branch of an encounter.
//!
//! Options are frozen once built and shared by every run that meets the
//! encounter. Per-run role picks never live on the option: they are returned
//! as a [`RoleAssignment`] and stored on the encounter instance instead.

pub mod phase;
pub mod resolver;

pub use phase::{phase_fn, OptionPhase, PhaseContext, PhaseOutcome};
pub use resolver::{resolve_roles, Ineligibility, RoleAssignment};

use crate::dialogue::DialogueLine;
use crate::errors::DefinitionResult;
use crate::pokemon::PartyPokemon;
use crate::requirements::{Requirement, SceneRequirement};
use crate::rng::EncounterRng;
use crate::scene::RunState;
use std::fmt;

/// How the option-select menu draws an option.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionMode {
    /// Always drawn normally; selecting it while unmet is refused.
    #[default]
    Default,
    /// Highlighted when it has requirements and meets them.
    DefaultOrSpecial,
    /// Greyed out while unmet.
    DisabledOrDefault,
    /// Greyed out while unmet, highlighted when met.
    DisabledOrSpecial,
}

impl OptionMode {
    pub fn greys_out_when_unmet(self) -> bool {
        matches!(self, OptionMode::DisabledOrDefault | OptionMode::DisabledOrSpecial)
    }

    pub fn highlights_when_met(self) -> bool {
        matches!(self, OptionMode::DefaultOrSpecial | OptionMode::DisabledOrSpecial)
    }
}

/// Dialogue keys the presentation layer needs for one option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionDialogue {
    pub button_label: Option<String>,
    pub disabled_button_label: Option<String>,
    pub button_tooltip: Option<String>,
    pub disabled_button_tooltip: Option<String>,
    /// Shown between the pre-option phase and the option phase.
    pub selected: Vec<DialogueLine>,
}

pub struct EncounterOption {
    mode: OptionMode,
    has_dex_progress: bool,
    requirements: Vec<SceneRequirement>,
    primary_requirements: Vec<Requirement>,
    secondary_requirements: Vec<Requirement>,
    exclude_primary_from_secondary: bool,
    dialogue: OptionDialogue,
    pre_option_phase: Option<Box<dyn OptionPhase>>,
    option_phase: Option<Box<dyn OptionPhase>>,
    post_option_phase: Option<Box<dyn OptionPhase>>,
}

impl fmt::Debug for EncounterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncounterOption")
            .field("mode", &self.mode)
            .field("requirements", &self.requirements)
            .field("primary_requirements", &self.primary_requirements)
            .field("secondary_requirements", &self.secondary_requirements)
            .field("exclude_primary_from_secondary", &self.exclude_primary_from_secondary)
            .field("actionable", &self.is_actionable())
            .finish_non_exhaustive()
    }
}

impl EncounterOption {
    pub fn builder() -> EncounterOptionBuilder {
        EncounterOptionBuilder::default()
    }

    pub fn mode(&self) -> OptionMode {
        self.mode
    }

    pub fn has_dex_progress(&self) -> bool {
        self.has_dex_progress
    }

    pub fn dialogue(&self) -> &OptionDialogue {
        &self.dialogue
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

    pub fn has_requirements(&self) -> bool {
        !self.requirements.is_empty()
            || !self.primary_requirements.is_empty()
            || !self.secondary_requirements.is_empty()
    }

    /// Only options with an option phase can be acted on.
    pub fn is_actionable(&self) -> bool {
        self.option_phase.is_some()
    }

    pub fn pre_option_phase(&self) -> Option<&dyn OptionPhase> {
        self.pre_option_phase.as_deref()
    }

    pub fn option_phase(&self) -> Option<&dyn OptionPhase> {
        self.option_phase.as_deref()
    }

    pub fn post_option_phase(&self) -> Option<&dyn OptionPhase> {
        self.post_option_phase.as_deref()
    }

    /// Scene requirements (AND), then the secondary and primary passes.
    pub fn resolve_roles(
        &self,
        state: &RunState,
        rng: &mut EncounterRng,
    ) -> Result<RoleAssignment, Ineligibility> {
        if let Some(index) = self
            .requirements
            .iter()
            .position(|requirement| !requirement.meets_requirement(state))
        {
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

    pub fn meets_requirements(&self, state: &RunState, rng: &mut EncounterRng) -> bool {
        self.resolve_roles(state, rng).is_ok()
    }

    /// Whether `pokemon` on its own passes every party-scoped primary
    /// requirement. Used by sub-menus that let the player pick the primary.
    pub fn pokemon_meets_primary_requirements(&self, pokemon: &PartyPokemon) -> bool {
        self.primary_requirements
            .iter()
            .filter_map(Requirement::as_party)
            .all(|requirement| requirement.matches(pokemon))
    }

    fn validate(&self) -> DefinitionResult<()> {
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
        Ok(())
    }
}

pub struct EncounterOptionBuilder {
    option: EncounterOption,
}

impl Default for EncounterOptionBuilder {
    fn default() -> Self {
        Self {
            option: EncounterOption {
                mode: OptionMode::Default,
                has_dex_progress: false,
                requirements: Vec::new(),
                primary_requirements: Vec::new(),
                secondary_requirements: Vec::new(),
                exclude_primary_from_secondary: false,
                dialogue: OptionDialogue::default(),
                pre_option_phase: None,
                option_phase: None,
                post_option_phase: None,
            },
        }
    }
}

impl EncounterOptionBuilder {
    pub fn with_mode(mut self, mode: OptionMode) -> Self {
        self.option.mode = mode;
        self
    }

    pub fn with_dex_progress(mut self, has_dex_progress: bool) -> Self {
        self.option.has_dex_progress = has_dex_progress;
        self
    }

    pub fn with_scene_requirement(mut self, requirement: SceneRequirement) -> Self {
        self.option.requirements.push(requirement);
        self
    }

    pub fn with_scene_money_requirement(self, required_money: u64, scaling_multiplier: f64) -> Self {
        self.with_scene_requirement(SceneRequirement::money(required_money, scaling_multiplier))
    }

    pub fn with_primary_pokemon_requirement(mut self, requirement: impl Into<Requirement>) -> Self {
        self.option.primary_requirements.push(requirement.into());
        self
    }

    /// Adds a secondary requirement. `exclude_primary` keeps the primary out
    /// of the secondary pool when possible.
    pub fn with_secondary_pokemon_requirement(
        mut self,
        requirement: impl Into<Requirement>,
        exclude_primary: bool,
    ) -> Self {
        self.option.secondary_requirements.push(requirement.into());
        self.option.exclude_primary_from_secondary = exclude_primary;
        self
    }

    pub fn with_dialogue(mut self, dialogue: OptionDialogue) -> Self {
        self.option.dialogue = dialogue;
        self
    }

    pub fn with_pre_option_phase(mut self, phase: impl OptionPhase + 'static) -> Self {
        self.option.pre_option_phase = Some(Box::new(phase));
        self
    }

    pub fn with_option_phase(mut self, phase: impl OptionPhase + 'static) -> Self {
        self.option.option_phase = Some(Box::new(phase));
        self
    }

    pub fn with_post_option_phase(mut self, phase: impl OptionPhase + 'static) -> Self {
        self.option.post_option_phase = Some(Box::new(phase));
        self
    }

    pub fn build(self) -> DefinitionResult<EncounterOption> {
        self.option.validate()?;
        Ok(self.option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DefinitionError;
    use crate::pokemon::PokemonId;
    use crate::requirements::{InclusiveRange, PartyCriterion, PartyRequirement};
    use crate::rng::SeedContext;
    use pretty_assertions::assert_eq;
    use schema::Species;

    fn pikachu_option() -> EncounterOption {
        EncounterOption::builder()
            .with_primary_pokemon_requirement(PartyRequirement::new(PartyCriterion::Species(vec![
                Species::Pikachu,
            ])))
            .with_option_phase(phase_fn(|_ctx| PhaseOutcome::Continue))
            .build()
            .unwrap()
    }

    fn three_member_run() -> RunState {
        RunState::new(
            vec![
                PartyPokemon::new(1, Species::Eevee, 20),
                PartyPokemon::new(2, Species::Pikachu, 20),
                PartyPokemon::new(3, Species::Snorlax, 20),
            ],
            40,
        )
    }

    #[test]
    fn test_pikachu_option_resolves_single_candidate() {
        let option = pikachu_option();
        let state = three_member_run();
        let mut rng = SeedContext::new(77).at_offset(40_000).rng();
        assert!(option.meets_requirements(&state, &mut rng));
        let roles = option.resolve_roles(&state, &mut rng).unwrap();
        assert_eq!(roles.primary, Some(PokemonId(2)));
        assert!(roles.secondary.is_empty());
        assert_eq!(
            roles.primary_pokemon(&state.party).map(|p| p.species),
            Some(Species::Pikachu)
        );
    }

    #[test]
    fn test_scene_requirement_short_circuits() {
        let option = EncounterOption::builder()
            .with_scene_requirement(SceneRequirement::WaveRange(InclusiveRange::new(50, 60)))
            .with_primary_pokemon_requirement(PartyRequirement::new(PartyCriterion::Species(vec![
                Species::Pikachu,
            ])))
            .build()
            .unwrap();
        let mut rng = SeedContext::new(1).rng();
        assert_eq!(
            option.resolve_roles(&three_member_run(), &mut rng),
            Err(Ineligibility::SceneRequirement { index: 0 })
        );
    }

    #[test]
    fn test_evaluation_leaves_option_untouched() {
        let option = pikachu_option();
        let before = format!("{option:?}");
        let mut state = three_member_run();
        let mut rng = SeedContext::new(1).rng();
        assert!(option.meets_requirements(&state, &mut rng));
        state.remove_party_member(PokemonId(2));
        assert!(!option.meets_requirements(&state, &mut rng));
        assert_eq!(format!("{option:?}"), before);
    }

    #[test]
    fn test_pokemon_meets_primary_requirements() {
        let option = pikachu_option();
        let state = three_member_run();
        assert!(option.pokemon_meets_primary_requirements(&state.party[1]));
        assert!(!option.pokemon_meets_primary_requirements(&state.party[0]));
    }

    #[test]
    fn test_option_without_phase_is_not_actionable() {
        let option = EncounterOption::builder().build().unwrap();
        assert!(!option.is_actionable());
        assert!(!option.has_requirements());
        assert!(pikachu_option().is_actionable());
    }

    #[test]
    fn test_build_rejects_zero_modulus() {
        let result = EncounterOption::builder()
            .with_scene_requirement(SceneRequirement::WaveModulus {
                modulus: 0,
                remainders: vec![],
            })
            .build();
        assert_eq!(result.err(), Some(DefinitionError::ZeroModulus));
    }
}
