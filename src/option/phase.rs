//! Option lifecycle callbacks and the context they run against.

use crate::battle::{self, EnemyCombatant, EnemyPartyConfig};
use crate::encounter::{EncounterInstance, EncounterVariant};
use crate::errors::DefinitionResult;
use crate::option::RoleAssignment;
use crate::pokemon::{PartyPokemon, PokemonId};
use crate::rng::EncounterRng;
use crate::scene::RunState;
use crate::services::{EncounterServices, PartyMemberView};
use async_trait::async_trait;
use std::sync::Arc;

/// What a lifecycle callback asks the flow to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    Continue,
    /// Stop the phase sequence where it is. Nothing is rolled back.
    Halt,
}

impl From<bool> for PhaseOutcome {
    fn from(proceed: bool) -> Self {
        if proceed {
            PhaseOutcome::Continue
        } else {
            PhaseOutcome::Halt
        }
    }
}

impl From<()> for PhaseOutcome {
    fn from(_: ()) -> Self {
        PhaseOutcome::Continue
    }
}

/// Everything a lifecycle callback may read or mutate.
pub struct PhaseContext<'a> {
    pub run: &'a mut RunState,
    pub encounter: &'a mut EncounterInstance,
    pub rng: &'a mut EncounterRng,
    pub services: &'a mut EncounterServices,
}

impl<'a> PhaseContext<'a> {
    pub fn roles(&self) -> Option<&RoleAssignment> {
        self.encounter.roles.as_ref()
    }

    pub fn primary_pokemon(&self) -> Option<&PartyPokemon> {
        self.roles()?.primary_pokemon(&self.run.party)
    }

    pub fn primary_pokemon_mut(&mut self) -> Option<&mut PartyPokemon> {
        let id = self.encounter.roles.as_ref()?.primary?;
        self.run.pokemon_mut(id)
    }

    /// Resolves `key` against the encounter's tokens and shows it.
    pub async fn show_dialogue(&mut self, key: &str) {
        let text = self
            .services
            .dialogue
            .resolve(key, &self.encounter.dialogue_tokens);
        self.services.presentation.show_text(text).await;
    }

    /// Lets the player pick the primary member for the selected option.
    ///
    /// Members failing the option's primary requirements are offered with
    /// `refusal_key` as the reason. A valid pick replaces the resolved
    /// primary and its tokens. Returns `None` when the player backs out or
    /// picks a refused member.
    pub async fn select_primary_pokemon(&mut self, refusal_key: &str) -> Option<PokemonId> {
        let definition = Arc::clone(self.encounter.definition());
        let option = definition.option(self.encounter.selected_option?)?;
        let refusal = self
            .services
            .dialogue
            .resolve(refusal_key, &self.encounter.dialogue_tokens);
        let members: Vec<PartyMemberView> = self
            .run
            .party
            .iter()
            .map(|pokemon| PartyMemberView {
                id: pokemon.id,
                name: pokemon.name(),
                refusal: (!option.pokemon_meets_primary_requirements(pokemon)).then(|| refusal.clone()),
            })
            .collect();

        let picked = self.services.presentation.select_party_member(members.clone()).await?;
        match members.into_iter().find(|member| member.id == picked)?.refusal {
            Some(text) => {
                self.services.presentation.show_text(text).await;
                None
            }
            None => {
                if let Some(roles) = self.encounter.roles.as_mut() {
                    roles.primary = Some(picked);
                }
                self.encounter.set_selected_role_tokens(self.run);
                tracing::debug!(?picked, "primary member picked by the player");
                Some(picked)
            }
        }
    }

    /// Materializes `config` as the enemy side and starts the battle.
    pub fn init_battle(&mut self, config: &EnemyPartyConfig) -> DefinitionResult<Vec<EnemyCombatant>> {
        battle::materialize(config, self.run, self.encounter, self.rng, self.services)
    }

    pub fn leave_without_battle(&mut self) {
        self.encounter.variant = Some(EncounterVariant::NoBattle);
        tracing::debug!("encounter continues without a battle");
    }
}

/// One of the three option lifecycle callbacks.
///
/// Implement this directly for callbacks that await the presentation layer;
/// wrap plain closures with [`phase_fn`].
#[async_trait]
pub trait OptionPhase: Send + Sync {
    async fn run(&self, ctx: &mut PhaseContext<'_>) -> PhaseOutcome;
}

pub struct FnPhase<F>(F);

/// Adapts a synchronous closure into an [`OptionPhase`].
pub fn phase_fn<F>(f: F) -> FnPhase<F>
where
    F: Fn(&mut PhaseContext<'_>) -> PhaseOutcome + Send + Sync,
{
    FnPhase(f)
}

#[async_trait]
impl<F> OptionPhase for FnPhase<F>
where
    F: Fn(&mut PhaseContext<'_>) -> PhaseOutcome + Send + Sync,
{
    async fn run(&self, ctx: &mut PhaseContext<'_>) -> PhaseOutcome {
        (self.0)(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bool_and_unit_map_to_outcomes() {
        assert_eq!(PhaseOutcome::from(true), PhaseOutcome::Continue);
        assert_eq!(PhaseOutcome::from(false), PhaseOutcome::Halt);
        assert_eq!(PhaseOutcome::from(()), PhaseOutcome::Continue);
    }
}
