//! Eligibility predicates over the run and the party.
//!
//! A [`Requirement`] is either scene-scoped (wave, weather, money, ...) or
//! party-scoped. Only the party variant can narrow a pool of candidates, and
//! that capability is reached through [`Requirement::as_party`] rather than by
//! inspecting the value at runtime.

pub mod party;
pub mod scene;

pub use party::{PartyCriterion, PartyRequirement};
pub use scene::SceneRequirement;

use crate::errors::DefinitionResult;
use crate::pokemon::PartyPokemon;
use crate::scene::RunState;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive `[min, max]` bounds. A range with `min > max` is not an error:
/// it places no constraint at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InclusiveRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> InclusiveRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

impl<T: fmt::Display> fmt::Display for InclusiveRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// A named value a requirement contributes to an encounter's dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueToken {
    pub key: &'static str,
    pub value: String,
}

impl DialogueToken {
    pub fn new(key: &'static str, value: impl ToString) -> Self {
        Self {
            key,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Requirement {
    Scene(SceneRequirement),
    Party(PartyRequirement),
}

impl Requirement {
    /// Pure check against the run; safe to call any number of times.
    pub fn meets_requirement(&self, state: &RunState) -> bool {
        match self {
            Requirement::Scene(requirement) => requirement.meets_requirement(state),
            Requirement::Party(requirement) => requirement.meets_requirement(state),
        }
    }

    /// The party-narrowing capability, present only on party requirements.
    pub fn as_party(&self) -> Option<&PartyRequirement> {
        match self {
            Requirement::Party(requirement) => Some(requirement),
            Requirement::Scene(_) => None,
        }
    }

    pub fn is_inverted(&self) -> bool {
        match self {
            Requirement::Party(requirement) => requirement.is_inverted(),
            Requirement::Scene(_) => false,
        }
    }

    pub fn dialogue_token(
        &self,
        state: &RunState,
        pokemon: Option<&PartyPokemon>,
    ) -> Option<DialogueToken> {
        match self {
            Requirement::Scene(requirement) => requirement.dialogue_token(state),
            Requirement::Party(requirement) => requirement.dialogue_token(pokemon),
        }
    }

    pub fn validate(&self) -> DefinitionResult<()> {
        match self {
            Requirement::Scene(requirement) => requirement.validate(),
            Requirement::Party(requirement) => requirement.validate(),
        }
    }
}

impl From<SceneRequirement> for Requirement {
    fn from(requirement: SceneRequirement) -> Self {
        Requirement::Scene(requirement)
    }
}

impl From<PartyRequirement> for Requirement {
    fn from(requirement: PartyRequirement) -> Self {
        Requirement::Party(requirement)
    }
}
