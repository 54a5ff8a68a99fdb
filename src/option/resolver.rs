//! Assigns party members to an option's primary and secondary roles.

use crate::pokemon::{PartyPokemon, PokemonId};
use crate::requirements::Requirement;
use crate::rng::EncounterRng;
use crate::scene::RunState;
use serde::{Deserialize, Serialize};

/// The outcome of a successful role resolution.
///
/// `primary` is `None` only when no primary requirements were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub primary: Option<PokemonId>,
    pub secondary: Vec<PokemonId>,
}

impl RoleAssignment {
    pub fn primary_pokemon<'a>(&self, party: &'a [PartyPokemon]) -> Option<&'a PartyPokemon> {
        let id = self.primary?;
        party.iter().find(|p| p.id == id)
    }

    pub fn secondary_pokemon<'a>(&self, party: &'a [PartyPokemon]) -> Vec<&'a PartyPokemon> {
        party
            .iter()
            .filter(|p| self.secondary.contains(&p.id))
            .collect()
    }
}

/// Why an option (or an encounter) cannot be selected right now. This is an
/// expected outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    /// The encounter has already been seen as often as it may be this run.
    AlreadyEncountered,
    SceneRequirement { index: usize },
    PrimaryRequirement { index: usize },
    SecondaryRequirement { index: usize },
    /// Every primary requirement passed on its own but no member satisfies all.
    NoQualifiedPrimary,
    /// Every qualified primary is also the only secondary candidate.
    OverlapCollapsesSecondary,
}

/// Narrows the whole party through `requirements` in order. Scene-scoped
/// entries gate but do not narrow. Returns the index of the first failing
/// requirement on failure.
fn narrow_party<'a>(
    requirements: &[Requirement],
    state: &'a RunState,
) -> Result<Vec<&'a PartyPokemon>, usize> {
    let mut qualified: Vec<&PartyPokemon> = state.party.iter().collect();
    for (index, requirement) in requirements.iter().enumerate() {
        if !requirement.meets_requirement(state) {
            return Err(index);
        }
        if let Some(party_requirement) = requirement.as_party() {
            qualified = party_requirement.query_party(qualified);
        }
    }
    Ok(qualified)
}

/// Computes the secondary pool. With no secondary requirements the pool is
/// empty and resolution continues.
pub fn resolve_secondary(
    requirements: &[Requirement],
    state: &RunState,
) -> Result<Vec<PokemonId>, Ineligibility> {
    if requirements.is_empty() {
        return Ok(Vec::new());
    }
    let pool = narrow_party(requirements, state)
        .map_err(|index| Ineligibility::SecondaryRequirement { index })?;
    Ok(pool.into_iter().map(|p| p.id).collect())
}

/// Resolves both roles. The secondary pass runs first because the primary
/// pick consults the secondary pool when `exclude_primary_from_secondary`
/// is set.
pub fn resolve_roles(
    primary_requirements: &[Requirement],
    secondary_requirements: &[Requirement],
    exclude_primary_from_secondary: bool,
    state: &RunState,
    rng: &mut EncounterRng,
) -> Result<RoleAssignment, Ineligibility> {
    let mut secondary = resolve_secondary(secondary_requirements, state)?;

    if primary_requirements.is_empty() {
        return Ok(RoleAssignment {
            primary: None,
            secondary,
        });
    }

    let qualified: Vec<PokemonId> = narrow_party(primary_requirements, state)
        .map_err(|index| Ineligibility::PrimaryRequirement { index })?
        .into_iter()
        .map(|p| p.id)
        .collect();
    if qualified.is_empty() {
        return Err(Ineligibility::NoQualifiedPrimary);
    }

    let primary = if exclude_primary_from_secondary && !secondary.is_empty() {
        let (overlapping, non_overlapping): (Vec<PokemonId>, Vec<PokemonId>) =
            qualified.iter().copied().partition(|id| secondary.contains(id));

        if let Some(pick) = rng.pick(&non_overlapping, "primary pokemon") {
            *pick
        } else if overlapping.len() > 1 || secondary.len() - overlapping.len() >= 1 {
            let Some(pick) = rng.pick(&overlapping, "overlapping primary pokemon").copied() else {
                return Err(Ineligibility::NoQualifiedPrimary);
            };
            secondary.retain(|id| *id != pick);
            pick
        } else {
            tracing::debug!(
                ?qualified,
                ?secondary,
                "every primary candidate is the last secondary candidate"
            );
            return Err(Ineligibility::OverlapCollapsesSecondary);
        }
    } else {
        match rng.pick(&qualified, "primary pokemon") {
            Some(pick) => *pick,
            None => return Err(Ineligibility::NoQualifiedPrimary),
        }
    };

    tracing::debug!(%primary, ?secondary, "resolved option roles");
    Ok(RoleAssignment {
        primary: Some(primary),
        secondary,
    })
}
