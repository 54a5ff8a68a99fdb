use super::{DialogueToken, InclusiveRange};
use crate::errors::DefinitionResult;
use crate::pokemon::PartyPokemon;
use crate::scene::RunState;
use schema::{
    Ability, EvolutionItem, FormChangeItem, HeldItemKind, Move, Nature, PokemonType, Species,
    StatusEffect,
};

/// What a party member is tested for. List criteria match when any listed
/// value applies to the member; range criteria use inclusive bounds.
#[derive(Debug, Clone, PartialEq)]
pub enum PartyCriterion {
    Species(Vec<Species>),
    Nature(Vec<Nature>),
    Type(Vec<PokemonType>),
    Move(Vec<Move>),
    /// Learnable by TM and not already known.
    CompatibleMove(Vec<Move>),
    Ability(Vec<Ability>),
    /// `StatusEffect::None` matches members with no status.
    Status(Vec<StatusEffect>),
    FormChangeItem(Vec<FormChangeItem>),
    EvolutionItem(Vec<EvolutionItem>),
    HeldItem(Vec<HeldItemKind>),
    /// Holds a type-boosting item for one of the listed types.
    AttackTypeBooster(Vec<PokemonType>),
    Level(InclusiveRange<u32>),
    Friendship(InclusiveRange<u8>),
    /// Current HP over max HP, in `0.0..=1.0`.
    HealthRatio(InclusiveRange<f64>),
    Weight(InclusiveRange<f64>),
}

impl PartyCriterion {
    /// `None` for list criteria, `Some(valid)` for range criteria.
    fn range_validity(&self) -> Option<bool> {
        match self {
            PartyCriterion::Level(range) => Some(range.is_valid()),
            PartyCriterion::Friendship(range) => Some(range.is_valid()),
            PartyCriterion::HealthRatio(range) => Some(range.is_valid()),
            PartyCriterion::Weight(range) => Some(range.is_valid()),
            _ => None,
        }
    }

    fn places_no_constraint(&self) -> bool {
        self.range_validity() == Some(false)
    }

    fn matches(&self, pokemon: &PartyPokemon) -> bool {
        match self {
            PartyCriterion::Species(species) => species.contains(&pokemon.species),
            PartyCriterion::Nature(natures) => natures.contains(&pokemon.nature),
            PartyCriterion::Type(types) => types.iter().any(|t| pokemon.has_type(*t)),
            PartyCriterion::Move(moves) => moves.iter().any(|m| pokemon.knows_move(*m)),
            PartyCriterion::CompatibleMove(moves) => {
                moves.iter().any(|m| pokemon.can_learn_by_tm(*m))
            }
            PartyCriterion::Ability(abilities) => {
                abilities.iter().any(|a| pokemon.has_ability(*a))
            }
            PartyCriterion::Status(statuses) => statuses.contains(&pokemon.status_effect()),
            PartyCriterion::FormChangeItem(items) => {
                items.iter().any(|i| pokemon.can_change_form_with(*i))
            }
            PartyCriterion::EvolutionItem(items) => {
                items.iter().any(|i| pokemon.can_evolve_with(*i))
            }
            PartyCriterion::HeldItem(items) => items.iter().any(|i| pokemon.holds(*i)),
            PartyCriterion::AttackTypeBooster(types) => pokemon
                .boosted_attack_types()
                .any(|boosted| types.contains(&boosted)),
            PartyCriterion::Level(range) => range.contains(pokemon.level),
            PartyCriterion::Friendship(range) => range.contains(pokemon.friendship),
            PartyCriterion::HealthRatio(range) => range.contains(pokemon.health_ratio()),
            PartyCriterion::Weight(range) => range.contains(pokemon.species_data().weight_kg),
        }
    }

    fn token(&self, pokemon: &PartyPokemon) -> DialogueToken {
        fn first_match<T: Copy + ToString>(
            values: &[T],
            is_match: impl Fn(T) -> bool,
        ) -> String {
            values
                .iter()
                .copied()
                .find(|v| is_match(*v))
                .or_else(|| values.first().copied())
                .map(|v| v.to_string())
                .unwrap_or_default()
        }

        match self {
            PartyCriterion::Species(_) => DialogueToken::new("species", pokemon.species),
            PartyCriterion::Nature(_) => DialogueToken::new("nature", pokemon.nature),
            PartyCriterion::Type(types) => {
                DialogueToken::new("type", first_match(types, |t| pokemon.has_type(t)))
            }
            PartyCriterion::Move(moves) => {
                DialogueToken::new("move", first_match(moves, |m| pokemon.knows_move(m)))
            }
            PartyCriterion::CompatibleMove(moves) => DialogueToken::new(
                "compatibleMove",
                first_match(moves, |m| pokemon.can_learn_by_tm(m)),
            ),
            PartyCriterion::Ability(abilities) => DialogueToken::new(
                "ability",
                first_match(abilities, |a| pokemon.has_ability(a)),
            ),
            PartyCriterion::Status(_) => DialogueToken::new("status", pokemon.status_effect()),
            PartyCriterion::FormChangeItem(items) => DialogueToken::new(
                "formChangeItem",
                first_match(items, |i| pokemon.can_change_form_with(i)),
            ),
            PartyCriterion::EvolutionItem(items) => DialogueToken::new(
                "evolutionItem",
                first_match(items, |i| pokemon.can_evolve_with(i)),
            ),
            PartyCriterion::HeldItem(items) => {
                DialogueToken::new("heldItem", first_match(items, |i| pokemon.holds(i)))
            }
            PartyCriterion::AttackTypeBooster(types) => {
                let held = pokemon
                    .held_items
                    .iter()
                    .find(|item| item.kind.boosted_type().is_some_and(|t| types.contains(&t)))
                    .map(|item| item.kind.to_string())
                    .unwrap_or_default();
                DialogueToken::new("heldItem", held)
            }
            PartyCriterion::Level(_) => DialogueToken::new("level", pokemon.level),
            PartyCriterion::Friendship(_) => DialogueToken::new("friendship", pokemon.friendship),
            PartyCriterion::HealthRatio(_) => DialogueToken::new(
                "healthRatio",
                format!("{}%", (pokemon.health_ratio() * 100.0).floor()),
            ),
            PartyCriterion::Weight(_) => {
                DialogueToken::new("weight", pokemon.species_data().weight_kg)
            }
        }
    }
}

/// A requirement over individual party members.
///
/// `meets_requirement` holds when at least `min_number_of_pokemon` members are
/// returned by [`PartyRequirement::query_party`].
#[derive(Debug, Clone, PartialEq)]
pub struct PartyRequirement {
    criterion: PartyCriterion,
    min_number_of_pokemon: usize,
    invert_query: bool,
    exclude_fainted: bool,
}

impl PartyRequirement {
    /// Requires one matching member. Type requirements skip fainted members
    /// by default, every other criterion considers the whole party.
    pub fn new(criterion: PartyCriterion) -> Self {
        let exclude_fainted = matches!(criterion, PartyCriterion::Type(_));
        Self {
            criterion,
            min_number_of_pokemon: 1,
            invert_query: false,
            exclude_fainted,
        }
    }

    pub fn min_pokemon(mut self, count: usize) -> Self {
        self.min_number_of_pokemon = count;
        self
    }

    /// Match members for which none of the listed values apply.
    pub fn inverted(mut self) -> Self {
        self.invert_query = true;
        self
    }

    pub fn exclude_fainted(mut self, exclude: bool) -> Self {
        self.exclude_fainted = exclude;
        self
    }

    pub fn criterion(&self) -> &PartyCriterion {
        &self.criterion
    }

    pub fn min_number_of_pokemon(&self) -> usize {
        self.min_number_of_pokemon
    }

    pub fn is_inverted(&self) -> bool {
        self.invert_query
    }

    /// Whether a single member would be returned by a party query.
    pub fn matches(&self, pokemon: &PartyPokemon) -> bool {
        if self.exclude_fainted && pokemon.is_fainted() {
            return false;
        }
        if self.criterion.places_no_constraint() {
            return true;
        }
        self.criterion.matches(pokemon) != self.invert_query
    }

    /// The members of `party` this requirement selects, in party order.
    pub fn query_party<'a>(
        &self,
        party: impl IntoIterator<Item = &'a PartyPokemon>,
    ) -> Vec<&'a PartyPokemon> {
        party.into_iter().filter(|p| self.matches(p)).collect()
    }

    pub fn meets_requirement(&self, state: &RunState) -> bool {
        if self.criterion.places_no_constraint() {
            return true;
        }
        if state.party.is_empty() {
            return false;
        }
        let matched = self.query_party(&state.party).len();
        let passed = matched >= self.min_number_of_pokemon;
        if !passed {
            tracing::debug!(
                criterion = ?self.criterion,
                matched,
                required = self.min_number_of_pokemon,
                "party requirement not met"
            );
        }
        passed
    }

    /// Token describing what `pokemon` matched. Inverted requirements have
    /// nothing meaningful to say and yield no token.
    pub fn dialogue_token(&self, pokemon: Option<&PartyPokemon>) -> Option<DialogueToken> {
        if self.invert_query {
            return None;
        }
        pokemon.map(|p| self.criterion.token(p))
    }

    pub fn validate(&self) -> DefinitionResult<()> {
        if self.criterion.places_no_constraint() {
            tracing::warn!(criterion = ?self.criterion, "range requirement has min > max and places no constraint");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn mixed_party() -> Vec<PartyPokemon> {
        vec![
            PartyPokemon::new(1, Species::Pikachu, 12)
                .with_nature(Nature::Timid)
                .with_ability(Ability::Static)
                .with_moves(vec![Move::ThunderShock, Move::Charm])
                .with_held_item(HeldItemKind::Magnet, 1),
            PartyPokemon::new(2, Species::Lapras, 35)
                .with_moves(vec![Move::Surf, Move::IceBeam])
                .with_compatible_tms(vec![Move::Surf, Move::Dive])
                .with_held_item(HeldItemKind::Leftovers, 1)
                .with_status(StatusEffect::Paralysis),
            PartyPokemon::new(3, Species::Charizard, 40)
                .with_ability(Ability::Blaze)
                .with_friendship(200)
                .with_hp(20),
            PartyPokemon::new(4, Species::Eevee, 8).with_hp(0),
        ]
    }

    fn ids(members: &[&PartyPokemon]) -> Vec<u32> {
        members.iter().map(|p| p.id.0).collect()
    }

    #[rstest]
    #[case(PartyCriterion::Species(vec![Species::Pikachu, Species::Eevee]), vec![1, 4])]
    #[case(PartyCriterion::Nature(vec![Nature::Timid]), vec![1])]
    #[case(PartyCriterion::Move(vec![Move::Surf, Move::Charm]), vec![1, 2])]
    #[case(PartyCriterion::CompatibleMove(vec![Move::Surf, Move::Dive]), vec![2])]
    #[case(PartyCriterion::Ability(vec![Ability::Blaze]), vec![3])]
    #[case(PartyCriterion::Status(vec![StatusEffect::None]), vec![1, 3, 4])]
    #[case(PartyCriterion::Status(vec![StatusEffect::Paralysis]), vec![2])]
    #[case(PartyCriterion::EvolutionItem(vec![EvolutionItem::ThunderStone]), vec![1, 4])]
    #[case(PartyCriterion::FormChangeItem(vec![FormChangeItem::CharizarditeY]), vec![3])]
    #[case(PartyCriterion::HeldItem(vec![HeldItemKind::Leftovers]), vec![2])]
    #[case(PartyCriterion::AttackTypeBooster(vec![PokemonType::Electric]), vec![1])]
    #[case(PartyCriterion::Level(InclusiveRange::new(10, 35)), vec![1, 2])]
    #[case(PartyCriterion::Friendship(InclusiveRange::new(150, 255)), vec![3])]
    #[case(PartyCriterion::HealthRatio(InclusiveRange::new(0.0, 0.5)), vec![3, 4])]
    #[case(PartyCriterion::Weight(InclusiveRange::new(50.0, 250.0)), vec![2, 3])]
    fn test_query_party_selects_matching_members(
        #[case] criterion: PartyCriterion,
        #[case] expected: Vec<u32>,
    ) {
        let party = mixed_party();
        let requirement = PartyRequirement::new(criterion);
        assert_eq!(ids(&requirement.query_party(&party)), expected);
    }

    #[test]
    fn test_type_requirement_skips_fainted_by_default() {
        let party = mixed_party();
        let requirement = PartyRequirement::new(PartyCriterion::Type(vec![PokemonType::Normal]));
        assert!(requirement.query_party(&party).is_empty());
        let including_fainted = requirement.exclude_fainted(false);
        assert_eq!(ids(&including_fainted.query_party(&party)), vec![4]);
    }

    #[rstest]
    #[case(PartyCriterion::Species(vec![Species::Lapras]))]
    #[case(PartyCriterion::HeldItem(vec![HeldItemKind::Leftovers, HeldItemKind::Magnet]))]
    #[case(PartyCriterion::Move(vec![Move::Surf]))]
    #[case(PartyCriterion::Level(InclusiveRange::new(30, 100)))]
    fn test_inverted_query_is_strict_complement(#[case] criterion: PartyCriterion) {
        let party = mixed_party();
        let plain = PartyRequirement::new(criterion.clone());
        let inverted = PartyRequirement::new(criterion).inverted();
        let selected = ids(&plain.query_party(&party));
        let complement = ids(&inverted.query_party(&party));
        assert!(selected.iter().all(|id| !complement.contains(id)));
        let mut union: Vec<u32> = selected.into_iter().chain(complement).collect();
        union.sort();
        assert_eq!(union, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_inverted_held_item_excludes_holders_of_any_listed_item() {
        let party = mixed_party();
        let requirement =
            PartyRequirement::new(PartyCriterion::HeldItem(vec![HeldItemKind::Magnet])).inverted();
        assert_eq!(ids(&requirement.query_party(&party)), vec![2, 3, 4]);
    }

    #[rstest]
    #[case(PartyCriterion::Level(InclusiveRange::new(50, 10)))]
    #[case(PartyCriterion::Friendship(InclusiveRange::new(200, 100)))]
    #[case(PartyCriterion::HealthRatio(InclusiveRange::new(0.9, 0.1)))]
    #[case(PartyCriterion::Weight(InclusiveRange::new(500.0, 1.0)))]
    fn test_invalid_range_always_passes(#[case] criterion: PartyCriterion) {
        let requirement = PartyRequirement::new(criterion).min_pokemon(6);
        for party in [vec![], mixed_party()] {
            let state = RunState::new(party, 20);
            assert!(requirement.meets_requirement(&state));
        }
    }

    #[test]
    fn test_min_number_of_pokemon() {
        let state = RunState::new(mixed_party(), 20);
        let requirement = PartyRequirement::new(PartyCriterion::Status(vec![StatusEffect::None]));
        assert!(requirement.clone().min_pokemon(3).meets_requirement(&state));
        assert!(!requirement.min_pokemon(4).meets_requirement(&state));
    }

    #[test]
    fn test_empty_party_fails_closed() {
        let state = RunState::new(vec![], 20);
        let requirement = PartyRequirement::new(PartyCriterion::Species(vec![Species::Pikachu]))
            .inverted()
            .min_pokemon(0);
        assert!(!requirement.meets_requirement(&state));
    }

    #[test]
    fn test_dialogue_tokens() {
        let party = mixed_party();
        let health = PartyRequirement::new(PartyCriterion::HealthRatio(InclusiveRange::new(0.0, 1.0)));
        assert_eq!(
            health.dialogue_token(Some(&party[2])),
            Some(DialogueToken::new("healthRatio", "15%"))
        );
        let moves = PartyRequirement::new(PartyCriterion::Move(vec![Move::Fly, Move::Surf]));
        assert_eq!(
            moves.dialogue_token(Some(&party[1])),
            Some(DialogueToken::new("move", "Surf"))
        );
        assert_eq!(moves.clone().inverted().dialogue_token(Some(&party[1])), None);
        assert_eq!(moves.dialogue_token(None), None);
    }
}
