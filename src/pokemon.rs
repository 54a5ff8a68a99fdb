use schema::{
    Ability, EvolutionItem, FormChangeItem, HeldItemKind, Move, Nature, PokemonType, Species,
    SpeciesData, StatusEffect,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a party member for the duration of a run.
///
/// Role resolution hands back ids rather than references so the party can be
/// mutated by option phases after roles are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PokemonId(pub u32);

impl fmt::Display for PokemonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCondition {
    pub effect: StatusEffect,
    /// Remaining turns for sleep; unused by other effects.
    pub cure_turn: Option<u8>,
}

impl StatusCondition {
    pub fn new(effect: StatusEffect) -> Self {
        Self {
            effect,
            cure_turn: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldItem {
    pub kind: HeldItemKind,
    pub stack_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyPokemon {
    pub id: PokemonId,
    pub species: Species,
    pub nickname: Option<String>,
    pub level: u32,
    pub friendship: u8,
    pub nature: Nature,
    pub ability: Option<Ability>,
    pub passive: Option<Ability>,
    pub moveset: Vec<Move>,
    /// Moves this member could learn from a TM.
    pub compatible_tms: Vec<Move>,
    pub status: Option<StatusCondition>,
    pub held_items: Vec<HeldItem>,
    pub hp: u32,
    pub max_hp: u32,
}

impl PartyPokemon {
    /// Creates a healthy party member with neutral defaults. Use the `with_*`
    /// methods to shape it further.
    pub fn new(id: u32, species: Species, level: u32) -> Self {
        let max_hp = 10 + level * 3;
        Self {
            id: PokemonId(id),
            species,
            nickname: None,
            level,
            friendship: 70,
            nature: Nature::Hardy,
            ability: None,
            passive: None,
            moveset: Vec::new(),
            compatible_tms: Vec::new(),
            status: None,
            held_items: Vec::new(),
            hp: max_hp,
            max_hp,
        }
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    pub fn with_nature(mut self, nature: Nature) -> Self {
        self.nature = nature;
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn with_passive(mut self, passive: Ability) -> Self {
        self.passive = Some(passive);
        self
    }

    pub fn with_moves(mut self, moves: Vec<Move>) -> Self {
        self.moveset = moves;
        self
    }

    pub fn with_compatible_tms(mut self, tms: Vec<Move>) -> Self {
        self.compatible_tms = tms;
        self
    }

    pub fn with_status(mut self, effect: StatusEffect) -> Self {
        self.status = Some(StatusCondition::new(effect));
        self
    }

    pub fn with_held_item(mut self, kind: HeldItemKind, stack_count: u32) -> Self {
        self.held_items.push(HeldItem { kind, stack_count });
        self
    }

    pub fn with_friendship(mut self, friendship: u8) -> Self {
        self.friendship = friendship;
        self
    }

    /// Sets current HP, clamped to max HP.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.max_hp);
        self
    }

    pub fn species_data(&self) -> &'static SpeciesData {
        self.species.data()
    }

    /// Display name: nickname if set, species name otherwise.
    pub fn name(&self) -> String {
        match &self.nickname {
            Some(nickname) => nickname.clone(),
            None => self.species.to_string(),
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// The member's current status effect, `StatusEffect::None` when healthy.
    pub fn status_effect(&self) -> StatusEffect {
        self.status.map(|s| s.effect).unwrap_or(StatusEffect::None)
    }

    pub fn health_ratio(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64
    }

    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.species_data().has_type(pokemon_type)
    }

    pub fn knows_move(&self, move_: Move) -> bool {
        self.moveset.contains(&move_)
    }

    /// A TM move this member is compatible with and does not already know.
    pub fn can_learn_by_tm(&self, move_: Move) -> bool {
        self.compatible_tms.contains(&move_) && !self.knows_move(move_)
    }

    pub fn has_ability(&self, ability: Ability) -> bool {
        self.ability == Some(ability) || self.passive == Some(ability)
    }

    pub fn holds(&self, kind: HeldItemKind) -> bool {
        self.held_items.iter().any(|item| item.kind == kind)
    }

    pub fn can_evolve_with(&self, item: EvolutionItem) -> bool {
        self.species_data().evolves_with(item).is_some()
    }

    pub fn can_change_form_with(&self, item: FormChangeItem) -> bool {
        self.species_data().changes_form_with(item)
    }

    /// Type-boosting held items by the type they boost.
    pub fn boosted_attack_types(&self) -> impl Iterator<Item = PokemonType> + '_ {
        self.held_items
            .iter()
            .filter_map(|item| item.kind.boosted_type())
    }

    pub fn give_held_item(&mut self, kind: HeldItemKind, count: u32) {
        match self.held_items.iter_mut().find(|item| item.kind == kind) {
            Some(item) => item.stack_count += count,
            None => self.held_items.push(HeldItem {
                kind,
                stack_count: count,
            }),
        }
    }

    /// Deals damage that never knocks the member out: HP stops at 1.
    pub fn apply_non_lethal_damage(&mut self, damage: u32) {
        if self.is_fainted() {
            return;
        }
        self.hp = self.hp.saturating_sub(damage).max(1);
    }

    /// Removes one of the given held item. Returns false if it was not held.
    pub fn take_held_item(&mut self, kind: HeldItemKind) -> bool {
        let Some(index) = self.held_items.iter().position(|item| item.kind == kind) else {
            return false;
        };
        if self.held_items[index].stack_count > 1 {
            self.held_items[index].stack_count -= 1;
        } else {
            self.held_items.remove(index);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_name_prefers_nickname() {
        let plain = PartyPokemon::new(1, Species::Pikachu, 10);
        let named = PartyPokemon::new(2, Species::Pikachu, 10).with_nickname("Sparky");
        assert_eq!(plain.name(), "Pikachu");
        assert_eq!(named.name(), "Sparky");
    }

    #[test]
    fn test_missing_status_reads_as_none() {
        let healthy = PartyPokemon::new(1, Species::Eevee, 5);
        assert_eq!(healthy.status_effect(), StatusEffect::None);
        let burned = healthy.with_status(StatusEffect::Burn);
        assert_eq!(burned.status_effect(), StatusEffect::Burn);
    }

    #[test]
    fn test_tm_compatibility_excludes_known_moves() {
        let pokemon = PartyPokemon::new(1, Species::Lapras, 30)
            .with_moves(vec![Move::Surf])
            .with_compatible_tms(vec![Move::Surf, Move::IceBeam]);
        assert!(!pokemon.can_learn_by_tm(Move::Surf));
        assert!(pokemon.can_learn_by_tm(Move::IceBeam));
    }

    #[test]
    fn test_take_held_item_decrements_stack() {
        let mut pokemon =
            PartyPokemon::new(1, Species::Snorlax, 40).with_held_item(HeldItemKind::Leftovers, 2);
        assert!(pokemon.take_held_item(HeldItemKind::Leftovers));
        assert_eq!(pokemon.held_items[0].stack_count, 1);
        assert!(pokemon.take_held_item(HeldItemKind::Leftovers));
        assert!(pokemon.held_items.is_empty());
        assert!(!pokemon.take_held_item(HeldItemKind::Leftovers));
    }

    #[test]
    fn test_fainted_at_zero_hp() {
        let pokemon = PartyPokemon::new(1, Species::Magikarp, 5).with_hp(0);
        assert!(pokemon.is_fainted());
        assert_eq!(pokemon.health_ratio(), 0.0);
    }

    #[rstest]
    #[case(40, 10, 30)]
    #[case(40, 39, 1)]
    #[case(40, 500, 1)]
    fn test_non_lethal_damage_leaves_one_hp(#[case] hp: u32, #[case] damage: u32, #[case] expected: u32) {
        let mut pokemon = PartyPokemon::new(1, Species::Lapras, 50).with_hp(hp);
        pokemon.apply_non_lethal_damage(damage);
        assert_eq!(pokemon.hp, expected);
    }

    #[test]
    fn test_give_held_item_stacks() {
        let mut pokemon = PartyPokemon::new(1, Species::Delibird, 20);
        pokemon.give_held_item(HeldItemKind::ShellBell, 1);
        pokemon.give_held_item(HeldItemKind::ShellBell, 1);
        assert_eq!(pokemon.held_items.len(), 1);
        assert_eq!(pokemon.held_items[0].stack_count, 2);
    }
}
