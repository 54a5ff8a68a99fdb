//! Read-mostly view of the run that requirements are evaluated against.

use crate::encounter::EncounterTier;
use crate::pokemon::{PartyPokemon, PokemonId};
use schema::{EncounterType, ModifierKind, TimeOfDay, WeatherType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentModifier {
    pub kind: ModifierKind,
    pub stack_count: u32,
}

/// One entry of the "previously encountered" log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeenEncounter {
    pub encounter_type: EncounterType,
    pub tier: EncounterTier,
    pub wave_index: u32,
    pub selected_option: Option<usize>,
}

/// Encounter bookkeeping that the save system persists between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSaveData {
    pub encounter_log: Vec<SeenEncounter>,
    /// Current spawn weight, raised on every missed roll.
    pub encounter_spawn_weight: u32,
    pub last_encounter_wave: Option<u32>,
}

impl EncounterSaveData {
    pub fn new(base_spawn_weight: u32) -> Self {
        Self {
            encounter_log: Vec::new(),
            encounter_spawn_weight: base_spawn_weight,
            last_encounter_wave: None,
        }
    }

    pub fn times_seen(&self, encounter_type: EncounterType) -> usize {
        self.encounter_log
            .iter()
            .filter(|entry| entry.encounter_type == encounter_type)
            .count()
    }

    pub fn tier_count(&self, tier: EncounterTier) -> u32 {
        self.encounter_log
            .iter()
            .filter(|entry| entry.tier == tier)
            .count() as u32
    }
}

impl Default for EncounterSaveData {
    fn default() -> Self {
        Self::new(3)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub party: Vec<PartyPokemon>,
    pub wave_index: u32,
    pub time_of_day: TimeOfDay,
    pub weather: Option<WeatherType>,
    pub money: u64,
    pub modifiers: Vec<PersistentModifier>,
    pub encounters: EncounterSaveData,
}

impl RunState {
    pub fn new(party: Vec<PartyPokemon>, wave_index: u32) -> Self {
        Self {
            party,
            wave_index,
            time_of_day: TimeOfDay::default(),
            weather: None,
            money: 0,
            modifiers: Vec::new(),
            encounters: EncounterSaveData::default(),
        }
    }

    pub fn pokemon(&self, id: PokemonId) -> Option<&PartyPokemon> {
        self.party.iter().find(|p| p.id == id)
    }

    pub fn pokemon_mut(&mut self, id: PokemonId) -> Option<&mut PartyPokemon> {
        self.party.iter_mut().find(|p| p.id == id)
    }

    /// Adds a member, assigning the next free id. Returns the id used.
    pub fn add_party_member(&mut self, mut pokemon: PartyPokemon) -> PokemonId {
        let next = self.party.iter().map(|p| p.id.0 + 1).max().unwrap_or(1);
        pokemon.id = PokemonId(next);
        self.party.push(pokemon);
        PokemonId(next)
    }

    pub fn remove_party_member(&mut self, id: PokemonId) -> Option<PartyPokemon> {
        let index = self.party.iter().position(|p| p.id == id)?;
        Some(self.party.remove(index))
    }

    pub fn unfainted_party_size(&self) -> usize {
        self.party.iter().filter(|p| !p.is_fainted()).count()
    }

    pub fn modifier_stack_count(&self, kind: ModifierKind) -> u32 {
        self.modifiers
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.stack_count)
            .sum()
    }

    pub fn add_modifier(&mut self, kind: ModifierKind, stack_count: u32) {
        match self.modifiers.iter_mut().find(|m| m.kind == kind) {
            Some(existing) => existing.stack_count += stack_count,
            None => self.modifiers.push(PersistentModifier { kind, stack_count }),
        }
    }

    pub fn add_money(&mut self, amount: u64) {
        self.money = self.money.saturating_add(amount);
    }

    /// Spends money, never going below zero.
    pub fn spend_money(&mut self, amount: u64) {
        self.money = self.money.saturating_sub(amount);
    }

    /// Money scaled to the current wave, as used for prices and payouts.
    pub fn wave_money_amount(&self, multiplier: f64) -> u64 {
        let wave = self.wave_index.max(1);
        let wave_set = (wave as f64 / 10.0).ceil() - 1.0;
        let position_in_set = ((wave - 1) % 10 + 1) as f64 / 10.0;
        let value = ((wave_set + 1.0 + (0.75 + position_in_set)) * 100.0)
            .powf(1.0 + 0.005 * wave_set)
            * multiplier;
        ((value / 10.0).floor() as u64) * 10
    }

    pub fn has_seen(&self, encounter_type: EncounterType) -> bool {
        self.encounters.times_seen(encounter_type) > 0
    }
}
