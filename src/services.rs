//! Seams to the collaborators the engine drives but does not own.

use crate::battle::{BattleSetup, EnemyCombatant};
use crate::dialogue::DialogueTokens;
use crate::pokemon::PokemonId;
use crate::rewards::{ExpAward, Reward, ShopConfig};
use crate::rng::EncounterRng;
use async_trait::async_trait;
use schema::{Species, TrainerType};
use serde::{Deserialize, Serialize};

/// One entry of the option-select menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionView {
    pub index: usize,
    pub label: String,
    /// Requirements are met and selecting it will run the option.
    pub enabled: bool,
    /// Drawn faded because it is unmet and its mode shows it disabled.
    pub greyed_out: bool,
    /// Drawn highlighted because it has requirements and meets them.
    pub special: bool,
    pub tooltip: Option<String>,
}

/// One party member offered by a member picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMemberView {
    pub id: PokemonId,
    pub name: String,
    /// Shown instead of accepting the pick. `None` when the member can be picked.
    pub refusal: Option<String>,
}

/// Displays text and menus. Each call resolves once the player has seen or
/// dismissed what was shown.
#[async_trait]
pub trait Presentation: Send {
    async fn show_text(&mut self, text: String);
    async fn show_option_select(&mut self, options: Vec<OptionView>);
    /// Resolves to the picked member, or `None` if the player backs out.
    async fn select_party_member(&mut self, members: Vec<PartyMemberView>) -> Option<PokemonId>;
    /// Resolves to the index of the picked entry, or `None` if the player backs out.
    async fn select_from_list(&mut self, prompt: String, entries: Vec<String>) -> Option<usize>;
}

pub trait DialogueProvider: Send {
    fn resolve(&self, key: &str, tokens: &DialogueTokens) -> String;
}

/// Owns the enemy side of the field.
pub trait FieldService: Send {
    fn clear_enemy_field(&mut self);
    fn summon_enemy(&mut self, enemy: EnemyCombatant);
    fn start_battle(&mut self, setup: BattleSetup);
}

/// Game-side rules for generating enemies that encounter configs leave open.
pub trait BattleInitializer: Send {
    /// Level a wild enemy gets on this wave before encounter scaling.
    fn wave_level(&mut self, wave_index: u32, rng: &mut EncounterRng) -> u32;
    fn trainer_party_levels(
        &mut self,
        trainer: TrainerType,
        wave_index: u32,
        rng: &mut EncounterRng,
    ) -> Vec<u32>;
    fn random_species(&mut self, wave_index: u32, level: u32, rng: &mut EncounterRng) -> Species;
    fn default_boss_segments(&mut self, wave_index: u32, level: u32, species: Species) -> u32;
}

#[cfg_attr(test, mockall::automock)]
pub trait RewardService: Send {
    fn open_shop(&mut self, shop: &ShopConfig);
    fn remove_pending_shop(&mut self);
    fn grant(&mut self, reward: &Reward);
    fn clear_pending_grants(&mut self);
    fn grant_exp(&mut self, awards: &[ExpAward]);
}

/// The full set of collaborators handed to option phases.
pub struct EncounterServices {
    pub presentation: Box<dyn Presentation>,
    pub dialogue: Box<dyn DialogueProvider>,
    pub field: Box<dyn FieldService>,
    pub battle: Box<dyn BattleInitializer>,
    pub rewards: Box<dyn RewardService>,
}
