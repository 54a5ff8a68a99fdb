use super::{EncounterVariant, MysteryEncounter};
use crate::battle::EnemyPartyConfig;
use crate::config::EncounterSettings;
use crate::dialogue::DialogueTokens;
use crate::option::{Ineligibility, RoleAssignment};
use crate::pokemon::{PartyPokemon, PokemonId};
use crate::requirements::Requirement;
use crate::rewards::{ExpGrant, PreRewardsCallback, Reward, RewardPlan, ShopConfig};
use crate::rng::{EncounterRng, SeedContext};
use crate::scene::RunState;
use crate::services::RewardService;
use std::sync::Arc;

/// Per-wave state of an encounter the player is currently inside.
///
/// Created when the encounter spawns and dropped once its post-option phase
/// has run. Shared definitions are never written to; everything selection
/// produces is recorded here.
#[derive(Debug)]
pub struct EncounterInstance {
    definition: Arc<MysteryEncounter>,
    pub wave_index: u32,
    seed: SeedContext,
    option_select_entries: u32,
    pub selected_option: Option<usize>,
    /// Roles resolved for the selected option.
    pub roles: Option<RoleAssignment>,
    /// Roles resolved from the encounter-level requirements.
    pub encounter_roles: Option<RoleAssignment>,
    pub dialogue_tokens: DialogueTokens,
    /// `None` until an option decides what kind of interaction this is.
    pub variant: Option<EncounterVariant>,
    /// Scratch space for carrying data between an option's phases.
    pub misc: serde_json::Value,
    pub enemy_party_configs: Vec<EnemyPartyConfig>,
    /// Set until the first shop is shown so its guaranteed tiers can't be rerolled.
    pub lock_reward_tiers: bool,
    pub exp_multiplier: f64,
    reward_plan: Option<RewardPlan>,
    exp_grant: Option<ExpGrant>,
}

impl EncounterInstance {
    pub fn new(
        definition: Arc<MysteryEncounter>,
        run_seed: u64,
        wave_index: u32,
        settings: &EncounterSettings,
    ) -> Self {
        let offset = wave_index as u64 * settings.wave_seed_multiplier;
        let enemy_party_configs = definition.enemy_party_configs().to_vec();
        Self {
            definition,
            wave_index,
            seed: SeedContext::new(run_seed).at_offset(offset),
            option_select_entries: 0,
            selected_option: None,
            roles: None,
            encounter_roles: None,
            dialogue_tokens: DialogueTokens::default(),
            variant: None,
            misc: serde_json::Value::Null,
            enemy_party_configs,
            lock_reward_tiers: true,
            exp_multiplier: 1.0,
            reward_plan: None,
            exp_grant: None,
        }
    }

    pub fn definition(&self) -> &Arc<MysteryEncounter> {
        &self.definition
    }

    pub fn seed(&self) -> SeedContext {
        self.seed
    }

    pub fn seed_offset(&self) -> u64 {
        self.seed.offset()
    }

    pub fn option_select_entries(&self) -> u32 {
        self.option_select_entries
    }

    /// Records an entry into the option menu. Every entry after the first
    /// advances the seed offset by `step` so a re-shown menu never replays
    /// draws already consumed. Returns whether this was the first entry.
    pub fn enter_option_select(&mut self, step: u64) -> bool {
        let first = self.option_select_entries == 0;
        if !first {
            self.seed = self.seed.advanced_by(step);
            tracing::debug!(offset = self.seed.offset(), "option select re-entered");
        }
        self.option_select_entries += 1;
        first
    }

    pub fn primary_pokemon<'a>(&self, run: &'a RunState) -> Option<&'a PartyPokemon> {
        self.roles.as_ref()?.primary_pokemon(&run.party)
    }

    pub fn secondary_pokemon<'a>(&self, run: &'a RunState) -> Vec<&'a PartyPokemon> {
        self.roles
            .as_ref()
            .map(|roles| roles.secondary_pokemon(&run.party))
            .unwrap_or_default()
    }

    /// Registers what the encounter pays out. A later call replaces the
    /// earlier registration entirely.
    pub fn set_custom_encounter_rewards(
        &mut self,
        shop: Option<ShopConfig>,
        non_shop_rewards: Option<Vec<Reward>>,
        pre_rewards: Option<PreRewardsCallback>,
    ) {
        if self.reward_plan.is_some() {
            tracing::debug!("replacing previously registered encounter rewards");
        }
        self.reward_plan = Some(RewardPlan::new(shop, non_shop_rewards, pre_rewards));
    }

    pub fn reward_plan(&self) -> Option<&RewardPlan> {
        self.reward_plan.as_ref()
    }

    /// Registers an exp payout for `participants`. Replaces any earlier grant.
    pub fn set_encounter_exp(&mut self, participants: Vec<PokemonId>, base_exp: u32, use_wave_index: bool) {
        self.exp_grant = Some(ExpGrant {
            participants,
            base_exp,
            use_wave_index,
        });
    }

    pub fn exp_grant(&self) -> Option<&ExpGrant> {
        self.exp_grant.as_ref()
    }

    /// Executes the registered exp grant and reward plan, each at most once.
    /// Returns whether anything was registered.
    pub fn execute_rewards(
        &mut self,
        run: &mut RunState,
        rng: &mut EncounterRng,
        rewards: &mut dyn RewardService,
    ) -> bool {
        let exp_grant = self.exp_grant.take();
        let reward_plan = self.reward_plan.take();
        if let Some(grant) = &exp_grant {
            grant.execute(run, self.variant, self.exp_multiplier, rewards);
        }
        if let Some(plan) = &reward_plan {
            tracing::info!(
                shop = plan.shop().is_some(),
                grants = plan.non_shop_rewards().map_or(0, <[Reward]>::len),
                "executing encounter rewards"
            );
            plan.execute(run, rng, rewards);
        }
        exp_grant.is_some() || reward_plan.is_some()
    }

    /// Fills `dialogue_tokens` from the encounter's and every option's
    /// requirements, resolving roles to find the members the tokens describe.
    ///
    /// Each option resolves on its own generator at the current offset, the
    /// same draw selection makes, so the tokens name the member the option
    /// will act on.
    pub fn populate_dialogue_tokens_from_requirements(&mut self, state: &RunState, rng: &mut EncounterRng) {
        let definition = Arc::clone(&self.definition);

        for requirement in definition.scene_requirements() {
            if let Some(token) = requirement.dialogue_token(state) {
                self.dialogue_tokens.set(token.key, token.value);
            }
        }

        let encounter_roles = crate::option::resolve_roles(
            definition.primary_requirements(),
            definition.secondary_requirements(),
            false,
            state,
            rng,
        )
        .ok();
        if let Some(roles) = &encounter_roles {
            self.set_role_tokens(
                "",
                state,
                roles,
                definition.primary_requirements(),
                definition.secondary_requirements(),
            );
        }
        self.encounter_roles = encounter_roles;

        for index in 0..definition.options().len() {
            self.populate_option_tokens(index, state);
        }
    }

    /// Refreshes option `index`'s tokens and returns its roles, or why it is
    /// not eligible.
    pub fn populate_option_tokens(
        &mut self,
        index: usize,
        state: &RunState,
    ) -> Option<Result<RoleAssignment, Ineligibility>> {
        let definition = Arc::clone(&self.definition);
        let option = definition.option(index)?;
        let prefix = option_prefix(index);
        for requirement in option.scene_requirements() {
            if let Some(token) = requirement.dialogue_token(state) {
                self.dialogue_tokens
                    .set(format!("{prefix}{}", capitalize(token.key)), token.value);
            }
        }
        let resolved = option.resolve_roles(state, &mut self.seed.rng());
        if let Ok(roles) = &resolved {
            self.set_role_tokens(
                &prefix,
                state,
                roles,
                option.primary_requirements(),
                option.secondary_requirements(),
            );
        }
        Some(resolved)
    }

    /// Rewrites the selected option's role tokens from the stored roles.
    /// Called once roles are fixed so dialogue keeps naming the members the
    /// phases act on.
    pub fn set_selected_role_tokens(&mut self, state: &RunState) {
        let (Some(index), Some(roles)) = (self.selected_option, self.roles.clone()) else {
            return;
        };
        let definition = Arc::clone(&self.definition);
        let Some(option) = definition.option(index) else {
            return;
        };
        self.set_role_tokens(
            &option_prefix(index),
            state,
            &roles,
            option.primary_requirements(),
            option.secondary_requirements(),
        );
    }

    pub fn set_role_tokens(
        &mut self,
        prefix: &str,
        state: &RunState,
        roles: &RoleAssignment,
        primary_requirements: &[Requirement],
        secondary_requirements: &[Requirement],
    ) {
        let slots = [
            ("primary", roles.primary_pokemon(&state.party), primary_requirements),
            (
                "secondary",
                roles.secondary_pokemon(&state.party).first().copied(),
                secondary_requirements,
            ),
        ];
        for (role, pokemon, requirements) in slots {
            let Some(pokemon) = pokemon else { continue };
            if requirements.is_empty() {
                continue;
            }
            let role_key = token_key(prefix, role);
            self.dialogue_tokens.set(format!("{role_key}Name"), pokemon.name());
            for requirement in requirements.iter().filter(|r| !r.is_inverted()) {
                if let Some(token) = requirement.dialogue_token(state, Some(pokemon)) {
                    self.dialogue_tokens
                        .set(format!("{role_key}{}", capitalize(token.key)), token.value);
                }
            }
        }
    }
}

fn option_prefix(index: usize) -> String {
    format!("option{}", index + 1)
}

/// `primary` with no prefix, `option1Primary` with one.
fn token_key(prefix: &str, role: &str) -> String {
    if prefix.is_empty() {
        role.to_string()
    } else {
        format!("{prefix}{}", capitalize(role))
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
