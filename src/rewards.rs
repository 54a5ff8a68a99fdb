//! Deferred reward and experience grants for an encounter instance.
//!
//! Option phases register intent with [`RewardPlan`] and [`ExpGrant`]; the
//! flow executes whatever is registered exactly once when the encounter
//! resolves its rewards.

use crate::encounter::EncounterVariant;
use crate::pokemon::PokemonId;
use crate::rng::EncounterRng;
use crate::scene::RunState;
use crate::services::RewardService;
use schema::{HeldItemKind, ModifierKind};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardTier {
    Common,
    Great,
    Ultra,
    Rogue,
    Master,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reward {
    Modifier(ModifierKind),
    HeldItem(HeldItemKind),
    Money(u64),
    /// A random item rolled from the given tier by the reward service.
    RandomOfTier(RewardTier),
}

/// Shop selection shown after the encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    pub guaranteed_tiers: Vec<RewardTier>,
    pub guaranteed_rewards: Vec<Reward>,
    /// Fill slots not covered by guarantees with regular shop rolls.
    pub fill_remaining: bool,
    pub reroll_disabled: bool,
}

impl ShopConfig {
    pub fn fill_remaining() -> Self {
        Self {
            fill_remaining: true,
            ..Self::default()
        }
    }

    pub fn with_guaranteed_tiers(tiers: Vec<RewardTier>) -> Self {
        Self {
            guaranteed_tiers: tiers,
            ..Self::default()
        }
    }
}

/// Runs right before rewards are handed out, with the reward-seeded rng.
pub type PreRewardsCallback = Box<dyn Fn(&mut RunState, &mut EncounterRng) + Send + Sync>;

/// A registered reward closure: pre-callback, then shop, then direct grants.
pub struct RewardPlan {
    shop: Option<ShopConfig>,
    non_shop_rewards: Option<Vec<Reward>>,
    pre_rewards: Option<PreRewardsCallback>,
}

impl fmt::Debug for RewardPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewardPlan")
            .field("shop", &self.shop)
            .field("non_shop_rewards", &self.non_shop_rewards)
            .field("has_pre_rewards", &self.pre_rewards.is_some())
            .finish()
    }
}

impl RewardPlan {
    pub fn new(
        shop: Option<ShopConfig>,
        non_shop_rewards: Option<Vec<Reward>>,
        pre_rewards: Option<PreRewardsCallback>,
    ) -> Self {
        Self {
            shop,
            non_shop_rewards,
            pre_rewards,
        }
    }

    pub fn shop(&self) -> Option<&ShopConfig> {
        self.shop.as_ref()
    }

    pub fn non_shop_rewards(&self) -> Option<&[Reward]> {
        self.non_shop_rewards.as_deref()
    }

    pub fn execute(&self, run: &mut RunState, rng: &mut EncounterRng, rewards: &mut dyn RewardService) {
        if let Some(pre_rewards) = &self.pre_rewards {
            pre_rewards(run, rng);
        }

        match &self.shop {
            Some(shop) => rewards.open_shop(shop),
            None => rewards.remove_pending_shop(),
        }

        match self.non_shop_rewards.as_deref() {
            Some(grants) if !grants.is_empty() => {
                for reward in grants {
                    rewards.grant(reward);
                }
            }
            _ => rewards.clear_pending_grants(),
        }
    }
}

/// Experience owed to one party member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpAward {
    pub pokemon: PokemonId,
    pub exp: u32,
}

/// Friendship participants gain from an encounter exp grant.
const PARTICIPANT_FRIENDSHIP: u8 = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpGrant {
    pub participants: Vec<PokemonId>,
    pub base_exp: u32,
    /// Scale `base_exp` by the wave index. Off when `base_exp` is already final.
    pub use_wave_index: bool,
}

impl ExpGrant {
    /// Splits the grant across the non-fainted party. Participants share the
    /// full value; others only get exp through Exp. Share stacks.
    pub fn distribute(
        &self,
        run: &RunState,
        variant: Option<EncounterVariant>,
        exp_multiplier: f64,
    ) -> Vec<ExpAward> {
        if self.participants.is_empty() {
            return Vec::new();
        }
        let mut exp_value = self.base_exp as f64
            * if self.use_wave_index {
                run.wave_index as f64
            } else {
                1.0
            };
        if variant == Some(EncounterVariant::TrainerBattle) {
            exp_value = (exp_value * 1.5).floor();
        }
        let participant_count = self.participants.len() as f64;
        let exp_share_stacks = run.modifier_stack_count(ModifierKind::ExpShare) as f64;

        run.party
            .iter()
            .filter(|p| !p.is_fainted())
            .map(|p| {
                let share = if self.participants.contains(&p.id) {
                    1.0 / participant_count
                } else {
                    exp_share_stacks * 0.2 / participant_count
                };
                ExpAward {
                    pokemon: p.id,
                    exp: (exp_value * share * exp_multiplier).floor() as u32,
                }
            })
            .collect()
    }

    pub fn execute(
        &self,
        run: &mut RunState,
        variant: Option<EncounterVariant>,
        exp_multiplier: f64,
        rewards: &mut dyn RewardService,
    ) {
        let awards = self.distribute(run, variant, exp_multiplier);
        for id in &self.participants {
            if let Some(pokemon) = run.pokemon_mut(*id) {
                if !pokemon.is_fainted() {
                    pokemon.friendship = pokemon.friendship.saturating_add(PARTICIPANT_FRIENDSHIP);
                }
            }
        }
        tracing::info!(awards = awards.len(), base_exp = self.base_exp, "granting encounter exp");
        rewards.grant_exp(&awards);
    }
}
