//! Deciding whether a wave gets an encounter, and which one.

use super::{EncounterTier, MysteryEncounter};
use crate::config::EncounterSettings;
use crate::rng::EncounterRng;
use crate::scene::{EncounterSaveData, RunState};
use std::sync::Arc;

/// Rolls whether `wave_index` spawns an encounter, updating the spawn
/// weight in `save`. Waves outside the legal range, or too close to the
/// last encounter, fail without drawing.
///
/// Runs that are behind the expected encounter count are favored and runs
/// ahead of it are penalized, so totals stay near the per-run target.
pub fn roll_for_encounter(
    save: &mut EncounterSaveData,
    wave_index: u32,
    settings: &EncounterSettings,
    rng: &mut EncounterRng,
) -> bool {
    let (first, last) = settings.encounter_wave_range;
    if wave_index < first || wave_index > last {
        return false;
    }
    if let Some(previous) = save.last_encounter_wave {
        if wave_index.saturating_sub(previous) < settings.min_waves_between_encounters {
            return false;
        }
    }

    let span = (last - first).max(1) as f64;
    let expected = settings.target_encounters_per_run as f64 / span * (wave_index - first) as f64;
    let behind_by = expected - save.encounter_log.len() as f64;
    let favored = save.encounter_spawn_weight as f64
        + behind_by * settings.spawn_rate_per_missing_encounter as f64;

    let roll = rng.int(settings.spawn_roll_range, "encounter spawn");
    let spawned = (roll as f64) < favored;
    if spawned {
        save.encounter_spawn_weight = settings.base_spawn_weight;
        save.last_encounter_wave = Some(wave_index);
    } else {
        save.encounter_spawn_weight += settings.spawn_weight_increment_on_miss;
    }
    tracing::debug!(wave_index, roll, favored, spawned, "encounter spawn roll");
    spawned
}

/// Rolls a tier. Every encounter already seen in a tier lowers that tier's
/// weight by its pity decay.
pub fn roll_tier(save: &EncounterSaveData, settings: &EncounterSettings, rng: &mut EncounterRng) -> EncounterTier {
    let weights: Vec<u32> = EncounterTier::ALL
        .iter()
        .map(|tier| {
            let decay = settings.tier_pity_decay.get(*tier) * save.tier_count(*tier);
            settings.tier_weights.get(*tier).saturating_sub(decay)
        })
        .collect();
    rng.weighted_index(&weights, "encounter tier")
        .and_then(|index| EncounterTier::ALL.get(index).copied())
        .unwrap_or(EncounterTier::Common)
}

/// Picks an encounter of `tier` that can spawn right now, weighted by spawn
/// weight. Falls back through lower tiers when a tier has no candidate.
pub fn select_encounter(
    catalog: &[Arc<MysteryEncounter>],
    tier: EncounterTier,
    state: &RunState,
    rng: &mut EncounterRng,
) -> Option<Arc<MysteryEncounter>> {
    let mut current = Some(tier);
    while let Some(tier) = current {
        let candidates: Vec<&Arc<MysteryEncounter>> = catalog
            .iter()
            .filter(|encounter| encounter.tier() == tier && encounter.can_spawn(state, rng))
            .collect();
        if !candidates.is_empty() {
            let weights: Vec<u32> = candidates.iter().map(|e| e.spawn_weight()).collect();
            let index = match rng.weighted_index(&weights, "encounter pick") {
                Some(index) => Some(index),
                None => rng.pick_index(candidates.len(), "encounter pick"),
            };
            if let Some(encounter) = index.and_then(|i| candidates.get(i)) {
                tracing::info!(encounter = %encounter.encounter_type(), ?tier, "selected encounter");
                return Some(Arc::clone(encounter));
            }
        }
        tracing::debug!(?tier, "no spawnable encounter in tier");
        current = tier.lower();
    }
    None
}
