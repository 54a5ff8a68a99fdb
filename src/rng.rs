//! Seeded randomness for encounter logic.
//!
//! Every random draw an encounter makes goes through an [`EncounterRng`]
//! obtained from a [`SeedContext`]. The same `(run_seed, offset)` pair always
//! yields the same draw sequence, on any machine and across restarts.

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

const OFFSET_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Run seed plus the decision point currently being rolled for.
///
/// Advancing returns a new context; a context is never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedContext {
    run_seed: u64,
    offset: u64,
}

impl SeedContext {
    pub fn new(run_seed: u64) -> Self {
        Self {
            run_seed,
            offset: 0,
        }
    }

    pub fn run_seed(&self) -> u64 {
        self.run_seed
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn at_offset(&self, offset: u64) -> Self {
        Self {
            run_seed: self.run_seed,
            offset,
        }
    }

    pub fn advanced_by(&self, step: u64) -> Self {
        self.at_offset(self.offset.wrapping_add(step))
    }

    /// A fresh generator positioned at the start of this context's sequence.
    pub fn rng(&self) -> EncounterRng {
        let state = self.run_seed ^ self.offset.wrapping_mul(OFFSET_MIX);
        EncounterRng {
            source: RngSource::Seeded(Pcg32::new(state, self.offset)),
        }
    }

    /// Runs `f` with a generator seeded from `(run_seed, offset)`.
    pub fn with_seed_offset<T>(&self, offset: u64, f: impl FnOnce(&mut EncounterRng) -> T) -> T {
        let mut rng = self.at_offset(offset).rng();
        f(&mut rng)
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Seeded(Pcg32),
    #[cfg(test)]
    Scripted { outcomes: Vec<u32>, index: usize },
}

#[derive(Debug, Clone)]
pub struct EncounterRng {
    source: RngSource,
}

impl EncounterRng {
    /// A generator that replays fixed outcomes, each reduced modulo the
    /// requested bound.
    #[cfg(test)]
    pub fn new_for_test(outcomes: Vec<u32>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    /// Uniform integer in `0..bound`. A bound of zero yields zero.
    pub fn int(&mut self, bound: u32, reason: &str) -> u32 {
        if bound == 0 {
            return 0;
        }
        let value = match &mut self.source {
            RngSource::Seeded(pcg) => pcg.random_range(0..bound),
            #[cfg(test)]
            RngSource::Scripted { outcomes, index } => {
                let Some(outcome) = outcomes.get(*index) else {
                    panic!("scripted rng exhausted while rolling for '{reason}'");
                };
                *index += 1;
                outcome % bound
            }
        };
        tracing::trace!(reason, bound, value, "rng draw");
        value
    }

    /// Uniform integer in `min..=max`.
    pub fn int_between(&mut self, min: u32, max: u32, reason: &str) -> u32 {
        if max <= min {
            return min;
        }
        min + self.int(max - min + 1, reason)
    }

    pub fn pick_index(&mut self, len: usize, reason: &str) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let bound = u32::try_from(len).unwrap_or(u32::MAX);
        Some(self.int(bound, reason) as usize)
    }

    pub fn pick<'a, T>(&mut self, items: &'a [T], reason: &str) -> Option<&'a T> {
        self.pick_index(items.len(), reason).map(|i| &items[i])
    }

    /// Index drawn proportionally to `weights`; `None` if every weight is zero.
    pub fn weighted_index(&mut self, weights: &[u32], reason: &str) -> Option<usize> {
        let total: u32 = weights.iter().sum();
        if total == 0 {
            return None;
        }
        let mut roll = self.int(total, reason);
        for (index, weight) in weights.iter().enumerate() {
            if roll < *weight {
                return Some(index);
            }
            roll -= weight;
        }
        None
    }
}
