use crate::rng::EncounterRng;
use crate::services::BattleInitializer;
use schema::{Species, TrainerType};

const WILD_POOL: &[Species] = &[
    Species::Magikarp,
    Species::Wingull,
    Species::Pikachu,
    Species::Eevee,
    Species::Squirtle,
    Species::Charmander,
    Species::Bulbasaur,
    Species::Wailmer,
];

/// Wave-scaled defaults used when a game does not supply its own rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardBattleInitializer;

impl StandardBattleInitializer {
    fn base_level(wave_index: u32) -> f64 {
        let wave = wave_index as f64;
        1.0 + wave / 2.0 + (wave / 25.0).powi(2)
    }
}

impl BattleInitializer for StandardBattleInitializer {
    fn wave_level(&mut self, wave_index: u32, _rng: &mut EncounterRng) -> u32 {
        let base = Self::base_level(wave_index);
        // Every tenth wave is a boss wave and levels up by a fifth.
        if wave_index % 10 == 0 {
            return (base * 1.2).floor() as u32;
        }
        base.round().max(1.0) as u32
    }

    fn trainer_party_levels(
        &mut self,
        trainer: TrainerType,
        wave_index: u32,
        rng: &mut EncounterRng,
    ) -> Vec<u32> {
        let size = match trainer {
            TrainerType::Youngster | TrainerType::Lass => 1 + (wave_index / 40) as usize,
            TrainerType::Veteran | TrainerType::AceTrainer => 2 + (wave_index / 40) as usize,
            _ => 1 + (wave_index / 50) as usize,
        }
        .min(6);
        let level = self.wave_level(wave_index, rng);
        vec![level; size]
    }

    fn random_species(&mut self, _wave_index: u32, _level: u32, rng: &mut EncounterRng) -> Species {
        rng.pick(WILD_POOL, "wild species")
            .copied()
            .unwrap_or(Species::Magikarp)
    }

    fn default_boss_segments(&mut self, wave_index: u32, level: u32, species: Species) -> u32 {
        let mut segments = 2;
        if level >= 100 {
            segments += 1;
        }
        if species.data().base_stat_total >= 670 {
            segments += 1;
        }
        segments + wave_index / 250
    }
}
