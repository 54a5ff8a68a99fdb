use super::{DialogueToken, InclusiveRange};
use crate::errors::{DefinitionError, DefinitionResult};
use crate::scene::RunState;
use schema::{EncounterType, ModifierKind, TimeOfDay, WeatherType};

/// Requirements over global run state rather than individual party members.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneRequirement {
    /// Current wave lies in the inclusive range.
    WaveRange(InclusiveRange<u32>),
    /// `wave_index % modulus` is one of `remainders`.
    WaveModulus { modulus: u32, remainders: Vec<u32> },
    /// Passes when the list is empty.
    TimeOfDay(Vec<TimeOfDay>),
    /// Passes when the list is empty or there is no active weather.
    Weather(Vec<WeatherType>),
    PartySize {
        range: InclusiveRange<usize>,
        exclude_fainted: bool,
    },
    /// The summed stack count of any of `kinds` reaches `min_stack_count`.
    PersistentModifier {
        kinds: Vec<ModifierKind>,
        min_stack_count: u32,
    },
    /// When `scaling_multiplier` is positive the price follows the wave
    /// instead of `required_money`.
    Money {
        required_money: u64,
        scaling_multiplier: f64,
    },
    PreviousEncounter(EncounterType),
}

impl SceneRequirement {
    pub fn party_size(min: usize, max: usize, exclude_fainted: bool) -> Self {
        SceneRequirement::PartySize {
            range: InclusiveRange::new(min, max),
            exclude_fainted,
        }
    }

    pub fn money(required_money: u64, scaling_multiplier: f64) -> Self {
        SceneRequirement::Money {
            required_money,
            scaling_multiplier,
        }
    }

    /// The price a money requirement asks for in the current run.
    pub fn required_money(&self, state: &RunState) -> Option<u64> {
        match self {
            SceneRequirement::Money {
                required_money,
                scaling_multiplier,
            } => Some(if *scaling_multiplier > 0.0 {
                state.wave_money_amount(*scaling_multiplier)
            } else {
                *required_money
            }),
            _ => None,
        }
    }

    pub fn meets_requirement(&self, state: &RunState) -> bool {
        match self {
            SceneRequirement::WaveRange(range) => {
                !range.is_valid() || range.contains(state.wave_index)
            }
            SceneRequirement::WaveModulus {
                modulus,
                remainders,
            } => {
                *modulus != 0 && remainders.contains(&(state.wave_index % modulus))
            }
            SceneRequirement::TimeOfDay(times) => {
                times.is_empty() || times.contains(&state.time_of_day)
            }
            SceneRequirement::Weather(weathers) => match state.weather {
                Some(weather) => weathers.is_empty() || weathers.contains(&weather),
                None => true,
            },
            SceneRequirement::PartySize {
                range,
                exclude_fainted,
            } => {
                if !range.is_valid() {
                    return true;
                }
                let size = if *exclude_fainted {
                    state.unfainted_party_size()
                } else {
                    state.party.len()
                };
                range.contains(size)
            }
            SceneRequirement::PersistentModifier {
                kinds,
                min_stack_count,
            } => {
                let owned: u32 = kinds
                    .iter()
                    .map(|kind| state.modifier_stack_count(*kind))
                    .sum();
                owned >= *min_stack_count
            }
            SceneRequirement::Money { .. } => {
                let required = self.required_money(state).unwrap_or(0);
                required == 0 || state.money >= required
            }
            SceneRequirement::PreviousEncounter(encounter_type) => {
                state.has_seen(*encounter_type)
            }
        }
    }

    pub fn dialogue_token(&self, state: &RunState) -> Option<DialogueToken> {
        let token = match self {
            SceneRequirement::WaveRange(_) | SceneRequirement::WaveModulus { .. } => {
                DialogueToken::new("waveIndex", state.wave_index)
            }
            SceneRequirement::TimeOfDay(_) => DialogueToken::new("timeOfDay", state.time_of_day),
            SceneRequirement::Weather(_) => DialogueToken::new(
                "weather",
                state.weather.map(|w| w.to_string()).unwrap_or_default(),
            ),
            SceneRequirement::PartySize {
                exclude_fainted, ..
            } => {
                let size = if *exclude_fainted {
                    state.unfainted_party_size()
                } else {
                    state.party.len()
                };
                DialogueToken::new("partySize", size)
            }
            SceneRequirement::PersistentModifier { kinds, .. } => {
                DialogueToken::new("requiredItem", kinds.first()?)
            }
            SceneRequirement::Money { .. } => {
                DialogueToken::new("money", self.required_money(state).unwrap_or(0))
            }
            SceneRequirement::PreviousEncounter(encounter_type) => {
                DialogueToken::new("previousEncounter", encounter_type)
            }
        };
        Some(token)
    }

    pub fn validate(&self) -> DefinitionResult<()> {
        match self {
            SceneRequirement::WaveModulus { modulus: 0, .. } => Err(DefinitionError::ZeroModulus),
            SceneRequirement::WaveRange(range) if !range.is_valid() => {
                tracing::warn!(%range, "wave range requirement has min > max and places no constraint");
                Ok(())
            }
            SceneRequirement::PartySize { range, .. } if !range.is_valid() => {
                tracing::warn!(%range, "party size requirement has min > max and places no constraint");
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encounter::EncounterTier;
    use crate::pokemon::PartyPokemon;
    use crate::scene::SeenEncounter;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::Species;

    fn state_at_wave(wave: u32, party_size: usize) -> RunState {
        let party = (0..party_size)
            .map(|i| PartyPokemon::new(i as u32 + 1, Species::Eevee, 20))
            .collect();
        RunState::new(party, wave)
    }

    #[rstest]
    #[case(29, false)]
    #[case(30, true)]
    #[case(180, true)]
    #[case(181, false)]
    fn test_wave_range(#[case] wave: u32, #[case] expected: bool) {
        let requirement = SceneRequirement::WaveRange(InclusiveRange::new(30, 180));
        assert_eq!(requirement.meets_requirement(&state_at_wave(wave, 2)), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(6)]
    fn test_inverted_party_size_range_always_passes(#[case] party_size: usize) {
        let requirement = SceneRequirement::party_size(6, 2, false);
        assert!(requirement.meets_requirement(&state_at_wave(50, party_size)));
    }

    #[test]
    fn test_party_size_can_ignore_fainted_members() {
        let mut state = state_at_wave(50, 2);
        state.party[1].hp = 0;
        assert!(SceneRequirement::party_size(2, 6, false).meets_requirement(&state));
        assert!(!SceneRequirement::party_size(2, 6, true).meets_requirement(&state));
    }

    #[rstest]
    #[case(40, true)]
    #[case(45, true)]
    #[case(43, false)]
    fn test_wave_modulus(#[case] wave: u32, #[case] expected: bool) {
        let requirement = SceneRequirement::WaveModulus {
            modulus: 5,
            remainders: vec![0],
        };
        assert_eq!(requirement.meets_requirement(&state_at_wave(wave, 1)), expected);
    }

    #[test]
    fn test_zero_modulus_is_an_authoring_error() {
        let requirement = SceneRequirement::WaveModulus {
            modulus: 0,
            remainders: vec![0],
        };
        assert_eq!(requirement.validate(), Err(DefinitionError::ZeroModulus));
        assert!(!requirement.meets_requirement(&state_at_wave(10, 1)));
    }

    #[test]
    fn test_weather_passes_without_active_weather() {
        let requirement = SceneRequirement::Weather(vec![WeatherType::Rain]);
        let mut state = state_at_wave(10, 1);
        assert!(requirement.meets_requirement(&state));
        state.weather = Some(WeatherType::Sunny);
        assert!(!requirement.meets_requirement(&state));
        state.weather = Some(WeatherType::Rain);
        assert!(requirement.meets_requirement(&state));
    }

    #[test]
    fn test_time_of_day() {
        let mut state = state_at_wave(10, 1);
        state.time_of_day = TimeOfDay::Night;
        assert!(SceneRequirement::TimeOfDay(vec![]).meets_requirement(&state));
        assert!(SceneRequirement::TimeOfDay(vec![TimeOfDay::Dusk, TimeOfDay::Night])
            .meets_requirement(&state));
        assert!(!SceneRequirement::TimeOfDay(vec![TimeOfDay::Day]).meets_requirement(&state));
    }

    #[test]
    fn test_money_uses_wave_scaling_when_multiplier_given() {
        let mut state = state_at_wave(10, 1);
        let requirement = SceneRequirement::money(0, 2.0);
        assert_eq!(requirement.required_money(&state), Some(550));
        state.money = 549;
        assert!(!requirement.meets_requirement(&state));
        state.money = 550;
        assert!(requirement.meets_requirement(&state));
        assert_eq!(
            requirement.dialogue_token(&state),
            Some(DialogueToken::new("money", 550))
        );
    }

    #[test]
    fn test_flat_money_requirement() {
        let mut state = state_at_wave(10, 1);
        state.money = 100;
        assert!(SceneRequirement::money(100, 0.0).meets_requirement(&state));
        assert!(!SceneRequirement::money(101, 0.0).meets_requirement(&state));
        assert!(SceneRequirement::money(0, 0.0).meets_requirement(&state));
    }

    #[test]
    fn test_persistent_modifier_sums_stacks_across_kinds() {
        let mut state = state_at_wave(10, 1);
        state.add_modifier(ModifierKind::Lure, 1);
        state.add_modifier(ModifierKind::SuperLure, 2);
        let requirement = SceneRequirement::PersistentModifier {
            kinds: vec![ModifierKind::Lure, ModifierKind::SuperLure],
            min_stack_count: 3,
        };
        assert!(requirement.meets_requirement(&state));
        let stricter = SceneRequirement::PersistentModifier {
            kinds: vec![ModifierKind::Lure],
            min_stack_count: 2,
        };
        assert!(!stricter.meets_requirement(&state));
    }

    #[test]
    fn test_previous_encounter() {
        let mut state = state_at_wave(60, 1);
        let requirement = SceneRequirement::PreviousEncounter(EncounterType::Delibirdy);
        assert!(!requirement.meets_requirement(&state));
        state.encounters.encounter_log.push(SeenEncounter {
            encounter_type: EncounterType::Delibirdy,
            tier: EncounterTier::Uncommon,
            wave_index: 42,
            selected_option: Some(0),
        });
        assert!(requirement.meets_requirement(&state));
    }

    #[test]
    fn test_evaluation_does_not_mutate_state() {
        let state = state_at_wave(30, 3);
        let snapshot = state.clone();
        let requirement = SceneRequirement::party_size(2, 6, true);
        for _ in 0..3 {
            assert!(requirement.meets_requirement(&state));
        }
        assert_eq!(state, snapshot);
    }
}
