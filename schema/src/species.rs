use crate::{EvolutionItem, FormChangeItem, PokemonType};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Species {
    Bulbasaur,
    Ivysaur,
    Charmander,
    Charmeleon,
    Charizard,
    Squirtle,
    Pikachu,
    Raichu,
    Eevee,
    Vaporeon,
    Jolteon,
    Flareon,
    Gloom,
    Vileplume,
    Bellossom,
    Magikarp,
    Gyarados,
    Lapras,
    Snorlax,
    Dragonite,
    Mewtwo,
    Delibird,
    Wingull,
    Pelipper,
    Wailmer,
    Rayquaza,
}

/// Static per-species facts that requirements and the battle initializer
/// consult. Looked up with [`Species::data`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesData {
    pub types: &'static [PokemonType],
    pub weight_kg: f64,
    pub base_stat_total: u16,
    /// Item-triggered evolutions as `(item, evolves_into)`.
    pub item_evolutions: &'static [(EvolutionItem, Species)],
    pub form_change_items: &'static [FormChangeItem],
}

impl SpeciesData {
    pub fn has_type(&self, pokemon_type: PokemonType) -> bool {
        self.types.contains(&pokemon_type)
    }

    pub fn evolves_with(&self, item: EvolutionItem) -> Option<Species> {
        self.item_evolutions
            .iter()
            .find(|(trigger, _)| *trigger == item)
            .map(|(_, target)| *target)
    }

    pub fn changes_form_with(&self, item: FormChangeItem) -> bool {
        self.form_change_items.contains(&item)
    }
}

impl Species {
    pub fn data(self) -> &'static SpeciesData {
        use EvolutionItem::*;
        use PokemonType::*;
        match self {
            Species::Bulbasaur => &SpeciesData {
                types: &[Grass, Poison],
                weight_kg: 6.9,
                base_stat_total: 318,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Ivysaur => &SpeciesData {
                types: &[Grass, Poison],
                weight_kg: 13.0,
                base_stat_total: 405,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Charmander => &SpeciesData {
                types: &[Fire],
                weight_kg: 8.5,
                base_stat_total: 309,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Charmeleon => &SpeciesData {
                types: &[Fire],
                weight_kg: 19.0,
                base_stat_total: 405,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Charizard => &SpeciesData {
                types: &[Fire, Flying],
                weight_kg: 90.5,
                base_stat_total: 534,
                item_evolutions: &[],
                form_change_items: &[FormChangeItem::CharizarditeX, FormChangeItem::CharizarditeY],
            },
            Species::Squirtle => &SpeciesData {
                types: &[Water],
                weight_kg: 9.0,
                base_stat_total: 314,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Pikachu => &SpeciesData {
                types: &[Electric],
                weight_kg: 6.0,
                base_stat_total: 320,
                item_evolutions: &[(ThunderStone, Species::Raichu)],
                form_change_items: &[],
            },
            Species::Raichu => &SpeciesData {
                types: &[Electric],
                weight_kg: 30.0,
                base_stat_total: 485,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Eevee => &SpeciesData {
                types: &[Normal],
                weight_kg: 6.5,
                base_stat_total: 325,
                item_evolutions: &[
                    (WaterStone, Species::Vaporeon),
                    (ThunderStone, Species::Jolteon),
                    (FireStone, Species::Flareon),
                ],
                form_change_items: &[],
            },
            Species::Vaporeon => &SpeciesData {
                types: &[Water],
                weight_kg: 29.0,
                base_stat_total: 525,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Jolteon => &SpeciesData {
                types: &[Electric],
                weight_kg: 24.5,
                base_stat_total: 525,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Flareon => &SpeciesData {
                types: &[Fire],
                weight_kg: 25.0,
                base_stat_total: 525,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Gloom => &SpeciesData {
                types: &[Grass, Poison],
                weight_kg: 8.6,
                base_stat_total: 395,
                item_evolutions: &[(LeafStone, Species::Vileplume), (SunStone, Species::Bellossom)],
                form_change_items: &[],
            },
            Species::Vileplume => &SpeciesData {
                types: &[Grass, Poison],
                weight_kg: 18.6,
                base_stat_total: 490,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Bellossom => &SpeciesData {
                types: &[Grass],
                weight_kg: 5.8,
                base_stat_total: 490,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Magikarp => &SpeciesData {
                types: &[Water],
                weight_kg: 10.0,
                base_stat_total: 200,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Gyarados => &SpeciesData {
                types: &[Water, Flying],
                weight_kg: 235.0,
                base_stat_total: 540,
                item_evolutions: &[],
                form_change_items: &[FormChangeItem::Gyaradosite],
            },
            Species::Lapras => &SpeciesData {
                types: &[Water, Ice],
                weight_kg: 220.0,
                base_stat_total: 535,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Snorlax => &SpeciesData {
                types: &[Normal],
                weight_kg: 460.0,
                base_stat_total: 540,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Dragonite => &SpeciesData {
                types: &[Dragon, Flying],
                weight_kg: 210.0,
                base_stat_total: 600,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Mewtwo => &SpeciesData {
                types: &[Psychic],
                weight_kg: 122.0,
                base_stat_total: 680,
                item_evolutions: &[],
                form_change_items: &[FormChangeItem::MewtwoniteX, FormChangeItem::MewtwoniteY],
            },
            Species::Delibird => &SpeciesData {
                types: &[Ice, Flying],
                weight_kg: 16.0,
                base_stat_total: 330,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Wingull => &SpeciesData {
                types: &[Water, Flying],
                weight_kg: 9.5,
                base_stat_total: 270,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Pelipper => &SpeciesData {
                types: &[Water, Flying],
                weight_kg: 28.0,
                base_stat_total: 440,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Wailmer => &SpeciesData {
                types: &[Water],
                weight_kg: 130.0,
                base_stat_total: 400,
                item_evolutions: &[],
                form_change_items: &[],
            },
            Species::Rayquaza => &SpeciesData {
                types: &[Dragon, Flying],
                weight_kg: 206.5,
                base_stat_total: 680,
                item_evolutions: &[],
                form_change_items: &[],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_evolution_lookup() {
        let eevee = Species::Eevee.data();
        assert_eq!(eevee.evolves_with(EvolutionItem::FireStone), Some(Species::Flareon));
        assert_eq!(eevee.evolves_with(EvolutionItem::LeafStone), None);
    }

    #[test]
    fn test_type_membership() {
        assert!(Species::Gyarados.data().has_type(PokemonType::Flying));
        assert!(!Species::Magikarp.data().has_type(PokemonType::Flying));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Species::Pikachu.to_string(), "Pikachu");
        assert_eq!(crate::HeldItemKind::KingsRock.to_string(), "King's Rock");
    }
}
