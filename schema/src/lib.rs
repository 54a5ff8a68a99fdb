// Mystery Encounter Schema - shared game vocabulary
// Static enums and lookup tables that encounter definitions, requirements and
// the run state all speak in. Nothing here carries per-run state.

pub use encounters::*;
pub use field::*;
pub use items::*;
pub use moves::*;
pub use pokemon_types::*;
pub use species::*;
pub use traits::*;

pub mod encounters;
pub mod field;
pub mod items;
pub mod moves;
pub mod pokemon_types;
pub mod species;
pub mod traits;
