//! The built-in encounter definitions.

mod delibirdy;
mod lost_at_sea;
mod training_session;

use crate::encounter::MysteryEncounter;
use crate::errors::DefinitionResult;
use std::sync::Arc;

pub use delibirdy::delibirdy;
pub use lost_at_sea::lost_at_sea;
pub use training_session::training_session;

/// Builds every registered encounter, ready to be passed to
/// [`select_encounter`](crate::encounter::select_encounter).
pub fn all_encounters() -> DefinitionResult<Vec<Arc<MysteryEncounter>>> {
    Ok(vec![
        Arc::new(delibirdy()?),
        Arc::new(training_session()?),
        Arc::new(lost_at_sea()?),
    ])
}
