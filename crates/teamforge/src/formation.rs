//! Formation entry points that hide the engine wiring.

use std::path::Path;

use teamforge_config::FormationConfig;
use teamforge_core::{Participant, Result};
use teamforge_engine::{
    FileCounterStore, FormationEngine, FormationResult, MemoryCounterStore, TeamFormationService,
    TeamIdAllocator,
};

/// Configuration file read by the entry points when present.
pub const CONFIG_FILE: &str = "teamforge.toml";

fn load_config() -> FormationConfig {
    FormationConfig::load(CONFIG_FILE).unwrap_or_default()
}

/// Forms teams from `pool` in one call.
///
/// Settings come from `teamforge.toml` in the working directory, or the
/// defaults if it is missing. Team identifiers start at `TEAM0001` and are not
/// persisted.
pub fn form_teams(pool: &[Participant], team_size: usize) -> Result<FormationResult> {
    #[cfg(feature = "console")]
    crate::console::init();

    let engine = FormationEngine::new(load_config());
    let mut ids = TeamIdAllocator::load(MemoryCounterStore::default())?;
    engine.build_teams(pool, team_size, &mut ids)
}

/// Opens a formation session whose team counter lives in `counter_path`.
///
/// Settings are read as in [`form_teams`].
pub fn open_session(
    counter_path: impl AsRef<Path>,
) -> Result<TeamFormationService<FileCounterStore>> {
    #[cfg(feature = "console")]
    crate::console::init();

    TeamFormationService::new(
        load_config(),
        FileCounterStore::new(counter_path.as_ref()),
    )
}
