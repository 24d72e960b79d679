//! TeamForge - Balanced Team Formation in Rust
//!
//! Hand over a pool of participants and a team size; get back full teams that
//! respect the composition rules and sit close to one shared skill target.
//!
//! # Example
//!
//! ```rust
//! use teamforge::prelude::*;
//!
//! let pool = vec![
//!     Participant::new("P1", "Ann", 7, "Strategist", "Chess", PersonalityType::Leader),
//!     Participant::new("P2", "Ben", 6, "Attacker", "FIFA", PersonalityType::Thinker),
//!     Participant::new("P3", "Cid", 5, "Defender", "Go", PersonalityType::Balanced),
//!     Participant::new("P4", "Dee", 4, "Supporter", "Chess", PersonalityType::Balanced),
//! ];
//!
//! let result = teamforge::form_teams(&pool, 3).unwrap();
//! assert_eq!(result.teams.len(), 1);
//! assert_eq!(result.unassigned_count(), 1);
//! assert_eq!(result.teams[0].id().to_string(), "TEAM0001");
//! ```

// Domain types
pub use teamforge_core::{
    CounterStore, DraftTeam, FormationError, Participant, ParticipantId, ParticipantStatus,
    PersonalityType, Result, StoreError, Team, TeamId, TeamStats,
};

// Configuration
pub use teamforge_config::{
    BalanceConfig, CompositionConfig, ConfigError, FormationConfig, ParallelConfig, SkillRange,
};

// Engine
pub use teamforge_engine::{
    BalanceValidator, BatchReport, CommitSummary, CompositionRules, ExecutionMode,
    FileCounterStore, FormationEngine, FormationReport, FormationResult, MemoryCounterStore,
    PendingRun, StopReason, TeamAssembler, TeamFormationService, TeamIdAllocator,
};

mod formation;
pub use formation::{form_teams, open_session, CONFIG_FILE};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{
        FormationConfig, FormationEngine, FormationError, FormationResult, Participant,
        ParticipantId, ParticipantStatus, PersonalityType, Team, TeamFormationService, TeamId,
    };
    pub use super::{FileCounterStore, MemoryCounterStore};
}
