//! TeamForge Formation Engine
//!
//! This crate provides the team formation pipeline including:
//! - Single-team assembly under hard composition rules
//! - Skill-balance acceptance with adaptive tolerance
//! - The per-batch retry loop
//! - Sequential and parallel execution with one global target skill
//! - Sequential team identifiers with persist and rollback
//! - Formation sessions (generate, commit, discard)

pub mod assembler;
pub mod balance;
pub mod engine;
pub mod ids;
pub mod partition;
pub mod report;
pub mod retry;
pub mod service;
pub mod store;

pub use assembler::{CompositionRules, TeamAssembler};
pub use balance::{BalanceValidator, ToleranceSchedule};
pub use engine::FormationEngine;
pub use ids::{CounterSnapshot, TeamIdAllocator};
pub use partition::{global_target_skill, BatchPlan, ExecutionMode};
pub use report::{BatchReport, FormationReport, FormationResult};
pub use retry::{BatchOutcome, RetryScheduler, StopReason};
pub use service::{CommitSummary, PendingRun, TeamFormationService};
pub use store::{FileCounterStore, MemoryCounterStore};
