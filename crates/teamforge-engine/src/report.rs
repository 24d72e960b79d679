//! Formation run results and statistics.

use std::time::Duration;

use teamforge_core::{Participant, ParticipantId, Team};

use crate::partition::ExecutionMode;
use crate::retry::StopReason;

/// Statistics for a single batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    /// Index of this batch (0-based, in pool order).
    pub index: usize,
    /// Participants handed to the worker.
    pub size: usize,
    /// Target skill the batch was judged against.
    pub target_skill: f64,
    pub teams_formed: usize,
    pub leftover: usize,
    /// Assembly attempts made by the worker.
    pub attempts: u64,
    /// Tolerance in force when the worker stopped.
    pub final_tolerance: f64,
    pub stop_reason: StopReason,
    /// Wall time spent in the worker.
    pub duration: Duration,
}

/// Complete statistics for a formation run.
#[derive(Debug, Clone, PartialEq)]
pub struct FormationReport {
    pub mode: ExecutionMode,
    pub pool_size: usize,
    pub team_size: usize,
    /// Target skill shared by every batch.
    pub global_target_skill: f64,
    pub worker_count: usize,
    /// Per-batch statistics, in batch order.
    pub batches: Vec<BatchReport>,
    /// Total time from validation to merge.
    pub duration: Duration,
}

impl FormationReport {
    /// Creates an empty report for a run that never dispatched a batch.
    pub fn empty(pool_size: usize, team_size: usize, global_target_skill: f64) -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            pool_size,
            team_size,
            global_target_skill,
            worker_count: 0,
            batches: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Returns the total number of assembly attempts across batches.
    pub fn total_attempts(&self) -> u64 {
        self.batches.iter().map(|b| b.attempts).sum()
    }

    pub fn teams_formed(&self) -> usize {
        self.batches.iter().map(|b| b.teams_formed).sum()
    }

    /// Returns true if every batch was judged against the global target.
    pub fn targets_consistent(&self) -> bool {
        self.batches
            .iter()
            .all(|b| b.target_skill == self.global_target_skill)
    }
}

/// Finalized teams and leftovers from one formation run.
#[derive(Debug, Clone)]
pub struct FormationResult {
    pub teams: Vec<Team>,
    /// Participants that were not placed in any team.
    pub unassigned: Vec<Participant>,
    pub report: FormationReport,
}

impl FormationResult {
    pub fn unassigned_count(&self) -> usize {
        self.unassigned.len()
    }

    /// Returns the team `participant_id` was placed in, if any.
    pub fn find_team(&self, participant_id: &ParticipantId) -> Option<&Team> {
        self.teams.iter().find(|t| t.contains(participant_id))
    }

    /// Mean of the teams' average skills, or `None` when no team formed.
    pub fn mean_team_average(&self) -> Option<f64> {
        if self.teams.is_empty() {
            return None;
        }
        let sum: f64 = self.teams.iter().map(Team::average_skill).sum();
        Some(sum / self.teams.len() as f64)
    }
}
