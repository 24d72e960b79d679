//! Formation sessions: generate a run, then commit or discard it.
//!
//! A generated run stays pending until the caller decides. Committing makes
//! the team identifiers durable and marks the members as assigned;
//! discarding hands the identifiers back so the next run reuses them.

use std::collections::HashSet;

use teamforge_config::FormationConfig;
use teamforge_core::{
    CounterStore, FormationError, Participant, ParticipantId, ParticipantStatus, Result, Team,
    TeamId,
};
use tracing::{info, warn};

use crate::engine::FormationEngine;
use crate::ids::{CounterSnapshot, TeamIdAllocator};
use crate::report::FormationResult;

/// A generated run awaiting commit or discard.
#[derive(Debug, Clone)]
pub struct PendingRun {
    snapshot: CounterSnapshot,
    result: FormationResult,
}

impl PendingRun {
    pub fn result(&self) -> &FormationResult {
        &self.result
    }

    pub fn teams(&self) -> &[Team] {
        &self.result.teams
    }

    /// Counter value before the run started.
    pub fn snapshot(&self) -> CounterSnapshot {
        self.snapshot
    }
}

/// What a successful commit changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub teams: usize,
    /// Registry records switched to [`ParticipantStatus::Assigned`].
    pub assigned: usize,
    pub last_team_id: Option<TeamId>,
}

/// Owns the engine and the identifier counter across runs.
#[derive(Debug)]
pub struct TeamFormationService<C: CounterStore> {
    engine: FormationEngine,
    ids: TeamIdAllocator<C>,
    pending: Option<PendingRun>,
}

impl<C: CounterStore> TeamFormationService<C> {
    /// Creates a service, reading the counter from `store`.
    pub fn new(config: FormationConfig, store: C) -> Result<Self> {
        Ok(Self {
            engine: FormationEngine::new(config),
            ids: TeamIdAllocator::load(store)?,
            pending: None,
        })
    }

    pub fn engine(&self) -> &FormationEngine {
        &self.engine
    }

    pub fn ids(&self) -> &TeamIdAllocator<C> {
        &self.ids
    }

    pub fn pending(&self) -> Option<&PendingRun> {
        self.pending.as_ref()
    }

    /// Forms teams from the available participants in `participants`.
    ///
    /// A run that is still pending is discarded first.
    pub fn generate(
        &mut self,
        participants: &[Participant],
        team_size: usize,
    ) -> Result<&FormationResult> {
        if let Some(previous) = self.pending.take() {
            warn!(
                event = "pending_run_discarded",
                teams = previous.result.teams.len(),
            );
            self.ids.rollback(previous.snapshot);
        }

        let available: Vec<Participant> = participants
            .iter()
            .filter(|p| p.is_available())
            .cloned()
            .collect();
        let snapshot = self.ids.snapshot();

        let result = match self.engine.build_teams(&available, team_size, &mut self.ids) {
            Ok(result) => result,
            Err(err) => {
                self.ids.rollback(snapshot);
                return Err(err);
            }
        };

        let run = self.pending.insert(PendingRun { snapshot, result });
        Ok(&run.result)
    }

    /// Persists the counter and marks the pending run's members as assigned
    /// in `participants`.
    ///
    /// If the counter cannot be written, nothing changes and the run stays
    /// pending, so the commit can be retried with the same identifiers.
    pub fn commit(&mut self, participants: &mut [Participant]) -> Result<CommitSummary> {
        if self.pending.is_none() {
            return Err(FormationError::NoPendingRun);
        }
        self.ids.persist()?;
        let run = self.pending.take().ok_or(FormationError::NoPendingRun)?;

        let placed: HashSet<&ParticipantId> =
            run.result.teams.iter().flat_map(|t| t.member_ids()).collect();
        let mut assigned = 0;
        for participant in participants.iter_mut() {
            if placed.contains(&participant.id) {
                participant.status = ParticipantStatus::Assigned;
                assigned += 1;
            }
        }

        let summary = CommitSummary {
            teams: run.result.teams.len(),
            assigned,
            last_team_id: run.result.teams.last().map(Team::id),
        };
        info!(
            event = "run_committed",
            teams = summary.teams,
            assigned = summary.assigned,
            counter = self.ids.persisted(),
        );
        Ok(summary)
    }

    /// Drops the pending run and restores the counter.
    pub fn discard(&mut self) -> Result<()> {
        let run = self.pending.take().ok_or(FormationError::NoPendingRun)?;
        self.ids.rollback(run.snapshot);
        info!(
            event = "run_discarded",
            teams = run.result.teams.len(),
            counter = self.ids.current(),
        );
        Ok(())
    }

    /// Looks up the pending team containing `participant_id`.
    pub fn find_team(&self, participant_id: &ParticipantId) -> Option<&Team> {
        self.pending.as_ref()?.result.find_team(participant_id)
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
