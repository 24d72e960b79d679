//! The per-batch retry loop.
//!
//! A [`RetryScheduler`] repeatedly asks the assembler for a candidate and the
//! balance validator for a verdict until the batch runs dry, the failure
//! budget is spent, or the tolerance ceiling has been tried without success.
//! Rejections never leave this loop; only cancellation does.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::seq::SliceRandom;
use rand::Rng;
use teamforge_config::BalanceConfig;
use teamforge_core::{DraftTeam, FormationError, Participant, Result};
use tracing::{debug, trace};

use crate::assembler::TeamAssembler;
use crate::balance::{BalanceValidator, ToleranceSchedule};

/// Why a batch stopped forming teams. All variants are normal outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Fewer participants remain than one team needs.
    PoolExhausted,
    /// The consecutive-failure budget was spent.
    AttemptsExhausted,
    /// A full relaxation window failed at the tolerance ceiling.
    ToleranceExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::PoolExhausted => write!(f, "PoolExhausted"),
            StopReason::AttemptsExhausted => write!(f, "AttemptsExhausted"),
            StopReason::ToleranceExhausted => write!(f, "ToleranceExhausted"),
        }
    }
}

/// Result of running the retry loop over one batch.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Accepted teams, still without identifiers.
    pub teams: Vec<DraftTeam>,
    /// Participants left unassigned in this batch.
    pub leftover: Vec<Participant>,
    /// Total assembly attempts made.
    pub attempts: u64,
    /// Tolerance in force when the loop stopped.
    pub final_tolerance: f64,
    pub stop_reason: StopReason,
}

/// Drives repeated assembly attempts for one batch.
#[derive(Debug)]
pub struct RetryScheduler<'a> {
    assembler: &'a TeamAssembler,
    schedule: ToleranceSchedule,
    target_skill: f64,
    team_size: usize,
    relax_every: u32,
    max_attempts: u32,
}

impl<'a> RetryScheduler<'a> {
    pub fn new(
        assembler: &'a TeamAssembler,
        balance: &BalanceConfig,
        target_skill: f64,
        team_size: usize,
    ) -> Self {
        Self {
            assembler,
            schedule: ToleranceSchedule::from(balance),
            target_skill,
            team_size,
            relax_every: balance.relax_every.max(1),
            max_attempts: balance.max_attempts,
        }
    }

    /// Forms as many teams as possible from `pool`.
    ///
    /// `cancel` is checked before every attempt.
    ///
    /// # Errors
    ///
    /// Returns [`FormationError::Cancelled`] once `cancel` is raised.
    pub fn run<R: Rng + ?Sized>(
        mut self,
        mut pool: Vec<Participant>,
        rng: &mut R,
        cancel: &AtomicBool,
    ) -> Result<BatchOutcome> {
        pool.shuffle(rng);

        let mut teams = Vec::new();
        let mut attempts = 0u64;
        let mut failures = 0u32;

        let stop_reason = loop {
            if pool.len() < self.team_size {
                break StopReason::PoolExhausted;
            }
            if failures >= self.max_attempts {
                break StopReason::AttemptsExhausted;
            }
            if cancel.load(Ordering::Relaxed) {
                return Err(FormationError::Cancelled);
            }

            attempts += 1;
            let validator = BalanceValidator::new(self.target_skill, self.schedule.current());
            let candidate = self.assembler.assemble(&pool, self.team_size, rng);

            match candidate {
                Some(team) if validator.accepts(&team) => {
                    pool.retain(|p| !team.contains(&p.id));
                    teams.push(team);
                    failures = 0;
                    self.schedule.reset();
                }
                candidate => {
                    trace!(
                        event = "attempt_rejected",
                        attempt = attempts,
                        assembled = candidate.is_some(),
                        average_skill = candidate.as_ref().map(DraftTeam::average_skill),
                        tolerance = validator.tolerance(),
                    );
                    failures += 1;
                    if failures % self.relax_every == 0 {
                        if !self.schedule.relax() {
                            break StopReason::ToleranceExhausted;
                        }
                        debug!(
                            event = "tolerance_relaxed",
                            tolerance = self.schedule.current(),
                            failures = failures,
                        );
                    }
                    pool.shuffle(rng);
                }
            }
        };

        Ok(BatchOutcome {
            teams,
            leftover: pool,
            attempts,
            final_tolerance: self.schedule.current(),
            stop_reason,
        })
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
