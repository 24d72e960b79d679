//! The formation engine: validation, batching, dispatch and merge.
//!
//! A run picks sequential or parallel execution from the pool size, computes
//! one target skill over the whole pool and hands each batch to a
//! [`RetryScheduler`]. Parallel batches run on scoped worker threads that
//! report back over a channel; the caller waits up to the configured timeout.
//! Identifiers are attached only after every batch has reported, in batch
//! order, so a failed run consumes no identifiers.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use teamforge_config::FormationConfig;
use teamforge_core::{CounterStore, FormationError, Participant, Result};
use tracing::{debug, info, warn};

use crate::assembler::{CompositionRules, TeamAssembler};
use crate::ids::TeamIdAllocator;
use crate::partition::{global_target_skill, BatchPlan, ExecutionMode};
use crate::report::{BatchReport, FormationReport, FormationResult};
use crate::retry::{BatchOutcome, RetryScheduler};

/// A batch's outcome together with its statistics.
struct BatchRun {
    outcome: BatchOutcome,
    report: BatchReport,
}

/// Forms teams from a pool of participants.
///
/// The engine is `Sync`; [`terminate_early`](Self::terminate_early) may be
/// called from another thread while [`build_teams`](Self::build_teams) runs.
/// One run at a time: a second `build_teams` while one is active fails with
/// [`FormationError::AlreadyRunning`].
///
/// # Example
///
/// ```
/// use teamforge_config::FormationConfig;
/// use teamforge_core::{Participant, PersonalityType};
/// use teamforge_engine::{FormationEngine, MemoryCounterStore, TeamIdAllocator};
///
/// let pool = vec![
///     Participant::new("P1", "Ann", 6, "Strategist", "Chess", PersonalityType::Leader),
///     Participant::new("P2", "Ben", 5, "Attacker", "FIFA", PersonalityType::Thinker),
///     Participant::new("P3", "Cid", 5, "Defender", "Go", PersonalityType::Balanced),
/// ];
///
/// let engine = FormationEngine::new(FormationConfig::default());
/// let mut ids = TeamIdAllocator::load(MemoryCounterStore::default()).unwrap();
/// let result = engine.build_teams(&pool, 3, &mut ids).unwrap();
///
/// assert_eq!(result.teams.len(), 1);
/// assert_eq!(result.teams[0].id().to_string(), "TEAM0001");
/// assert_eq!(result.unassigned_count(), 0);
/// ```
#[derive(Debug)]
pub struct FormationEngine {
    config: FormationConfig,
    assembler: TeamAssembler,
    cancel: Mutex<Arc<AtomicBool>>,
    running: AtomicBool,
}

impl Default for FormationEngine {
    fn default() -> Self {
        Self::new(FormationConfig::default())
    }
}

impl FormationEngine {
    pub fn new(config: FormationConfig) -> Self {
        let assembler = TeamAssembler::new(CompositionRules::from(&config.composition));
        Self {
            config,
            assembler,
            cancel: Mutex::new(Arc::new(AtomicBool::new(false))),
            running: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &FormationConfig {
        &self.config
    }

    pub fn assembler(&self) -> &TeamAssembler {
        &self.assembler
    }

    /// Requests that the current run stop.
    ///
    /// Workers notice between assembly attempts and the run fails with
    /// [`FormationError::Cancelled`]. Returns false if no run is active.
    pub fn terminate_early(&self) -> bool {
        if !self.running.load(Ordering::SeqCst) {
            return false;
        }
        self.current_cancel_flag().store(true, Ordering::SeqCst);
        true
    }

    /// Returns true while `build_teams` is executing.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn current_cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel.lock().unwrap_or_else(|e| e.into_inner()))
    }

    /// Rejects team sizes below the minimum, out-of-range skill levels and
    /// repeated participant ids.
    pub fn validate(&self, pool: &[Participant], team_size: usize) -> Result<()> {
        let min = self.config.composition.min_team_size;
        if team_size < min {
            return Err(FormationError::InvalidTeamSize {
                size: team_size,
                min,
            });
        }

        let range = self.config.skill;
        let mut seen = HashSet::with_capacity(pool.len());
        for participant in pool {
            if participant.id.as_str().is_empty() {
                return Err(FormationError::InvalidParticipant {
                    id: participant.id.clone(),
                    reason: "empty id".to_string(),
                });
            }
            if !range.contains(participant.skill_level) {
                return Err(FormationError::InvalidParticipant {
                    id: participant.id.clone(),
                    reason: format!(
                        "skill level {} outside {}..={}",
                        participant.skill_level, range.min, range.max
                    ),
                });
            }
            if !seen.insert(&participant.id) {
                return Err(FormationError::DuplicateParticipant(participant.id.clone()));
            }
        }
        Ok(())
    }

    /// Forms as many teams of `team_size` as the pool allows.
    ///
    /// Identifiers come from `ids` and are attached in the merge step; they
    /// are neither persisted nor rolled back here.
    ///
    /// # Errors
    ///
    /// Invalid input, another run already in progress, a worker that fails or
    /// cannot be spawned, a timeout, or cancellation. No identifiers are
    /// consumed when an error is returned.
    pub fn build_teams<C: CounterStore>(
        &self,
        pool: &[Participant],
        team_size: usize,
        ids: &mut TeamIdAllocator<C>,
    ) -> Result<FormationResult> {
        let _guard = RunGuard::acquire(&self.running)?;

        let cancel = Arc::new(AtomicBool::new(false));
        *self.cancel.lock().unwrap_or_else(|e| e.into_inner()) = Arc::clone(&cancel);

        self.run(pool, team_size, ids, &cancel)
    }

    fn run<C: CounterStore>(
        &self,
        pool: &[Participant],
        team_size: usize,
        ids: &mut TeamIdAllocator<C>,
        cancel: &AtomicBool,
    ) -> Result<FormationResult> {
        let start = Instant::now();
        self.validate(pool, team_size)?;

        let target = global_target_skill(pool, team_size);
        if pool.len() < team_size {
            debug!(
                event = "insufficient_candidates",
                pool_size = pool.len(),
                team_size = team_size,
            );
            return Ok(FormationResult {
                teams: Vec::new(),
                unassigned: pool.to_vec(),
                report: FormationReport::empty(pool.len(), team_size, target),
            });
        }

        let plan = BatchPlan::new(pool.len(), team_size, &self.config.parallel);
        info!(
            event = "formation_start",
            pool_size = pool.len(),
            team_size = team_size,
            mode = %plan.mode,
            workers = plan.worker_count,
            global_target_skill = target,
        );

        let runs = match plan.mode {
            ExecutionMode::Sequential => {
                vec![self.run_batch(0, pool.to_vec(), target, team_size, cancel)?]
            }
            ExecutionMode::Parallel => {
                self.run_parallel(plan.split(pool), target, team_size, cancel)?
            }
        };

        let mut teams = Vec::new();
        let mut unassigned = Vec::new();
        let mut batches = Vec::with_capacity(runs.len());
        for run in runs {
            teams.extend(run.outcome.teams.into_iter().map(|draft| ids.finalize(draft)));
            unassigned.extend(run.outcome.leftover);
            batches.push(run.report);
        }

        let duration = start.elapsed();
        info!(
            event = "formation_end",
            teams = teams.len(),
            unassigned = unassigned.len(),
            duration_ms = duration.as_millis() as u64,
        );

        Ok(FormationResult {
            teams,
            unassigned,
            report: FormationReport {
                mode: plan.mode,
                pool_size: pool.len(),
                team_size,
                global_target_skill: target,
                worker_count: plan.worker_count,
                batches,
                duration,
            },
        })
    }

    fn batch_rng(&self, index: usize) -> ChaCha8Rng {
        match self.config.random_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(index as u64)),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }

    fn run_batch(
        &self,
        index: usize,
        batch: Vec<Participant>,
        target: f64,
        team_size: usize,
        cancel: &AtomicBool,
    ) -> Result<BatchRun> {
        let start = Instant::now();
        let size = batch.len();
        let mut rng = self.batch_rng(index);

        let outcome = RetryScheduler::new(&self.assembler, &self.config.balance, target, team_size)
            .run(batch, &mut rng, cancel)?;

        let report = BatchReport {
            index,
            size,
            target_skill: target,
            teams_formed: outcome.teams.len(),
            leftover: outcome.leftover.len(),
            attempts: outcome.attempts,
            final_tolerance: outcome.final_tolerance,
            stop_reason: outcome.stop_reason,
            duration: start.elapsed(),
        };
        debug!(
            event = "batch_end",
            batch = index,
            size = size,
            teams = report.teams_formed,
            leftover = report.leftover,
            attempts = report.attempts,
            stop_reason = %report.stop_reason,
        );
        Ok(BatchRun { outcome, report })
    }

    fn run_parallel(
        &self,
        batches: Vec<Vec<Participant>>,
        target: f64,
        team_size: usize,
        cancel: &AtomicBool,
    ) -> Result<Vec<BatchRun>> {
        let batch_count = batches.len();
        let timeout = self.config.worker_timeout();
        // None when the timeout is too large to represent: wait without bound.
        let deadline = Instant::now().checked_add(timeout);
        let (tx, rx) = channel::unbounded();

        thread::scope(|s| {
            let mut handles = Vec::with_capacity(batch_count);
            let mut spawn_error = None;

            for (index, batch) in batches.into_iter().enumerate() {
                let tx = tx.clone();
                debug!(event = "batch_dispatch", batch = index, size = batch.len());

                let spawned = thread::Builder::new()
                    .name(format!("teamforge-batch-{index}"))
                    .spawn_scoped(s, move || {
                        let result = run_guarded(index, || {
                            self.run_batch(index, batch, target, team_size, cancel)
                        });
                        // The receiver is gone only if the run already failed.
                        let _ = tx.send((index, result));
                    });

                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        spawn_error = Some(FormationError::WorkerSpawn {
                            batch: index,
                            source,
                        });
                        break;
                    }
                }
            }
            drop(tx);

            let collected = match spawn_error {
                Some(err) => Err(err),
                None => collect_batches(&rx, batch_count, deadline, timeout),
            };
            if let Err(err) = &collected {
                warn!(event = "formation_failed", error = %err);
                cancel.store(true, Ordering::SeqCst);
            }

            for handle in handles {
                // Panics were caught inside the worker.
                let _ = handle.join();
            }
            collected
        })
    }
}

/// Clears the running flag when a run ends, including by panic.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(running: &'a AtomicBool) -> Result<Self> {
        running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| FormationError::AlreadyRunning)?;
        Ok(Self(running))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Runs one batch, turning a panic into [`FormationError::WorkerFailed`].
fn run_guarded<T>(batch: usize, work: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|payload| {
        Err(FormationError::WorkerFailed {
            batch,
            message: panic_message(&*payload),
        })
    })
}

/// Receives one report per batch, returning them in batch order.
///
/// Without a deadline it waits until every worker has reported or hung up.
fn collect_batches<T>(
    rx: &Receiver<(usize, Result<T>)>,
    batch_count: usize,
    deadline: Option<Instant>,
    timeout: Duration,
) -> Result<Vec<T>> {
    let mut slots: Vec<Option<T>> = (0..batch_count).map(|_| None).collect();

    for _ in 0..batch_count {
        let received = match deadline {
            Some(deadline) => rx.recv_deadline(deadline),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok((index, Ok(run))) => slots[index] = Some(run),
            Ok((_, Err(err))) => return Err(err),
            Err(RecvTimeoutError::Timeout) => return Err(FormationError::WorkerTimeout(timeout)),
            Err(RecvTimeoutError::Disconnected) => {
                let batch = slots.iter().position(Option::is_none).unwrap_or(0);
                return Err(FormationError::WorkerFailed {
                    batch,
                    message: "worker exited without reporting".to_string(),
                });
            }
        }
    }

    Ok(slots.into_iter().flatten().collect())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
