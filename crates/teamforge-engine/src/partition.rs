//! Execution mode selection and pool partitioning.
//!
//! Large pools are split into contiguous, disjoint batches that workers
//! process independently. Every batch is judged against one target skill
//! computed over the whole pool, so teams stay comparable across batches.

use std::fmt;

use teamforge_config::ParallelConfig;
use teamforge_core::Participant;

/// How a formation run is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One batch, processed on the calling thread.
    Sequential,
    /// Several batches, one worker thread each.
    Parallel,
}

impl ExecutionMode {
    /// Picks the mode for a pool of `pool_len` participants.
    pub fn for_pool(pool_len: usize, config: &ParallelConfig) -> Self {
        if pool_len < config.threshold {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Parallel
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Sequential => write!(f, "Sequential"),
            ExecutionMode::Parallel => write!(f, "Parallel"),
        }
    }
}

/// Average skill every team should aim for.
///
/// Computed once as `total_skill / (max(1, pool / n) * n)`, the mean skill
/// of the participants that could be placed if the pool split evenly.
pub fn global_target_skill(pool: &[Participant], team_size: usize) -> f64 {
    if team_size == 0 {
        return 0.0;
    }
    let total: u64 = pool.iter().map(|p| u64::from(p.skill_level)).sum();
    let team_count = (pool.len() / team_size).max(1);
    total as f64 / (team_count * team_size) as f64
}

/// How a pool is divided among workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub mode: ExecutionMode,
    pub worker_count: usize,
    pub batch_size: usize,
}

impl BatchPlan {
    /// Plans a run over `pool_len` participants with teams of `team_size`.
    ///
    /// In parallel mode the worker count is `min(max_workers, max(2,
    /// pool / (3n)))` and batches hold `max(3n, ceil(pool / workers))`
    /// participants, so there are never more batches than workers.
    pub fn new(pool_len: usize, team_size: usize, config: &ParallelConfig) -> Self {
        match ExecutionMode::for_pool(pool_len, config) {
            ExecutionMode::Sequential => Self {
                mode: ExecutionMode::Sequential,
                worker_count: 1,
                batch_size: pool_len.max(1),
            },
            ExecutionMode::Parallel => {
                let min_batch = team_size.saturating_mul(3).max(1);
                let worker_count = config.max_workers.min((pool_len / min_batch).max(2)).max(1);
                let batch_size = min_batch.max(pool_len.div_ceil(worker_count));
                Self {
                    mode: ExecutionMode::Parallel,
                    worker_count,
                    batch_size,
                }
            }
        }
    }

    /// Number of batches `pool_len` participants produce.
    pub fn batch_count(&self, pool_len: usize) -> usize {
        pool_len.div_ceil(self.batch_size)
    }

    /// Splits `pool` into contiguous batches in input order. The last batch
    /// may be smaller.
    pub fn split(&self, pool: &[Participant]) -> Vec<Vec<Participant>> {
        pool.chunks(self.batch_size).map(<[_]>::to_vec).collect()
    }
}
