//! Error types for TeamForge

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::participant::ParticipantId;

/// Errors raised by a team-id counter store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing medium could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The stored counter value could not be parsed
    #[error("Corrupt counter value: {0}")]
    Corrupt(String),
}

/// Main error type for team formation operations
///
/// Constraint and skill-balance rejections never surface here; they are
/// recovered inside the worker loop. Only invalid input and infrastructure
/// failures reach the caller.
#[derive(Debug, Error)]
pub enum FormationError {
    /// Requested team size is below the configured minimum
    #[error("Team size {size} is below the minimum of {min}")]
    InvalidTeamSize { size: usize, min: usize },

    /// A participant record failed validation
    #[error("Invalid participant {id}: {reason}")]
    InvalidParticipant { id: ParticipantId, reason: String },

    /// The same participant id appears more than once in the pool
    #[error("Duplicate participant id: {0}")]
    DuplicateParticipant(ParticipantId),

    /// A worker thread could not be started
    #[error("Failed to spawn worker for batch {batch}: {source}")]
    WorkerSpawn {
        batch: usize,
        #[source]
        source: io::Error,
    },

    /// A worker panicked or disconnected before reporting
    #[error("Worker for batch {batch} failed: {message}")]
    WorkerFailed { batch: usize, message: String },

    /// Workers did not all report back within the configured wait
    #[error("Workers did not finish within {0:?}")]
    WorkerTimeout(Duration),

    /// A run was started while another run on the same engine was active
    #[error("A formation run is already in progress")]
    AlreadyRunning,

    /// Formation was cancelled before completion
    #[error("Team formation was cancelled")]
    Cancelled,

    /// Commit or discard was requested with no pending run
    #[error("No pending formation run")]
    NoPendingRun,

    /// The team-id counter could not be persisted
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
}

/// Result type alias for TeamForge operations
pub type Result<T> = std::result::Result<T, FormationError>;
