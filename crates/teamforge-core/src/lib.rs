//! TeamForge Core - domain types for team formation
//!
//! This crate provides the fundamental abstractions for TeamForge:
//! - Participant records and their personality classification
//! - Draft and finalized teams with derived composition statistics
//! - Error types shared by the engine and its collaborators
//! - The persistence interface for the team-id counter

pub mod error;
pub mod participant;
pub mod store;
pub mod team;

pub use error::{FormationError, Result, StoreError};
pub use participant::{Participant, ParticipantId, ParticipantStatus, PersonalityType};
pub use store::CounterStore;
pub use team::{DraftTeam, Team, TeamId, TeamStats};
