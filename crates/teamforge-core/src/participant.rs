//! Participant records as seen by the formation engine.
//!
//! Records are owned by an external registry. The engine only reads them,
//! except for [`ParticipantStatus`], which changes when a run is committed.

use std::fmt;

/// Unique participant identifier assigned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Personality category a participant has been classified into.
///
/// Classification from survey scores happens upstream; every record
/// reaching the engine carries exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PersonalityType {
    Leader,
    Thinker,
    Balanced,
}

impl PersonalityType {
    /// All personality types, in index order.
    pub const ALL: [PersonalityType; 3] = [
        PersonalityType::Leader,
        PersonalityType::Thinker,
        PersonalityType::Balanced,
    ];

    /// Dense index used for per-type counters.
    pub fn index(self) -> usize {
        match self {
            PersonalityType::Leader => 0,
            PersonalityType::Thinker => 1,
            PersonalityType::Balanced => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PersonalityType::Leader => "Leader",
            PersonalityType::Thinker => "Thinker",
            PersonalityType::Balanced => "Balanced",
        }
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assignment status of a participant in the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParticipantStatus {
    #[default]
    Available,
    Assigned,
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantStatus::Available => f.write_str("Available"),
            ParticipantStatus::Assigned => f.write_str("Assigned"),
        }
    }
}

/// A candidate for team formation.
///
/// # Example
///
/// ```
/// use teamforge_core::{Participant, ParticipantStatus, PersonalityType};
///
/// let p = Participant::new("P001", "Ada", 7, "Strategist", "Chess", PersonalityType::Leader);
/// assert_eq!(p.status, ParticipantStatus::Available);
/// assert!(p.is_leader());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub skill_level: u32,
    pub preferred_role: String,
    pub preferred_game: String,
    pub personality_type: PersonalityType,
    pub status: ParticipantStatus,
}

impl Participant {
    /// Creates an available participant.
    pub fn new(
        id: impl Into<ParticipantId>,
        name: impl Into<String>,
        skill_level: u32,
        preferred_role: impl Into<String>,
        preferred_game: impl Into<String>,
        personality_type: PersonalityType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            skill_level,
            preferred_role: preferred_role.into(),
            preferred_game: preferred_game.into(),
            personality_type,
            status: ParticipantStatus::Available,
        }
    }

    pub fn with_status(mut self, status: ParticipantStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_available(&self) -> bool {
        self.status == ParticipantStatus::Available
    }

    pub fn is_leader(&self) -> bool {
        self.personality_type == PersonalityType::Leader
    }

    pub fn is_thinker(&self) -> bool {
        self.personality_type == PersonalityType::Thinker
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} | Game: {} | Skill: {} | Role: {} | Type: {}",
            self.id,
            self.name,
            self.preferred_game,
            self.skill_level,
            self.preferred_role,
            self.personality_type
        )
    }
}
