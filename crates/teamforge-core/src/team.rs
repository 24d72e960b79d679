//! Teams and their identifier lifecycle.
//!
//! A team starts as a [`DraftTeam`], which has no identifier at all. Only the
//! id allocator turns a draft into a [`Team`] by attaching a sequential
//! [`TeamId`], so reading the id of an unfinalized team cannot compile.

use std::collections::BTreeMap;
use std::fmt;

use crate::participant::{Participant, ParticipantId, PersonalityType};

/// Permanent, sequential team identifier.
///
/// Displays as `TEAM0001`, `TEAM0002`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TeamId(u64);

impl TeamId {
    pub fn new(sequence: u64) -> Self {
        Self(sequence)
    }

    /// Returns the sequence number backing this id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TEAM{:04}", self.0)
    }
}

/// Composition statistics derived from a team's members.
///
/// Updated on every member addition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamStats {
    member_count: usize,
    skill_total: u64,
    personality_counts: [usize; 3],
    role_counts: BTreeMap<String, usize>,
    game_counts: BTreeMap<String, usize>,
}

impl TeamStats {
    fn record(&mut self, participant: &Participant) {
        self.member_count += 1;
        self.skill_total += u64::from(participant.skill_level);
        self.personality_counts[participant.personality_type.index()] += 1;
        *self
            .role_counts
            .entry(participant.preferred_role.clone())
            .or_insert(0) += 1;
        *self
            .game_counts
            .entry(participant.preferred_game.clone())
            .or_insert(0) += 1;
    }

    pub fn member_count(&self) -> usize {
        self.member_count
    }

    pub fn skill_total(&self) -> u64 {
        self.skill_total
    }

    /// Mean skill level, or 0.0 for an empty team.
    pub fn average_skill(&self) -> f64 {
        if self.member_count == 0 {
            0.0
        } else {
            self.skill_total as f64 / self.member_count as f64
        }
    }

    pub fn personality_count(&self, personality: PersonalityType) -> usize {
        self.personality_counts[personality.index()]
    }

    pub fn leader_count(&self) -> usize {
        self.personality_count(PersonalityType::Leader)
    }

    pub fn thinker_count(&self) -> usize {
        self.personality_count(PersonalityType::Thinker)
    }

    pub fn role_count(&self, role: &str) -> usize {
        self.role_counts.get(role).copied().unwrap_or(0)
    }

    pub fn game_count(&self, game: &str) -> usize {
        self.game_counts.get(game).copied().unwrap_or(0)
    }

    pub fn distinct_roles(&self) -> usize {
        self.role_counts.len()
    }

    /// Largest number of members sharing one preferred game.
    pub fn max_game_count(&self) -> usize {
        self.game_counts.values().copied().max().unwrap_or(0)
    }

    pub fn role_distribution(&self) -> &BTreeMap<String, usize> {
        &self.role_counts
    }

    pub fn game_distribution(&self) -> &BTreeMap<String, usize> {
        &self.game_counts
    }

    pub fn personality_distribution(&self) -> [(PersonalityType, usize); 3] {
        PersonalityType::ALL.map(|t| (t, self.personality_count(t)))
    }
}

/// A team under construction. Has no identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftTeam {
    capacity: usize,
    members: Vec<Participant>,
    stats: TeamStats,
}

impl DraftTeam {
    /// Creates an empty draft with room for `capacity` members.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            members: Vec::with_capacity(capacity),
            stats: TeamStats::default(),
        }
    }

    /// Adds a member. Returns false without changing the team if it is full.
    pub fn push(&mut self, participant: Participant) -> bool {
        if self.is_full() {
            return false;
        }
        self.stats.record(&participant);
        self.members.push(participant);
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    /// Number of open slots.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.members.len())
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn stats(&self) -> &TeamStats {
        &self.stats
    }

    pub fn average_skill(&self) -> f64 {
        self.stats.average_skill()
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.members.iter().any(|m| &m.id == id)
    }

    /// Attaches a permanent identifier.
    ///
    /// Called by the id allocator during the serial merge step.
    pub fn finalize(self, id: TeamId) -> Team {
        Team {
            id,
            members: self.members,
            stats: self.stats,
        }
    }
}

/// A finalized team with a permanent sequential identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    id: TeamId,
    members: Vec<Participant>,
    stats: TeamStats,
}

impl Team {
    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn stats(&self) -> &TeamStats {
        &self.stats
    }

    pub fn average_skill(&self) -> f64 {
        self.stats.average_skill()
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.members.iter().any(|m| &m.id == id)
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &ParticipantId> + '_ {
        self.members.iter().map(|m| &m.id)
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} members)", self.id, self.members.len())
    }
}

#[cfg(test)]
#[path = "team_tests.rs"]
mod tests;
