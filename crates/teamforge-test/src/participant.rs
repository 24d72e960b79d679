//! Participant builders and team invariant checks.
//!
//! # Example
//!
//! ```ignore
//! use teamforge_test::participant::{leader, thinker, balanced};
//!
//! let pool = vec![
//!     leader("L1", 8, "Strategist", "Chess"),
//!     thinker("T1", 6, "Analyst", "Go"),
//!     balanced("B1", 5, "Attacker", "FIFA"),
//! ];
//! ```

use std::collections::HashSet;

use teamforge_core::{Participant, PersonalityType, TeamStats};

/// Creates an available participant whose name equals its id.
pub fn participant(
    id: &str,
    skill: u32,
    role: &str,
    game: &str,
    personality: PersonalityType,
) -> Participant {
    Participant::new(id, id, skill, role, game, personality)
}

pub fn leader(id: &str, skill: u32, role: &str, game: &str) -> Participant {
    participant(id, skill, role, game, PersonalityType::Leader)
}

pub fn thinker(id: &str, skill: u32, role: &str, game: &str) -> Participant {
    participant(id, skill, role, game, PersonalityType::Thinker)
}

pub fn balanced(id: &str, skill: u32, role: &str, game: &str) -> Participant {
    participant(id, skill, role, game, PersonalityType::Balanced)
}

/// Asserts the hard composition rules with default limits.
///
/// Checks size, exactly one Leader, one or two Thinkers, at most two members
/// per game, at least three distinct roles and no repeated member.
pub fn assert_team_invariants(members: &[Participant], stats: &TeamStats, team_size: usize) {
    assert_eq!(members.len(), team_size, "team size");
    assert_eq!(stats.member_count(), team_size, "stats member count");
    assert_eq!(stats.leader_count(), 1, "leader count");
    assert!(
        (1..=2).contains(&stats.thinker_count()),
        "thinker count {}",
        stats.thinker_count()
    );
    assert!(
        stats.max_game_count() <= 2,
        "game concentration {}",
        stats.max_game_count()
    );
    assert!(
        stats.distinct_roles() >= 3,
        "distinct roles {}",
        stats.distinct_roles()
    );

    let ids: HashSet<_> = members.iter().map(|m| &m.id).collect();
    assert_eq!(ids.len(), members.len(), "repeated member");
}
