//! Ready-made candidate pools.
//!
//! Generated pools repeat a five-participant pattern (one Leader, two
//! Thinkers, two Balanced) so that every contiguous slice of fifteen holds
//! enough of each personality type to form teams on its own.

use teamforge_core::{Participant, PersonalityType};

use crate::participant::{balanced, leader, participant, thinker};

pub const ROLES: [&str; 5] = ["Strategist", "Attacker", "Defender", "Supporter", "Coordinator"];

pub const GAMES: [&str; 7] = [
    "Chess",
    "FIFA",
    "Valorant",
    "Dota 2",
    "CS2",
    "Basketball",
    "Rocket League",
];

/// Two Leaders (skills 9, 8), four Thinkers (5, 6, 7, 4) and six Balanced
/// participants (skill 6) spread over four roles, no game used more than
/// twice. With a team size of 4 exactly two teams can form.
pub fn scenario_a() -> Vec<Participant> {
    vec![
        leader("L1", 9, "Captain", "Chess"),
        leader("L2", 8, "Commander", "Go"),
        thinker("T1", 5, "Analyst", "Valorant"),
        thinker("T2", 6, "Planner", "FIFA"),
        thinker("T3", 7, "Scout", "Dota 2"),
        thinker("T4", 4, "Tactician", "CS2"),
        balanced("B1", 6, "Attacker", "Apex"),
        balanced("B2", 6, "Defender", "Apex"),
        balanced("B3", 6, "Supporter", "Rocket League"),
        balanced("B4", 6, "Coordinator", "Rocket League"),
        balanced("B5", 6, "Attacker", "Overwatch"),
        balanced("B6", 6, "Defender", "Fortnite"),
    ]
}

/// Five participants where any Leader + Thinker + Balanced trio is a valid
/// team of 3, so exactly one team forms.
pub fn scenario_b() -> Vec<Participant> {
    vec![
        leader("L1", 9, "Strategist", "Chess"),
        thinker("T1", 9, "Analyst", "Go"),
        balanced("B1", 9, "Attacker", "FIFA"),
        balanced("B2", 1, "Defender", "Apex"),
        balanced("B3", 1, "Supporter", "Valorant"),
    ]
}

/// `n` participants following the repeating pattern, all with the same skill.
pub fn uniform_pool(n: usize, skill: u32) -> Vec<Participant> {
    patterned_pool(n, |_| skill)
}

/// `n` participants following the repeating pattern with skills spread
/// over 1..=10.
pub fn broad_pool(n: usize) -> Vec<Participant> {
    patterned_pool(n, |i| 1 + ((i * 7) % 10) as u32)
}

fn patterned_pool(n: usize, skill: impl Fn(usize) -> u32) -> Vec<Participant> {
    (0..n)
        .map(|i| {
            let personality = match i % 5 {
                0 => PersonalityType::Leader,
                1 | 2 => PersonalityType::Thinker,
                _ => PersonalityType::Balanced,
            };
            participant(
                &format!("P{:03}", i + 1),
                skill(i),
                ROLES[i % ROLES.len()],
                GAMES[i % GAMES.len()],
                personality,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_a_shape() {
        let pool = scenario_a();
        assert_eq!(pool.len(), 12);
        assert_eq!(pool.iter().filter(|p| p.is_leader()).count(), 2);
        assert_eq!(pool.iter().filter(|p| p.is_thinker()).count(), 4);
    }

    #[test]
    fn test_patterned_pool_batches_have_leaders() {
        let pool = uniform_pool(60, 5);
        for chunk in pool.chunks(15) {
            assert_eq!(chunk.iter().filter(|p| p.is_leader()).count(), 3);
            assert_eq!(chunk.iter().filter(|p| p.is_thinker()).count(), 6);
        }
    }

    #[test]
    fn test_broad_pool_skill_range() {
        let pool = broad_pool(50);
        assert!(pool.iter().all(|p| (1..=10).contains(&p.skill_level)));
        assert_eq!(pool.iter().map(|p| p.skill_level).min(), Some(1));
        assert_eq!(pool.iter().map(|p| p.skill_level).max(), Some(10));
    }
}
