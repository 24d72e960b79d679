//! Tests for single-team assembly.

use super::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use teamforge_test::participant::{assert_team_invariants, balanced, leader, thinker};
use teamforge_test::scenario::{scenario_a, uniform_pool};

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[test]
fn test_pool_smaller_than_team_is_no_team() {
    let pool = vec![
        leader("L1", 5, "Strategist", "Chess"),
        thinker("T1", 5, "Analyst", "Go"),
    ];
    let before = pool.clone();

    let team = TeamAssembler::default().assemble(&pool, 3, &mut rng(1));
    assert!(team.is_none());
    assert_eq!(pool, before);
}

#[test]
fn test_empty_pool_is_no_team() {
    assert!(TeamAssembler::default().assemble(&[], 3, &mut rng(1)).is_none());
}

#[test]
fn test_no_leader_is_no_team() {
    let pool = vec![
        thinker("T1", 5, "Analyst", "Go"),
        thinker("T2", 5, "Planner", "Chess"),
        balanced("B1", 5, "Attacker", "FIFA"),
        balanced("B2", 5, "Defender", "Apex"),
    ];
    for seed in 0..20 {
        assert!(TeamAssembler::default().assemble(&pool, 3, &mut rng(seed)).is_none());
    }
}

#[test]
fn test_no_thinker_is_no_team() {
    let pool = vec![
        leader("L1", 5, "Strategist", "Go"),
        balanced("B1", 5, "Attacker", "FIFA"),
        balanced("B2", 5, "Defender", "Apex"),
        balanced("B3", 5, "Supporter", "Chess"),
    ];
    for seed in 0..20 {
        assert!(TeamAssembler::default().assemble(&pool, 3, &mut rng(seed)).is_none());
    }
}

#[test]
fn test_teams_satisfy_invariants_across_seeds() {
    let pool = scenario_a();
    let assembler = TeamAssembler::default();
    for seed in 0..50 {
        let team = assembler
            .assemble(&pool, 4, &mut rng(seed))
            .expect("scenario A always assembles");
        assert_team_invariants(team.members(), team.stats(), 4);
        // Two Thinkers are always available, so both slots are used.
        assert_eq!(team.stats().thinker_count(), 2);
    }
}

#[test]
fn test_assemble_does_not_mutate_pool() {
    let pool = uniform_pool(20, 5);
    let before = pool.clone();
    let _ = TeamAssembler::default().assemble(&pool, 5, &mut rng(3));
    assert_eq!(pool, before);
}

#[test]
fn test_game_concentration_is_capped() {
    let pool = vec![
        leader("L1", 5, "Strategist", "Chess"),
        thinker("T1", 5, "Analyst", "Chess"),
        balanced("B1", 5, "Attacker", "Chess"),
        balanced("B2", 5, "Defender", "Chess"),
        balanced("B3", 5, "Supporter", "Go"),
        balanced("B4", 5, "Coordinator", "FIFA"),
    ];
    for seed in 0..30 {
        let team = TeamAssembler::default()
            .assemble(&pool, 4, &mut rng(seed))
            .expect("two non-Chess fillers are enough");
        assert!(team.stats().game_count("Chess") <= 2);
        assert_team_invariants(team.members(), team.stats(), 4);
    }
}

#[test]
fn test_insufficient_role_diversity_is_no_team() {
    let pool = vec![
        leader("L1", 5, "Attacker", "Chess"),
        thinker("T1", 5, "Defender", "Go"),
        balanced("B1", 5, "Attacker", "FIFA"),
        balanced("B2", 5, "Defender", "Apex"),
        balanced("B3", 5, "Attacker", "CS2"),
    ];
    for seed in 0..20 {
        assert!(TeamAssembler::default().assemble(&pool, 4, &mut rng(seed)).is_none());
    }
}

#[test]
fn test_thinker_count_is_capped() {
    let pool = vec![
        leader("L1", 5, "Strategist", "Chess"),
        thinker("T1", 5, "Analyst", "Go"),
        thinker("T2", 5, "Planner", "FIFA"),
        thinker("T3", 5, "Scout", "Apex"),
        thinker("T4", 5, "Tactician", "CS2"),
        balanced("B1", 5, "Attacker", "Valorant"),
        balanced("B2", 5, "Defender", "Dota 2"),
    ];
    for seed in 0..30 {
        let team = TeamAssembler::default()
            .assemble(&pool, 5, &mut rng(seed))
            .expect("enough Balanced to fill");
        assert_eq!(team.stats().thinker_count(), 2);
        assert_eq!(team.stats().leader_count(), 1);
    }
}

#[test]
fn test_only_thinker_candidates_left_cannot_fill() {
    // Leader plus four Thinkers: a team of 4 would need a third Thinker.
    let pool = vec![
        leader("L1", 5, "Strategist", "Chess"),
        thinker("T1", 5, "Analyst", "Go"),
        thinker("T2", 5, "Planner", "FIFA"),
        thinker("T3", 5, "Scout", "Apex"),
        thinker("T4", 5, "Tactician", "CS2"),
    ];
    assert!(TeamAssembler::default().assemble(&pool, 4, &mut rng(9)).is_none());
}

#[test]
fn test_rules_admits() {
    let rules = CompositionRules::default();
    let mut draft = DraftTeam::new(3);
    draft.push(leader("L1", 5, "Attacker", "Chess"));

    assert!(!rules.admits(&draft, &leader("L2", 5, "Defender", "Go")));
    // Same role as the Leader would leave only two distinct roles in a team of 3.
    assert!(!rules.admits(&draft, &thinker("T1", 5, "Attacker", "Go")));
    assert!(rules.admits(&draft, &thinker("T2", 5, "Defender", "Chess")));

    draft.push(thinker("T2", 5, "Defender", "Chess"));
    // A third Chess player breaks the game limit.
    assert!(!rules.admits(&draft, &balanced("B1", 5, "Supporter", "Chess")));
    assert!(rules.admits(&draft, &balanced("B2", 5, "Supporter", "Go")));

    draft.push(balanced("B2", 5, "Supporter", "Go"));
    assert!(!rules.admits(&draft, &balanced("B3", 5, "Coordinator", "FIFA")));
}

#[test]
fn test_rules_from_config() {
    let config = CompositionConfig {
        max_thinkers: 1,
        max_same_game: 3,
        min_distinct_roles: 4,
        ..CompositionConfig::default()
    };
    let rules = CompositionRules::from(&config);
    assert_eq!(rules.max_thinkers, 1);
    assert_eq!(rules.max_same_game, 3);
    assert_eq!(rules.min_distinct_roles, 4);
}
