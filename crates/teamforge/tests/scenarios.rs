//! End-to-end formation scenarios through the public API.

use teamforge::prelude::*;
use teamforge::{ExecutionMode, TeamIdAllocator};
use teamforge_test::participant::assert_team_invariants;
use teamforge_test::scenario::{broad_pool, scenario_a, scenario_b, uniform_pool};

fn build(pool: &[Participant], team_size: usize) -> FormationResult {
    let engine = FormationEngine::new(FormationConfig::default());
    let mut ids = TeamIdAllocator::load(MemoryCounterStore::default()).unwrap();
    engine.build_teams(pool, team_size, &mut ids).unwrap()
}

#[test]
fn scenario_a_is_capped_by_leaders() {
    let result = build(&scenario_a(), 4);
    assert_eq!(result.teams.len(), 2);
    assert_eq!(result.unassigned_count(), 4);
    assert!(result.unassigned.iter().all(|p| p.personality_type == PersonalityType::Balanced));
}

#[test]
fn scenario_b_forms_single_team() {
    let result = build(&scenario_b(), 3);
    assert_eq!(result.teams.len(), 1);
    assert_eq!(result.unassigned_count(), 2);
}

#[test]
fn scenario_c_empty_pool_is_not_an_error() {
    let result = teamforge::form_teams(&[], 3).unwrap();
    assert!(result.teams.is_empty());
    assert_eq!(result.unassigned_count(), 0);
}

#[test]
fn scenario_d_uses_one_target_for_all_batches() {
    let result = build(&uniform_pool(60, 5), 5);
    assert_eq!(result.report.mode, ExecutionMode::Parallel);
    assert!(result.report.batches.len() > 1);
    for batch in &result.report.batches {
        assert_eq!(batch.target_skill, result.report.global_target_skill);
    }
    for team in &result.teams {
        assert_team_invariants(team.members(), team.stats(), 5);
        assert_eq!(team.average_skill(), 5.0);
    }
}

#[test]
fn team_ids_are_unique_and_contiguous() {
    let result = build(&broad_pool(90), 3);
    let ids: Vec<u64> = result.teams.iter().map(|t| t.id().get()).collect();
    let expected: Vec<u64> = (1..=ids.len() as u64).collect();
    assert_eq!(ids, expected);
}

#[test]
fn config_changes_composition_rules() {
    let config = FormationConfig::from_toml_str(
        r#"
        [composition]
        max_thinkers = 1
        "#,
    )
    .unwrap();
    let engine = FormationEngine::new(config);
    let mut ids = TeamIdAllocator::load(MemoryCounterStore::default()).unwrap();
    let result = engine.build_teams(&scenario_a(), 4, &mut ids).unwrap();

    assert_eq!(result.teams.len(), 2);
    for team in &result.teams {
        assert_eq!(team.stats().thinker_count(), 1);
    }
}
