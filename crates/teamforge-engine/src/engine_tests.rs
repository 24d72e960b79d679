//! Tests for the formation engine.

use std::collections::HashSet;

use super::*;
use crate::balance::BalanceValidator;
use crate::retry::StopReason;
use crate::store::MemoryCounterStore;
use teamforge_core::{ParticipantId, TeamId};
use teamforge_test::participant::{assert_team_invariants, balanced, leader, thinker};
use teamforge_test::scenario::{broad_pool, scenario_a, scenario_b, uniform_pool};

fn allocator(start: u64) -> TeamIdAllocator<MemoryCounterStore> {
    TeamIdAllocator::load(MemoryCounterStore::new(start)).unwrap()
}

fn seeded(seed: u64) -> FormationEngine {
    FormationEngine::new(FormationConfig::default().with_random_seed(seed))
}

/// Every participant ends up in exactly one team or in the leftovers.
fn assert_partition(result: &FormationResult, pool: &[Participant]) {
    let mut seen: HashSet<&ParticipantId> = HashSet::new();
    for team in &result.teams {
        for id in team.member_ids() {
            assert!(seen.insert(id), "{id} placed twice");
        }
    }
    for p in &result.unassigned {
        assert!(seen.insert(&p.id), "{} both placed and unassigned", p.id);
    }
    assert_eq!(seen.len(), pool.len());
}

fn assert_contiguous_ids(result: &FormationResult, first: u64) {
    let ids: Vec<u64> = result.teams.iter().map(|t| t.id().get()).collect();
    let expected: Vec<u64> = (first..first + ids.len() as u64).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_scenario_a_two_teams() {
    let pool = scenario_a();
    let mut ids = allocator(0);
    let result = FormationEngine::default()
        .build_teams(&pool, 4, &mut ids)
        .unwrap();

    assert_eq!(result.teams.len(), 2);
    assert_eq!(result.unassigned_count(), 4);
    for team in &result.teams {
        assert_team_invariants(team.members(), team.stats(), 4);
    }
    assert_partition(&result, &pool);
    assert_contiguous_ids(&result, 1);
    assert_eq!(ids.current(), 2);

    let report = &result.report;
    assert_eq!(report.mode, ExecutionMode::Sequential);
    assert_eq!(report.batch_count(), 1);
    assert!((report.global_target_skill - 6.25).abs() < 1e-9);
}

#[test]
fn test_scenario_b_one_team() {
    let pool = scenario_b();
    let mut ids = allocator(0);
    let result = FormationEngine::default()
        .build_teams(&pool, 3, &mut ids)
        .unwrap();

    assert_eq!(result.teams.len(), 1);
    assert_eq!(result.unassigned_count(), 2);
    let team = &result.teams[0];
    assert!(team.contains(&"L1".into()));
    assert!(team.contains(&"T1".into()));
    assert_team_invariants(team.members(), team.stats(), 3);
}

#[test]
fn test_scenario_c_empty_pool() {
    let mut ids = allocator(5);
    let result = FormationEngine::default()
        .build_teams(&[], 4, &mut ids)
        .unwrap();

    assert!(result.teams.is_empty());
    assert_eq!(result.unassigned_count(), 0);
    assert!(result.report.batches.is_empty());
    assert_eq!(ids.current(), 5);
}

#[test]
fn test_pool_smaller_than_team_is_returned_unassigned() {
    let pool = vec![
        leader("L1", 5, "Strategist", "Chess"),
        thinker("T1", 5, "Analyst", "Go"),
    ];
    let mut ids = allocator(0);
    let result = FormationEngine::default()
        .build_teams(&pool, 3, &mut ids)
        .unwrap();

    assert!(result.teams.is_empty());
    assert_eq!(result.unassigned, pool);
    assert!(!ids.is_dirty());
}

#[test]
fn test_scenario_d_parallel_with_one_target() {
    let pool = uniform_pool(60, 5);
    let mut ids = allocator(0);
    let result = FormationEngine::default()
        .build_teams(&pool, 5, &mut ids)
        .unwrap();

    let report = &result.report;
    assert_eq!(report.mode, ExecutionMode::Parallel);
    assert_eq!(report.worker_count, 4);
    assert_eq!(report.batch_count(), 4);
    assert!(report.targets_consistent());
    assert_eq!(report.global_target_skill, 5.0);
    assert_eq!(report.teams_formed(), result.teams.len());

    assert!(!result.teams.is_empty());
    let (lower, upper) = BalanceValidator::new(5.0, 0.35).bounds();
    for team in &result.teams {
        assert_team_invariants(team.members(), team.stats(), 5);
        assert!((lower..=upper).contains(&team.average_skill()));
    }
    assert_partition(&result, &pool);
    assert_contiguous_ids(&result, 1);
}

#[test]
fn test_batch_reports_are_in_batch_order() {
    let pool = uniform_pool(60, 5);
    let result = seeded(3).build_teams(&pool, 5, &mut allocator(0)).unwrap();

    let indices: Vec<_> = result.report.batches.iter().map(|b| b.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
    for batch in &result.report.batches {
        assert_eq!(batch.size, 15);
        assert_eq!(batch.stop_reason == StopReason::PoolExhausted, batch.leftover < 5);
    }
}

#[test]
fn test_fairness_across_batches() {
    let pool = broad_pool(120);
    let result = seeded(11).build_teams(&pool, 4, &mut allocator(0)).unwrap();
    let target = result.report.global_target_skill;

    assert_eq!(result.report.mode, ExecutionMode::Parallel);
    assert!(result.report.targets_consistent());
    assert!(!result.teams.is_empty());

    let validator = BalanceValidator::new(target, 0.35);
    for team in &result.teams {
        assert_team_invariants(team.members(), team.stats(), 4);
        assert!(validator.accepts_average(team.average_skill()));
    }
    let mean = result.mean_team_average().unwrap();
    assert!(validator.accepts_average(mean));
    assert_partition(&result, &pool);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let pool = broad_pool(60);
    let members = |result: &FormationResult| -> Vec<Vec<ParticipantId>> {
        result
            .teams
            .iter()
            .map(|t| t.member_ids().cloned().collect())
            .collect()
    };

    let first = seeded(42).build_teams(&pool, 4, &mut allocator(0)).unwrap();
    let second = seeded(42).build_teams(&pool, 4, &mut allocator(0)).unwrap();
    assert_eq!(members(&first), members(&second));
}

#[test]
fn test_ids_continue_from_counter() {
    let mut ids = allocator(41);
    let result = FormationEngine::default()
        .build_teams(&scenario_a(), 4, &mut ids)
        .unwrap();

    assert_eq!(result.teams[0].id(), TeamId::new(42));
    assert_eq!(result.teams[0].id().to_string(), "TEAM0042");
    assert_contiguous_ids(&result, 42);
    // Allocation alone does not persist.
    assert_eq!(ids.persisted(), 41);
}

#[test]
fn test_team_size_below_minimum_is_rejected() {
    let mut ids = allocator(0);
    let err = FormationEngine::default()
        .build_teams(&scenario_a(), 2, &mut ids)
        .unwrap_err();
    assert!(matches!(err, FormationError::InvalidTeamSize { size: 2, min: 3 }));
}

#[test]
fn test_out_of_range_skill_is_rejected() {
    let engine = FormationEngine::default();
    for skill in [0, 11] {
        let mut pool = scenario_a();
        pool.push(balanced("X1", skill, "Attacker", "Go"));
        let err = engine.build_teams(&pool, 4, &mut allocator(0)).unwrap_err();
        match err {
            FormationError::InvalidParticipant { id, .. } => assert_eq!(id.as_str(), "X1"),
            other => panic!("unexpected error {other:?}"),
        }
    }
}

#[test]
fn test_duplicate_id_is_rejected() {
    let mut pool = scenario_a();
    pool.push(balanced("B1", 5, "Coordinator", "Go"));
    let mut ids = allocator(0);
    let err = FormationEngine::default()
        .build_teams(&pool, 4, &mut ids)
        .unwrap_err();

    assert!(matches!(err, FormationError::DuplicateParticipant(id) if id.as_str() == "B1"));
    assert_eq!(ids.current(), 0);
}

#[test]
fn test_cancelled_sequential_run_consumes_no_ids() {
    let engine = FormationEngine::default();
    let mut ids = allocator(3);
    let cancel = AtomicBool::new(true);

    let err = engine.run(&scenario_a(), 4, &mut ids, &cancel).unwrap_err();
    assert!(matches!(err, FormationError::Cancelled));
    assert_eq!(ids.current(), 3);
}

#[test]
fn test_cancelled_parallel_run_consumes_no_ids() {
    let engine = FormationEngine::default();
    let mut ids = allocator(3);
    let cancel = AtomicBool::new(true);

    let err = engine
        .run(&uniform_pool(60, 5), 5, &mut ids, &cancel)
        .unwrap_err();
    assert!(matches!(err, FormationError::Cancelled));
    assert_eq!(ids.current(), 3);
}

#[test]
fn test_terminate_early_when_idle() {
    let engine = FormationEngine::default();
    assert!(!engine.is_running());
    assert!(!engine.terminate_early());

    // An earlier request does not leak into the next run.
    let result = engine.build_teams(&scenario_a(), 4, &mut allocator(0));
    assert!(result.is_ok());
}

#[test]
fn test_terminate_early_cancels_active_run() {
    let engine = FormationEngine::default();
    let mut ids = allocator(3);
    let guard = RunGuard::acquire(&engine.running).unwrap();
    let cancel = Arc::new(AtomicBool::new(false));
    *engine.cancel.lock().unwrap() = Arc::clone(&cancel);

    assert!(engine.is_running());
    assert!(engine.terminate_early());
    assert!(cancel.load(Ordering::SeqCst));

    let err = engine
        .run(&uniform_pool(60, 5), 5, &mut ids, &cancel)
        .unwrap_err();
    assert!(matches!(err, FormationError::Cancelled));
    assert_eq!(ids.current(), 3);

    drop(guard);
    assert!(!engine.is_running());
    assert!(!engine.terminate_early());
}

#[test]
fn test_overlapping_run_is_rejected() {
    let engine = FormationEngine::default();
    let mut ids = allocator(0);
    let guard = RunGuard::acquire(&engine.running).unwrap();

    let err = engine
        .build_teams(&scenario_a(), 4, &mut ids)
        .unwrap_err();
    assert!(matches!(err, FormationError::AlreadyRunning));
    assert!(engine.is_running());
    assert_eq!(ids.current(), 0);

    drop(guard);
    let result = engine.build_teams(&scenario_a(), 4, &mut ids).unwrap();
    assert_eq!(result.teams.len(), 2);
    assert!(!engine.is_running());
}

#[test]
fn test_run_guard_released_on_panic() {
    let running = AtomicBool::new(false);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let _guard = RunGuard::acquire(&running).unwrap();
        assert!(RunGuard::acquire(&running).is_err());
        panic!("batch blew up");
    }));

    assert!(outcome.is_err());
    assert!(!running.load(Ordering::SeqCst));
    assert!(RunGuard::acquire(&running).is_ok());
}

#[test]
fn test_unrepresentable_timeout_waits_without_deadline() {
    let engine = FormationEngine::new(
        FormationConfig::default()
            .with_random_seed(5)
            .with_worker_timeout_secs(u64::MAX),
    );
    assert!(engine.config().validate().is_ok());

    let pool = uniform_pool(60, 5);
    let result = engine.build_teams(&pool, 5, &mut allocator(0)).unwrap();
    assert_eq!(result.report.mode, ExecutionMode::Parallel);
    assert_partition(&result, &pool);
}

#[test]
fn test_collect_batches_orders_by_index() {
    let (tx, rx) = channel::unbounded::<(usize, Result<u32>)>();
    tx.send((2, Ok(30))).unwrap();
    tx.send((0, Ok(10))).unwrap();
    tx.send((1, Ok(20))).unwrap();

    let deadline = Instant::now().checked_add(Duration::from_secs(5));
    let runs = collect_batches(&rx, 3, deadline, Duration::from_secs(5)).unwrap();
    assert_eq!(runs, vec![10, 20, 30]);
}

#[test]
fn test_collect_batches_surfaces_worker_error() {
    let (tx, rx) = channel::unbounded::<(usize, Result<u32>)>();
    tx.send((0, Ok(10))).unwrap();
    tx.send((
        1,
        Err(FormationError::WorkerFailed {
            batch: 1,
            message: "boom".to_string(),
        }),
    ))
    .unwrap();

    let err = collect_batches(&rx, 2, None, Duration::from_secs(5)).unwrap_err();
    assert!(matches!(
        err,
        FormationError::WorkerFailed { batch: 1, ref message } if message == "boom"
    ));
}

#[test]
fn test_collect_batches_times_out_at_deadline() {
    let (tx, rx) = channel::unbounded::<(usize, Result<u32>)>();

    let timeout = Duration::from_secs(7);
    let err = collect_batches(&rx, 1, Some(Instant::now()), timeout).unwrap_err();
    assert!(matches!(err, FormationError::WorkerTimeout(d) if d == timeout));
    drop(tx);
}

#[test]
fn test_collect_batches_reports_silent_worker() {
    for deadline in [None, Instant::now().checked_add(Duration::from_secs(5))] {
        let (tx, rx) = channel::unbounded::<(usize, Result<u32>)>();
        tx.send((0, Ok(10))).unwrap();
        drop(tx);

        let err = collect_batches(&rx, 2, deadline, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, FormationError::WorkerFailed { batch: 1, .. }));
    }
}

#[test]
fn test_worker_panic_becomes_worker_failure() {
    let ok = run_guarded(0, || Ok(4u32)).unwrap();
    assert_eq!(ok, 4);

    let err = run_guarded::<u32>(2, || panic!("assembler exploded")).unwrap_err();
    match err {
        FormationError::WorkerFailed { batch, message } => {
            assert_eq!(batch, 2);
            assert_eq!(message, "assembler exploded");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_panic_message_extraction() {
    let from_str: Box<dyn Any + Send> = Box::new("boom");
    let from_string: Box<dyn Any + Send> = Box::new(String::from("bang"));
    let other: Box<dyn Any + Send> = Box::new(7u8);

    assert_eq!(panic_message(&*from_str), "boom");
    assert_eq!(panic_message(&*from_string), "bang");
    assert_eq!(panic_message(&*other), "worker panicked");
}
