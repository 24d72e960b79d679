//! Greedy, constraint-satisfying assembly of a single team.
//!
//! The assembler is a pure function of its inputs: it never mutates the pool
//! and returns `None` when no valid team can be built on this attempt. There
//! is no backtracking; repeated failures are handled by the retry loop.

use rand::seq::SliceRandom;
use rand::Rng;
use teamforge_config::CompositionConfig;
use teamforge_core::{DraftTeam, Participant, PersonalityType, TeamStats};

/// Hard composition rules for a team.
///
/// Every team requires exactly one Leader and at least one Thinker; the
/// remaining limits are configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRules {
    pub max_thinkers: usize,
    pub max_same_game: usize,
    pub min_distinct_roles: usize,
}

impl Default for CompositionRules {
    fn default() -> Self {
        Self::from(&CompositionConfig::default())
    }
}

impl From<&CompositionConfig> for CompositionRules {
    fn from(config: &CompositionConfig) -> Self {
        Self {
            max_thinkers: config.max_thinkers,
            max_same_game: config.max_same_game,
            min_distinct_roles: config.min_distinct_roles,
        }
    }
}

impl CompositionRules {
    /// Returns true if `candidate` can join `draft` while every rule stays
    /// satisfiable once the remaining slots are filled.
    pub fn admits(&self, draft: &DraftTeam, candidate: &Participant) -> bool {
        if draft.is_full() {
            return false;
        }
        let stats = draft.stats();

        match candidate.personality_type {
            PersonalityType::Leader if stats.leader_count() >= 1 => return false,
            PersonalityType::Thinker if stats.thinker_count() >= self.max_thinkers => {
                return false
            }
            _ => {}
        }

        if stats.game_count(&candidate.preferred_game) >= self.max_same_game {
            return false;
        }

        let new_role = usize::from(stats.role_count(&candidate.preferred_role) == 0);
        let open_after = draft.remaining() - 1;
        stats.distinct_roles() + new_role + open_after >= self.min_distinct_roles
    }

    /// Full check of a finished team's composition.
    pub fn is_satisfied_by(&self, stats: &TeamStats) -> bool {
        stats.leader_count() == 1
            && (1..=self.max_thinkers).contains(&stats.thinker_count())
            && stats.max_game_count() <= self.max_same_game
            && stats.distinct_roles() >= self.min_distinct_roles
    }
}

/// Builds at most one team per call from a pool of unassigned participants.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use teamforge_core::{Participant, PersonalityType};
/// use teamforge_engine::TeamAssembler;
///
/// let pool = vec![
///     Participant::new("P1", "A", 5, "Strategist", "Chess", PersonalityType::Leader),
///     Participant::new("P2", "B", 5, "Attacker", "FIFA", PersonalityType::Thinker),
///     Participant::new("P3", "C", 5, "Defender", "Go", PersonalityType::Balanced),
/// ];
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let team = TeamAssembler::default().assemble(&pool, 3, &mut rng).unwrap();
/// assert_eq!(team.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TeamAssembler {
    rules: CompositionRules,
}

impl TeamAssembler {
    pub fn new(rules: CompositionRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CompositionRules {
        &self.rules
    }

    /// Attempts to build one full team of `team_size` members.
    ///
    /// Candidates are visited in a fresh random order. The Leader is reserved
    /// first, then up to `max_thinkers` Thinkers, then the remaining slots are
    /// filled greedily; a candidate that would break a rule is skipped.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        pool: &[Participant],
        team_size: usize,
        rng: &mut R,
    ) -> Option<DraftTeam> {
        if team_size == 0 || pool.len() < team_size {
            return None;
        }

        let mut order: Vec<usize> = (0..pool.len()).collect();
        order.shuffle(rng);

        let mut taken = vec![false; pool.len()];
        let mut draft = DraftTeam::new(team_size);

        let leader = order.iter().copied().find(|&i| pool[i].is_leader())?;
        taken[leader] = true;
        draft.push(pool[leader].clone());

        for &i in &order {
            if draft.is_full() || draft.stats().thinker_count() >= self.rules.max_thinkers {
                break;
            }
            if !taken[i] && pool[i].is_thinker() && self.rules.admits(&draft, &pool[i]) {
                taken[i] = true;
                draft.push(pool[i].clone());
            }
        }
        if draft.stats().thinker_count() == 0 {
            return None;
        }

        for &i in &order {
            if draft.is_full() {
                break;
            }
            if !taken[i] && self.rules.admits(&draft, &pool[i]) {
                taken[i] = true;
                draft.push(pool[i].clone());
            }
        }

        (draft.is_full() && self.rules.is_satisfied_by(draft.stats())).then_some(draft)
    }
}

#[cfg(test)]
#[path = "assembler_tests.rs"]
mod tests;
