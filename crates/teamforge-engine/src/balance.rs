//! Skill-balance acceptance and adaptive tolerance.

use teamforge_config::BalanceConfig;
use teamforge_core::DraftTeam;

/// Slack for comparing accumulated float steps against the ceiling.
const TOLERANCE_EPSILON: f64 = 1e-9;

/// Accepts a candidate team whose average skill lies within
/// `target * (1 ± tolerance)`.
///
/// # Example
///
/// ```
/// use teamforge_engine::BalanceValidator;
///
/// let validator = BalanceValidator::new(6.0, 0.15);
/// assert!(validator.accepts_average(6.5));
/// assert!(!validator.accepts_average(7.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceValidator {
    target_skill: f64,
    tolerance: f64,
}

impl BalanceValidator {
    pub fn new(target_skill: f64, tolerance: f64) -> Self {
        Self {
            target_skill,
            tolerance,
        }
    }

    pub fn target_skill(&self) -> f64 {
        self.target_skill
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Inclusive lower and upper bound on an acceptable average.
    pub fn bounds(&self) -> (f64, f64) {
        (
            self.target_skill * (1.0 - self.tolerance),
            self.target_skill * (1.0 + self.tolerance),
        )
    }

    pub fn accepts_average(&self, average_skill: f64) -> bool {
        let (lower, upper) = self.bounds();
        lower <= average_skill && average_skill <= upper
    }

    pub fn accepts(&self, team: &DraftTeam) -> bool {
        self.accepts_average(team.average_skill())
    }
}

/// Tolerance that widens in fixed steps from a baseline up to a ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct ToleranceSchedule {
    baseline: f64,
    step: f64,
    ceiling: f64,
    relaxations: u32,
}

impl ToleranceSchedule {
    pub fn new(baseline: f64, step: f64, ceiling: f64) -> Self {
        Self {
            baseline,
            step,
            ceiling,
            relaxations: 0,
        }
    }

    fn uncapped(&self) -> f64 {
        self.baseline + self.step * f64::from(self.relaxations)
    }

    /// The active tolerance.
    pub fn current(&self) -> f64 {
        self.uncapped().min(self.ceiling)
    }

    pub fn at_ceiling(&self) -> bool {
        self.uncapped() >= self.ceiling - TOLERANCE_EPSILON
    }

    /// Widens by one step. Returns false if already at the ceiling.
    pub fn relax(&mut self) -> bool {
        if self.at_ceiling() {
            return false;
        }
        self.relaxations += 1;
        true
    }

    /// Returns to the baseline.
    pub fn reset(&mut self) {
        self.relaxations = 0;
    }

    pub fn relaxations(&self) -> u32 {
        self.relaxations
    }
}

impl From<&BalanceConfig> for ToleranceSchedule {
    fn from(config: &BalanceConfig) -> Self {
        Self::new(
            config.baseline_tolerance,
            config.tolerance_step,
            config.tolerance_ceiling,
        )
    }
}
