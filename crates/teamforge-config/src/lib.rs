//! Configuration system for TeamForge.
//!
//! Load formation configuration from TOML or YAML files to tune parallelism,
//! skill balancing and composition rules without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use teamforge_config::FormationConfig;
//! use std::time::Duration;
//!
//! let config = FormationConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [parallel]
//!     threshold = 40
//!     worker_timeout_secs = 10
//!
//!     [balance]
//!     baseline_tolerance = 0.10
//! "#).unwrap();
//!
//! assert_eq!(config.parallel.threshold, 40);
//! assert_eq!(config.worker_timeout(), Duration::from_secs(10));
//! assert_eq!(config.balance.tolerance_ceiling, 0.35);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use teamforge_config::FormationConfig;
//!
//! let config = FormationConfig::load("teamforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main formation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FormationConfig {
    /// Random seed for reproducible runs.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Sequential/parallel execution settings.
    #[serde(default)]
    pub parallel: ParallelConfig,

    /// Skill-balance acceptance and tolerance relaxation.
    #[serde(default)]
    pub balance: BalanceConfig,

    /// Hard composition rules.
    #[serde(default)]
    pub composition: CompositionConfig,

    /// Accepted skill level range.
    #[serde(default)]
    pub skill: SkillRange,
}

impl FormationConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or fails
    /// [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the pool size at which parallel mode engages.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel.threshold = threshold;
        self
    }

    /// Sets the maximum number of concurrent workers.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.parallel.max_workers = max_workers;
        self
    }

    /// Sets how long to wait for workers before giving up.
    pub fn with_worker_timeout_secs(mut self, seconds: u64) -> Self {
        self.parallel.worker_timeout_secs = seconds;
        self
    }

    /// Replaces the balance configuration.
    pub fn with_balance(mut self, balance: BalanceConfig) -> Self {
        self.balance = balance;
        self
    }

    /// Returns the worker wait limit as a Duration.
    pub fn worker_timeout(&self) -> Duration {
        Duration::from_secs(self.parallel.worker_timeout_secs)
    }

    /// Checks the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.parallel;
        if p.max_workers == 0 {
            return Err(ConfigError::Invalid("max_workers must be at least 1".into()));
        }
        if p.worker_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "worker_timeout_secs must be at least 1".into(),
            ));
        }

        let b = &self.balance;
        if !(b.baseline_tolerance >= 0.0 && b.baseline_tolerance < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "baseline_tolerance {} must be in [0, 1)",
                b.baseline_tolerance
            )));
        }
        if !(b.tolerance_ceiling >= b.baseline_tolerance && b.tolerance_ceiling < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance_ceiling {} must be in [baseline_tolerance, 1)",
                b.tolerance_ceiling
            )));
        }
        if !(b.tolerance_step > 0.0) {
            return Err(ConfigError::Invalid("tolerance_step must be positive".into()));
        }
        if b.relax_every == 0 || b.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "relax_every and max_attempts must be at least 1".into(),
            ));
        }

        let c = &self.composition;
        if c.min_team_size < 3 {
            return Err(ConfigError::Invalid(
                "min_team_size must be at least 3".into(),
            ));
        }
        if c.max_thinkers == 0 || c.max_same_game == 0 {
            return Err(ConfigError::Invalid(
                "max_thinkers and max_same_game must be at least 1".into(),
            ));
        }

        if self.skill.min > self.skill.max {
            return Err(ConfigError::Invalid(format!(
                "skill range {}..={} is empty",
                self.skill.min, self.skill.max
            )));
        }
        Ok(())
    }
}

/// Execution strategy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ParallelConfig {
    /// Pools at least this large run in parallel mode.
    pub threshold: usize,

    /// Upper bound on concurrent workers.
    pub max_workers: usize,

    /// Seconds to wait for all workers before failing the run.
    pub worker_timeout_secs: u64,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            threshold: 30,
            max_workers: 4,
            worker_timeout_secs: 30,
        }
    }
}

/// Skill-balance configuration.
///
/// A candidate team is accepted when its average skill lies within
/// `target * (1 ± tolerance)`. Tolerance starts at `baseline_tolerance` and
/// widens by `tolerance_step` every `relax_every` consecutive failures, up to
/// `tolerance_ceiling`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BalanceConfig {
    pub baseline_tolerance: f64,
    pub tolerance_step: f64,
    pub tolerance_ceiling: f64,

    /// Consecutive failures between relaxations.
    pub relax_every: u32,

    /// Consecutive failures after which a worker gives up.
    pub max_attempts: u32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            baseline_tolerance: 0.15,
            tolerance_step: 0.05,
            tolerance_ceiling: 0.35,
            relax_every: 10,
            max_attempts: 50,
        }
    }
}

/// Hard composition rules applied to every team.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CompositionConfig {
    /// Smallest team size accepted by the engine.
    pub min_team_size: usize,

    /// Maximum Thinkers per team (at least one is always required).
    pub max_thinkers: usize,

    /// Maximum members sharing one preferred game.
    pub max_same_game: usize,

    /// Minimum distinct preferred roles per team.
    pub min_distinct_roles: usize,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            min_team_size: 3,
            max_thinkers: 2,
            max_same_game: 2,
            min_distinct_roles: 3,
        }
    }
}

/// Inclusive range of valid skill levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SkillRange {
    pub min: u32,
    pub max: u32,
}

impl SkillRange {
    pub fn contains(&self, skill: u32) -> bool {
        (self.min..=self.max).contains(&skill)
    }
}

impl Default for SkillRange {
    fn default() -> Self {
        Self { min: 1, max: 10 }
    }
}
