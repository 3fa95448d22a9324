//! Configuration system for RotaForge.
//!
//! Load run parameters from TOML or YAML files to control the horizon,
//! per-category shift ceilings, relaxable soft limits and the solve time
//! limit without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use rotaforge_config::RotaConfig;
//! use std::time::Duration;
//!
//! let config = RotaConfig::from_toml_str(r#"
//!     random_seed = 7
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!
//!     [support]
//!     num_weeks = 6
//!     max_oncall_shifts = 2
//!
//!     [content_support.scd_period_limit]
//!     start = 4
//!     bound = 2
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Duration::from_secs(30));
//! assert_eq!(config.support.num_weeks, 6);
//! assert_eq!(config.support.max_inhours_shifts, 1);
//! assert_eq!(config.content_support.scd_period_limit.start, 4);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use rotaforge_config::RotaConfig;
//!
//! let config = RotaConfig::load("rota.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default optimizer time limit in seconds.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 30;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Every invalid field found, not just the first.
    #[error("Invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Main run configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RotaConfig {
    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of concurrent solve attempts during relaxation search.
    #[serde(default)]
    pub worker_count: WorkerCount,

    /// Per-attempt optimizer time limit.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Weekly support rota parameters.
    #[serde(default)]
    pub support: SupportConfig,

    /// Daily content-support rota parameters.
    #[serde(default)]
    pub content_support: ContentSupportConfig,
}

impl RotaConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
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
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the optimizer time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the relaxation worker count.
    pub fn with_worker_count(mut self, workers: WorkerCount) -> Self {
        self.worker_count = workers;
        self
    }

    /// Replaces the support rota parameters.
    pub fn with_support(mut self, support: SupportConfig) -> Self {
        self.support = support;
        self
    }

    /// Replaces the content-support rota parameters.
    pub fn with_content_support(mut self, content_support: ContentSupportConfig) -> Self {
        self.content_support = content_support;
        self
    }

    /// Returns the per-attempt optimizer time limit.
    ///
    /// Falls back to [`DEFAULT_TIME_LIMIT_SECS`] when nothing is configured.
    pub fn time_limit(&self) -> Duration {
        self.termination
            .as_ref()
            .and_then(|t| t.time_limit())
            .unwrap_or(Duration::from_secs(DEFAULT_TIME_LIMIT_SECS))
    }

    /// Checks that every count is positive, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing every offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if self.worker_count == WorkerCount::Count(0) {
            errors.push("'worker_count' must be a positive number".to_string());
        }
        self.support.collect_errors(&mut errors);
        self.content_support.collect_errors(&mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

/// Worker pool size for relaxation search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerCount {
    /// One worker per available CPU core.
    #[default]
    Auto,

    /// Specific number of workers.
    Count(usize),
}

impl WorkerCount {
    /// Resolves the worker count to an actual number, never more than
    /// `candidate_count` and never less than one.
    pub fn resolve(&self, candidate_count: usize) -> usize {
        let wanted = match self {
            WorkerCount::Auto => std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1),
            WorkerCount::Count(n) => *n,
        };
        wanted.min(candidate_count).max(1)
    }
}

impl std::fmt::Display for WorkerCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerCount::Auto => write!(f, "Auto"),
            WorkerCount::Count(n) => write!(f, "{}", n),
        }
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds one optimizer call may spend.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes one optimizer call may spend.
    pub minutes_spent_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let seconds =
            self.seconds_spent_limit.unwrap_or(0) + self.minutes_spent_limit.unwrap_or(0) * 60;
        if seconds > 0 {
            Some(Duration::from_secs(seconds))
        } else {
            None
        }
    }
}

/// Weekly support rota parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SupportConfig {
    /// Number of weeks to generate.
    pub num_weeks: usize,

    /// Maximum in-hours shifts (primary, secondary, shadow) per person.
    pub max_inhours_shifts: u32,

    /// Maximum in-hours standby shifts per person.
    pub max_standby_shifts: u32,

    /// Maximum on-call shifts per person.
    pub max_oncall_shifts: u32,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            num_weeks: 12,
            max_inhours_shifts: 1,
            max_standby_shifts: 1,
            max_oncall_shifts: 3,
        }
    }
}

impl SupportConfig {
    fn collect_errors(&self, errors: &mut Vec<String>) {
        positive(errors, "support.num_weeks", self.num_weeks as u64);
        positive(errors, "support.max_inhours_shifts", self.max_inhours_shifts as u64);
        positive(errors, "support.max_standby_shifts", self.max_standby_shifts as u64);
        positive(errors, "support.max_oncall_shifts", self.max_oncall_shifts as u64);
    }
}

/// Start and bound of a relaxable soft limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SoftLimitConfig {
    /// Strictest value, tried first.
    pub start: u32,

    /// Loosest value the search may reach.
    pub bound: u32,
}

impl SoftLimitConfig {
    pub fn new(start: u32, bound: u32) -> Self {
        Self { start, bound }
    }
}

/// Daily content-support rota parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ContentSupportConfig {
    /// Number of weeks to generate; each week has five working days.
    pub num_weeks: usize,

    /// Working days a senior content designer sits out after appearing.
    pub scd_period_limit: SoftLimitConfig,

    /// Working days everyone else sits out after appearing.
    pub other_period_limit: SoftLimitConfig,

    /// Cap on distinct product-team people in the rota. `bound` of `None`
    /// means the number of product-team people.
    pub product_people_limit: ProductLimitConfig,

    /// Team whose members are counted by `product_people_limit`.
    pub product_team: String,

    /// Working days a product-team member sits out after appearing, whatever
    /// the role.
    pub product_window: usize,
}

/// Start and optional bound of the product-people soft limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProductLimitConfig {
    pub start: u32,
    #[serde(default)]
    pub bound: Option<u32>,
}

impl Default for ContentSupportConfig {
    fn default() -> Self {
        Self {
            num_weeks: 12,
            scd_period_limit: SoftLimitConfig::new(5, 1),
            other_period_limit: SoftLimitConfig::new(9, 1),
            product_people_limit: ProductLimitConfig {
                start: 1,
                bound: None,
            },
            product_team: "product".to_string(),
            product_window: 10,
        }
    }
}

impl ContentSupportConfig {
    fn collect_errors(&self, errors: &mut Vec<String>) {
        positive(errors, "content_support.num_weeks", self.num_weeks as u64);
        positive(
            errors,
            "content_support.scd_period_limit.start",
            self.scd_period_limit.start as u64,
        );
        positive(
            errors,
            "content_support.scd_period_limit.bound",
            self.scd_period_limit.bound as u64,
        );
        positive(
            errors,
            "content_support.other_period_limit.start",
            self.other_period_limit.start as u64,
        );
        positive(
            errors,
            "content_support.other_period_limit.bound",
            self.other_period_limit.bound as u64,
        );
        positive(
            errors,
            "content_support.product_window",
            self.product_window as u64,
        );
        if self.product_team.trim().is_empty() {
            errors.push("'content_support.product_team' must not be empty".to_string());
        }
    }
}

fn positive(errors: &mut Vec<String>, field: &str, value: u64) {
    if value == 0 {
        errors.push(format!("'{}' must be a positive number", field));
    }
}
