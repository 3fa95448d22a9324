//! Error types for RotaForge

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Main error type for RotaForge operations.
#[derive(Debug, Error)]
pub enum RotaError {
    /// The optimizer proved that no assignment satisfies the hard constraints.
    #[error("There is no rota meeting the constraints! Try a shorter rota, or allowing more shifts per person.")]
    Infeasible,

    /// The optimizer did not finish inside its time limit.
    #[error("Optimizer did not finish within {0:?}")]
    TimedOut(Duration),

    /// The optimizer reported success but its answer failed validation.
    #[error(transparent)]
    SolverFault(#[from] Box<SolverFault>),

    /// Every relaxation candidate was tried without a verified rota.
    #[error("No satisfying rota found after {attempts} relaxation attempts")]
    NoSatisfyingRota { attempts: usize },

    /// The optimizer backend failed for a reason other than infeasibility.
    #[error("Optimizer error: {0}")]
    Optimizer(String),

    /// Run parameters were rejected before solving.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RotaError {
    /// Returns true when a looser parameter tuple may succeed where this
    /// attempt failed.
    ///
    /// Solver faults are never relaxable: re-running the same backend on a
    /// different tuple does not fix a defective answer.
    pub fn is_relaxable(&self) -> bool {
        matches!(self, RotaError::Infeasible | RotaError::TimedOut(_))
    }

    /// Returns the solver fault, if this error carries one.
    pub fn as_fault(&self) -> Option<&SolverFault> {
        match self {
            RotaError::SolverFault(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<SolverFault> for RotaError {
    fn from(fault: SolverFault) -> Self {
        RotaError::SolverFault(Box::new(fault))
    }
}

/// Result type alias for RotaForge operations
pub type Result<T> = std::result::Result<T, RotaError>;

/// A mismatch between optimizer-reported success and independently
/// validated truth.
///
/// Carries the first violating period, a description of the violated rule
/// and a full per-period dump of the assignment table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverFault {
    pub period: usize,
    pub rule: String,
    pub dump: String,
}

impl SolverFault {
    pub fn new(period: usize, rule: impl Into<String>, dump: impl Into<String>) -> Self {
        Self {
            period,
            rule: rule.into(),
            dump: dump.into(),
        }
    }
}

impl fmt::Display for SolverFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Solver fault in period {}: {}",
            self.period + 1,
            self.rule
        )?;
        write!(f, "{}", self.dump)
    }
}

impl std::error::Error for SolverFault {}
