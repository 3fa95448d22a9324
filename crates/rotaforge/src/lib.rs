//! RotaForge - duty rota generation in Rust
//!
//! Assigns people to roles across a run of periods (weeks, working days)
//! by building a 0/1 integer program, solving it, and checking the answer
//! independently before handing it out.
//!
//! Two rota flavors ship with the crate:
//! - [`support`]: a weekly second-line support rota with experience gating
//!   and post-solve seniority repair
//! - [`content_support`]: a daily content-support rota whose soft limits are
//!   relaxed by a concurrent search until a rota is found
//!
//! # Example
//!
//! ```
//! use rotaforge::prelude::*;
//!
//! let config = RotaConfig::new().with_random_seed(7);
//! assert_eq!(config.support.num_weeks, 12);
//!
//! let err = RotaError::Infeasible;
//! assert!(err.is_relaxable());
//! ```

pub use rotaforge_config::{
    ConfigError, ContentSupportConfig, ProductLimitConfig, RotaConfig, SoftLimitConfig,
    SupportConfig, TerminationConfig, WorkerCount,
};
pub use rotaforge_core::{
    leave_map, Assignments, Cardinality, Member, People, Result, Role, Rota, RotaError, Solution,
    SolverFault,
};
pub use rotaforge_solver::{
    build, relaxation_candidates, repair, solve, solve_and_validate, validate, ExperienceCounter,
    HardConstraint, ObjectiveComposer, ParameterTuple, RelaxationSearch, RotaProblem,
    SearchOutcome, SeniorityPair, SoftLimit, StopFlag,
};

pub mod content_support;
pub mod support;

mod tiers;

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::content_support::{self, ContentPerson, ContentRole, ContentRota};
    pub use super::support::{self, SupportPerson, SupportRole};
    pub use super::{
        Member, People, Result, Role, Rota, RotaConfig, RotaError, SolverFault, WorkerCount,
    };
}
