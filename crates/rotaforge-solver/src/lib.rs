//! RotaForge Solver Engine
//!
//! This crate turns a declarative rota problem into a 0/1 integer program and
//! back into a trusted assignment table:
//! - Generic rota builder (assignment matrix, cardinality, leave)
//! - Hard constraints shared by the model encoder and the validator
//! - Conditional-threshold linearization for experience gating
//! - Priority-tiered objective composition
//! - Solve → validate pipeline around the `good_lp` optimizer
//! - Concurrent adaptive relaxation search
//! - Post-solve seniority repair
//!
//! Logging levels:
//! - **INFO**: solve and search start/end
//! - **DEBUG**: model sizes, individual attempt outcomes
//! - **WARN**: solver faults

pub mod builder;
pub mod constraint;
pub mod experience;
pub mod linearize;
pub mod model;
pub mod objective;
pub mod problem;
pub mod relax;
pub mod repair;
pub mod rng;
pub mod search;
pub mod solve;
pub mod termination;
pub mod validate;

pub use builder::build;
pub use constraint::HardConstraint;
pub use experience::ExperienceCounter;
pub use model::{LinearModel, RotaModel};
pub use objective::ObjectiveComposer;
pub use problem::RotaProblem;
pub use relax::{relaxation_candidates, Loosen, ParameterTuple, SoftLimit};
pub use repair::{repair, SeniorityPair};
pub use rng::{attempt_rng, derive_seed, master_seed};
pub use search::{RelaxationSearch, SearchOutcome};
pub use solve::{solve, solve_and_validate};
pub use termination::StopFlag;
pub use validate::validate;
