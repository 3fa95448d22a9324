//! RotaForge Core - Core types and traits for rota generation
//!
//! This crate provides the fundamental abstractions for RotaForge:
//! - Role tags with static family and cardinality lookups
//! - The person table consumed by every rota flavor
//! - Solved assignment tables and the per-period rota output
//! - Error types shared by the solver pipeline

pub mod error;
pub mod person;
pub mod role;
pub mod rota;
pub mod solution;

pub use error::{Result, RotaError, SolverFault};
pub use person::{leave_map, Member, People};
pub use role::{Cardinality, Role};
pub use rota::Rota;
pub use solution::{Assignments, Solution};
