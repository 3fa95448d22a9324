//! Shared test fixtures for RotaForge crates.
//!
//! This crate provides data types and small builders for testing.
//! It depends only on `rotaforge-core` so that every other crate can take it
//! as a dev-dependency.
//!
//! - [`role`] - A three-role set with one optional role
//! - [`staff`] - A minimal person record and table builder
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! rotaforge-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use rotaforge_test::{staff_table, Staff, TestRole};
//! ```

pub mod role;
pub mod staff;

pub use role::{TestFamily, TestRole};
pub use staff::{staff_table, Staff};
