//! Test role set.
//!
//! `Lead` and `Backup` are mandatory cover roles; `Trainee` is optional.
//!
//! # Example
//!
//! ```
//! use rotaforge_core::Role;
//! use rotaforge_test::{TestFamily, TestRole};
//!
//! assert_eq!(TestRole::members_of(TestFamily::Cover), vec![TestRole::Lead, TestRole::Backup]);
//! assert!(!TestRole::Trainee.is_mandatory());
//! ```

use rotaforge_core::{Cardinality, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TestRole {
    Lead,
    Backup,
    Trainee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TestFamily {
    Cover,
    Training,
}

impl Role for TestRole {
    type Family = TestFamily;

    const ALL: &'static [Self] = &[TestRole::Lead, TestRole::Backup, TestRole::Trainee];

    fn name(self) -> &'static str {
        match self {
            TestRole::Lead => "lead",
            TestRole::Backup => "backup",
            TestRole::Trainee => "trainee",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn families(self) -> &'static [TestFamily] {
        match self {
            TestRole::Lead | TestRole::Backup => &[TestFamily::Cover],
            TestRole::Trainee => &[TestFamily::Training],
        }
    }

    fn cardinality(self) -> Cardinality {
        match self {
            TestRole::Lead | TestRole::Backup => Cardinality::Mandatory,
            TestRole::Trainee => Cardinality::Optional,
        }
    }
}
