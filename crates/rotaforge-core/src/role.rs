//! Role tags.
//!
//! Every rota flavor defines a closed enum of roles. Each variant carries
//! fixed structured attributes through static lookups: an ordinal index used
//! to lay out the assignment table, the role families it belongs to, and
//! whether it must be filled every period.

use std::fmt::Debug;
use std::hash::Hash;

/// Whether a role must be filled in every period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Cardinality {
    /// Exactly one assignee per period.
    Mandatory,
    /// At most one assignee per period.
    Optional,
}

/// A closed set of duty roles.
///
/// # Example
///
/// ```
/// use rotaforge_core::{Cardinality, Role};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// enum Desk { Lead, Trainee }
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// enum DeskFamily { Desk }
///
/// impl Role for Desk {
///     type Family = DeskFamily;
///     const ALL: &'static [Self] = &[Desk::Lead, Desk::Trainee];
///
///     fn name(self) -> &'static str {
///         match self { Desk::Lead => "lead", Desk::Trainee => "trainee" }
///     }
///     fn index(self) -> usize { self as usize }
///     fn families(self) -> &'static [DeskFamily] { &[DeskFamily::Desk] }
///     fn cardinality(self) -> Cardinality {
///         match self { Desk::Lead => Cardinality::Mandatory, Desk::Trainee => Cardinality::Optional }
///     }
/// }
///
/// assert!(Desk::Lead.is_mandatory());
/// assert!(Desk::Trainee.in_family(DeskFamily::Desk));
/// ```
pub trait Role: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static {
    /// Role-family tag type.
    type Family: Copy + Eq + Ord + Hash + Debug + Send + Sync + 'static;

    /// Every role, ordered by [`Role::index`].
    const ALL: &'static [Self];

    /// Lower-case name used in output columns and diagnostics.
    fn name(self) -> &'static str;

    /// Ordinal position in [`Role::ALL`].
    fn index(self) -> usize;

    /// Families this role belongs to.
    fn families(self) -> &'static [Self::Family];

    /// Mandatory-vs-optional cardinality per period.
    fn cardinality(self) -> Cardinality;

    fn is_mandatory(self) -> bool {
        self.cardinality() == Cardinality::Mandatory
    }

    fn in_family(self, family: Self::Family) -> bool {
        self.families().contains(&family)
    }

    /// Roles belonging to `family`, in ordinal order.
    fn members_of(family: Self::Family) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|r| r.in_family(family))
            .collect()
    }
}
