//! Minimal person records.

use std::collections::BTreeSet;

use rotaforge_core::{Member, People};

/// A person with a team and a leave set and nothing else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Staff {
    pub team: String,
    pub leave: BTreeSet<usize>,
}

impl Staff {
    /// Creates a person on `team` with no leave.
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            leave: BTreeSet::new(),
        }
    }

    /// Adds leave periods.
    pub fn on_leave(mut self, periods: impl IntoIterator<Item = usize>) -> Self {
        self.leave.extend(periods);
        self
    }
}

impl Member for Staff {
    fn team(&self) -> &str {
        &self.team
    }

    fn leave(&self) -> &BTreeSet<usize> {
        &self.leave
    }
}

/// Builds a table of `(name, team)` people without leave.
///
/// # Example
///
/// ```
/// use rotaforge_test::staff_table;
///
/// let people = staff_table(&[("ann", "red"), ("bob", "blue")]);
/// assert_eq!(people.keys().collect::<Vec<_>>(), ["ann", "bob"]);
/// ```
pub fn staff_table(entries: &[(&str, &str)]) -> People<Staff> {
    entries
        .iter()
        .map(|(name, team)| (name.to_string(), Staff::new(*team)))
        .collect()
}
