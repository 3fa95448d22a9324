//! Solved assignment tables.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::marker::PhantomData;

use crate::role::Role;

/// Read-only `(period, person, role) -> bool` lookups.
///
/// Implemented by the optimizer's [`Solution`] and by the repaired
/// [`Rota`](crate::Rota) output, so that experience replay and checks can run
/// against either.
pub trait Assignments<R: Role> {
    fn num_periods(&self) -> usize;

    fn is_assigned(&self, period: usize, person: &str, role: R) -> bool;

    /// Number of roles in `family` held by `person` in `period`.
    fn family_count(&self, period: usize, person: &str, family: R::Family) -> u32 {
        R::ALL
            .iter()
            .filter(|r| r.in_family(family) && self.is_assigned(period, person, **r))
            .count() as u32
    }

    /// Number of roles in `roles` held by `person` in `period`.
    fn count_of(&self, period: usize, person: &str, roles: &[R]) -> u32 {
        roles
            .iter()
            .filter(|r| self.is_assigned(period, person, **r))
            .count() as u32
    }

    /// Roles held by `person` in `period`, in ordinal order.
    fn roles_of(&self, period: usize, person: &str) -> Vec<R> {
        R::ALL
            .iter()
            .copied()
            .filter(|r| self.is_assigned(period, person, *r))
            .collect()
    }
}

/// An immutable solved assignment table.
///
/// Produced once per solve and never mutated; validation, extraction and
/// diagnostics all query it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<R: Role> {
    num_periods: usize,
    people: Vec<String>,
    index: BTreeMap<String, usize>,
    values: Vec<bool>,
    _roles: PhantomData<fn() -> R>,
}

impl<R: Role> Solution<R> {
    /// Wraps a dense table laid out as `[period][person][role]`.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not cover the full period × person × role
    /// space.
    pub fn new(num_periods: usize, people: Vec<String>, values: Vec<bool>) -> Self {
        assert_eq!(
            values.len(),
            num_periods * people.len() * R::ALL.len(),
            "assignment table does not match the period × person × role space"
        );
        let index = people
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            num_periods,
            people,
            index,
            values,
            _roles: PhantomData,
        }
    }

    /// Builds a table from explicit `(period, person, role)` triples.
    ///
    /// Triples naming unknown people or periods outside the horizon are
    /// ignored.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let solution = Solution::from_assignments(2, ["ann", "bob"], &[(0, "ann", Desk::Lead)]);
    /// assert!(solution.is_assigned(0, "ann", Desk::Lead));
    /// ```
    pub fn from_assignments<I, S>(num_periods: usize, people: I, assignments: &[(usize, &str, R)]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let people: Vec<String> = people.into_iter().map(Into::into).collect();
        let values = vec![false; num_periods * people.len() * R::ALL.len()];
        let mut solution = Self::new(num_periods, people, values);
        for &(period, person, role) in assignments {
            if period >= num_periods {
                continue;
            }
            if let Some(&p) = solution.index.get(person) {
                let offset = solution.offset(period, p, role);
                solution.values[offset] = true;
            }
        }
        solution
    }

    /// People in table order.
    pub fn people(&self) -> &[String] {
        &self.people
    }

    /// Everyone holding `role` in `period`.
    pub fn assignees(&self, period: usize, role: R) -> Vec<&str> {
        self.people
            .iter()
            .enumerate()
            .filter(|(p, _)| self.values[self.offset(period, *p, role)])
            .map(|(_, name)| name.as_str())
            .collect()
    }

    /// The first person holding `role` in `period`, if any.
    pub fn assignee(&self, period: usize, role: R) -> Option<&str> {
        self.assignees(period, role).into_iter().next()
    }

    /// Renders every period's role → person assignments, one line per
    /// period. Roles with several holders list them all.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for period in 0..self.num_periods {
            let _ = write!(out, "period {}:", period + 1);
            for role in R::ALL {
                let holders = self.assignees(period, *role);
                let holders = if holders.is_empty() {
                    "-".to_string()
                } else {
                    holders.join("+")
                };
                let _ = write!(out, " {}={}", role.name(), holders);
            }
            out.push('\n');
        }
        out
    }

    fn offset(&self, period: usize, person: usize, role: R) -> usize {
        (period * self.people.len() + person) * R::ALL.len() + role.index()
    }
}

impl<R: Role> Assignments<R> for Solution<R> {
    fn num_periods(&self) -> usize {
        self.num_periods
    }

    fn is_assigned(&self, period: usize, person: &str, role: R) -> bool {
        if period >= self.num_periods {
            return false;
        }
        self.index
            .get(person)
            .is_some_and(|p| self.values[self.offset(period, *p, role)])
    }
}
