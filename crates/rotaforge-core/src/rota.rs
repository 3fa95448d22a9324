//! The per-period rota output.

use std::collections::BTreeMap;

use crate::role::Role;
use crate::solution::{Assignments, Solution};

/// A solved rota: one `role -> person` mapping per period.
///
/// Roles with no assignee are absent from a period's mapping. After a
/// validated solve that can only happen for optional roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rota<R: Role> {
    period_noun: &'static str,
    periods: Vec<BTreeMap<R, String>>,
}

impl<R: Role> Rota<R> {
    /// Creates an empty rota of `num_periods` periods.
    pub fn new(period_noun: &'static str, num_periods: usize) -> Self {
        Self {
            period_noun,
            periods: vec![BTreeMap::new(); num_periods],
        }
    }

    /// Extracts the rota from a solved assignment table.
    pub fn from_solution(period_noun: &'static str, solution: &Solution<R>) -> Self {
        let mut rota = Self::new(period_noun, solution.num_periods());
        for (period, row) in rota.periods.iter_mut().enumerate() {
            for role in R::ALL {
                if let Some(person) = solution.assignee(period, *role) {
                    row.insert(*role, person.to_string());
                }
            }
        }
        rota
    }

    /// "week", "day", ...
    pub fn period_noun(&self) -> &'static str {
        self.period_noun
    }

    /// Assigns `role` in `period` to `person`.
    ///
    /// # Panics
    ///
    /// Panics if `period` is outside the horizon.
    pub fn assign(&mut self, period: usize, role: R, person: impl Into<String>) {
        self.periods[period].insert(role, person.into());
    }

    pub fn assignee(&self, period: usize, role: R) -> Option<&str> {
        self.periods
            .get(period)
            .and_then(|row| row.get(&role))
            .map(String::as_str)
    }

    /// One row per period.
    pub fn periods(&self) -> &[BTreeMap<R, String>] {
        &self.periods
    }

    pub(crate) fn period_mut(&mut self, period: usize) -> Option<&mut BTreeMap<R, String>> {
        self.periods.get_mut(period)
    }

    /// Swaps the holders of two roles in `period`.
    ///
    /// Does nothing unless both roles are filled.
    pub fn swap(&mut self, period: usize, first: R, second: R) {
        let Some(row) = self.period_mut(period) else {
            return;
        };
        if !(row.contains_key(&first) && row.contains_key(&second)) {
            return;
        }
        if let (Some(a), Some(b)) = (row.remove(&first), row.remove(&second)) {
            row.insert(first, b);
            row.insert(second, a);
        }
    }

    /// Periods in which `person` holds any role.
    pub fn periods_of(&self, person: &str) -> Vec<usize> {
        self.periods
            .iter()
            .enumerate()
            .filter(|(_, row)| row.values().any(|p| p == person))
            .map(|(i, _)| i)
            .collect()
    }
}

impl<R: Role> Assignments<R> for Rota<R> {
    fn num_periods(&self) -> usize {
        self.periods.len()
    }

    fn is_assigned(&self, period: usize, person: &str, role: R) -> bool {
        self.assignee(period, role) == Some(person)
    }
}
