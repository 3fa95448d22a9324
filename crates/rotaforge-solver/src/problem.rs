//! Declarative rota problems.

use std::collections::{BTreeMap, BTreeSet};

use rotaforge_core::Role;

use crate::constraint::HardConstraint;

/// Everything needed to build a model for one attempt and to validate its
/// answer afterwards.
#[derive(Debug, Clone)]
pub struct RotaProblem<R: Role> {
    pub title: String,
    /// "week", "day", ...
    pub period_noun: &'static str,
    pub num_periods: usize,
    pub people: Vec<String>,
    /// 0-based leave periods per person. Periods past the horizon are
    /// ignored.
    pub leave: BTreeMap<String, BTreeSet<usize>>,
    pub constraints: Vec<HardConstraint<R>>,
}

impl<R: Role> RotaProblem<R> {
    pub fn new<I, S>(
        title: impl Into<String>,
        period_noun: &'static str,
        num_periods: usize,
        people: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            period_noun,
            num_periods,
            people: people.into_iter().map(Into::into).collect(),
            leave: BTreeMap::new(),
            constraints: Vec::new(),
        }
    }

    pub fn with_leave(mut self, leave: BTreeMap<String, BTreeSet<usize>>) -> Self {
        self.leave = leave;
        self
    }

    pub fn with_constraint(mut self, constraint: HardConstraint<R>) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn push(&mut self, constraint: HardConstraint<R>) {
        self.constraints.push(constraint);
    }

    pub fn is_on_leave(&self, person: &str, period: usize) -> bool {
        self.leave
            .get(person)
            .is_some_and(|periods| periods.contains(&period))
    }
}
