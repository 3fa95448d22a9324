//! Running experience counters.

use rotaforge_core::{Assignments, Role};

/// One definition of an experience counter, shared by the model encoder, the
/// validator and post-solve repair.
///
/// An accruing counter starts at `seed` and grows by the number of `counted`
/// roles held in each earlier period. A fixed counter stays at `seed`; rota
/// flavors use one when a person can hold the counted roles at most once,
/// since a single appearance can then never be followed by a gated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceCounter<R: Role> {
    pub name: &'static str,
    pub seed: u32,
    pub counted: Vec<R>,
    pub accrues: bool,
}

impl<R: Role> ExperienceCounter<R> {
    pub fn running(name: &'static str, seed: u32, counted: Vec<R>) -> Self {
        Self {
            name,
            seed,
            counted,
            accrues: true,
        }
    }

    pub fn fixed(name: &'static str, seed: u32) -> Self {
        Self {
            name,
            seed,
            counted: Vec::new(),
            accrues: false,
        }
    }

    /// Value after a period in which `held` counted roles were held.
    pub fn step(&self, previous: u32, held: u32) -> u32 {
        if self.accrues {
            previous + held
        } else {
            previous
        }
    }

    /// Largest value reachable within `num_periods`, given at most one role
    /// per person per period.
    pub fn bound(&self, num_periods: usize) -> u32 {
        if self.accrues {
            self.seed + num_periods as u32
        } else {
            self.seed
        }
    }

    /// Value at the start of `period`, replayed from `table`.
    pub fn value_at(&self, table: &impl Assignments<R>, person: &str, period: usize) -> u32 {
        (0..period.min(table.num_periods())).fold(self.seed, |value, t| {
            self.step(value, table.count_of(t, person, &self.counted))
        })
    }
}
