//! Independent validation of solved assignment tables.
//!
//! The optimizer's claim of success is not trusted. Every rule is replayed
//! against the extracted table by ordinary per-period iteration, with running
//! state standing in for the model's auxiliary variables.

use std::collections::BTreeSet;

use rotaforge_core::{Assignments, Cardinality, Role, Solution, SolverFault};

use crate::constraint::HardConstraint;
use crate::problem::RotaProblem;

/// Checks `solution` against every structural rule and every hard constraint
/// of `problem`.
///
/// Periods are walked in order. In each period the checks run as role
/// cardinality, single role per person, leave, then each hard constraint in
/// problem order. The first violation found is returned.
pub fn validate<R: Role>(
    problem: &RotaProblem<R>,
    solution: &Solution<R>,
) -> Result<(), SolverFault> {
    let mut state = ReplayState::new(&problem.constraints);
    for period in 0..problem.num_periods {
        check_period(problem, solution, period, &mut state)
            .map_err(|rule| SolverFault::new(period, rule, solution.dump()))?;
    }
    Ok(())
}

/// Running per-constraint totals carried from one period to the next.
struct ReplayState {
    totals: Vec<u32>,
    seen: Vec<BTreeSet<String>>,
}

impl ReplayState {
    fn new<R: Role>(constraints: &[HardConstraint<R>]) -> Self {
        let totals = constraints
            .iter()
            .map(|c| match c {
                HardConstraint::MinExperience { counter, .. } => counter.seed,
                _ => 0,
            })
            .collect();
        Self {
            totals,
            seen: vec![BTreeSet::new(); constraints.len()],
        }
    }
}

fn check_period<R: Role>(
    problem: &RotaProblem<R>,
    solution: &Solution<R>,
    period: usize,
    state: &mut ReplayState,
) -> Result<(), String> {
    for role in R::ALL.iter().copied() {
        let holders = solution.assignees(period, role);
        match role.cardinality() {
            Cardinality::Mandatory if holders.len() != 1 => {
                return Err(format!(
                    "role '{}' needs exactly one holder, found {}",
                    role.name(),
                    holders.len()
                ));
            }
            Cardinality::Optional if holders.len() > 1 => {
                return Err(format!(
                    "role '{}' has {} holders",
                    role.name(),
                    holders.len()
                ));
            }
            _ => {}
        }
    }

    for person in &problem.people {
        let held = solution.roles_of(period, person);
        if held.len() > 1 {
            return Err(format!("{} holds {} roles", person, held.len()));
        }
    }

    for person in &problem.people {
        if problem.is_on_leave(person, period) && !solution.roles_of(period, person).is_empty() {
            return Err(format!("{} is assigned while on leave", person));
        }
    }

    for (i, constraint) in problem.constraints.iter().enumerate() {
        if !holds(constraint, i, period, problem, solution, state) {
            return Err(constraint.describe());
        }
    }
    Ok(())
}

/// Evaluates one constraint at `period`, advancing its running state.
fn holds<R: Role>(
    constraint: &HardConstraint<R>,
    i: usize,
    period: usize,
    problem: &RotaProblem<R>,
    solution: &Solution<R>,
    state: &mut ReplayState,
) -> bool {
    match constraint {
        HardConstraint::Ineligible { person, role } => !solution.is_assigned(period, person, *role),

        HardConstraint::MinExperience {
            person,
            role,
            counter,
            threshold,
        } => {
            let value = state.totals[i];
            let ok = !solution.is_assigned(period, person, *role) || value > *threshold;
            state.totals[i] = counter.step(value, solution.count_of(period, person, &counter.counted));
            ok
        }

        HardConstraint::RepetitionCap {
            person,
            roles,
            prior,
            ceiling,
        } => {
            state.totals[i] += solution.count_of(period, person, roles);
            // an exhausted cap allows none, however far past the ceiling
            if prior >= ceiling {
                state.totals[i] == 0
            } else {
                prior + state.totals[i] <= *ceiling
            }
        }

        HardConstraint::NoConsecutivePeriods => {
            period == 0
                || problem.people.iter().all(|person| {
                    solution.roles_of(period - 1, person).is_empty()
                        || solution.roles_of(period, person).is_empty()
                })
        }

        HardConstraint::TeamSeparation {
            first,
            second,
            family,
            adjacent,
        } => {
            let duty = |t: usize, person: &str| solution.family_count(t, person, *family);
            if duty(period, first) + duty(period, second) > 1 {
                return false;
            }
            !(*adjacent
                && period > 0
                && (duty(period - 1, first) + duty(period, second) > 1
                    || duty(period - 1, second) + duty(period, first) > 1))
        }

        HardConstraint::FamilyQuota {
            person,
            family,
            max,
        } => {
            state.totals[i] += solution.family_count(period, person, *family);
            state.totals[i] <= *max
        }

        HardConstraint::RollingWindow {
            person,
            window,
            exempt,
        } => {
            let start = (period + 1).saturating_sub(*window);
            let counted: u32 = (start..=period)
                .map(|t| {
                    solution
                        .roles_of(t, person)
                        .into_iter()
                        .filter(|r| exempt.map_or(true, |family| !r.in_family(family)))
                        .count() as u32
                })
                .sum();
            *window == 0 || counted <= 1
        }

        HardConstraint::GroupQuota { members, cap, .. } => {
            for member in members {
                if !solution.roles_of(period, member).is_empty() {
                    state.seen[i].insert(member.clone());
                }
            }
            state.seen[i].len() as u32 <= *cap
        }
    }
}
