//! Encoding tests: each rule is built into a tiny model and solved.

use std::collections::{BTreeMap, BTreeSet};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rotaforge_core::{Assignments, Result, RotaError, Solution};
use rotaforge_test::{TestFamily, TestRole};

use super::*;
use crate::builder::build;
use crate::problem::RotaProblem;
use crate::solve::solve_and_validate;

use TestRole::{Backup, Lead, Trainee};

fn run(problem: &RotaProblem<TestRole>) -> Result<Solution<TestRole>> {
    let model = build(problem, &mut ChaCha8Rng::seed_from_u64(17));
    solve_and_validate(problem, model, None)
}

/// Only `person` may lead.
fn sole_lead(problem: RotaProblem<TestRole>, person: &str) -> RotaProblem<TestRole> {
    let others: Vec<String> = problem
        .people
        .iter()
        .filter(|p| *p != person)
        .cloned()
        .collect();
    others.into_iter().fold(problem, |problem, other| {
        problem.with_constraint(HardConstraint::Ineligible {
            person: other,
            role: Lead,
        })
    })
}

#[test]
fn test_describe() {
    let rule = HardConstraint::<TestRole>::RepetitionCap {
        person: "ann".into(),
        roles: vec![Lead, Trainee],
        prior: 1,
        ceiling: 2,
    };
    assert_eq!(rule.describe(), "ann may hold lead/trainee at most 2 times (1 already)");

    let rule = HardConstraint::<TestRole>::FamilyQuota {
        person: "bob".into(),
        family: TestFamily::Cover,
        max: 3,
    };
    assert_eq!(rule.describe(), "bob holds at most 3 Cover roles");
}

#[test]
fn test_accruing_experience_orders_appearances() {
    // ann is the only lead available in period 1, so she has to back up first
    let leave = BTreeMap::from([("bob".to_string(), BTreeSet::from([1]))]);
    let problem = RotaProblem::new("t", "week", 2, ["ann", "bob", "dan"])
        .with_leave(leave)
        .with_constraint(HardConstraint::Ineligible {
            person: "dan".into(),
            role: Lead,
        })
        .with_constraint(HardConstraint::MinExperience {
            person: "ann".into(),
            role: Lead,
            counter: ExperienceCounter::running("cover", 0, vec![Lead, Backup]),
            threshold: 0,
        });

    let solution = run(&problem).unwrap();
    assert!(solution.is_assigned(0, "ann", Backup));
    assert!(solution.is_assigned(1, "ann", Lead));
}

#[test]
fn test_unseasoned_sole_lead_is_infeasible() {
    let problem = sole_lead(RotaProblem::new("t", "week", 1, ["ann", "bob", "cat"]), "ann")
        .with_constraint(HardConstraint::MinExperience {
            person: "ann".into(),
            role: Lead,
            counter: ExperienceCounter::running("cover", 0, vec![Lead, Backup]),
            threshold: 0,
        });
    assert!(matches!(run(&problem), Err(RotaError::Infeasible)));
}

#[test]
fn test_fixed_experience_short_circuits() {
    let gated = |seed| {
        sole_lead(RotaProblem::new("t", "week", 1, ["ann", "bob"]), "ann").with_constraint(
            HardConstraint::MinExperience {
                person: "ann".into(),
                role: Lead,
                counter: ExperienceCounter::fixed("cover", seed),
                threshold: 2,
            },
        )
    };
    assert!(matches!(run(&gated(2)), Err(RotaError::Infeasible)));
    assert!(run(&gated(3)).is_ok());
}

#[test]
fn test_exhausted_repetition_cap_zeroes_roles() {
    let problem = sole_lead(RotaProblem::new("t", "week", 1, ["ann", "bob"]), "ann")
        .with_constraint(HardConstraint::RepetitionCap {
            person: "ann".into(),
            roles: vec![Lead],
            prior: 2,
            ceiling: 2,
        });
    assert!(matches!(run(&problem), Err(RotaError::Infeasible)));
}

#[test]
fn test_repetition_cap_limits_total() {
    let problem = RotaProblem::new("t", "week", 4, ["ann", "bob", "cat"]).with_constraint(
        HardConstraint::RepetitionCap {
            person: "ann".into(),
            roles: vec![Lead, Backup],
            prior: 1,
            ceiling: 2,
        },
    );
    let solution = run(&problem).unwrap();
    let held: u32 = (0..4)
        .map(|t| solution.count_of(t, "ann", &[Lead, Backup]))
        .sum();
    assert!(held <= 1);
}

#[test]
fn test_rolling_window_with_and_without_exemption() {
    // two people and two mandatory roles: both work every period
    let window = |exempt| {
        RotaProblem::new("t", "day", 2, ["ann", "bob"]).with_constraint(
            HardConstraint::RollingWindow {
                person: "ann".into(),
                window: 2,
                exempt,
            },
        )
    };
    assert!(matches!(run(&window(None)), Err(RotaError::Infeasible)));
    assert!(run(&window(Some(TestFamily::Cover))).is_ok());
}

#[test]
fn test_group_quota() {
    let capped = |people: &[&str]| {
        RotaProblem::new("t", "day", 1, people.iter().copied()).with_constraint(
            HardConstraint::GroupQuota {
                group: "red".into(),
                members: vec!["ann".into(), "bob".into()],
                cap: 1,
            },
        )
    };

    let solution = run(&capped(&["ann", "bob", "cat"])).unwrap();
    assert_eq!(solution.roles_of(0, "cat").len(), 1);
    assert!(matches!(run(&capped(&["ann", "bob"])), Err(RotaError::Infeasible)));
}

#[test]
fn test_adjacent_team_separation() {
    // four people, two roles, no repeats: ann and bob must split the periods
    let problem = RotaProblem::new("t", "week", 2, ["ann", "bob", "cat", "dan"])
        .with_constraint(HardConstraint::NoConsecutivePeriods)
        .with_constraint(HardConstraint::TeamSeparation {
            first: "ann".into(),
            second: "bob".into(),
            family: TestFamily::Cover,
            adjacent: true,
        });
    assert!(matches!(run(&problem), Err(RotaError::Infeasible)));

    let same_period_only = RotaProblem::new("t", "week", 2, ["ann", "bob", "cat", "dan"])
        .with_constraint(HardConstraint::NoConsecutivePeriods)
        .with_constraint(HardConstraint::TeamSeparation {
            first: "ann".into(),
            second: "bob".into(),
            family: TestFamily::Cover,
            adjacent: false,
        });
    let solution = run(&same_period_only).unwrap();
    for t in 0..2 {
        let cover = |person| solution.family_count(t, person, TestFamily::Cover);
        assert!(cover("ann") + cover("bob") <= 1);
    }
}

#[test]
fn test_unknown_person_is_vacuous() {
    let problem = RotaProblem::new("t", "week", 1, ["ann", "bob"]).with_constraint(
        HardConstraint::Ineligible {
            person: "zed".into(),
            role: Lead,
        },
    );
    assert!(run(&problem).is_ok());
}
