//! End-to-end tests for the daily content-support rota.

use std::collections::BTreeSet;

use rotaforge::content_support::{
    ContentFamily, Grade, OTHER_PERIOD_LIMIT, PRODUCT_PEOPLE_LIMIT, SCD_PERIOD_LIMIT,
};
use rotaforge::prelude::*;
use rotaforge::{ContentSupportConfig, SoftLimitConfig};

use ContentFamily::{Cr, SecondLine, TwoI};

/// Six reviewers on separate teams and four second-liners.
fn people() -> People<ContentPerson> {
    let mut people = People::new();
    for i in 1..=6 {
        people.insert(
            format!("reviewer{}", i),
            ContentPerson::new(format!("team{}", i), Grade::Scd).with_skills([TwoI, Cr]),
        );
    }
    for i in 1..=4 {
        people.insert(
            format!("liner{}", i),
            ContentPerson::new("mainstream", Grade::Other).with_skills([SecondLine]),
        );
    }
    people
}

fn config(scd_start: u32) -> RotaConfig {
    RotaConfig::new()
        .with_random_seed(17)
        .with_worker_count(WorkerCount::Count(1))
        .with_termination_seconds(120)
        .with_content_support(ContentSupportConfig {
            num_weeks: 1,
            scd_period_limit: SoftLimitConfig::new(scd_start, 1),
            other_period_limit: SoftLimitConfig::new(1, 1),
            ..ContentSupportConfig::default()
        })
}

fn assert_rules_hold(rota: &Rota<ContentRole>, people: &People<ContentPerson>) {
    let mut previous: BTreeSet<String> = BTreeSet::new();
    for (day, slots) in rota.periods().iter().enumerate() {
        assert_eq!(slots.len(), ContentRole::ALL.len(), "day {} is short", day);

        let working: BTreeSet<String> = slots.values().cloned().collect();
        assert_eq!(working.len(), slots.len());
        assert!(working.is_disjoint(&previous), "day {} follows on", day);

        for (role, name) in slots {
            assert!(people[name].can_do(*role), "{} cannot be {}", name, role.name());
            assert!(!people[name].forbidden_days.contains(&day));
        }

        let a = &people[&slots[&ContentRole::A2i]];
        let b = &people[&slots[&ContentRole::B2i]];
        assert_ne!(a.team, b.team);

        previous = working;
    }
}

#[test]
fn test_strict_limits_that_fit_are_kept() {
    let people = people();
    let generated = content_support::generate(&people, &config(1)).unwrap();

    assert_eq!(generated.attempts, 1);
    assert_eq!(generated.limits.get(SCD_PERIOD_LIMIT), Some(1));
    assert_eq!(generated.limits.get(OTHER_PERIOD_LIMIT), Some(1));
    assert_eq!(generated.rota.periods().len(), 5);
    assert_eq!(generated.rota.period_noun(), "day");
    assert_rules_hold(&generated.rota, &people);
}

#[test]
fn test_limit_is_loosened_until_feasible() {
    // a two-day gap fits six reviewers in at most twice each over five days,
    // short of the fifteen review slots
    let people = people();
    let generated = content_support::generate(&people, &config(2)).unwrap();

    assert_eq!(generated.limits.get(SCD_PERIOD_LIMIT), Some(1));
    assert_eq!(generated.attempts, 2);
    assert_rules_hold(&generated.rota, &people);
}

#[test]
fn test_product_people_are_capped() {
    let mut people = people();
    for i in 1..=3 {
        people.insert(
            format!("product{}", i),
            ContentPerson::new("product", Grade::Other).with_skills([SecondLine]),
        );
    }
    let generated = content_support::generate(&people, &config(1)).unwrap();

    let cap = generated.limits.get(PRODUCT_PEOPLE_LIMIT).unwrap() as usize;
    let appearing = (1..=3)
        .filter(|i| !generated.rota.periods_of(&format!("product{}", i)).is_empty())
        .count();
    assert!(appearing <= cap);
    for i in 1..=3 {
        assert!(generated.rota.periods_of(&format!("product{}", i)).len() <= 1);
    }
    assert_rules_hold(&generated.rota, &people);
}

#[test]
fn test_leave_is_respected() {
    let mut people = people();
    if let Some(liner) = people.get_mut("liner1") {
        liner.forbidden_days.extend([0, 1, 2, 3, 4]);
    }
    people.insert(
        "liner5".to_string(),
        ContentPerson::new("mainstream", Grade::Other).with_skills([SecondLine]),
    );

    let generated = content_support::generate(&people, &config(1)).unwrap();
    assert!(generated.rota.periods_of("liner1").is_empty());
    assert_rules_hold(&generated.rota, &people);
}

#[test]
fn test_same_seed_single_worker_is_reproducible() {
    let people = people();
    let first = content_support::generate(&people, &config(2)).unwrap();
    let second = content_support::generate(&people, &config(2)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_nobody_eligible_exhausts_search() {
    let mut people = people();
    people.retain(|name, _| name.starts_with("reviewer"));

    let err = content_support::generate(&people, &config(2)).unwrap_err();
    assert!(
        matches!(err, RotaError::NoSatisfyingRota { attempts: 2 }),
        "got {:?}",
        err
    );
}
