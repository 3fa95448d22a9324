//! End-to-end tests for the weekly support rota.

use std::collections::BTreeSet;

use rotaforge::prelude::*;
use rotaforge::support::{repair_seniority, Experience, PRIMARY_THRESHOLD, SECONDARY_ONCALL_THRESHOLD};
use rotaforge::SupportConfig;

use SupportRole::*;

const SENIOR: Experience = Experience {
    inhours: 5,
    shadow: 2,
    oncall: 5,
};
const MID: Experience = Experience {
    inhours: 3,
    shadow: 2,
    oncall: 3,
};
const JUNIOR: Experience = Experience {
    inhours: 0,
    shadow: 2,
    oncall: 0,
};

const SENIOR_ROLES: [SupportRole; 6] = [
    Primary,
    Secondary,
    PrimaryStandby,
    SecondaryStandby,
    PrimaryOncall,
    SecondaryOncall,
];
const JUNIOR_ROLES: [SupportRole; 4] = [Secondary, PrimaryStandby, SecondaryStandby, PrimaryOncall];

/// Twelve people in four teams: enough for two weeks with nobody working
/// both.
fn team_table() -> People<SupportPerson> {
    let mut people = People::new();
    for team in 1..=4 {
        let name = |kind: &str| format!("{}{}", kind, team);
        let team_name = format!("team{}", team);
        people.insert(
            name("senior"),
            SupportPerson::new(&team_name)
                .with_roles(SENIOR_ROLES)
                .with_experience(SENIOR),
        );
        people.insert(
            name("mid"),
            SupportPerson::new(&team_name)
                .with_roles(SENIOR_ROLES)
                .with_experience(MID),
        );
        people.insert(
            name("junior"),
            SupportPerson::new(&team_name)
                .with_roles(JUNIOR_ROLES)
                .with_experience(JUNIOR),
        );
    }
    people
}

fn config(seed: u64) -> RotaConfig {
    RotaConfig::new()
        .with_random_seed(seed)
        .with_termination_seconds(120)
        .with_support(SupportConfig {
            num_weeks: 2,
            ..SupportConfig::default()
        })
}

fn assert_rules_hold(rota: &Rota<SupportRole>, people: &People<SupportPerson>) {
    let mut previous: BTreeSet<String> = BTreeSet::new();
    for (week, slots) in rota.periods().iter().enumerate() {
        for role in SupportRole::ALL.iter().filter(|r| r.is_mandatory()) {
            assert!(slots.contains_key(role), "week {} has no {}", week, role.name());
        }

        let working: BTreeSet<String> = slots.values().cloned().collect();
        assert_eq!(working.len(), slots.len(), "week {} double-books someone", week);
        assert!(
            working.is_disjoint(&previous),
            "week {} repeats someone from the week before",
            week
        );

        for (role, name) in slots {
            let person = &people[name];
            assert!(person.can_do(*role), "{} cannot be {}", name, role.name());
            assert!(!person.forbidden_weeks.contains(&week));
            match role {
                Primary => assert!(person.experience.inhours > PRIMARY_THRESHOLD),
                SecondaryOncall => {
                    assert!(person.experience.oncall > SECONDARY_ONCALL_THRESHOLD)
                }
                _ => {}
            }
        }

        let in_hours_teams: Vec<&str> = [Primary, Secondary, Shadow]
            .iter()
            .filter_map(|r| slots.get(r))
            .map(|name| people[name].team.as_str())
            .collect();
        let distinct: BTreeSet<&str> = in_hours_teams.iter().copied().collect();
        assert_eq!(distinct.len(), in_hours_teams.len());

        previous = working;
    }
}

#[test]
fn test_generates_valid_rota() {
    let people = team_table();
    let rota = support::generate(&people, &config(3)).unwrap();

    assert_eq!(rota.periods().len(), 2);
    assert_eq!(rota.period_noun(), "week");
    assert_rules_hold(&rota, &people);
}

#[test]
fn test_in_hours_teams_rest_a_week() {
    let people = team_table();
    let rota = support::generate(&people, &config(5)).unwrap();

    let team_of = |week: usize| -> Vec<String> {
        [Primary, Secondary, Shadow]
            .iter()
            .filter_map(|r| rota.assignee(week, *r))
            .map(|name| people[name].team.clone())
            .collect()
    };
    let first = team_of(0);
    for team in team_of(1) {
        assert!(!first.contains(&team), "{} is in-hours two weeks running", team);
    }
}

#[test]
fn test_senior_role_goes_to_more_experienced() {
    let people = team_table();
    let rota = support::generate(&people, &config(9)).unwrap();

    for week in 0..2 {
        let experience = |role| {
            rota.assignee(week, role)
                .map(|name| people[name].experience.inhours)
        };
        if let (Some(primary), Some(secondary)) = (experience(Primary), experience(Secondary)) {
            assert!(primary >= secondary, "week {}: {} < {}", week, primary, secondary);
        }
    }
}

#[test]
fn test_repair_is_idempotent_on_output() {
    let people = team_table();
    let config = config(13);
    let rota = support::generate(&people, &config).unwrap();

    let mut again = rota.clone();
    assert_eq!(repair_seniority(&mut again, &people, &config.support), 0);
    assert_eq!(again, rota);
}

#[test]
fn test_same_seed_same_rota() {
    let people = team_table();
    let first = support::generate(&people, &config(21)).unwrap();
    let second = support::generate(&people, &config(21)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_person_on_leave_is_never_assigned() {
    let mut people = team_table();
    people.insert(
        "away".to_string(),
        SupportPerson::new("team5")
            .with_roles(SENIOR_ROLES)
            .with_experience(SENIOR)
            .on_leave([0, 1]),
    );

    let rota = support::generate(&people, &config(4)).unwrap();
    assert!(rota.periods_of("away").is_empty());
    assert_rules_hold(&rota, &people);
}

#[test]
fn test_shadow_veteran_is_never_shadow() {
    let mut people = team_table();
    people.insert(
        "veteran".to_string(),
        SupportPerson::new("team5")
            .with_roles(SupportRole::ALL.iter().copied())
            .with_experience(Experience {
                inhours: 6,
                shadow: 3,
                oncall: 6,
            }),
    );

    let rota = support::generate(&people, &config(1)).unwrap();
    for week in 0..2 {
        assert_ne!(rota.assignee(week, Shadow), Some("veteran"));
    }
    assert_rules_hold(&rota, &people);
}

#[test]
fn test_too_few_people_is_infeasible() {
    let mut people = People::new();
    for name in ["ann", "bob", "cat", "dan", "eve"] {
        people.insert(
            name.to_string(),
            SupportPerson::new(name)
                .with_roles(SupportRole::ALL.iter().copied())
                .with_experience(SENIOR),
        );
    }
    let config = config(1).with_support(SupportConfig {
        num_weeks: 4,
        ..SupportConfig::default()
    });

    let err = support::generate(&people, &config).unwrap_err();
    assert!(matches!(err, RotaError::Infeasible), "got {:?}", err);
}
