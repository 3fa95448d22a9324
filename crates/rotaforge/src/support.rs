//! Weekly second-line support rota.
//!
//! Each week needs an in-hours primary and secondary (plus an optional
//! shadow), two in-hours standbys, and a primary and secondary for
//! out-of-hours on-call. Experience gates who may take the senior roles, and
//! that experience grows as the rota runs.
//!
//! # Example
//!
//! ```no_run
//! use rotaforge::prelude::*;
//! use rotaforge::support::Experience;
//!
//! let mut people = People::new();
//! people.insert(
//!     "ann".to_string(),
//!     SupportPerson::new("platform")
//!         .with_roles([SupportRole::Primary, SupportRole::PrimaryOncall])
//!         .with_experience(Experience { inhours: 4, shadow: 2, oncall: 3 }),
//! );
//! // ... enough people to fill seven roles a week ...
//!
//! let config = RotaConfig::new().with_random_seed(1);
//! match support::generate(&people, &config) {
//!     Ok(rota) => println!("{} weeks", rota.periods().len()),
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use std::collections::BTreeSet;

use rotaforge_config::{RotaConfig, SupportConfig};
use rotaforge_core::{leave_map, Assignments, Cardinality, Member, People, Result, Role, Rota, RotaError};
use rotaforge_solver::{
    attempt_rng, build, master_seed, repair, solve_and_validate, ExperienceCounter, HardConstraint,
    ObjectiveComposer, RotaModel, RotaProblem, SeniorityPair,
};
use tracing::info;

use crate::tiers;

/// In-hours experience needed, exclusive, before someone may be primary.
pub const PRIMARY_THRESHOLD: u32 = 2;
/// Shadow experience needed, exclusive, before someone may be secondary.
pub const SECONDARY_THRESHOLD: u32 = 1;
/// On-call experience needed, exclusive, before someone may be secondary
/// on-call.
pub const SECONDARY_ONCALL_THRESHOLD: u32 = 2;
/// Lifetime shadow shifts, earlier rotas included.
pub const SHADOW_CEILING: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SupportRole {
    Primary,
    Secondary,
    Shadow,
    PrimaryStandby,
    SecondaryStandby,
    PrimaryOncall,
    SecondaryOncall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SupportFamily {
    InHours,
    Standby,
    Oncall,
}

impl Role for SupportRole {
    type Family = SupportFamily;

    const ALL: &'static [Self] = &[
        SupportRole::Primary,
        SupportRole::Secondary,
        SupportRole::Shadow,
        SupportRole::PrimaryStandby,
        SupportRole::SecondaryStandby,
        SupportRole::PrimaryOncall,
        SupportRole::SecondaryOncall,
    ];

    fn name(self) -> &'static str {
        match self {
            SupportRole::Primary => "primary",
            SupportRole::Secondary => "secondary",
            SupportRole::Shadow => "shadow",
            SupportRole::PrimaryStandby => "primary_standby",
            SupportRole::SecondaryStandby => "secondary_standby",
            SupportRole::PrimaryOncall => "primary_oncall",
            SupportRole::SecondaryOncall => "secondary_oncall",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn families(self) -> &'static [SupportFamily] {
        match self {
            SupportRole::Primary | SupportRole::Secondary | SupportRole::Shadow => {
                &[SupportFamily::InHours]
            }
            SupportRole::PrimaryStandby | SupportRole::SecondaryStandby => {
                &[SupportFamily::Standby]
            }
            SupportRole::PrimaryOncall | SupportRole::SecondaryOncall => &[SupportFamily::Oncall],
        }
    }

    fn cardinality(self) -> Cardinality {
        match self {
            SupportRole::Shadow => Cardinality::Optional,
            _ => Cardinality::Mandatory,
        }
    }
}

/// Shifts done before this rota starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Experience {
    /// In-hours primary or secondary shifts.
    pub inhours: u32,
    pub shadow: u32,
    /// On-call shifts of either kind.
    pub oncall: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SupportPerson {
    pub team: String,
    pub can_do: BTreeSet<SupportRole>,
    pub experience: Experience,
    /// 0-based weeks this person is away.
    pub forbidden_weeks: BTreeSet<usize>,
}

impl SupportPerson {
    pub fn new(team: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            can_do: BTreeSet::new(),
            experience: Experience::default(),
            forbidden_weeks: BTreeSet::new(),
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = SupportRole>) -> Self {
        self.can_do.extend(roles);
        self
    }

    pub fn with_experience(mut self, experience: Experience) -> Self {
        self.experience = experience;
        self
    }

    pub fn on_leave(mut self, weeks: impl IntoIterator<Item = usize>) -> Self {
        self.forbidden_weeks.extend(weeks);
        self
    }

    pub fn can_do(&self, role: SupportRole) -> bool {
        self.can_do.contains(&role)
    }
}

impl Member for SupportPerson {
    fn team(&self) -> &str {
        &self.team
    }

    fn leave(&self) -> &BTreeSet<usize> {
        &self.forbidden_weeks
    }
}

/// One person's experience counters for a given run.
///
/// A category someone can hold at most once in the rota never accrues: the
/// one appearance could not be followed by a gated one.
#[derive(Debug, Clone)]
pub struct Counters {
    pub inhours: ExperienceCounter<SupportRole>,
    pub shadow: ExperienceCounter<SupportRole>,
    pub oncall: ExperienceCounter<SupportRole>,
}

impl Counters {
    pub fn new(person: &SupportPerson, settings: &SupportConfig) -> Self {
        let counter = |name, seed, counted: Vec<SupportRole>, cap: u32| {
            if cap > 1 {
                ExperienceCounter::running(name, seed, counted)
            } else {
                ExperienceCounter::fixed(name, seed)
            }
        };
        let experience = person.experience;
        Self {
            inhours: counter(
                "inhours",
                experience.inhours,
                vec![SupportRole::Primary, SupportRole::Secondary],
                settings.max_inhours_shifts,
            ),
            shadow: counter(
                "shadow",
                experience.shadow,
                vec![SupportRole::Shadow],
                settings.max_inhours_shifts,
            ),
            oncall: counter(
                "oncall",
                experience.oncall,
                vec![SupportRole::PrimaryOncall, SupportRole::SecondaryOncall],
                settings.max_oncall_shifts,
            ),
        }
    }

    /// The counter and exclusive threshold gating `role`, if any.
    pub fn gate(&self, role: SupportRole) -> Option<(&ExperienceCounter<SupportRole>, u32)> {
        match role {
            SupportRole::Primary => Some((&self.inhours, PRIMARY_THRESHOLD)),
            SupportRole::Secondary => Some((&self.shadow, SECONDARY_THRESHOLD)),
            SupportRole::SecondaryOncall => Some((&self.oncall, SECONDARY_ONCALL_THRESHOLD)),
            _ => None,
        }
    }
}

/// Pairs whose senior role should go to the more experienced holder.
pub fn seniority_pairs() -> [SeniorityPair<SupportRole>; 2] {
    [
        SeniorityPair::new(SupportRole::Primary, SupportRole::Secondary),
        SeniorityPair::new(SupportRole::SecondaryOncall, SupportRole::PrimaryOncall),
    ]
}

/// Builds the declarative problem for `people`.
pub fn problem(people: &People<SupportPerson>, settings: &SupportConfig) -> RotaProblem<SupportRole> {
    let mut problem = RotaProblem::new("2ndline rota", "week", settings.num_weeks, people.keys())
        .with_leave(leave_map(people))
        .with_constraint(HardConstraint::NoConsecutivePeriods);

    for (name, person) in people {
        let counters = Counters::new(person, settings);
        for role in SupportRole::ALL.iter().copied() {
            if !person.can_do(role) {
                problem.push(HardConstraint::Ineligible {
                    person: name.clone(),
                    role,
                });
            } else if let Some((counter, threshold)) = counters.gate(role) {
                problem.push(HardConstraint::MinExperience {
                    person: name.clone(),
                    role,
                    counter: counter.clone(),
                    threshold,
                });
            }
        }

        if person.can_do(SupportRole::Shadow) {
            problem.push(HardConstraint::RepetitionCap {
                person: name.clone(),
                roles: vec![SupportRole::Shadow],
                prior: person.experience.shadow,
                ceiling: SHADOW_CEILING,
            });
        }

        for (family, max) in [
            (SupportFamily::InHours, settings.max_inhours_shifts),
            (SupportFamily::Standby, settings.max_standby_shifts),
            (SupportFamily::Oncall, settings.max_oncall_shifts),
        ] {
            problem.push(HardConstraint::FamilyQuota {
                person: name.clone(),
                family,
                max,
            });
        }
    }

    for (first, second) in teammates(people) {
        problem.push(HardConstraint::TeamSeparation {
            first: first.clone(),
            second: second.clone(),
            family: SupportFamily::InHours,
            adjacent: true,
        });
        problem.push(HardConstraint::TeamSeparation {
            first,
            second,
            family: SupportFamily::Standby,
            adjacent: false,
        });
    }
    problem
}

/// Every unordered pair of distinct people sharing a team.
fn teammates(people: &People<SupportPerson>) -> Vec<(String, String)> {
    let names: Vec<&String> = people.keys().collect();
    let mut pairs = Vec::new();
    for (i, first) in names.iter().enumerate() {
        for second in &names[i + 1..] {
            if people[*first].team() == people[*second].team() {
                pairs.push(((*first).clone(), (*second).clone()));
            }
        }
    }
    pairs
}

/// Lexicographic objective: people, then development opportunities, then
/// coverage, then the tie-break.
///
/// Development counts secondaries with under three in-hours shifts and
/// primary on-calls with under three on-call shifts, judged on experience
/// from before the rota.
pub fn objective(
    model: &RotaModel<SupportRole>,
    people: &People<SupportPerson>,
    rng: &mut impl rand::Rng,
) -> ObjectiveComposer {
    let mut development = Vec::new();
    for (name, person) in people {
        for t in 0..model.num_periods() {
            if person.experience.inhours <= PRIMARY_THRESHOLD {
                development.extend(model.assign_of(t, name, SupportRole::Secondary));
            }
            if person.experience.oncall <= SECONDARY_ONCALL_THRESHOLD {
                development.extend(model.assign_of(t, name, SupportRole::PrimaryOncall));
            }
        }
    }
    let cap = (2 * model.num_periods()) as f64;

    let composer = tiers::people(ObjectiveComposer::new(), model);
    let composer = composer.tier(
        "development",
        development.into_iter().map(|var| (var, 1.0)),
        Some(cap),
    );
    let composer = tiers::coverage(composer, model);
    tiers::tie_break(composer, model, rng)
}

/// Hands each senior role to the more experienced holder of its pair,
/// provided both people may hold their new roles. Returns the number of swaps.
pub fn repair_seniority(
    rota: &mut Rota<SupportRole>,
    people: &People<SupportPerson>,
    settings: &SupportConfig,
) -> usize {
    let counters: Vec<(&str, Counters)> = people
        .iter()
        .map(|(name, person)| (name.as_str(), Counters::new(person, settings)))
        .collect();
    let lookup = |name: &str| counters.iter().find(|(n, _)| *n == name).map(|(_, c)| c);
    repair(
        rota,
        &seniority_pairs(),
        |rota, period, name, pair| {
            let Some(counters) = lookup(name) else {
                return 0;
            };
            let counter = if pair.senior == SupportRole::Primary {
                &counters.inhours
            } else {
                &counters.oncall
            };
            counter.value_at(rota, name, period)
        },
        |rota, period, name, role| {
            let (Some(person), Some(counters)) = (people.get(name), lookup(name)) else {
                return false;
            };
            person.can_do(role)
                && counters
                    .gate(role)
                    .map_or(true, |(counter, threshold)| {
                        counter.value_at(rota, name, period) > threshold
                    })
        },
    )
}

/// Generates a validated, seniority-repaired support rota.
///
/// # Errors
///
/// - [`RotaError::Config`] when `config` fails validation
/// - [`RotaError::Infeasible`] when no rota satisfies the rules
/// - [`RotaError::TimedOut`] when the optimizer exceeds the time limit
/// - [`RotaError::SolverFault`] when the optimizer's answer breaks a rule
pub fn generate(people: &People<SupportPerson>, config: &RotaConfig) -> Result<Rota<SupportRole>> {
    config
        .validate()
        .map_err(|e| RotaError::Config(e.to_string()))?;
    let settings = &config.support;
    let seed = master_seed(config.random_seed);
    info!(
        event = "rota_start",
        flavor = "support",
        weeks = settings.num_weeks,
        people = people.len(),
        seed,
    );

    let problem = problem(people, settings);
    let mut rng = attempt_rng(seed, 0);
    let mut model = build(&problem, &mut rng);
    let objective = objective(&model, people, &mut rng).compose();
    model.set_objective(objective);
    let solution = solve_and_validate(&problem, model, Some(config.time_limit()))?;

    let mut rota = Rota::from_solution(problem.period_noun, &solution);
    let swaps = repair_seniority(&mut rota, people, settings);

    info!(
        event = "rota_end",
        flavor = "support",
        weeks = rota.num_periods(),
        swaps,
    );
    Ok(rota)
}
