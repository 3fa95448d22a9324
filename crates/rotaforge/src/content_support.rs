//! Daily content-support rota.
//!
//! Five roles are filled every working day: two second-pair-of-eyes reviews
//! (`2i`), one content-request triage (`cr`) and two second-line slots. How
//! often one person may appear is governed by soft limits that a concurrent
//! relaxation search loosens until some rota fits.

use std::collections::BTreeSet;
use std::sync::Arc;

use rotaforge_config::{ContentSupportConfig, RotaConfig};
use rotaforge_core::{leave_map, Cardinality, Member, People, Result, Role, Rota, RotaError};
use rotaforge_solver::{
    attempt_rng, build, master_seed, relaxation_candidates, solve_and_validate, HardConstraint,
    ObjectiveComposer, ParameterTuple, RelaxationSearch, RotaModel, RotaProblem, SoftLimit,
};
use tracing::info;

use crate::tiers;

pub const SCD_PERIOD_LIMIT: &str = "scd_period_limit";
pub const OTHER_PERIOD_LIMIT: &str = "other_period_limit";
pub const PRODUCT_PEOPLE_LIMIT: &str = "product_people_limit";

/// Working days per week.
pub const DAYS_PER_WEEK: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ContentRole {
    A2i,
    B2i,
    Cr,
    A2ndline,
    B2ndline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ContentFamily {
    TwoI,
    Cr,
    SecondLine,
}

impl Role for ContentRole {
    type Family = ContentFamily;

    const ALL: &'static [Self] = &[
        ContentRole::A2i,
        ContentRole::B2i,
        ContentRole::Cr,
        ContentRole::A2ndline,
        ContentRole::B2ndline,
    ];

    fn name(self) -> &'static str {
        match self {
            ContentRole::A2i => "2i_a",
            ContentRole::B2i => "2i_b",
            ContentRole::Cr => "cr",
            ContentRole::A2ndline => "2ndline_a",
            ContentRole::B2ndline => "2ndline_b",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn families(self) -> &'static [ContentFamily] {
        match self {
            ContentRole::A2i | ContentRole::B2i => &[ContentFamily::TwoI],
            ContentRole::Cr => &[ContentFamily::Cr],
            ContentRole::A2ndline | ContentRole::B2ndline => &[ContentFamily::SecondLine],
        }
    }

    fn cardinality(self) -> Cardinality {
        Cardinality::Mandatory
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Grade {
    /// Senior content designer.
    Scd,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentPerson {
    pub team: String,
    pub grade: Grade,
    pub skills: BTreeSet<ContentFamily>,
    /// 0-based working days this person is away.
    pub forbidden_days: BTreeSet<usize>,
}

impl ContentPerson {
    pub fn new(team: impl Into<String>, grade: Grade) -> Self {
        Self {
            team: team.into(),
            grade,
            skills: BTreeSet::new(),
            forbidden_days: BTreeSet::new(),
        }
    }

    pub fn with_skills(mut self, skills: impl IntoIterator<Item = ContentFamily>) -> Self {
        self.skills.extend(skills);
        self
    }

    pub fn on_leave(mut self, days: impl IntoIterator<Item = usize>) -> Self {
        self.forbidden_days.extend(days);
        self
    }

    pub fn can_do(&self, role: ContentRole) -> bool {
        role.families().iter().any(|f| self.skills.contains(f))
    }
}

impl Member for ContentPerson {
    fn team(&self) -> &str {
        &self.team
    }

    fn leave(&self) -> &BTreeSet<usize> {
        &self.forbidden_days
    }
}

/// A generated content-support rota with the limits it was found under.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRota {
    pub rota: Rota<ContentRole>,
    pub limits: ParameterTuple,
    /// Attempts that finished before and including the winner.
    pub attempts: usize,
}

fn product_members<'a>(
    people: &'a People<ContentPerson>,
    settings: &'a ContentSupportConfig,
) -> impl Iterator<Item = &'a String> + 'a {
    people
        .iter()
        .filter(move |(_, p)| p.team() == settings.product_team)
        .map(|(name, _)| name)
}

/// The three soft limits, bounded as configured. An unset product bound is
/// the size of the product team.
pub fn soft_limits(people: &People<ContentPerson>, settings: &ContentSupportConfig) -> Vec<SoftLimit> {
    let product = &settings.product_people_limit;
    let product_bound = product
        .bound
        .unwrap_or_else(|| product_members(people, settings).count() as u32);
    vec![
        SoftLimit::decreasing(
            SCD_PERIOD_LIMIT,
            settings.scd_period_limit.start,
            settings.scd_period_limit.bound,
        ),
        SoftLimit::decreasing(
            OTHER_PERIOD_LIMIT,
            settings.other_period_limit.start,
            settings.other_period_limit.bound,
        ),
        SoftLimit::increasing(PRODUCT_PEOPLE_LIMIT, product.start, product_bound),
    ]
}

/// Window length for "once every `limit` working days".
///
/// The limit counts both ends: with a limit of 5, someone on day 0 is next
/// free on day 6.
pub fn window_for(limit: usize) -> usize {
    limit + 1
}

/// Builds the declarative problem for one parameter tuple.
///
/// # Errors
///
/// [`RotaError::Internal`] if `limits` lacks one of the soft limits.
pub fn problem(
    people: &People<ContentPerson>,
    settings: &ContentSupportConfig,
    limits: &ParameterTuple,
) -> Result<RotaProblem<ContentRole>> {
    let scd_limit = limits.require(SCD_PERIOD_LIMIT)? as usize;
    let other_limit = limits.require(OTHER_PERIOD_LIMIT)? as usize;
    let product_limit = limits.require(PRODUCT_PEOPLE_LIMIT)?;

    let mut problem = RotaProblem::new(
        "content support rota",
        "day",
        settings.num_weeks * DAYS_PER_WEEK,
        people.keys(),
    )
    .with_leave(leave_map(people))
    .with_constraint(HardConstraint::NoConsecutivePeriods);

    for (name, person) in people {
        for role in ContentRole::ALL.iter().copied() {
            if !person.can_do(role) {
                problem.push(HardConstraint::Ineligible {
                    person: name.clone(),
                    role,
                });
            }
        }

        let (gap, exempt) = if person.team() == settings.product_team {
            (settings.product_window, None)
        } else {
            let gap = match person.grade {
                Grade::Scd => scd_limit,
                Grade::Other => other_limit,
            };
            (gap, Some(ContentFamily::SecondLine))
        };
        problem.push(HardConstraint::RollingWindow {
            person: name.clone(),
            window: window_for(gap),
            exempt,
        });
    }

    let reviewers: Vec<&String> = people
        .iter()
        .filter(|(_, p)| p.skills.contains(&ContentFamily::TwoI))
        .map(|(name, _)| name)
        .collect();
    for (i, first) in reviewers.iter().enumerate() {
        for second in &reviewers[i + 1..] {
            if people[*first].team() == people[*second].team() {
                problem.push(HardConstraint::TeamSeparation {
                    first: (*first).clone(),
                    second: (*second).clone(),
                    family: ContentFamily::TwoI,
                    adjacent: false,
                });
            }
        }
    }

    let members: Vec<String> = product_members(people, settings).cloned().collect();
    if !members.is_empty() {
        problem.push(HardConstraint::GroupQuota {
            group: settings.product_team.clone(),
            members,
            cap: product_limit,
        });
    }
    Ok(problem)
}

/// Distinct people, then total assignments, then the tie-break.
pub fn objective(model: &RotaModel<ContentRole>, rng: &mut impl rand::Rng) -> ObjectiveComposer {
    let composer = tiers::people(ObjectiveComposer::new(), model);
    let composer = tiers::coverage(composer, model);
    tiers::tie_break(composer, model, rng)
}

/// Generates a content-support rota, loosening soft limits until one fits.
///
/// Candidates are tried strictest first on `config.worker_count` workers;
/// the first rota to come back validated wins. With one worker and a fixed
/// seed the result is reproducible.
///
/// # Errors
///
/// - [`RotaError::Config`] when `config` fails validation
/// - [`RotaError::SolverFault`] when every candidate failed and at least one
///   produced a rota that broke a rule
/// - [`RotaError::NoSatisfyingRota`] when every candidate failed otherwise
///
/// A fault takes precedence over exhaustion: the first one seen is returned
/// even when every other candidate was merely infeasible.
pub fn generate(people: &People<ContentPerson>, config: &RotaConfig) -> Result<ContentRota> {
    config
        .validate()
        .map_err(|e| RotaError::Config(e.to_string()))?;
    let settings = Arc::new(config.content_support.clone());
    let seed = master_seed(config.random_seed);

    let limits = soft_limits(people, &settings);
    let candidates = relaxation_candidates(&limits, &mut attempt_rng(seed, u64::MAX));
    let workers = config.worker_count.resolve(candidates.len());
    info!(
        event = "rota_start",
        flavor = "content_support",
        days = settings.num_weeks * DAYS_PER_WEEK,
        people = people.len(),
        candidates = candidates.len(),
        seed,
    );

    let people = Arc::new(people.clone());
    let time_limit = config.time_limit();
    let outcome = RelaxationSearch::new(workers).run(candidates, move |index, params| {
        let problem = problem(&people, &settings, params)?;
        let mut rng = attempt_rng(seed, index as u64);
        let mut model = build(&problem, &mut rng);
        let objective = objective(&model, &mut rng).compose();
        model.set_objective(objective);
        let solution = solve_and_validate(&problem, model, Some(time_limit))?;
        Ok(Rota::from_solution(problem.period_noun, &solution))
    })?;

    info!(
        event = "rota_end",
        flavor = "content_support",
        limits = %outcome.params,
        attempts = outcome.attempts,
    );
    Ok(ContentRota {
        rota: outcome.value,
        limits: outcome.params,
        attempts: outcome.attempts,
    })
}
