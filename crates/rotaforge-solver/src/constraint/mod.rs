//! Hard constraints.
//!
//! Each rule is a plain value. [`encode`](HardConstraint::encode) turns it
//! into linear constraints on a [`RotaModel`](crate::RotaModel), and the
//! validator replays the same value period by period against a solved table.
//! Rota flavors never write model constraints directly.

mod encode;

use rotaforge_core::Role;

use crate::experience::ExperienceCounter;

/// A rule every accepted rota satisfies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HardConstraint<R: Role> {
    /// `person` never holds `role`.
    Ineligible { person: String, role: R },

    /// `person` may hold `role` in a period only while `counter` is strictly
    /// above `threshold`.
    MinExperience {
        person: String,
        role: R,
        counter: ExperienceCounter<R>,
        threshold: u32,
    },

    /// `prior` plus every period holding one of `roles` stays within
    /// `ceiling`.
    RepetitionCap {
        person: String,
        roles: Vec<R>,
        prior: u32,
        ceiling: u32,
    },

    /// Nobody holds a role in two adjacent periods.
    NoConsecutivePeriods,

    /// `first` and `second` never both hold a `family` role in the same
    /// period, nor across adjacent periods when `adjacent` is set.
    TeamSeparation {
        first: String,
        second: String,
        family: R::Family,
        adjacent: bool,
    },

    /// `person` holds at most `max` roles of `family` over the horizon.
    FamilyQuota {
        person: String,
        family: R::Family,
        max: u32,
    },

    /// `person` holds at most one role in any `window` consecutive periods,
    /// ignoring roles of the `exempt` family.
    RollingWindow {
        person: String,
        window: usize,
        exempt: Option<R::Family>,
    },

    /// At most `cap` of `members` appear anywhere in the rota.
    GroupQuota {
        group: String,
        members: Vec<String>,
        cap: u32,
    },
}

impl<R: Role> HardConstraint<R> {
    /// Short rule description used in solver fault reports.
    pub fn describe(&self) -> String {
        match self {
            HardConstraint::Ineligible { person, role } => {
                format!("{} cannot be {}", person, role.name())
            }
            HardConstraint::MinExperience {
                person,
                role,
                counter,
                threshold,
            } => format!(
                "{} needs {} experience above {} to be {}",
                person,
                counter.name,
                threshold,
                role.name()
            ),
            HardConstraint::RepetitionCap {
                person,
                roles,
                prior,
                ceiling,
            } => format!(
                "{} may hold {} at most {} times ({} already)",
                person,
                role_list(roles),
                ceiling,
                prior
            ),
            HardConstraint::NoConsecutivePeriods => {
                "nobody works two periods in a row".to_string()
            }
            HardConstraint::TeamSeparation {
                first,
                second,
                family,
                adjacent,
            } => format!(
                "{} and {} cannot share {:?} duty{}",
                first,
                second,
                family,
                if *adjacent { " in the same or adjacent periods" } else { "" }
            ),
            HardConstraint::FamilyQuota {
                person,
                family,
                max,
            } => format!("{} holds at most {} {:?} roles", person, max, family),
            HardConstraint::RollingWindow {
                person,
                window,
                exempt,
            } => match exempt {
                Some(family) => format!(
                    "{} appears at most once in {} periods, {:?} aside",
                    person, window, family
                ),
                None => format!("{} appears at most once in {} periods", person, window),
            },
            HardConstraint::GroupQuota {
                group,
                members,
                cap,
            } => format!(
                "at most {} of the {} {} people appear",
                cap,
                members.len(),
                group
            ),
        }
    }
}

fn role_list<R: Role>(roles: &[R]) -> String {
    roles
        .iter()
        .map(|r| r.name())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests;
