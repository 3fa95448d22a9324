//! Linear encoding of hard constraints.

use good_lp::Expression;
use rotaforge_core::Role;
use tracing::debug;

use super::HardConstraint;
use crate::model::RotaModel;

impl<R: Role> HardConstraint<R> {
    /// Emits the linear constraints for this rule.
    ///
    /// Rules naming people outside the model are vacuous and emit nothing.
    pub fn encode(&self, model: &mut RotaModel<R>) {
        let periods = model.num_periods();
        match self {
            HardConstraint::Ineligible { person, role } => {
                let Some(p) = lookup(model, person) else { return };
                for t in 0..periods {
                    let var = model.assign(t, p, *role);
                    model.lp_mut().forbid(var);
                }
            }

            HardConstraint::MinExperience {
                person,
                role,
                counter,
                threshold,
            } => {
                let Some(p) = lookup(model, person) else { return };
                if !counter.accrues {
                    if counter.seed <= *threshold {
                        for t in 0..periods {
                            let var = model.assign(t, p, *role);
                            model.lp_mut().forbid(var);
                        }
                    }
                    return;
                }
                let bound = counter.bound(periods);
                let values = model.counter_vars(p, counter);
                for (t, value) in values.into_iter().enumerate() {
                    let b = model.assign(t, p, *role);
                    model
                        .lp_mut()
                        .require_exceeds(Expression::from(value), *threshold, bound, b);
                }
            }

            HardConstraint::RepetitionCap {
                person,
                roles,
                prior,
                ceiling,
            } => {
                let Some(p) = lookup(model, person) else { return };
                if prior >= ceiling {
                    for t in 0..periods {
                        for role in roles {
                            let var = model.assign(t, p, *role);
                            model.lp_mut().forbid(var);
                        }
                    }
                    return;
                }
                let mut total = Expression::default();
                for t in 0..periods {
                    total += model.period_sum(t, p, |r| roles.contains(&r));
                }
                model.lp_mut().add(total.leq(f64::from(ceiling - prior)));
            }

            HardConstraint::NoConsecutivePeriods => {
                for p in 0..model.people().len() {
                    for t in 1..periods {
                        let pair = model.period_sum(t - 1, p, |_| true)
                            + model.period_sum(t, p, |_| true);
                        model.lp_mut().add(pair.leq(1.0));
                    }
                }
            }

            HardConstraint::TeamSeparation {
                first,
                second,
                family,
                adjacent,
            } => {
                let (Some(a), Some(b)) = (lookup(model, first), lookup(model, second)) else {
                    return;
                };
                let in_family = |r: R| r.in_family(*family);
                for t in 0..periods {
                    let same = model.period_sum(t, a, in_family) + model.period_sum(t, b, in_family);
                    model.lp_mut().add(same.leq(1.0));
                    if *adjacent && t + 1 < periods {
                        let forward =
                            model.period_sum(t, a, in_family) + model.period_sum(t + 1, b, in_family);
                        let backward =
                            model.period_sum(t, b, in_family) + model.period_sum(t + 1, a, in_family);
                        model.lp_mut().add(forward.leq(1.0));
                        model.lp_mut().add(backward.leq(1.0));
                    }
                }
            }

            HardConstraint::FamilyQuota {
                person,
                family,
                max,
            } => {
                let Some(p) = lookup(model, person) else { return };
                let mut total = Expression::default();
                for t in 0..periods {
                    total += model.period_sum(t, p, |r| r.in_family(*family));
                }
                model.lp_mut().add(total.leq(f64::from(*max)));
            }

            HardConstraint::RollingWindow {
                person,
                window,
                exempt,
            } => {
                let Some(p) = lookup(model, person) else { return };
                if *window == 0 || periods == 0 {
                    return;
                }
                let counted = |r: R| exempt.map_or(true, |family| !r.in_family(family));
                for start in 0..=periods.saturating_sub(*window) {
                    let end = (start + window).min(periods);
                    let mut total = Expression::default();
                    for t in start..end {
                        total += model.period_sum(t, p, counted);
                    }
                    model.lp_mut().add(total.leq(1.0));
                }
            }

            HardConstraint::GroupQuota { members, cap, .. } => {
                let mut total = Expression::default();
                for member in members {
                    if let Some(var) = model.assigned_of(member) {
                        total.add_mul(1.0, var);
                    }
                }
                model.lp_mut().add(total.leq(f64::from(*cap)));
            }
        }
    }
}

fn lookup<R: Role>(model: &RotaModel<R>, person: &str) -> Option<usize> {
    let index = model.person_index(person);
    if index.is_none() {
        debug!(event = "constraint_skipped", person, "person is not in the model");
    }
    index
}
