//! Generic rota builder.

use good_lp::Expression;
use rand::seq::SliceRandom;
use rand::Rng;
use rotaforge_core::{Cardinality, Role};
use tracing::debug;

use crate::model::RotaModel;
use crate::problem::RotaProblem;

/// Builds the model for one attempt.
///
/// People are shuffled with `rng` so that different attempts explore
/// different tie orders. Beyond the problem's own hard constraints this emits
/// the structural rules every rota shares: role cardinality, one role per
/// person per period, leave, and the link between `assign` and `assigned`.
pub fn build<R: Role>(problem: &RotaProblem<R>, rng: &mut impl Rng) -> RotaModel<R> {
    let mut people = problem.people.clone();
    people.shuffle(rng);
    let mut model = RotaModel::new(problem.title.clone(), problem.num_periods, people);
    let periods = problem.num_periods;
    let headcount = model.people().len();

    for p in 0..headcount {
        let assigned = model.assigned(p);
        let mut total = Expression::default();
        for t in 0..periods {
            let held = model.period_sum(t, p, |_| true);
            total += held.clone();
            model.lp_mut().add((Expression::from(assigned) - held).geq(0.0));
        }
        model.lp_mut().add((Expression::from(assigned) - total).leq(0.0));
    }

    for t in 0..periods {
        for role in R::ALL.iter().copied() {
            let mut holders = Expression::default();
            for p in 0..headcount {
                holders.add_mul(1.0, model.assign(t, p, role));
            }
            let constraint = match role.cardinality() {
                Cardinality::Mandatory => holders.eq(1.0),
                Cardinality::Optional => holders.leq(1.0),
            };
            model.lp_mut().add(constraint);
        }
        for p in 0..headcount {
            let held = model.period_sum(t, p, |_| true);
            model.lp_mut().add(held.leq(1.0));
        }
    }

    for (person, leave) in &problem.leave {
        let Some(p) = model.person_index(person) else {
            continue;
        };
        for &t in leave.iter().filter(|t| **t < periods) {
            for role in R::ALL.iter().copied() {
                let var = model.assign(t, p, role);
                model.lp_mut().forbid(var);
            }
        }
    }

    for constraint in &problem.constraints {
        constraint.encode(&mut model);
    }

    debug!(
        event = "model_built",
        title = model.title(),
        periods,
        people = headcount,
        variables = model.lp().variable_count(),
        constraints = model.lp().constraint_count(),
    );
    model
}
