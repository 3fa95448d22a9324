//! Objective tiers shared by the rota flavors.

use rand::Rng;
use rotaforge_core::Role;
use rotaforge_solver::{ObjectiveComposer, RotaModel};

/// Distinct people appearing anywhere in the rota.
pub(crate) fn people<R: Role>(
    composer: ObjectiveComposer,
    model: &RotaModel<R>,
) -> ObjectiveComposer {
    let headcount = model.people().len();
    composer.tier(
        "people",
        (0..headcount).map(|p| (model.assigned(p), 1.0)),
        Some(headcount as f64),
    )
}

/// Filled role slots. Never more than every role in every period.
pub(crate) fn coverage<R: Role>(
    composer: ObjectiveComposer,
    model: &RotaModel<R>,
) -> ObjectiveComposer {
    composer.tier(
        "coverage",
        model.assign_vars().iter().map(|var| (*var, 1.0)),
        Some(slots(model)),
    )
}

pub(crate) fn tie_break<R: Role>(
    composer: ObjectiveComposer,
    model: &RotaModel<R>,
    rng: &mut impl Rng,
) -> ObjectiveComposer {
    composer.tie_break(model.assign_vars().iter().copied(), Some(slots(model)), rng)
}

fn slots<R: Role>(model: &RotaModel<R>) -> f64 {
    (model.num_periods() * R::ALL.len()) as f64
}
