//! Priority-tiered objective composition.
//!
//! The optimizer maximises a single linear expression. Tiers are folded into
//! it with weights computed bottom-up, so that one unit of a higher tier is
//! always worth more than the best achievable total of every tier below it.

use good_lp::{Expression, Variable};
use rand::Rng;

/// One priority level of the objective.
#[derive(Debug, Clone)]
struct Tier {
    name: &'static str,
    terms: Vec<(Variable, f64)>,
    bound: f64,
}

/// Builds a lexicographic objective out of weighted tiers.
///
/// # Example
///
/// ```
/// use good_lp::{variable, ProblemVariables};
/// use rotaforge_solver::ObjectiveComposer;
///
/// let mut vars = ProblemVariables::new();
/// let x = vars.add(variable().binary());
/// let y = vars.add(variable().binary());
///
/// let composer = ObjectiveComposer::new()
///     .tier("coverage", [(x, 1.0), (y, 1.0)], None)
///     .tier("assignments", [(x, 1.0)], None);
///
/// assert_eq!(composer.weights(), vec![2.0, 1.0]);
/// let _objective = composer.compose();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectiveComposer {
    tiers: Vec<Tier>,
}

impl ObjectiveComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next tier, below every tier added so far.
    ///
    /// The tier's attainable range is the sum of its absolute coefficients,
    /// tightened to `cap` when one is known.
    pub fn tier<I>(mut self, name: &'static str, terms: I, cap: Option<f64>) -> Self
    where
        I: IntoIterator<Item = (Variable, f64)>,
    {
        let terms: Vec<(Variable, f64)> = terms.into_iter().collect();
        let range: f64 = terms.iter().map(|(_, c)| c.abs()).sum();
        let bound = cap.map_or(range, |cap| range.min(cap));
        self.tiers.push(Tier { name, terms, bound });
        self
    }

    /// Appends the lowest tier, with pseudo-random 0/1 coefficients drawn
    /// from `rng`.
    pub fn tie_break<I>(self, vars: I, cap: Option<f64>, rng: &mut impl Rng) -> Self
    where
        I: IntoIterator<Item = Variable>,
    {
        let terms: Vec<(Variable, f64)> = vars
            .into_iter()
            .map(|var| (var, if rng.random_bool(0.5) { 1.0 } else { 0.0 }))
            .collect();
        self.tier("tie_break", terms, cap)
    }

    /// Tier weights in priority order.
    pub fn weights(&self) -> Vec<f64> {
        let mut weights = vec![0.0; self.tiers.len()];
        let mut below = 0.0;
        for (i, tier) in self.tiers.iter().enumerate().rev() {
            let weight = below + 1.0;
            weights[i] = weight;
            below += weight * tier.bound;
        }
        weights
    }

    /// Tier names in priority order.
    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.name).collect()
    }

    /// Folds every tier into one expression.
    pub fn compose(self) -> Expression {
        let weights = self.weights();
        let mut objective = Expression::default();
        for (tier, weight) in self.tiers.into_iter().zip(weights) {
            for (var, coefficient) in tier.terms {
                if coefficient != 0.0 {
                    objective.add_mul(weight * coefficient, var);
                }
            }
        }
        objective
    }
}
