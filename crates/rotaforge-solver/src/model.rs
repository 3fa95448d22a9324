//! The 0/1 integer program behind a rota.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use good_lp::{
    microlp, variable, Constraint, Expression, ProblemVariables, ResolutionError, SolverModel,
    Variable,
};
use rotaforge_core::Role;

use crate::experience::ExperienceCounter;

/// A bag of variables, linear constraints and one objective to maximise.
///
/// Thin wrapper over `good_lp` that keeps constraints around until the model
/// is handed to the optimizer, so that it can be built incrementally and moved
/// to another thread.
pub struct LinearModel {
    vars: ProblemVariables,
    variable_count: usize,
    constraints: Vec<Constraint>,
    objective: Expression,
}

impl Default for LinearModel {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearModel {
    pub fn new() -> Self {
        Self {
            vars: ProblemVariables::new(),
            variable_count: 0,
            constraints: Vec::new(),
            objective: Expression::default(),
        }
    }

    /// Allocates a fresh 0/1 variable.
    pub fn binary(&mut self) -> Variable {
        self.variable_count += 1;
        self.vars.add(variable().binary())
    }

    /// Allocates a fresh integer variable in `[min, max]`.
    pub fn integer(&mut self, min: f64, max: f64) -> Variable {
        self.variable_count += 1;
        self.vars.add(variable().integer().min(min).max(max))
    }

    pub fn add(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Pins `var` to zero.
    pub fn forbid(&mut self, var: Variable) {
        self.add(Expression::from(var).eq(0.0));
    }

    pub fn set_objective(&mut self, objective: Expression) {
        self.objective = objective;
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Maximises the objective subject to every constraint added so far.
    ///
    /// Blocks until the optimizer returns; the call cannot be interrupted.
    pub fn optimise(self) -> Result<impl good_lp::Solution, ResolutionError> {
        let mut problem = self.vars.maximise(self.objective).using(microlp);
        for constraint in self.constraints {
            problem = problem.with(constraint);
        }
        problem.solve()
    }
}

/// The rota-shaped view of a [`LinearModel`].
///
/// Owns the dense `assign[period][person][role]` matrix, the per-person
/// `assigned` flags and the cached running experience counters. People are
/// held in model order, which the builder shuffles per attempt.
pub struct RotaModel<R: Role> {
    title: String,
    num_periods: usize,
    people: Vec<String>,
    index: BTreeMap<String, usize>,
    assign: Vec<Variable>,
    assigned: Vec<Variable>,
    counters: BTreeMap<(usize, &'static str), Vec<Variable>>,
    lp: LinearModel,
    _roles: PhantomData<fn() -> R>,
}

impl<R: Role> RotaModel<R> {
    /// Allocates the assignment matrix and `assigned` flags for `people`
    /// over `num_periods`. No constraints are emitted.
    pub fn new(title: impl Into<String>, num_periods: usize, people: Vec<String>) -> Self {
        let mut lp = LinearModel::new();
        let assign = (0..num_periods * people.len() * R::ALL.len())
            .map(|_| lp.binary())
            .collect();
        let assigned = people.iter().map(|_| lp.binary()).collect();
        let index = people
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            title: title.into(),
            num_periods,
            people,
            index,
            assign,
            assigned,
            counters: BTreeMap::new(),
            lp,
            _roles: PhantomData,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn num_periods(&self) -> usize {
        self.num_periods
    }

    /// People in model order.
    pub fn people(&self) -> &[String] {
        &self.people
    }

    pub fn person_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// `assign(period, person, role)` by model position.
    pub fn assign(&self, period: usize, person: usize, role: R) -> Variable {
        self.assign[(period * self.people.len() + person) * R::ALL.len() + role.index()]
    }

    /// `assign(period, person, role)` by name.
    pub fn assign_of(&self, period: usize, person: &str, role: R) -> Option<Variable> {
        self.person_index(person)
            .filter(|_| period < self.num_periods)
            .map(|p| self.assign(period, p, role))
    }

    pub fn assigned(&self, person: usize) -> Variable {
        self.assigned[person]
    }

    pub fn assigned_of(&self, person: &str) -> Option<Variable> {
        self.person_index(person).map(|p| self.assigned(p))
    }

    /// Every assignment variable, in `[period][person][role]` order.
    pub fn assign_vars(&self) -> &[Variable] {
        &self.assign
    }

    /// Sum of `assign(period, person, role)` over the roles accepted by
    /// `filter`.
    pub fn period_sum(&self, period: usize, person: usize, filter: impl Fn(R) -> bool) -> Expression {
        let mut sum = Expression::default();
        for role in R::ALL.iter().copied().filter(|r| filter(*r)) {
            sum.add_mul(1.0, self.assign(period, person, role));
        }
        sum
    }

    /// Running values of `counter` for `person`, one integer variable per
    /// period.
    ///
    /// The first request allocates the variables and the recurrence
    /// `c(0) = seed`, `c(t) = c(t-1) + Σ counted(t-1)`; later requests for
    /// the same counter name reuse them.
    pub fn counter_vars(&mut self, person: usize, counter: &ExperienceCounter<R>) -> Vec<Variable> {
        if let Some(vars) = self.counters.get(&(person, counter.name)) {
            return vars.clone();
        }
        let bound = counter.bound(self.num_periods) as f64;
        let vars: Vec<Variable> = (0..self.num_periods)
            .map(|_| self.lp.integer(0.0, bound))
            .collect();
        if let Some(first) = vars.first() {
            self.lp.add(Expression::from(*first).eq(counter.seed as f64));
        }
        for t in 1..self.num_periods {
            let mut step = Expression::from(vars[t]);
            step.add_mul(-1.0, vars[t - 1]);
            for role in &counter.counted {
                step.add_mul(-1.0, self.assign(t - 1, person, *role));
            }
            self.lp.add(step.eq(0.0));
        }
        self.counters.insert((person, counter.name), vars.clone());
        vars
    }

    pub fn lp(&self) -> &LinearModel {
        &self.lp
    }

    pub fn lp_mut(&mut self) -> &mut LinearModel {
        &mut self.lp
    }

    pub fn set_objective(&mut self, objective: Expression) {
        self.lp.set_objective(objective);
    }

    pub(crate) fn into_parts(self) -> (LinearModel, Vec<Variable>, Vec<String>, usize) {
        (self.lp, self.assign, self.people, self.num_periods)
    }
}
