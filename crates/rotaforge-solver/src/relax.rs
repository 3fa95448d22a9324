//! Soft limits and the order in which they are loosened.

use std::collections::BTreeMap;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use rotaforge_core::{Result, RotaError};

/// Which way a soft limit moves when it is loosened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loosen {
    Decrease,
    Increase,
}

/// A relaxable limit: tried at `start` first, never loosened past `bound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftLimit {
    pub name: &'static str,
    pub start: u32,
    pub bound: u32,
    pub direction: Loosen,
}

impl SoftLimit {
    pub fn decreasing(name: &'static str, start: u32, bound: u32) -> Self {
        Self {
            name,
            start,
            bound,
            direction: Loosen::Decrease,
        }
    }

    pub fn increasing(name: &'static str, start: u32, bound: u32) -> Self {
        Self {
            name,
            start,
            bound,
            direction: Loosen::Increase,
        }
    }

    fn exhausted(&self, value: u32) -> bool {
        match self.direction {
            Loosen::Decrease => value <= self.bound,
            Loosen::Increase => value >= self.bound,
        }
    }

    fn loosen(&self, value: u32) -> u32 {
        match self.direction {
            Loosen::Decrease => value.saturating_sub(1),
            Loosen::Increase => value + 1,
        }
    }
}

/// One assignment of values to soft limits, used by exactly one attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterTuple(BTreeMap<&'static str, u32>);

impl ParameterTuple {
    pub fn get(&self, name: &str) -> Option<u32> {
        self.0.get(name).copied()
    }

    /// Looks up `name`, failing if the tuple does not carry it.
    pub fn require(&self, name: &str) -> Result<u32> {
        self.get(name)
            .ok_or_else(|| RotaError::Internal(format!("missing soft limit '{}'", name)))
    }

    pub fn set(&mut self, name: &'static str, value: u32) {
        self.0.insert(name, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl fmt::Display for ParameterTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.0 {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
            first = false;
        }
        Ok(())
    }
}

/// Enumerates parameter tuples from strictest to loosest.
///
/// The strict tuple comes first. Each following tuple loosens exactly one
/// limit by one step. Limits take turns in a shuffled round; when a round is
/// used up, a fresh one is shuffled from the limits that can still move. The
/// last tuple has every limit at its bound. A limit that starts at its bound
/// never moves.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use rotaforge_solver::{relaxation_candidates, SoftLimit};
///
/// let limits = [SoftLimit::decreasing("gap", 3, 1), SoftLimit::increasing("people", 1, 2)];
/// let candidates = relaxation_candidates(&limits, &mut ChaCha8Rng::seed_from_u64(0));
///
/// assert_eq!(candidates.len(), 4);
/// assert_eq!(candidates[0].get("gap"), Some(3));
/// assert_eq!(candidates[3].get("gap"), Some(1));
/// assert_eq!(candidates[3].get("people"), Some(2));
/// ```
pub fn relaxation_candidates(limits: &[SoftLimit], rng: &mut impl Rng) -> Vec<ParameterTuple> {
    let mut current = ParameterTuple::default();
    for limit in limits {
        current.set(limit.name, limit.start);
    }
    let value = |tuple: &ParameterTuple, limit: &SoftLimit| tuple.get(limit.name).unwrap_or(limit.start);

    let mut candidates = vec![current.clone()];
    let mut round: Vec<usize> = Vec::new();
    loop {
        if round.is_empty() {
            round = (0..limits.len())
                .filter(|i| !limits[*i].exhausted(value(&current, &limits[*i])))
                .collect();
            if round.is_empty() {
                break;
            }
            round.shuffle(rng);
        }
        let limit = &limits[round.remove(0)];
        let next = limit.loosen(value(&current, limit));
        current.set(limit.name, next);
        candidates.push(current.clone());
    }
    candidates
}
