//! The person table.
//!
//! People have no names of their own: a flavor is always given a
//! `name -> record` map. The map is ordered so that model construction and
//! reporting iterate people deterministically.

use std::collections::{BTreeMap, BTreeSet};

/// People keyed by name.
pub type People<P> = BTreeMap<String, P>;

/// Attributes every rota flavor needs from a person record.
pub trait Member {
    /// Team name, compared for team-separation rules.
    fn team(&self) -> &str;

    /// 0-based periods this person is unavailable for.
    fn leave(&self) -> &BTreeSet<usize>;
}

/// Collects the non-empty leave sets of `people`.
pub fn leave_map<P: Member>(people: &People<P>) -> BTreeMap<String, BTreeSet<usize>> {
    people
        .iter()
        .filter(|(_, p)| !p.leave().is_empty())
        .map(|(name, p)| (name.clone(), p.leave().clone()))
        .collect()
}
