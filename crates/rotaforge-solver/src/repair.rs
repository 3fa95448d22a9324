//! Post-solve seniority repair.
//!
//! The objective does not see who is more experienced inside a pair of roles
//! with a seniority order, so a solved rota may put the less experienced
//! person in the senior role. Repair swaps such labels afterwards.

use rotaforge_core::{Role, Rota};
use tracing::debug;

/// Two roles of one period where `senior` should go to the more experienced
/// of the two holders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeniorityPair<R> {
    pub senior: R,
    pub junior: R,
}

impl<R> SeniorityPair<R> {
    pub fn new(senior: R, junior: R) -> Self {
        Self { senior, junior }
    }
}

/// Swaps holders of each pair wherever the junior holder is strictly more
/// experienced than the senior one.
///
/// `experience(rota, period, person, pair)` is the person's running
/// experience for that pair at the start of `period`; it is recomputed from
/// the rota as it stands, so earlier swaps are seen by later periods.
/// `eligible(rota, period, person, role)` guards each swap: both people must
/// be allowed to hold their new role. Only labels move, never people, and a
/// second pass makes no further change.
///
/// Returns the number of swaps made.
pub fn repair<R, E, G>(
    rota: &mut Rota<R>,
    pairs: &[SeniorityPair<R>],
    experience: E,
    eligible: G,
) -> usize
where
    R: Role,
    E: Fn(&Rota<R>, usize, &str, &SeniorityPair<R>) -> u32,
    G: Fn(&Rota<R>, usize, &str, R) -> bool,
{
    let mut swaps = 0;
    for period in 0..rota.periods().len() {
        for pair in pairs {
            let (Some(senior), Some(junior)) =
                (rota.assignee(period, pair.senior), rota.assignee(period, pair.junior))
            else {
                continue;
            };
            if experience(rota, period, junior, pair) <= experience(rota, period, senior, pair) {
                continue;
            }
            if !(eligible(rota, period, junior, pair.senior)
                && eligible(rota, period, senior, pair.junior))
            {
                continue;
            }
            debug!(
                event = "seniority_swap",
                period = period + 1,
                senior = pair.senior.name(),
                junior = pair.junior.name(),
            );
            rota.swap(period, pair.senior, pair.junior);
            swaps += 1;
        }
    }
    swaps
}

#[cfg(test)]
mod tests {
    use rotaforge_core::Assignments;
    use rotaforge_test::TestRole;

    use super::*;
    use crate::experience::ExperienceCounter;

    use TestRole::{Backup, Lead};

    const PAIR: SeniorityPair<TestRole> = SeniorityPair {
        senior: Lead,
        junior: Backup,
    };

    fn seeds(person: &str) -> u32 {
        match person {
            "ann" => 5,
            "bob" => 1,
            _ => 0,
        }
    }

    fn fixed_experience(
        _: &Rota<TestRole>,
        _: usize,
        person: &str,
        _: &SeniorityPair<TestRole>,
    ) -> u32 {
        seeds(person)
    }

    fn rota() -> Rota<TestRole> {
        let mut rota = Rota::new("week", 2);
        rota.assign(0, Lead, "bob");
        rota.assign(0, Backup, "ann");
        rota.assign(1, Lead, "ann");
        rota.assign(1, Backup, "cat");
        rota
    }

    #[test]
    fn test_swaps_when_junior_is_more_experienced() {
        let mut rota = rota();
        let swaps = repair(&mut rota, &[PAIR], fixed_experience, |_, _, _, _| true);

        assert_eq!(swaps, 1);
        assert_eq!(rota.assignee(0, Lead), Some("ann"));
        assert_eq!(rota.assignee(0, Backup), Some("bob"));
        assert_eq!(rota.assignee(1, Lead), Some("ann"));
    }

    #[test]
    fn test_repair_is_idempotent() {
        let mut once = rota();
        repair(&mut once, &[PAIR], fixed_experience, |_, _, _, _| true);
        let mut twice = once.clone();
        let swaps = repair(&mut twice, &[PAIR], fixed_experience, |_, _, _, _| true);

        assert_eq!(swaps, 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_ineligible_swap_is_skipped() {
        let mut rota = rota();
        let swaps = repair(&mut rota, &[PAIR], fixed_experience, |_, _, person, role| {
            !(person == "bob" && role == Backup)
        });
        assert_eq!(swaps, 0);
        assert_eq!(rota.assignee(0, Lead), Some("bob"));
    }

    #[test]
    fn test_running_experience_sees_earlier_periods() {
        let mut rota = Rota::new("week", 3);
        rota.assign(0, Lead, "cat");
        rota.assign(0, Backup, "dan");
        rota.assign(1, Lead, "eve");
        rota.assign(1, Backup, "cat");
        rota.assign(2, Lead, "eve");
        rota.assign(2, Backup, "cat");
        let counter = ExperienceCounter::running("lead", 0, vec![Lead]);

        let swaps = repair(
            &mut rota,
            &[PAIR],
            |rota, period, person, _| counter.value_at(rota, person, period),
            |_, _, _, _| true,
        );

        // the period 1 swap hands cat a second lead, so period 2 swaps too
        assert_eq!(swaps, 2);
        assert_eq!(rota.assignee(1, Lead), Some("cat"));
        assert_eq!(rota.assignee(2, Lead), Some("cat"));
        assert_eq!(rota.periods_of("cat"), vec![0, 1, 2]);
        assert!(rota.is_assigned(2, "eve", Backup));
    }
}
