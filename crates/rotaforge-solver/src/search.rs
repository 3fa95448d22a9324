//! Concurrent adaptive relaxation search.
//!
//! Candidate parameter tuples are queued strictest first and pulled by a
//! fixed pool of detached worker threads. The first attempt to succeed, in
//! completion order, wins; everything still running is abandoned and its
//! late result dropped.

use std::sync::Arc;
use std::thread;

use crossbeam::channel;
use rotaforge_core::{Result, RotaError};
use tracing::{debug, info, warn};

use crate::relax::ParameterTuple;
use crate::termination::StopFlag;

/// The winning attempt of a relaxation search.
#[derive(Debug, Clone)]
pub struct SearchOutcome<T> {
    /// The tuple the winning attempt ran with.
    pub params: ParameterTuple,
    /// Position of the winning tuple in the candidate order.
    pub index: usize,
    pub value: T,
    /// Attempts that finished, the winner included.
    pub attempts: usize,
}

/// Runs solve attempts over candidate tuples on a worker pool.
///
/// # Example
///
/// ```
/// use rotaforge_core::RotaError;
/// use rotaforge_solver::{ParameterTuple, RelaxationSearch};
///
/// let candidates: Vec<ParameterTuple> = (0..3)
///     .rev()
///     .map(|gap| {
///         let mut tuple = ParameterTuple::default();
///         tuple.set("gap", gap);
///         tuple
///     })
///     .collect();
///
/// let outcome = RelaxationSearch::new(1)
///     .run(candidates, |_, params| match params.require("gap")? {
///         gap if gap > 1 => Err(RotaError::Infeasible),
///         gap => Ok(gap),
///     })
///     .unwrap();
/// assert_eq!(outcome.value, 1);
/// assert_eq!(outcome.attempts, 2);
/// ```
#[derive(Debug, Clone)]
pub struct RelaxationSearch {
    workers: usize,
    stop: StopFlag,
}

impl RelaxationSearch {
    /// Creates a search with `workers` concurrent attempts, at least one.
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            stop: StopFlag::new(),
        }
    }

    /// Shares `stop` with the caller, who may set it to cancel pending
    /// attempts. A stopped search stays stopped.
    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Runs `attempt` over `candidates` until one succeeds.
    ///
    /// `attempt` receives the candidate's position and tuple. With a single
    /// worker candidates run strictly in order, so the outcome depends only
    /// on `attempt`.
    ///
    /// # Errors
    ///
    /// When every candidate fails: the first [`RotaError::SolverFault`] seen,
    /// or [`RotaError::NoSatisfyingRota`] if none was. A fault outranks
    /// exhaustion because it means a rota was produced that broke a rule.
    pub fn run<T, F>(&self, candidates: Vec<ParameterTuple>, attempt: F) -> Result<SearchOutcome<T>>
    where
        T: Send + 'static,
        F: Fn(usize, &ParameterTuple) -> Result<T> + Send + Sync + 'static,
    {
        let total = candidates.len();
        let workers = self.workers.min(total.max(1));
        info!(event = "search_start", candidates = total, workers);

        let (job_sender, jobs) = channel::unbounded();
        for job in candidates.into_iter().enumerate() {
            job_sender
                .send(job)
                .map_err(|_| RotaError::Internal("relaxation queue closed".to_string()))?;
        }
        drop(job_sender);

        let (result_sender, results) = channel::unbounded();
        let attempt = Arc::new(attempt);
        for worker in 0..workers {
            let jobs = jobs.clone();
            let results = result_sender.clone();
            let stop = self.stop.clone();
            let attempt = Arc::clone(&attempt);
            let spawned = thread::Builder::new()
                .name(format!("relaxation-{}", worker))
                .spawn(move || {
                    while let Ok((index, params)) = jobs.recv() {
                        if stop.is_stopped() {
                            break;
                        }
                        let outcome = attempt(index, &params);
                        if results.send((index, params, outcome)).is_err() {
                            break;
                        }
                    }
                });
            if let Err(e) = spawned {
                self.stop.stop();
                return Err(RotaError::Internal(format!(
                    "failed to spawn relaxation worker: {}",
                    e
                )));
            }
        }
        drop(result_sender);

        let mut attempts = 0;
        let mut first_fault = None;
        for (index, params, outcome) in results.iter() {
            attempts += 1;
            match outcome {
                Ok(value) => {
                    self.stop.stop();
                    info!(
                        event = "search_end",
                        outcome = "found",
                        candidate = index,
                        params = %params,
                        attempts,
                    );
                    return Ok(SearchOutcome {
                        params,
                        index,
                        value,
                        attempts,
                    });
                }
                Err(err) if err.is_relaxable() => {
                    debug!(
                        event = "attempt_failed",
                        candidate = index,
                        params = %params,
                        error = %err,
                    );
                }
                Err(err) => {
                    warn!(
                        event = "attempt_failed",
                        candidate = index,
                        params = %params,
                        error = %err,
                    );
                    if first_fault.is_none() && err.as_fault().is_some() {
                        first_fault = Some(err);
                    }
                }
            }
        }

        info!(event = "search_end", outcome = "exhausted", attempts);
        Err(first_fault.unwrap_or(RotaError::NoSatisfyingRota { attempts }))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rotaforge_core::SolverFault;

    use super::*;
    use crate::relax::{relaxation_candidates, SoftLimit};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn limit_candidates(start: u32, bound: u32) -> Vec<ParameterTuple> {
        relaxation_candidates(
            &[SoftLimit::decreasing("limit", start, bound)],
            &mut ChaCha8Rng::seed_from_u64(0),
        )
    }

    #[test]
    fn test_single_worker_takes_first_feasible_in_order() {
        let outcome = RelaxationSearch::new(1)
            .run(limit_candidates(5, 1), |_, params| {
                let limit = params.require("limit")?;
                if limit > 3 {
                    Err(RotaError::Infeasible)
                } else {
                    Ok(limit)
                }
            })
            .unwrap();

        assert_eq!(outcome.value, 3);
        assert_eq!(outcome.params.get("limit"), Some(3));
        assert_eq!(outcome.index, 2);
        assert_eq!(outcome.attempts, 3);
    }

    #[test]
    fn test_fast_loose_attempt_beats_slow_strict_one() {
        let outcome = RelaxationSearch::new(2)
            .run(limit_candidates(2, 1), |index, _| {
                if index == 0 {
                    thread::sleep(Duration::from_millis(500));
                }
                Ok(index)
            })
            .unwrap();
        assert_eq!(outcome.value, 1);
        assert_eq!(outcome.params.get("limit"), Some(1));
    }

    #[test]
    fn test_exhaustion_reports_attempts() {
        let err = RelaxationSearch::new(3)
            .run(limit_candidates(4, 1), |_, _| -> Result<()> {
                Err(RotaError::Infeasible)
            })
            .unwrap_err();
        assert!(matches!(err, RotaError::NoSatisfyingRota { attempts: 4 }));
    }

    #[test]
    fn test_exhaustion_prefers_solver_fault() {
        let err = RelaxationSearch::new(1)
            .run(limit_candidates(3, 1), |index, _| -> Result<()> {
                if index == 1 {
                    Err(SolverFault::new(0, "role 'lead' has 2 holders", "").into())
                } else {
                    Err(RotaError::TimedOut(Duration::from_millis(1)))
                }
            })
            .unwrap_err();
        assert_eq!(err.as_fault().map(|f| f.rule.as_str()), Some("role 'lead' has 2 holders"));
    }

    #[test]
    fn test_optimizer_error_does_not_end_search() {
        let outcome = RelaxationSearch::new(1)
            .run(limit_candidates(3, 1), |index, _| {
                if index == 0 {
                    Err(RotaError::Optimizer("singular basis".into()))
                } else {
                    Ok(index)
                }
            })
            .unwrap();
        assert_eq!(outcome.value, 1);
        assert_eq!(outcome.attempts, 2);

        let err = RelaxationSearch::new(1)
            .run(limit_candidates(2, 1), |_, _| -> Result<()> {
                Err(RotaError::Optimizer("singular basis".into()))
            })
            .unwrap_err();
        assert!(matches!(err, RotaError::NoSatisfyingRota { attempts: 2 }));
    }

    #[test]
    fn test_stopped_search_launches_nothing() {
        let stop = StopFlag::new();
        stop.stop();
        let err = RelaxationSearch::new(2)
            .with_stop_flag(stop)
            .run(limit_candidates(3, 1), |_, _| Ok(()))
            .unwrap_err();
        assert!(matches!(err, RotaError::NoSatisfyingRota { attempts: 0 }));
    }

    #[test]
    fn test_empty_candidate_list() {
        let err = RelaxationSearch::new(4)
            .run(Vec::new(), |_, _| Ok(()))
            .unwrap_err();
        assert!(matches!(err, RotaError::NoSatisfyingRota { attempts: 0 }));
    }
}
