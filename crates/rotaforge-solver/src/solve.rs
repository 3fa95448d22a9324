//! Solve → validate pipeline.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, RecvTimeoutError};
use good_lp::{ResolutionError, Solution as _};
use rotaforge_core::{Result, Role, RotaError, Solution};
use tracing::{info, warn};

use crate::model::RotaModel;
use crate::problem::RotaProblem;
use crate::validate::validate;

/// Runs the optimizer on `model` and extracts the assignment table.
///
/// The optimizer runs on its own thread. With a `time_limit`, the caller
/// stops waiting once it elapses and gets [`RotaError::TimedOut`]; the
/// optimizer thread is abandoned and its late answer dropped.
///
/// # Errors
///
/// - [`RotaError::Infeasible`] when the optimizer proves there is no answer
/// - [`RotaError::TimedOut`] when the time limit elapses first
/// - [`RotaError::Optimizer`] for any other backend failure
pub fn solve<R: Role>(model: RotaModel<R>, time_limit: Option<Duration>) -> Result<Solution<R>> {
    let title = model.title().to_string();
    let (lp, assign, people, num_periods) = model.into_parts();
    info!(
        event = "solve_start",
        title = %title,
        variables = lp.variable_count(),
        constraints = lp.constraint_count(),
        time_limit_ms = time_limit.map(|d| d.as_millis() as u64),
    );
    let started = Instant::now();

    let (sender, receiver) = channel::bounded(1);
    thread::Builder::new()
        .name(format!("optimizer-{}", title))
        .spawn(move || {
            let values = lp.optimise().map(|solution| {
                assign
                    .iter()
                    .map(|var| solution.value(*var) > 0.5)
                    .collect::<Vec<bool>>()
            });
            // The receiver is gone once the caller has timed out.
            let _ = sender.send(values);
        })
        .map_err(|e| RotaError::Internal(format!("failed to spawn optimizer thread: {}", e)))?;

    let received = match time_limit {
        Some(limit) => receiver.recv_timeout(limit).map_err(|e| match e {
            RecvTimeoutError::Timeout => RotaError::TimedOut(limit),
            RecvTimeoutError::Disconnected => disconnected(),
        }),
        None => receiver.recv().map_err(|_| disconnected()),
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let values = match received.and_then(|r| r.map_err(resolution_error)) {
        Ok(values) => values,
        Err(err) => {
            info!(event = "solve_end", title = %title, outcome = %err, elapsed_ms);
            return Err(err);
        }
    };
    info!(event = "solve_end", title = %title, outcome = "solved", elapsed_ms);
    Ok(Solution::new(num_periods, people, values))
}

/// Solves `model` and accepts the answer only if it passes the independent
/// validator for `problem`.
///
/// # Errors
///
/// Everything [`solve`] returns, plus [`RotaError::SolverFault`] when the
/// optimizer claimed success but its answer breaks a rule.
pub fn solve_and_validate<R: Role>(
    problem: &RotaProblem<R>,
    model: RotaModel<R>,
    time_limit: Option<Duration>,
) -> Result<Solution<R>> {
    let solution = solve(model, time_limit)?;
    if let Err(fault) = validate(problem, &solution) {
        warn!(
            event = "solver_fault",
            title = %problem.title,
            period = fault.period + 1,
            rule = %fault.rule,
        );
        return Err(fault.into());
    }
    Ok(solution)
}

fn resolution_error(err: ResolutionError) -> RotaError {
    match err {
        ResolutionError::Infeasible => RotaError::Infeasible,
        other => RotaError::Optimizer(other.to_string()),
    }
}

fn disconnected() -> RotaError {
    RotaError::Internal("optimizer thread exited without an answer".to_string())
}
