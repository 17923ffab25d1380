use crate::engine::ansatz::Ansatz;
use crate::engine::cancellation::CancellationToken;
use crate::engine::config::{InitialPoint, OptimizerKind, VariationalSolverConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::core::operators::qubit::QubitOperator;
use argmin::core::{CostFunction, Error, Executor, Gradient, State, TerminationReason, TerminationStatus};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::neldermead::NelderMead;
use argmin::solver::quasinewton::LBFGS;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::f64::consts::PI;

/// Number of correction pairs kept by L-BFGS.
const LBFGS_MEMORY: usize = 7;

/// Energy of the trial state as an argmin problem.
pub(super) struct Objective<'a> {
    pub ansatz: &'a dyn Ansatz,
    pub hamiltonian: &'a QubitOperator,
    pub cancellation: &'a CancellationToken,
    pub reporter: &'a ProgressReporter<'a>,
    pub gradient_step: f64,
    /// Energy of every cost evaluation, in call order.
    pub history: &'a RefCell<Vec<f64>>,
}

impl Objective<'_> {
    fn energy(&self, parameters: &[f64]) -> Result<f64, EngineError> {
        self.cancellation.check()?;
        let energy = self.ansatz.prepare(parameters)?.expectation(self.hamiltonian);
        if !energy.is_finite() {
            return Err(EngineError::OptimizationDiverged {
                iterations: self.history.borrow().len() as u64,
                reason: "objective became non-finite".to_string(),
            });
        }
        Ok(energy)
    }
}

impl CostFunction for Objective<'_> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, parameters: &Self::Param) -> Result<Self::Output, Error> {
        let energy = self.energy(parameters)?;
        let mut history = self.history.borrow_mut();
        history.push(energy);
        self.reporter.report(Progress::StatusUpdate {
            text: format!("Evaluation {}: E = {energy:.10}", history.len()),
        });
        Ok(energy)
    }
}

impl Gradient for Objective<'_> {
    type Param = Vec<f64>;
    type Gradient = Vec<f64>;

    /// Central finite differences.
    fn gradient(&self, parameters: &Self::Param) -> Result<Self::Gradient, Error> {
        let h = self.gradient_step;
        let mut shifted = parameters.clone();
        let mut gradient = Vec::with_capacity(parameters.len());
        for i in 0..parameters.len() {
            shifted[i] = parameters[i] + h;
            let forward = self.energy(&shifted)?;
            shifted[i] = parameters[i] - h;
            let backward = self.energy(&shifted)?;
            shifted[i] = parameters[i];
            gradient.push((forward - backward) / (2.0 * h));
        }
        Ok(gradient)
    }
}

/// Outcome of a converged optimization.
pub(super) struct Minimum {
    pub parameters: Vec<f64>,
    pub iterations: u64,
}

pub(super) fn initial_point(point: &InitialPoint, num_parameters: usize) -> Result<Vec<f64>, EngineError> {
    match point {
        InitialPoint::Zeros => Ok(vec![0.0; num_parameters]),
        InitialPoint::Random { seed } => {
            let mut rng = StdRng::seed_from_u64(*seed);
            Ok((0..num_parameters).map(|_| rng.gen_range(-PI..PI)).collect())
        }
        InitialPoint::Explicit(values) if values.len() == num_parameters => Ok(values.clone()),
        InitialPoint::Explicit(values) => Err(EngineError::Initialization(format!(
            "initial point has {} values but the ansatz has {num_parameters} parameters",
            values.len()
        ))),
    }
}

/// Recovers an engine error raised inside the objective, or wraps the optimizer's own.
fn into_engine_error(error: Error) -> EngineError {
    match error.downcast::<EngineError>() {
        Ok(engine) => engine,
        Err(other) => EngineError::Optimizer(other.to_string()),
    }
}

fn check_termination(status: &TerminationStatus, iterations: u64) -> Result<(), EngineError> {
    match status {
        TerminationStatus::Terminated(TerminationReason::SolverConverged) => Ok(()),
        TerminationStatus::Terminated(reason) => Err(EngineError::OptimizationDiverged {
            iterations,
            reason: format!("{reason:?}"),
        }),
        TerminationStatus::NotTerminated => Err(EngineError::OptimizationDiverged {
            iterations,
            reason: "optimizer stopped without terminating".to_string(),
        }),
    }
}

pub(super) fn minimize(
    objective: Objective<'_>,
    config: &VariationalSolverConfig,
    start: Vec<f64>,
) -> Result<Minimum, EngineError> {
    match config.optimizer {
        OptimizerKind::NelderMead => {
            let mut simplex = vec![start.clone()];
            for i in 0..start.len() {
                let mut vertex = start.clone();
                vertex[i] += config.initial_step;
                simplex.push(vertex);
            }
            let solver = NelderMead::new(simplex)
                .with_sd_tolerance(config.tolerance)
                .map_err(into_engine_error)?;
            let result = Executor::new(objective, solver)
                .configure(|state| state.max_iters(config.max_iterations))
                .run()
                .map_err(into_engine_error)?;
            let state = result.state();
            check_termination(state.get_termination_status(), state.get_iter())?;
            let parameters = state
                .get_best_param()
                .cloned()
                .ok_or_else(|| EngineError::Internal("Nelder-Mead returned no parameters".into()))?;
            Ok(Minimum {
                parameters,
                iterations: state.get_iter(),
            })
        }
        OptimizerKind::Lbfgs => {
            let linesearch = MoreThuenteLineSearch::new();
            let solver = LBFGS::new(linesearch, LBFGS_MEMORY)
                .with_tolerance_grad(config.tolerance)
                .map_err(into_engine_error)?
                .with_tolerance_cost(config.tolerance * 1e-4)
                .map_err(into_engine_error)?;
            let result = Executor::new(objective, solver)
                .configure(|state| state.param(start).max_iters(config.max_iterations))
                .run()
                .map_err(into_engine_error)?;
            let state = result.state();
            check_termination(state.get_termination_status(), state.get_iter())?;
            let parameters = state
                .get_best_param()
                .cloned()
                .ok_or_else(|| EngineError::Internal("L-BFGS returned no parameters".into()))?;
            Ok(Minimum {
                parameters,
                iterations: state.get_iter(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_initial_point_is_seeded() {
        let a = initial_point(&InitialPoint::Random { seed: 7 }, 4).unwrap();
        let b = initial_point(&InitialPoint::Random { seed: 7 }, 4).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|x| (-PI..PI).contains(x)));
    }

    #[test]
    fn explicit_initial_point_must_match_parameter_count() {
        let err = initial_point(&InitialPoint::Explicit(vec![0.1, 0.2]), 3).unwrap_err();
        assert!(matches!(err, EngineError::Initialization(_)));
        assert_eq!(
            initial_point(&InitialPoint::Explicit(vec![0.1, 0.2]), 2).unwrap(),
            vec![0.1, 0.2]
        );
    }

    #[test]
    fn optimizer_errors_are_wrapped() {
        let err = into_engine_error(Error::msg("line search failed"));
        assert!(matches!(err, EngineError::Optimizer(msg) if msg == "line search failed"));

        let cancelled: Error = EngineError::Cancelled {
            reason: "timeout reached".into(),
        }
        .into();
        assert!(matches!(into_engine_error(cancelled), EngineError::Cancelled { .. }));
    }
}
