use super::Eigensolver;
use super::optimizer::{Objective, initial_point, minimize};
use crate::engine::ansatz;
use crate::engine::cancellation::CancellationToken;
use crate::engine::config::{VARIATIONAL_QUBIT_LIMIT, VariationalSolverConfig};
use crate::engine::error::EngineError;
use crate::engine::filter::FilterPredicate;
use crate::engine::problem::QubitProblem;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::result::EigensolverResult;
use std::cell::RefCell;
use tracing::{info, instrument, warn};

/// Variational minimization of ⟨ψ(θ)|H|ψ(θ)⟩ on a statevector.
///
/// The filter is applied to the optimized state only; the optimizer itself
/// is unconstrained.
#[derive(Debug, Clone)]
pub struct VariationalSolver {
    config: VariationalSolverConfig,
    cancellation: CancellationToken,
}

impl VariationalSolver {
    pub fn new(config: VariationalSolverConfig) -> Self {
        Self {
            config,
            cancellation: CancellationToken::new(),
        }
    }

    /// Polls `token` before every objective evaluation.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &VariationalSolverConfig {
        &self.config
    }
}

impl Eigensolver for VariationalSolver {
    fn name(&self) -> &'static str {
        "variational"
    }

    #[instrument(skip_all, name = "variational_solver")]
    fn solve(
        &self,
        problem: &QubitProblem,
        filter: Option<&FilterPredicate>,
        reporter: &ProgressReporter,
    ) -> Result<EigensolverResult, EngineError> {
        let num_qubits = problem.num_qubits();
        let max_qubits = self.config.max_qubits.min(VARIATIONAL_QUBIT_LIMIT);
        if num_qubits > max_qubits {
            return Err(EngineError::ProblemTooLarge {
                num_qubits,
                max_qubits,
            });
        }
        self.cancellation.check()?;

        let ansatz = ansatz::build(self.config.ansatz, problem)?;
        let start = initial_point(&self.config.initial_point, ansatz.num_parameters())?;
        info!(
            parameters = ansatz.num_parameters(),
            optimizer = ?self.config.optimizer,
            "Starting variational optimization"
        );

        let history = RefCell::new(Vec::new());
        let objective = Objective {
            ansatz: ansatz.as_ref(),
            hamiltonian: &problem.hamiltonian,
            cancellation: &self.cancellation,
            reporter,
            gradient_step: self.config.gradient_step,
            history: &history,
        };
        let minimum = minimize(objective, &self.config, start)?;

        let state = ansatz.prepare(&minimum.parameters)?;
        let energy = state.expectation(&problem.hamiltonian);
        let values = problem.evaluate_aux(state.amplitudes());
        if let Some(filter) = filter {
            if !filter.accepts(energy, &values) {
                warn!(energy, filter = %filter, "Optimized state lies outside the requested sector");
                return Err(EngineError::NoEligibleState {
                    filter: filter.to_string(),
                });
            }
        }

        let history = history.into_inner();
        reporter.report(Progress::Message(format!(
            "Converged after {} iterations ({} evaluations)",
            minimum.iterations,
            history.len()
        )));
        info!(energy, iterations = minimum.iterations, "Variational optimization converged");
        Ok(EigensolverResult {
            eigenvalue: energy,
            eigenvalues: vec![energy],
            eigenstate: Some(state.into_amplitudes()),
            aux_values: values,
            optimal_parameters: Some(minimum.parameters),
            cost_evaluations: history.len(),
            optimizer_iterations: minimum.iterations,
            energy_history: history,
        })
    }
}
