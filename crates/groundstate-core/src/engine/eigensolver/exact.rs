use super::Eigensolver;
use crate::engine::config::{EXACT_QUBIT_LIMIT, ExactSolverConfig};
use crate::engine::error::EngineError;
use crate::engine::filter::FilterPredicate;
use crate::engine::problem::QubitProblem;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::result::EigensolverResult;
use nalgebra::SymmetricEigen;
use num_complex::Complex64;
use tracing::{debug, info, instrument};

/// Full diagonalization of the dense Hamiltonian.
#[derive(Debug, Clone, Default)]
pub struct ExactSolver {
    config: ExactSolverConfig,
}

impl ExactSolver {
    pub fn new(config: ExactSolverConfig) -> Self {
        Self { config }
    }
}

impl Eigensolver for ExactSolver {
    fn name(&self) -> &'static str {
        "exact"
    }

    #[instrument(skip_all, name = "exact_solver")]
    fn solve(
        &self,
        problem: &QubitProblem,
        filter: Option<&FilterPredicate>,
        reporter: &ProgressReporter,
    ) -> Result<EigensolverResult, EngineError> {
        let num_qubits = problem.num_qubits();
        let max_qubits = self.config.max_qubits.min(EXACT_QUBIT_LIMIT);
        if num_qubits > max_qubits {
            return Err(EngineError::ProblemTooLarge {
                num_qubits,
                max_qubits,
            });
        }

        reporter.report(Progress::StatusUpdate {
            text: format!("Diagonalizing {0}×{0} matrix", 1usize << num_qubits),
        });
        let matrix = problem.hamiltonian.to_matrix();
        let eigen = SymmetricEigen::try_new(
            matrix,
            self.config.eigen_tolerance,
            self.config.max_sweeps,
        )
        .ok_or(EngineError::Convergence {
            iterations: self.config.max_sweeps,
        })?;

        let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
        order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

        let wanted = self.config.num_eigenvalues;
        let mut result = EigensolverResult::default();
        reporter.report(Progress::TaskStart {
            total_steps: order.len() as u64,
        });
        for index in order {
            reporter.report(Progress::TaskIncrement);
            let eigenvalue = eigen.eigenvalues[index];
            let state: Vec<Complex64> = eigen.eigenvectors.column(index).iter().copied().collect();
            let values = problem.evaluate_aux(&state);
            if let Some(filter) = filter {
                if !filter.accepts(eigenvalue, &values) {
                    debug!(eigenvalue, filter = %filter, "Rejected eigenstate");
                    continue;
                }
            }
            if result.eigenvalues.is_empty() {
                result.eigenvalue = eigenvalue;
                result.eigenstate = Some(state);
                result.aux_values = values;
            }
            result.eigenvalues.push(eigenvalue);
            if result.eigenvalues.len() == wanted {
                break;
            }
        }
        reporter.report(Progress::TaskFinish);

        if result.eigenvalues.is_empty() {
            return Err(EngineError::NoEligibleState {
                filter: filter.map(|f| f.to_string()).unwrap_or_default(),
            });
        }
        info!(eigenvalue = result.eigenvalue, "Exact diagonalization finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapping::Mapping;
    use crate::engine::config::ExactSolverConfigBuilder;
    use crate::engine::problem::PARTICLE_NUMBER;
    use crate::engine::transform::Transformation;
    use crate::testing::{h2_descriptor, harmonic_descriptor, toy_problem};

    #[test]
    fn returns_global_minimum_without_filter() {
        let result = ExactSolver::default()
            .solve(&toy_problem(), None, &ProgressReporter::new())
            .unwrap();
        assert!((result.eigenvalue + 2.0).abs() < 1e-8);
        assert_eq!(result.eigenvalues.len(), 1);
        assert!(result.eigenstate.is_some());
    }

    #[test]
    fn filter_skips_to_next_eligible_eigenvalue() {
        let filter = FilterPredicate::particle_number(1.0);
        let config = ExactSolverConfigBuilder::new().num_eigenvalues(4).build().unwrap();
        let result = ExactSolver::new(config)
            .solve(&toy_problem(), Some(&filter), &ProgressReporter::new())
            .unwrap();
        assert!((result.eigenvalue + 1.0).abs() < 1e-8);
        assert_eq!(result.eigenvalues.len(), 2);
        assert!((result.eigenvalues[1] - 1.0).abs() < 1e-8);
        assert!((result.aux_values[PARTICLE_NUMBER] - 1.0).abs() < 1e-8);
    }

    #[test]
    fn unsatisfiable_filter_reports_no_eligible_state() {
        let filter = FilterPredicate::particle_number(5.0);
        let err = ExactSolver::default()
            .solve(&toy_problem(), Some(&filter), &ProgressReporter::new())
            .unwrap_err();
        match err {
            EngineError::NoEligibleState { filter } => assert_eq!(filter, "particle_number = 5"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn refuses_registers_above_limit() {
        let config = ExactSolverConfigBuilder::new().max_qubits(1).build().unwrap();
        let err = ExactSolver::new(config)
            .solve(&toy_problem(), None, &ProgressReporter::new())
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::ProblemTooLarge {
                num_qubits: 2,
                max_qubits: 1
            }
        ));
    }

    #[test]
    fn h2_two_electron_sector_gives_fci_energy() {
        let prepared = Transformation::new(Mapping::JordanWigner)
            .prepare(&h2_descriptor().into())
            .unwrap();
        let filter = FilterPredicate::particle_number(2.0);
        let result = ExactSolver::default()
            .solve(&prepared.qubit, Some(&filter), &ProgressReporter::new())
            .unwrap();
        assert!((result.eigenvalue - (-1.851026)).abs() < 1e-5);
    }

    #[test]
    fn harmonic_single_occupation_filter_selects_zero_point_energy() {
        let descriptor = harmonic_descriptor();
        let prepared = Transformation::new(Mapping::Direct)
            .prepare(&descriptor.clone().into())
            .unwrap();
        let unfiltered = ExactSolver::default()
            .solve(&prepared.qubit, None, &ProgressReporter::new())
            .unwrap();
        assert!(unfiltered.eigenvalue.abs() < 1e-8);

        let filter = FilterPredicate::single_occupation_per_mode(descriptor.num_modes());
        let filtered = ExactSolver::default()
            .solve(&prepared.qubit, Some(&filter), &ProgressReporter::new())
            .unwrap();
        assert!((filtered.eigenvalue - 1500.0).abs() < 1e-6);
    }
}
