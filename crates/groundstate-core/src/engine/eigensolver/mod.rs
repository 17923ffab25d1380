//! Eigensolvers consuming a [`QubitProblem`](super::problem::QubitProblem).
//!
//! - [`exact`] diagonalizes the dense Hamiltonian and scans the spectrum.
//! - [`variational`] minimizes the energy of a parameterized trial state.

pub mod exact;
mod optimizer;
pub mod variational;

use super::error::EngineError;
use super::filter::FilterPredicate;
use super::problem::QubitProblem;
use super::progress::ProgressReporter;
use super::result::EigensolverResult;

pub use exact::ExactSolver;
pub use variational::VariationalSolver;

pub trait Eigensolver: Send + Sync {
    fn name(&self) -> &'static str;

    /// Finds the lowest eigenvalue whose eigenstate passes `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoEligibleState`] when no candidate satisfies
    /// the filter, plus solver-specific failures.
    fn solve(
        &self,
        problem: &QubitProblem,
        filter: Option<&FilterPredicate>,
        reporter: &ProgressReporter,
    ) -> Result<EigensolverResult, EngineError>;
}
