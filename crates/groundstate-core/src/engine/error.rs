use thiserror::Error;

use crate::core::mapping::MappingError;
use crate::core::models::descriptor::DescriptorError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Qubit mapping failed: {source}")]
    Mapping {
        #[from]
        source: MappingError,
    },

    #[error("Invalid problem: {source}")]
    Descriptor {
        #[from]
        source: DescriptorError,
    },

    #[error("Eigen-decomposition failed to converge after {iterations} iterations")]
    Convergence { iterations: usize },

    #[error("Optimization diverged after {iterations} iterations: {reason}")]
    OptimizationDiverged { iterations: u64, reason: String },

    #[error("No eigenstate satisfies the filter ({filter})")]
    NoEligibleState { filter: String },

    #[error("Solve was cancelled: {reason}")]
    Cancelled { reason: String },

    #[error("Operator on {num_qubits} qubits exceeds the solver limit of {max_qubits}")]
    ProblemTooLarge { num_qubits: usize, max_qubits: usize },

    #[error("Invalid ansatz: {0}")]
    InvalidAnsatz(String),

    #[error("Optimizer error: {0}")]
    Optimizer(String),

    #[error("Initialization failed: {0}")]
    Initialization(String),

    #[error("Internal logic error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Whether repeating the solve (possibly with adjusted settings) may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::Convergence { .. } | EngineError::OptimizationDiverged { .. }
        )
    }
}
