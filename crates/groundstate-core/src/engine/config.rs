use crate::core::mapping::Mapping;
use crate::core::transformers::active_space::ActiveSpace;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Largest operator the exact solver may densify (a 2^n × 2^n matrix).
pub const EXACT_QUBIT_LIMIT: usize = 16;
/// Largest register the variational solver may simulate as a statevector.
pub const VARIATIONAL_QUBIT_LIMIT: usize = 30;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizerKind {
    #[default]
    NelderMead,
    Lbfgs,
}

/// Parameterized trial-state families for the variational solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum AnsatzKind {
    /// RY rotation layers separated by linear CX entanglers.
    RealAmplitudes { reps: usize },
    /// RY and RZ rotation layers separated by linear CX entanglers.
    EfficientSu2 { reps: usize },
    /// Product of exponentials of the problem's excitation generators.
    Excitations,
}

impl Default for AnsatzKind {
    fn default() -> Self {
        AnsatzKind::Excitations
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum InitialPoint {
    #[default]
    Zeros,
    /// Uniform in [−π, π) from a seeded generator.
    Random { seed: u64 },
    Explicit(Vec<f64>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExactSolverConfig {
    pub num_eigenvalues: usize,
    pub max_qubits: usize,
    pub eigen_tolerance: f64,
    pub max_sweeps: usize,
}

impl Default for ExactSolverConfig {
    fn default() -> Self {
        Self {
            num_eigenvalues: 1,
            max_qubits: 14,
            eigen_tolerance: f64::EPSILON,
            max_sweeps: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariationalSolverConfig {
    pub ansatz: AnsatzKind,
    pub optimizer: OptimizerKind,
    pub initial_point: InitialPoint,
    pub max_iterations: u64,
    pub tolerance: f64,
    pub initial_step: f64,
    pub gradient_step: f64,
    pub max_qubits: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SolverConfig {
    Exact(ExactSolverConfig),
    Variational(VariationalSolverConfig),
}

/// Symmetry-sector constraints applied to candidate eigenstates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    /// Restrict to the particle numbers (electronic) or single occupation
    /// (vibrational) of the problem itself.
    pub match_problem_sector: bool,
    pub particle_number: Option<f64>,
    pub magnetization: Option<f64>,
    pub angular_momentum: Option<f64>,
    pub single_occupation_per_mode: bool,
}

impl FilterConfig {
    pub fn is_empty(&self) -> bool {
        !self.match_problem_sector
            && self.particle_number.is_none()
            && self.magnetization.is_none()
            && self.angular_momentum.is_none()
            && !self.single_occupation_per_mode
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroundStateConfig {
    /// `None` selects the default mapping of the problem class.
    pub mapping: Option<Mapping>,
    pub two_qubit_reduction: bool,
    pub active_space: Option<ActiveSpace>,
    pub freeze_core: bool,
    pub solver: SolverConfig,
    pub filter: FilterConfig,
    pub timeout: Option<Duration>,
}

#[derive(Default)]
pub struct ExactSolverConfigBuilder {
    num_eigenvalues: Option<usize>,
    max_qubits: Option<usize>,
    eigen_tolerance: Option<f64>,
    max_sweeps: Option<usize>,
}

impl ExactSolverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_eigenvalues(mut self, n: usize) -> Self {
        self.num_eigenvalues = Some(n);
        self
    }
    pub fn max_qubits(mut self, n: usize) -> Self {
        self.max_qubits = Some(n);
        self
    }
    pub fn eigen_tolerance(mut self, eps: f64) -> Self {
        self.eigen_tolerance = Some(eps);
        self
    }
    pub fn max_sweeps(mut self, n: usize) -> Self {
        self.max_sweeps = Some(n);
        self
    }

    pub fn build(self) -> Result<ExactSolverConfig, ConfigError> {
        let defaults = ExactSolverConfig::default();
        let config = ExactSolverConfig {
            num_eigenvalues: self.num_eigenvalues.unwrap_or(defaults.num_eigenvalues),
            max_qubits: self.max_qubits.unwrap_or(defaults.max_qubits),
            eigen_tolerance: self.eigen_tolerance.unwrap_or(defaults.eigen_tolerance),
            max_sweeps: self.max_sweeps.unwrap_or(defaults.max_sweeps),
        };
        if config.num_eigenvalues == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "num_eigenvalues",
                reason: "at least one eigenvalue must be requested".to_string(),
            });
        }
        if config.max_qubits > EXACT_QUBIT_LIMIT {
            return Err(ConfigError::InvalidParameter {
                name: "max_qubits",
                reason: format!("at most {EXACT_QUBIT_LIMIT} qubits can be diagonalized densely"),
            });
        }
        if !(config.eigen_tolerance > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "eigen_tolerance",
                reason: "must be positive".to_string(),
            });
        }
        Ok(config)
    }
}

#[derive(Default)]
pub struct VariationalSolverConfigBuilder {
    ansatz: Option<AnsatzKind>,
    optimizer: Option<OptimizerKind>,
    initial_point: Option<InitialPoint>,
    max_iterations: Option<u64>,
    tolerance: Option<f64>,
    initial_step: Option<f64>,
    gradient_step: Option<f64>,
    max_qubits: Option<usize>,
}

impl VariationalSolverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ansatz(mut self, ansatz: AnsatzKind) -> Self {
        self.ansatz = Some(ansatz);
        self
    }
    pub fn optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.optimizer = Some(optimizer);
        self
    }
    pub fn initial_point(mut self, point: InitialPoint) -> Self {
        self.initial_point = Some(point);
        self
    }
    pub fn max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }
    pub fn initial_step(mut self, step: f64) -> Self {
        self.initial_step = Some(step);
        self
    }
    pub fn gradient_step(mut self, step: f64) -> Self {
        self.gradient_step = Some(step);
        self
    }
    pub fn max_qubits(mut self, n: usize) -> Self {
        self.max_qubits = Some(n);
        self
    }

    pub fn build(self) -> Result<VariationalSolverConfig, ConfigError> {
        let config = VariationalSolverConfig {
            ansatz: self.ansatz.unwrap_or_default(),
            optimizer: self.optimizer.unwrap_or_default(),
            initial_point: self.initial_point.unwrap_or_default(),
            max_iterations: self.max_iterations.unwrap_or(1000),
            tolerance: self.tolerance.unwrap_or(1e-8),
            initial_step: self.initial_step.unwrap_or(0.5),
            gradient_step: self.gradient_step.unwrap_or(1e-5),
            max_qubits: self.max_qubits.unwrap_or(16),
        };
        if config.max_qubits > VARIATIONAL_QUBIT_LIMIT {
            return Err(ConfigError::InvalidParameter {
                name: "max_qubits",
                reason: format!("at most {VARIATIONAL_QUBIT_LIMIT} qubits can be simulated"),
            });
        }
        if config.max_iterations == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        for (name, value) in [
            ("tolerance", config.tolerance),
            ("initial_step", config.initial_step),
            ("gradient_step", config.gradient_step),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be a positive finite number, got {value}"),
                });
            }
        }
        if let AnsatzKind::RealAmplitudes { reps } | AnsatzKind::EfficientSu2 { reps } = config.ansatz {
            if reps == 0 {
                return Err(ConfigError::InvalidParameter {
                    name: "ansatz.reps",
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        Ok(config)
    }
}

#[derive(Default)]
pub struct GroundStateConfigBuilder {
    mapping: Option<Mapping>,
    two_qubit_reduction: Option<bool>,
    active_space: Option<ActiveSpace>,
    freeze_core: Option<bool>,
    solver: Option<SolverConfig>,
    filter: Option<FilterConfig>,
    timeout: Option<Duration>,
}

impl GroundStateConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = Some(mapping);
        self
    }
    pub fn two_qubit_reduction(mut self, enabled: bool) -> Self {
        self.two_qubit_reduction = Some(enabled);
        self
    }
    pub fn active_space(mut self, active_space: ActiveSpace) -> Self {
        self.active_space = Some(active_space);
        self
    }
    pub fn freeze_core(mut self, enabled: bool) -> Self {
        self.freeze_core = Some(enabled);
        self
    }
    pub fn solver(mut self, solver: SolverConfig) -> Self {
        self.solver = Some(solver);
        self
    }
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = Some(filter);
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<GroundStateConfig, ConfigError> {
        let two_qubit_reduction = self.two_qubit_reduction.unwrap_or(false);
        if two_qubit_reduction && self.mapping.is_some_and(|m| m != Mapping::Parity) {
            return Err(ConfigError::InvalidParameter {
                name: "two_qubit_reduction",
                reason: "only available with the parity mapping".to_string(),
            });
        }
        let freeze_core = self.freeze_core.unwrap_or(false);
        if freeze_core && self.active_space.is_some() {
            return Err(ConfigError::InvalidParameter {
                name: "freeze_core",
                reason: "cannot be combined with an explicit active space".to_string(),
            });
        }
        Ok(GroundStateConfig {
            mapping: self.mapping,
            two_qubit_reduction,
            active_space: self.active_space,
            freeze_core,
            solver: self.solver.ok_or(ConfigError::MissingParameter("solver"))?,
            filter: self.filter.unwrap_or_default(),
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ground_state_builder_requires_solver() {
        let result = GroundStateConfigBuilder::new().build();
        assert_eq!(result, Err(ConfigError::MissingParameter("solver")));
    }

    #[test]
    fn ground_state_builder_rejects_reduction_without_parity() {
        let result = GroundStateConfigBuilder::new()
            .mapping(Mapping::JordanWigner)
            .two_qubit_reduction(true)
            .solver(SolverConfig::Exact(ExactSolverConfig::default()))
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "two_qubit_reduction",
                ..
            })
        ));
    }

    #[test]
    fn solver_builders_cap_max_qubits() {
        let exact = ExactSolverConfigBuilder::new().max_qubits(64).build();
        assert!(matches!(
            exact,
            Err(ConfigError::InvalidParameter { name: "max_qubits", .. })
        ));
        assert!(ExactSolverConfigBuilder::new().max_qubits(EXACT_QUBIT_LIMIT).build().is_ok());

        let variational = VariationalSolverConfigBuilder::new()
            .max_qubits(VARIATIONAL_QUBIT_LIMIT + 1)
            .build();
        assert!(matches!(
            variational,
            Err(ConfigError::InvalidParameter { name: "max_qubits", .. })
        ));
    }

    #[test]
    fn variational_builder_applies_defaults() {
        let config = VariationalSolverConfigBuilder::new().build().unwrap();
        assert_eq!(config.optimizer, OptimizerKind::NelderMead);
        assert_eq!(config.ansatz, AnsatzKind::Excitations);
        assert_eq!(config.initial_point, InitialPoint::Zeros);
        assert_eq!(config.max_iterations, 1000);
    }

    #[test]
    fn variational_builder_rejects_zero_reps() {
        let result = VariationalSolverConfigBuilder::new()
            .ansatz(AnsatzKind::RealAmplitudes { reps: 0 })
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                name: "ansatz.reps",
                ..
            })
        ));
    }

    #[test]
    fn exact_builder_rejects_zero_eigenvalues() {
        let result = ExactSolverConfigBuilder::new().num_eigenvalues(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn filter_config_default_is_empty() {
        assert!(FilterConfig::default().is_empty());
        let filter = FilterConfig {
            particle_number: Some(2.0),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }
}
