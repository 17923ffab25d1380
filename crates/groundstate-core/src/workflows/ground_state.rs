use crate::core::mapping::Mapping;
use crate::core::models::descriptor::ProblemDescriptor;
use crate::engine::cancellation::CancellationToken;
use crate::engine::config::{FilterConfig, GroundStateConfig, SolverConfig};
use crate::engine::eigensolver::{Eigensolver, ExactSolver, VariationalSolver};
use crate::engine::error::EngineError;
use crate::engine::filter::FilterPredicate;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::result::GroundStateResult;
use crate::engine::transform::Transformation;
use tracing::{info, instrument};

enum FilterSource {
    None,
    Predicate(FilterPredicate),
    Config(FilterConfig),
}

/// Composes a [`Transformation`] with an [`Eigensolver`] and interprets the
/// result against the original problem.
pub struct GroundStateSolver {
    transformation: Transformation,
    solver: Box<dyn Eigensolver>,
    filter: FilterSource,
    cancellation: CancellationToken,
}

impl GroundStateSolver {
    pub fn new(transformation: Transformation, solver: Box<dyn Eigensolver>) -> Self {
        Self {
            transformation,
            solver,
            filter: FilterSource::None,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_filter(mut self, filter: FilterPredicate) -> Self {
        self.filter = FilterSource::Predicate(filter);
        self
    }

    /// Builds the filter from `config` once the problem transformers have run,
    /// so sector constraints refer to the reduced problem.
    pub fn with_filter_config(mut self, config: FilterConfig) -> Self {
        self.filter = if config.is_empty() {
            FilterSource::None
        } else {
            FilterSource::Config(config)
        };
        self
    }

    /// Checked between the transformation and the eigensolver.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn transformation(&self) -> &Transformation {
        &self.transformation
    }

    pub fn solve(&self, descriptor: &ProblemDescriptor) -> Result<GroundStateResult, EngineError> {
        self.solve_with_reporter(descriptor, &ProgressReporter::new())
    }

    #[instrument(skip_all, name = "ground_state_solver", fields(solver = self.solver.name()))]
    pub fn solve_with_reporter(
        &self,
        descriptor: &ProblemDescriptor,
        reporter: &ProgressReporter,
    ) -> Result<GroundStateResult, EngineError> {
        reporter.report(Progress::PhaseStart {
            name: "Transformation",
        });
        let prepared = self.transformation.prepare(descriptor)?;
        info!(
            qubits = prepared.qubit.num_qubits(),
            terms = prepared.qubit.hamiltonian.num_terms(),
            "Problem mapped onto qubits."
        );
        reporter.report(Progress::PhaseFinish);
        self.cancellation.check()?;

        let built;
        let filter = match &self.filter {
            FilterSource::None => None,
            FilterSource::Predicate(predicate) => Some(predicate),
            FilterSource::Config(config) => {
                built = FilterPredicate::from_config(config, &prepared.descriptor);
                built.as_ref()
            }
        };

        reporter.report(Progress::PhaseStart { name: "Eigensolver" });
        let raw = self.solver.solve(&prepared.qubit, filter, reporter)?;
        reporter.report(Progress::PhaseFinish);

        let result = GroundStateResult::interpret(
            &prepared.descriptor,
            self.transformation.mapping(),
            prepared.qubit.num_qubits(),
            raw,
        );
        info!(
            total_energy = result.total_energy,
            constant_offset = result.constant_offset,
            "Ground state found."
        );
        Ok(result)
    }
}

/// Builds the transformation, eigensolver and filter described by `config`
/// and solves `descriptor`.
///
/// `cancellation` is combined with the configured timeout, if any.
#[instrument(skip_all, name = "ground_state_workflow")]
pub fn run(
    descriptor: &ProblemDescriptor,
    config: &GroundStateConfig,
    reporter: &ProgressReporter,
    cancellation: &CancellationToken,
) -> Result<GroundStateResult, EngineError> {
    let token = match config.timeout {
        Some(timeout) => cancellation.clone().and_timeout(timeout),
        None => cancellation.clone(),
    };

    let mapping = config
        .mapping
        .unwrap_or_else(|| Mapping::default_for(descriptor.class()));
    let mut transformation = Transformation::new(mapping);
    if config.two_qubit_reduction {
        transformation = transformation.with_two_qubit_reduction();
    }
    if config.freeze_core {
        transformation = transformation.with_freeze_core();
    }
    if let Some(active_space) = config.active_space {
        transformation = transformation.with_active_space(active_space);
    }

    let solver: Box<dyn Eigensolver> = match &config.solver {
        SolverConfig::Exact(exact) => Box::new(ExactSolver::new(exact.clone())),
        SolverConfig::Variational(variational) => {
            Box::new(VariationalSolver::new(variational.clone()).with_cancellation(token.clone()))
        }
    };
    info!(
        problem = %descriptor.class(),
        mapping = %mapping,
        solver = solver.name(),
        "Starting ground-state workflow."
    );

    GroundStateSolver::new(transformation, solver)
        .with_filter_config(config.filter.clone())
        .with_cancellation(token)
        .solve_with_reporter(descriptor, reporter)
}
