use super::error::EngineError;
use super::problem::{
    ANGULAR_MOMENTUM, DIPOLE_AXES, MAGNETIZATION, PARTICLE_NUMBER, PreparedProblem, QubitProblem,
    occupation_key,
};
use crate::core::mapping::tapering::TwoQubitReduction;
use crate::core::mapping::{Mapping, MappingError, ModeTable};
use crate::core::models::descriptor::{ElectronicDescriptor, ProblemClass, ProblemDescriptor};
use crate::core::models::vibrational::VibrationalDescriptor;
use crate::core::operators::electronic::{self, Spin, spin_orbital};
use crate::core::operators::excitations;
use crate::core::operators::ladder::LadderOperator;
use crate::core::operators::qubit::QubitOperator;
use crate::core::operators::vibrational;
use crate::core::transformers::active_space::{ActiveSpace, FreezeCore};
use std::collections::BTreeMap;
use tracing::debug;

/// Maps a [`ProblemDescriptor`] onto qubits.
///
/// A transformation is a pure function of its settings and the descriptor:
/// calling it twice on the same input yields identical operators.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    mapping: Mapping,
    two_qubit_reduction: bool,
    active_space: Option<ActiveSpace>,
    freeze_core: bool,
}

impl Transformation {
    pub fn new(mapping: Mapping) -> Self {
        Self {
            mapping,
            two_qubit_reduction: false,
            active_space: None,
            freeze_core: false,
        }
    }

    /// The default mapping of `problem` with no transformers.
    pub fn default_for(problem: ProblemClass) -> Self {
        Self::new(Mapping::default_for(problem))
    }

    /// Tapers the two symmetry qubits of the parity encoding.
    pub fn with_two_qubit_reduction(mut self) -> Self {
        self.two_qubit_reduction = true;
        self
    }

    pub fn with_active_space(mut self, active_space: ActiveSpace) -> Self {
        self.active_space = Some(active_space);
        self
    }

    pub fn with_freeze_core(mut self) -> Self {
        self.freeze_core = true;
        self
    }

    pub fn mapping(&self) -> Mapping {
        self.mapping
    }

    /// Maps the descriptor's Hamiltonian.
    ///
    /// # Errors
    ///
    /// Fails with [`MappingError::Unsupported`] (wrapped in
    /// [`EngineError::Mapping`]) when the mapping does not apply to the
    /// descriptor's problem class.
    pub fn transform(&self, descriptor: &ProblemDescriptor) -> Result<QubitOperator, EngineError> {
        Ok(self.prepare(descriptor)?.qubit.hamiltonian)
    }

    /// Runs the problem transformers and maps the Hamiltonian, the auxiliary
    /// operators, the reference state and the excitation generators.
    pub fn prepare(&self, descriptor: &ProblemDescriptor) -> Result<PreparedProblem, EngineError> {
        let class = descriptor.class();
        if !self.mapping.supports(class) {
            return Err(MappingError::Unsupported {
                mapping: self.mapping,
                problem: class,
            }
            .into());
        }
        if self.two_qubit_reduction && self.mapping != Mapping::Parity {
            return Err(MappingError::ReductionRequiresParity(self.mapping).into());
        }

        let prepared = match descriptor {
            ProblemDescriptor::Electronic(electronic) => {
                let reduced = self.reduce_electronic(electronic)?;
                let qubit = self.map_electronic(&reduced)?;
                PreparedProblem {
                    descriptor: reduced.into(),
                    qubit,
                }
            }
            ProblemDescriptor::Vibrational(vib) => {
                if self.two_qubit_reduction {
                    return Err(MappingError::MissingParticleNumbers.into());
                }
                PreparedProblem {
                    descriptor: vib.clone().into(),
                    qubit: self.map_vibrational(vib)?,
                }
            }
        };
        debug!(
            mapping = %self.mapping,
            qubits = prepared.qubit.num_qubits(),
            terms = prepared.qubit.hamiltonian.num_terms(),
            "Mapped problem onto qubits"
        );
        Ok(prepared)
    }

    fn reduce_electronic(&self, descriptor: &ElectronicDescriptor) -> Result<ElectronicDescriptor, EngineError> {
        let mut current = descriptor.clone();
        if self.freeze_core {
            current = FreezeCore.transform(&current)?;
        }
        if let Some(active_space) = &self.active_space {
            current = active_space.transform(&current)?;
        }
        Ok(current)
    }

    fn map_electronic(&self, descriptor: &ElectronicDescriptor) -> Result<QubitProblem, EngineError> {
        let n = descriptor.num_spatial_orbitals();
        let (alpha, beta) = descriptor.num_particles();
        let table = self
            .mapping
            .mode_table(descriptor.num_spin_orbitals(), ProblemClass::Electronic)?;

        let hamiltonian = table.map(&electronic::hamiltonian(descriptor.integrals()))?;
        let mut aux = BTreeMap::new();
        aux.insert(PARTICLE_NUMBER.to_string(), table.map(&electronic::particle_number(n))?);
        aux.insert(ANGULAR_MOMENTUM.to_string(), table.map(&electronic::angular_momentum(n))?);
        aux.insert(MAGNETIZATION.to_string(), table.map(&electronic::magnetization(n))?);
        if let Some(dipole) = descriptor.dipole() {
            for (name, matrix) in DIPOLE_AXES.iter().zip(dipole.axes()) {
                aux.insert(name.to_string(), table.map(&electronic::dipole(matrix))?);
            }
        }

        let occupied = (0..alpha)
            .map(|p| spin_orbital(p, Spin::Alpha, n))
            .chain((0..beta).map(|p| spin_orbital(p, Spin::Beta, n)));
        let reference = table.occupation_state(occupied);
        let generators = map_all(&table, &excitations::uccsd(n, (alpha, beta)))?;

        let problem = QubitProblem {
            hamiltonian,
            aux_operators: aux,
            reference_state: Some(reference),
            excitations: generators,
        };
        if self.two_qubit_reduction {
            return Ok(taper(&problem, TwoQubitReduction::new(table.num_modes(), (alpha, beta)))?);
        }
        Ok(problem)
    }

    fn map_vibrational(&self, descriptor: &VibrationalDescriptor) -> Result<QubitProblem, EngineError> {
        let table = self
            .mapping
            .mode_table(descriptor.total_modals(), ProblemClass::Vibrational)?;
        let hamiltonian = table.map(&vibrational::hamiltonian(descriptor))?;
        let aux = (0..descriptor.num_modes())
            .map(|m| Ok((occupation_key(m), table.map(&vibrational::occupation(descriptor, m))?)))
            .collect::<Result<BTreeMap<_, _>, MappingError>>()?;
        let reference =
            table.occupation_state((0..descriptor.num_modes()).map(|m| descriptor.modal_offset(m, 0)));
        let generators = map_all(&table, &excitations::uvccsd(descriptor.num_modals()))?;
        Ok(QubitProblem {
            hamiltonian,
            aux_operators: aux,
            reference_state: Some(reference),
            excitations: generators,
        })
    }
}

fn map_all(
    table: &ModeTable,
    operators: &[LadderOperator],
) -> Result<Vec<QubitOperator>, MappingError> {
    operators
        .iter()
        .map(|op| table.map(op))
        .filter(|mapped| !matches!(mapped, Ok(op) if op.is_zero()))
        .collect()
}

fn taper(problem: &QubitProblem, reduction: TwoQubitReduction) -> Result<QubitProblem, MappingError> {
    let aux_operators = problem
        .aux_operators
        .iter()
        .map(|(name, op)| Ok((name.clone(), reduction.reduce(op)?)))
        .collect::<Result<BTreeMap<_, _>, MappingError>>()?;
    let excitations = problem
        .excitations
        .iter()
        .map(|op| reduction.reduce(op))
        .filter(|reduced| !matches!(reduced, Ok(op) if op.is_zero()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QubitProblem {
        hamiltonian: reduction.reduce(&problem.hamiltonian)?,
        aux_operators,
        reference_state: problem.reference_state.map(|s| reduction.reduce_basis_state(s)),
        excitations,
    })
}
