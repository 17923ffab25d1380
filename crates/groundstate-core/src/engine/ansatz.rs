use super::config::AnsatzKind;
use super::error::EngineError;
use super::problem::QubitProblem;
use super::statevector::Statevector;
use crate::core::operators::pauli::PauliString;
use crate::core::operators::qubit::QubitOperator;

/// A parameterized trial state.
pub trait Ansatz: Send + Sync {
    fn num_qubits(&self) -> usize;
    fn num_parameters(&self) -> usize;
    fn prepare(&self, parameters: &[f64]) -> Result<Statevector, EngineError>;
}

/// Builds the ansatz of `kind` for `problem`, starting from its reference
/// state (or `|0…0⟩` when the problem has none).
pub fn build(kind: AnsatzKind, problem: &QubitProblem) -> Result<Box<dyn Ansatz>, EngineError> {
    let num_qubits = problem.num_qubits();
    let reference = problem.reference_state.unwrap_or(0);
    let ansatz: Box<dyn Ansatz> = match kind {
        AnsatzKind::RealAmplitudes { reps } => Box::new(HardwareEfficient {
            num_qubits,
            reps,
            rotations: Rotations::Y,
            reference,
        }),
        AnsatzKind::EfficientSu2 { reps } => Box::new(HardwareEfficient {
            num_qubits,
            reps,
            rotations: Rotations::YZ,
            reference,
        }),
        AnsatzKind::Excitations => {
            Box::new(ExcitationAnsatz::new(num_qubits, reference, &problem.excitations)?)
        }
    };
    if num_qubits == 0 || ansatz.num_parameters() == 0 {
        return Err(EngineError::InvalidAnsatz(format!(
            "{kind:?} has no parameters on a {num_qubits}-qubit problem"
        )));
    }
    Ok(ansatz)
}

fn check_len(expected: usize, parameters: &[f64]) -> Result<(), EngineError> {
    if parameters.len() != expected {
        return Err(EngineError::InvalidAnsatz(format!(
            "expected {expected} parameters, got {}",
            parameters.len()
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rotations {
    Y,
    YZ,
}

impl Rotations {
    fn per_qubit(self) -> usize {
        match self {
            Rotations::Y => 1,
            Rotations::YZ => 2,
        }
    }
}

/// `reps + 1` rotation layers separated by a linear chain of CX gates.
#[derive(Debug, Clone)]
struct HardwareEfficient {
    num_qubits: usize,
    reps: usize,
    rotations: Rotations,
    reference: u64,
}

impl Ansatz for HardwareEfficient {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn num_parameters(&self) -> usize {
        self.num_qubits * self.rotations.per_qubit() * (self.reps + 1)
    }

    fn prepare(&self, parameters: &[f64]) -> Result<Statevector, EngineError> {
        check_len(self.num_parameters(), parameters)?;
        let mut state = Statevector::basis(self.num_qubits, self.reference);
        let mut params = parameters.iter().copied();
        for layer in 0..=self.reps {
            for q in 0..self.num_qubits {
                state.ry(q, params.next().unwrap_or_default());
            }
            if self.rotations == Rotations::YZ {
                for q in 0..self.num_qubits {
                    state.rz(q, params.next().unwrap_or_default());
                }
            }
            if layer < self.reps {
                for q in 1..self.num_qubits {
                    state.cx(q - 1, q);
                }
            }
        }
        Ok(state)
    }
}

/// `Π_k exp(θ_k G_k)` over anti-Hermitian generators `G_k = Σ i c P`.
///
/// The Pauli terms of each generator commute, so each exponential is applied
/// exactly as a sequence of single-string rotations.
#[derive(Debug, Clone)]
struct ExcitationAnsatz {
    num_qubits: usize,
    reference: u64,
    generators: Vec<Vec<(PauliString, f64)>>,
}

impl ExcitationAnsatz {
    fn new(
        num_qubits: usize,
        reference: u64,
        excitations: &[QubitOperator],
    ) -> Result<Self, EngineError> {
        let mut generators = Vec::with_capacity(excitations.len());
        for (index, generator) in excitations.iter().enumerate() {
            let mut terms = Vec::with_capacity(generator.num_terms());
            for (string, coefficient) in generator.terms() {
                if coefficient.re.abs() > 1e-10 {
                    return Err(EngineError::InvalidAnsatz(format!(
                        "excitation generator {index} is not anti-Hermitian"
                    )));
                }
                terms.push((*string, coefficient.im));
            }
            generators.push(terms);
        }
        Ok(Self {
            num_qubits,
            reference,
            generators,
        })
    }
}

impl Ansatz for ExcitationAnsatz {
    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn num_parameters(&self) -> usize {
        self.generators.len()
    }

    fn prepare(&self, parameters: &[f64]) -> Result<Statevector, EngineError> {
        check_len(self.num_parameters(), parameters)?;
        let mut state = Statevector::basis(self.num_qubits, self.reference);
        for (terms, &theta) in self.generators.iter().zip(parameters) {
            for (string, c) in terms {
                state.pauli_rotation(string, theta * c);
            }
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapping::Mapping;
    use crate::engine::transform::Transformation;
    use crate::testing::{h2_descriptor, toy_operator};

    #[test]
    fn parameter_counts_follow_layer_structure() {
        let problem = QubitProblem::new(toy_operator());
        let real = build(AnsatzKind::RealAmplitudes { reps: 2 }, &problem).unwrap();
        assert_eq!(real.num_parameters(), 6);
        let su2 = build(AnsatzKind::EfficientSu2 { reps: 1 }, &problem).unwrap();
        assert_eq!(su2.num_parameters(), 8);
    }

    #[test]
    fn zero_parameters_reproduce_reference_state() {
        let problem = QubitProblem::new(toy_operator()).with_reference_state(0b10);
        let ansatz = build(AnsatzKind::RealAmplitudes { reps: 1 }, &problem).unwrap();
        let state = ansatz.prepare(&[0.0; 4]).unwrap();
        assert!((state.amplitudes()[0b10].re - 1.0).abs() < 1e-12);
    }

    #[test]
    fn wrong_parameter_count_is_rejected() {
        let problem = QubitProblem::new(toy_operator());
        let ansatz = build(AnsatzKind::RealAmplitudes { reps: 1 }, &problem).unwrap();
        assert!(matches!(
            ansatz.prepare(&[0.0; 3]),
            Err(EngineError::InvalidAnsatz(_))
        ));
    }

    #[test]
    fn excitations_without_generators_are_rejected() {
        let problem = QubitProblem::new(toy_operator());
        assert!(matches!(
            build(AnsatzKind::Excitations, &problem),
            Err(EngineError::InvalidAnsatz(_))
        ));
    }

    #[test]
    fn excitation_ansatz_preserves_particle_number() {
        let prepared = Transformation::new(Mapping::JordanWigner)
            .prepare(&h2_descriptor().into())
            .unwrap();
        let ansatz = build(AnsatzKind::Excitations, &prepared.qubit).unwrap();
        let state = ansatz.prepare(&[0.3, -0.2, 0.5]).unwrap();
        assert!((state.norm() - 1.0).abs() < 1e-12);
        let n = state.expectation(&prepared.qubit.aux_operators["particle_number"]);
        assert!((n - 2.0).abs() < 1e-10);
    }
}
