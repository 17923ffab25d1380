use super::problem::{
    ANGULAR_MOMENTUM, DIPOLE_AXES, MAGNETIZATION, ObservableValues, PARTICLE_NUMBER, occupation_key,
};
use crate::core::mapping::Mapping;
use crate::core::models::descriptor::{ElectronicDescriptor, ProblemClass, ProblemDescriptor};
use crate::core::models::vibrational::VibrationalDescriptor;
use crate::core::utils::units::AU_TO_DEBYE;
use num_complex::Complex64;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Raw output of one eigensolver call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EigensolverResult {
    /// Lowest eligible eigenvalue of the qubit Hamiltonian.
    pub eigenvalue: f64,
    /// Every eligible eigenvalue found, ascending.
    pub eigenvalues: Vec<f64>,
    #[serde(skip)]
    pub eigenstate: Option<Vec<Complex64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_parameters: Option<Vec<f64>>,
    pub cost_evaluations: usize,
    pub optimizer_iterations: u64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub energy_history: Vec<f64>,
    pub aux_values: ObservableValues,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DipoleMoment {
    pub nuclear: [f64; 3],
    pub electronic: [f64; 3],
    pub total: [f64; 3],
}

impl DipoleMoment {
    pub fn magnitude(&self) -> f64 {
        self.total.iter().map(|c| c * c).sum::<f64>().sqrt()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElectronicProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particle_number: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angular_momentum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnetization: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dipole: Option<DipoleMoment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum Properties {
    Electronic(ElectronicProperties),
    Vibrational { occupations: Vec<f64> },
}

/// Interpreted ground-state result: the eigensolver output plus the classical
/// constants and observables of the original problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundStateResult {
    pub problem: ProblemClass,
    pub mapping: Mapping,
    pub num_qubits: usize,
    /// Eigenvalue of the qubit Hamiltonian.
    pub computed_energy: f64,
    /// Classical energy not represented in the qubit Hamiltonian.
    pub constant_offset: f64,
    /// `computed_energy + constant_offset`.
    pub total_energy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nuclear_repulsion_energy: Option<f64>,
    pub energy_shifts: BTreeMap<String, f64>,
    pub properties: Properties,
    pub solver: EigensolverResult,
}

/// S from ⟨S²⟩ = S(S + 1).
pub fn spin_from_s2(s2: f64) -> f64 {
    (-1.0 + (1.0 + 4.0 * s2).sqrt()) / 2.0
}

impl GroundStateResult {
    /// Combines a raw result with the constants of the (post-transformer) descriptor.
    pub fn interpret(
        descriptor: &ProblemDescriptor,
        mapping: Mapping,
        num_qubits: usize,
        solver: EigensolverResult,
    ) -> Self {
        let (constant_offset, nuclear, shifts, properties) = match descriptor {
            ProblemDescriptor::Electronic(e) => (
                e.constant_energy(),
                Some(e.nuclear_repulsion_energy()),
                e.energy_shifts().clone(),
                Properties::Electronic(electronic_properties(e, &solver.aux_values)),
            ),
            ProblemDescriptor::Vibrational(v) => (
                0.0,
                None,
                BTreeMap::new(),
                vibrational_properties(v, &solver.aux_values),
            ),
        };
        Self {
            problem: descriptor.class(),
            mapping,
            num_qubits,
            computed_energy: solver.eigenvalue,
            constant_offset,
            total_energy: solver.eigenvalue + constant_offset,
            nuclear_repulsion_energy: nuclear,
            energy_shifts: shifts,
            properties,
            solver,
        }
    }

    /// Computed energy plus transformer shifts, without nuclear repulsion.
    pub fn electronic_energy(&self) -> f64 {
        self.computed_energy + self.energy_shifts.values().sum::<f64>()
    }
}

fn electronic_properties(descriptor: &ElectronicDescriptor, values: &ObservableValues) -> ElectronicProperties {
    let s2 = values.get(ANGULAR_MOMENTUM).copied();
    let spin = s2.map(|s2| spin_from_s2(s2.max(0.0)));
    let dipole = DIPOLE_AXES
        .iter()
        .map(|axis| values.get(*axis).copied())
        .collect::<Option<Vec<f64>>>()
        .map(|measured| {
            let nuclear = descriptor.nuclear_dipole();
            let shift = descriptor.dipole_shift();
            let electronic: [f64; 3] = std::array::from_fn(|i| -(measured[i] + shift[i]));
            DipoleMoment {
                nuclear: [nuclear.x, nuclear.y, nuclear.z],
                electronic,
                total: std::array::from_fn(|i| nuclear[i] + electronic[i]),
            }
        });
    ElectronicProperties {
        particle_number: values.get(PARTICLE_NUMBER).copied(),
        angular_momentum: s2,
        spin,
        multiplicity: spin.map(|s| 2.0 * s + 1.0),
        magnetization: values.get(MAGNETIZATION).copied(),
        dipole,
    }
}

fn vibrational_properties(descriptor: &VibrationalDescriptor, values: &ObservableValues) -> Properties {
    Properties::Vibrational {
        occupations: (0..descriptor.num_modes())
            .map(|m| values.get(&occupation_key(m)).copied().unwrap_or(f64::NAN))
            .collect(),
    }
}

fn fmt_vector(v: &[f64; 3]) -> String {
    format!("[{:.8}  {:.8}  {:.8}]", v[0], v[1], v[2])
}

impl fmt::Display for GroundStateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.properties {
            Properties::Electronic(props) => {
                writeln!(f, "=== GROUND STATE ENERGY ===")?;
                writeln!(f)?;
                writeln!(
                    f,
                    "* Electronic ground state energy (Hartree): {:.12}",
                    self.electronic_energy()
                )?;
                writeln!(f, "  - computed part:      {:.12}", self.computed_energy)?;
                for (name, shift) in &self.energy_shifts {
                    writeln!(f, "  - {name}: {shift:.12}")?;
                }
                if let Some(nuclear) = self.nuclear_repulsion_energy {
                    writeln!(f, "~ Nuclear repulsion energy (Hartree): {nuclear:.12}")?;
                }
                writeln!(f, "> Total ground state energy (Hartree): {:.12}", self.total_energy)?;

                writeln!(f)?;
                writeln!(f, "=== MEASURED OBSERVABLES ===")?;
                writeln!(f)?;
                let mut line = String::from(" ");
                if let Some(n) = props.particle_number {
                    line.push_str(&format!(" # Particles: {n:.3}"));
                }
                if let Some(s) = props.spin {
                    line.push_str(&format!(" S: {s:.3}"));
                }
                if let Some(s2) = props.angular_momentum {
                    line.push_str(&format!(" S^2: {s2:.3}"));
                }
                if let Some(m) = props.magnetization {
                    line.push_str(&format!(" M: {m:.3}"));
                }
                writeln!(f, "{line}")?;

                if let Some(dipole) = &props.dipole {
                    writeln!(f)?;
                    writeln!(f, "=== DIPOLE MOMENTS ===")?;
                    writeln!(f)?;
                    writeln!(f, "~ Nuclear dipole moment (a.u.): {}", fmt_vector(&dipole.nuclear))?;
                    writeln!(
                        f,
                        "* Electronic dipole moment (a.u.): {}",
                        fmt_vector(&dipole.electronic)
                    )?;
                    writeln!(
                        f,
                        "> Dipole moment (a.u.): {}  Total: {:.8}",
                        fmt_vector(&dipole.total),
                        dipole.magnitude()
                    )?;
                    let debye = dipole.total.map(|c| c * AU_TO_DEBYE);
                    writeln!(
                        f,
                        "               (debye): {}  Total: {:.8}",
                        fmt_vector(&debye),
                        dipole.magnitude() * AU_TO_DEBYE
                    )?;
                }
            }
            Properties::Vibrational { occupations } => {
                writeln!(f, "=== GROUND STATE ENERGY ===")?;
                writeln!(f)?;
                writeln!(
                    f,
                    "* Vibrational ground state energy (cm^-1): {:.8}",
                    self.total_energy
                )?;
                writeln!(f, "The number of occupied modals for each mode is:")?;
                for (mode, occupation) in occupations.iter().enumerate() {
                    writeln!(f, "- Mode {mode}: {occupation:.6}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{h2_descriptor, harmonic_descriptor};

    fn raw(eigenvalue: f64, aux: &[(&str, f64)]) -> EigensolverResult {
        EigensolverResult {
            eigenvalue,
            eigenvalues: vec![eigenvalue],
            aux_values: aux.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn total_energy_is_eigenvalue_plus_offset() {
        let descriptor: ProblemDescriptor = h2_descriptor().into();
        let result = GroundStateResult::interpret(
            &descriptor,
            Mapping::JordanWigner,
            4,
            raw(-1.851026, &[]),
        );
        assert_eq!(result.total_energy, -1.851026 + result.constant_offset);
        assert_eq!(result.nuclear_repulsion_energy, Some(result.constant_offset));
    }

    #[test]
    fn spin_and_multiplicity_are_derived_from_s2() {
        assert_eq!(spin_from_s2(0.0), 0.0);
        assert!((spin_from_s2(0.75) - 0.5).abs() < 1e-12);
        assert!((spin_from_s2(2.0) - 1.0).abs() < 1e-12);

        let descriptor: ProblemDescriptor = h2_descriptor().into();
        let result = GroundStateResult::interpret(
            &descriptor,
            Mapping::JordanWigner,
            4,
            raw(-1.0, &[("angular_momentum", 2.0), ("particle_number", 2.0)]),
        );
        match result.properties {
            Properties::Electronic(props) => {
                assert!((props.multiplicity.unwrap() - 3.0).abs() < 1e-12);
                assert_eq!(props.particle_number, Some(2.0));
                assert!(props.dipole.is_none());
            }
            other => panic!("unexpected properties {other:?}"),
        }
    }

    #[test]
    fn display_uses_report_layout() {
        let descriptor: ProblemDescriptor = h2_descriptor().into();
        let result = GroundStateResult::interpret(
            &descriptor,
            Mapping::JordanWigner,
            4,
            raw(-1.8, &[("particle_number", 2.0), ("angular_momentum", 0.0), ("magnetization", 0.0)]),
        );
        let text = result.to_string();
        assert!(text.starts_with("=== GROUND STATE ENERGY ===\n"));
        assert!(text.contains("> Total ground state energy (Hartree):"));
        assert!(text.contains("# Particles: 2.000 S: 0.000 S^2: 0.000 M: 0.000"));
    }

    #[test]
    fn vibrational_result_reports_occupations() {
        let descriptor: ProblemDescriptor = harmonic_descriptor().into();
        let result = GroundStateResult::interpret(
            &descriptor,
            Mapping::Direct,
            4,
            raw(1500.0, &[("occupation_mode_0", 1.0), ("occupation_mode_1", 1.0)]),
        );
        assert_eq!(result.total_energy, 1500.0);
        assert_eq!(
            result.properties,
            Properties::Vibrational {
                occupations: vec![1.0, 1.0]
            }
        );
        assert!(result.to_string().contains("- Mode 1: 1.000000"));
    }

    #[test]
    fn serializes_to_toml_without_eigenstate() {
        let descriptor: ProblemDescriptor = h2_descriptor().into();
        let mut solver = raw(-1.8, &[("particle_number", 2.0)]);
        solver.eigenstate = Some(vec![Complex64::new(1.0, 0.0)]);
        let result = GroundStateResult::interpret(&descriptor, Mapping::Parity, 2, solver);
        let text = toml::to_string(&result).unwrap();
        assert!(text.contains("total_energy"));
        assert!(text.contains("mapping = \"parity\""));
        assert!(!text.contains("eigenstate"));
    }
}
