//! Shared fixtures for unit tests.

use crate::core::io::fcidump::FcidumpFile;
use crate::core::io::traits::ChemistryFile;
use crate::core::models::descriptor::ElectronicDescriptor;
use crate::core::models::vibrational::VibrationalDescriptor;
use crate::core::operators::pauli::{Pauli, PauliString};
use crate::core::operators::qubit::QubitOperator;
use crate::engine::problem::{PARTICLE_NUMBER, QubitProblem};
use num_complex::Complex64;
use std::io::Cursor;

/// H2 in the STO-3G basis near equilibrium.
pub const H2_FCIDUMP: &str = " &FCI NORB=2,NELEC=2,MS2=0,
  ORBSYM=1,1,
  ISYM=1,
 &END
 0.6744887663568382 1 1 1 1
 0.6634680964235684 1 1 2 2
 0.1812888082114961 1 2 1 2
 0.6973949208906209 2 2 2 2
-1.2524635735648986 1 1 0 0
-0.47594871522096355 2 2 0 0
 0.7137539936876182 0 0 0 0
";

pub const H2_NUCLEAR_REPULSION: f64 = 0.7137539936876182;

pub fn h2_descriptor() -> ElectronicDescriptor {
    let (data, _) = FcidumpFile::read_from(&mut Cursor::new(H2_FCIDUMP)).unwrap();
    ElectronicDescriptor::builder()
        .integrals(data.integrals)
        .num_particles(1, 1)
        .nuclear_repulsion_energy(data.core_energy)
        .build()
        .unwrap()
}

/// Two modes of 1000 and 2000 cm⁻¹ with two modals each.
pub fn harmonic_descriptor() -> VibrationalDescriptor {
    VibrationalDescriptor::harmonic(&[1000.0, 2000.0], &[2, 2]).unwrap()
}

fn real(c: f64) -> Complex64 {
    Complex64::new(c, 0.0)
}

/// Z0 + Z1 + ½(X0X1 + Y0Y1), with spectrum −2 (N=2), −1 and 1 (N=1), 2 (N=0).
pub fn toy_operator() -> QubitOperator {
    QubitOperator::from_terms(
        2,
        [
            (PauliString::single(0, Pauli::Z), real(1.0)),
            (PauliString::single(1, Pauli::Z), real(1.0)),
            (PauliString::from_paulis(&[(0, Pauli::X), (1, Pauli::X)]), real(0.5)),
            (PauliString::from_paulis(&[(0, Pauli::Y), (1, Pauli::Y)]), real(0.5)),
        ],
    )
}

/// [`toy_operator`] with N = 1 − ½Z0 − ½Z1 as its particle-number observable.
pub fn toy_problem() -> QubitProblem {
    let number = QubitOperator::from_terms(
        2,
        [
            (PauliString::identity(), real(1.0)),
            (PauliString::single(0, Pauli::Z), real(-0.5)),
            (PauliString::single(1, Pauli::Z), real(-0.5)),
        ],
    );
    QubitProblem::new(toy_operator()).with_aux_operator(PARTICLE_NUMBER, number)
}
