use crate::core::operators::pauli::PauliString;
use crate::core::operators::qubit::QubitOperator;
use num_complex::Complex64;

/// Dense amplitudes of an `n`-qubit register; basis index bit `j` is qubit `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// The computational basis state `|index⟩`.
    pub fn basis(num_qubits: usize, index: u64) -> Self {
        let mut amplitudes = vec![Complex64::default(); 1 << num_qubits];
        amplitudes[index as usize] = Complex64::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    pub fn norm(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
    }

    /// Visits every amplitude pair that differs only in `qubit`.
    fn for_each_pair(&mut self, qubit: usize, mut f: impl FnMut(&mut Complex64, &mut Complex64)) {
        let bit = 1usize << qubit;
        for i in 0..self.amplitudes.len() {
            if i & bit == 0 {
                let (low, high) = self.amplitudes.split_at_mut(i | bit);
                f(&mut low[i], &mut high[0]);
            }
        }
    }

    /// `RY(θ) = exp(−iθY/2)`.
    pub fn ry(&mut self, qubit: usize, theta: f64) {
        let (s, c) = (theta / 2.0).sin_cos();
        self.for_each_pair(qubit, |zero, one| {
            let (a, b) = (*zero, *one);
            *zero = a * c - b * s;
            *one = a * s + b * c;
        });
    }

    /// `RZ(θ) = exp(−iθZ/2)`.
    pub fn rz(&mut self, qubit: usize, theta: f64) {
        let minus = Complex64::from_polar(1.0, -theta / 2.0);
        let plus = Complex64::from_polar(1.0, theta / 2.0);
        self.for_each_pair(qubit, |zero, one| {
            *zero *= minus;
            *one *= plus;
        });
    }

    pub fn cx(&mut self, control: usize, target: usize) {
        let (c, t) = (1usize << control, 1usize << target);
        for i in 0..self.amplitudes.len() {
            if i & c != 0 && i & t == 0 {
                self.amplitudes.swap(i, i | t);
            }
        }
    }

    /// Applies `exp(iφP) = cos φ · I + i sin φ · P` for a Pauli string `P`.
    pub fn pauli_rotation(&mut self, string: &PauliString, phi: f64) {
        let (s, c) = phi.sin_cos();
        let mut rotated: Vec<Complex64> = self.amplitudes.iter().map(|a| a * c).collect();
        let i_sin = Complex64::new(0.0, s);
        for (basis, amplitude) in self.amplitudes.iter().enumerate() {
            if amplitude.norm_sqr() == 0.0 {
                continue;
            }
            let (phase, target) = string.apply_to_basis(basis as u64);
            rotated[target as usize] += i_sin * phase * amplitude;
        }
        self.amplitudes = rotated;
    }

    pub fn expectation(&self, operator: &QubitOperator) -> f64 {
        operator.expectation(&self.amplitudes).re
    }
}
