use num_complex::Complex64;
use std::fmt;
use thiserror::Error;

/// Largest register a [`PauliString`] can describe.
pub const MAX_QUBITS: usize = 64;

/// A single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    pub fn symbol(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    fn bits(self) -> (bool, bool) {
        match self {
            Pauli::I => (false, false),
            Pauli::X => (true, false),
            Pauli::Y => (true, true),
            Pauli::Z => (false, true),
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PauliParseError {
    #[error("Invalid Pauli symbol '{symbol}' at position {position}")]
    InvalidSymbol { symbol: char, position: usize },
    #[error("Pauli label of length {0} exceeds the {MAX_QUBITS}-qubit limit")]
    TooLong(usize),
}

/// A tensor product of single-qubit Paulis in symplectic (x, z) bit form.
///
/// Bit `j` of each mask refers to qubit `j`; `Y` is stored as `x & z` and the
/// string represents `i^{|x & z|} X^x Z^z`, so every string is Hermitian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PauliString {
    x: u64,
    z: u64,
}

#[inline]
fn i_pow(exponent: i64) -> Complex64 {
    match exponent.rem_euclid(4) {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, 1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, -1.0),
    }
}

impl PauliString {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn from_masks(x: u64, z: u64) -> Self {
        Self { x, z }
    }

    pub fn single(qubit: usize, pauli: Pauli) -> Self {
        Self::identity().with(qubit, pauli)
    }

    pub fn from_paulis(paulis: &[(usize, Pauli)]) -> Self {
        paulis
            .iter()
            .fold(Self::identity(), |acc, &(qubit, pauli)| acc.with(qubit, pauli))
    }

    /// Parses a dense label such as `"IXYZ"`, rightmost character = qubit 0.
    pub fn from_label(label: &str) -> Result<Self, PauliParseError> {
        let chars: Vec<char> = label.chars().collect();
        if chars.len() > MAX_QUBITS {
            return Err(PauliParseError::TooLong(chars.len()));
        }
        let mut string = Self::identity();
        for (position, &symbol) in chars.iter().enumerate() {
            let pauli = match symbol {
                'I' => Pauli::I,
                'X' => Pauli::X,
                'Y' => Pauli::Y,
                'Z' => Pauli::Z,
                _ => return Err(PauliParseError::InvalidSymbol { symbol, position }),
            };
            string = string.with(chars.len() - 1 - position, pauli);
        }
        Ok(string)
    }

    /// Returns a copy with qubit `qubit` replaced by `pauli`.
    pub fn with(self, qubit: usize, pauli: Pauli) -> Self {
        let bit = 1u64 << qubit;
        let (x, z) = pauli.bits();
        Self {
            x: if x { self.x | bit } else { self.x & !bit },
            z: if z { self.z | bit } else { self.z & !bit },
        }
    }

    pub fn x_mask(&self) -> u64 {
        self.x
    }

    pub fn z_mask(&self) -> u64 {
        self.z
    }

    pub fn pauli_at(&self, qubit: usize) -> Pauli {
        let x = self.x >> qubit & 1 == 1;
        let z = self.z >> qubit & 1 == 1;
        match (x, z) {
            (false, false) => Pauli::I,
            (true, false) => Pauli::X,
            (true, true) => Pauli::Y,
            (false, true) => Pauli::Z,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.x == 0 && self.z == 0
    }

    /// Number of non-identity factors.
    pub fn weight(&self) -> u32 {
        (self.x | self.z).count_ones()
    }

    /// Index of the highest qubit with a non-identity factor.
    pub fn max_qubit(&self) -> Option<usize> {
        let support = self.x | self.z;
        (support != 0).then(|| 63 - support.leading_zeros() as usize)
    }

    pub fn commutes_with(&self, other: &PauliString) -> bool {
        ((self.x & other.z) ^ (self.z & other.x)).count_ones() % 2 == 0
    }

    /// Operator product `self · other = phase · result`.
    pub fn multiply(&self, other: &PauliString) -> (Complex64, PauliString) {
        let result = PauliString {
            x: self.x ^ other.x,
            z: self.z ^ other.z,
        };
        let exponent = (self.x & self.z).count_ones() as i64
            + (other.x & other.z).count_ones() as i64
            - (result.x & result.z).count_ones() as i64
            + 2 * (self.z & other.x).count_ones() as i64;
        (i_pow(exponent), result)
    }

    /// Action on a computational basis state: `P|b⟩ = phase · |b'⟩`.
    #[inline]
    pub fn apply_to_basis(&self, basis: u64) -> (Complex64, u64) {
        let exponent =
            (self.x & self.z).count_ones() as i64 + 2 * (basis & self.z).count_ones() as i64;
        (i_pow(exponent), basis ^ self.x)
    }

    /// Removes qubit `qubit`, shifting every higher qubit down by one.
    pub fn remove_qubit(&self, qubit: usize) -> PauliString {
        let low = (1u64 << qubit) - 1;
        let squeeze = |mask: u64| (mask & low) | ((mask >> 1) & !low);
        PauliString {
            x: squeeze(self.x),
            z: squeeze(self.z),
        }
    }

    /// Dense label over `num_qubits` qubits, rightmost character = qubit 0.
    pub fn to_label(&self, num_qubits: usize) -> String {
        (0..num_qubits)
            .rev()
            .map(|q| self.pauli_at(q).symbol())
            .collect()
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return write!(f, "I");
        }
        let mut first = true;
        for qubit in 0..MAX_QUBITS {
            let pauli = self.pauli_at(qubit);
            if pauli != Pauli::I {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{pauli}{qubit}")?;
                first = false;
            }
        }
        Ok(())
    }
}
