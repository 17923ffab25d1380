use num_complex::Complex64;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ladder {
    Create,
    Annihilate,
}

/// One creation or annihilation operator acting on `mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LadderFactor {
    pub kind: Ladder,
    pub mode: usize,
}

impl LadderFactor {
    pub fn create(mode: usize) -> Self {
        Self {
            kind: Ladder::Create,
            mode,
        }
    }

    pub fn annihilate(mode: usize) -> Self {
        Self {
            kind: Ladder::Annihilate,
            mode,
        }
    }
}

impl fmt::Display for LadderFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Ladder::Create => write!(f, "+_{}", self.mode),
            Ladder::Annihilate => write!(f, "-_{}", self.mode),
        }
    }
}

/// A second-quantized operator: a weighted sum of ordered ladder-operator products.
///
/// The product order of each term is preserved exactly as written; no normal
/// ordering is attempted. Whether the modes obey fermionic or hard-core
/// bosonic statistics is decided by the qubit mapping that consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderOperator {
    num_modes: usize,
    terms: BTreeMap<Vec<LadderFactor>, Complex64>,
}

impl LadderOperator {
    pub fn zero(num_modes: usize) -> Self {
        Self {
            num_modes,
            terms: BTreeMap::new(),
        }
    }

    pub fn identity(num_modes: usize, coefficient: f64) -> Self {
        let mut op = Self::zero(num_modes);
        op.add_term(Vec::new(), Complex64::new(coefficient, 0.0));
        op
    }

    /// `coefficient · a†_p a_q`.
    pub fn one_body(num_modes: usize, p: usize, q: usize, coefficient: f64) -> Self {
        let mut op = Self::zero(num_modes);
        op.add_term(
            vec![LadderFactor::create(p), LadderFactor::annihilate(q)],
            Complex64::new(coefficient, 0.0),
        );
        op
    }

    pub fn add_term(&mut self, factors: Vec<LadderFactor>, coefficient: Complex64) {
        if coefficient == Complex64::default() {
            return;
        }
        *self.terms.entry(factors).or_default() += coefficient;
    }

    pub fn num_modes(&self) -> usize {
        self.num_modes
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = (&[LadderFactor], &Complex64)> {
        self.terms.iter().map(|(f, c)| (f.as_slice(), c))
    }

    /// Highest mode index referenced by any term.
    pub fn max_mode(&self) -> Option<usize> {
        self.terms.keys().flatten().map(|factor| factor.mode).max()
    }

    /// Hermitian conjugate: reverses every product and swaps creation with annihilation.
    pub fn adjoint(&self) -> Self {
        let mut result = Self::zero(self.num_modes);
        for (factors, coefficient) in &self.terms {
            let conjugated = factors
                .iter()
                .rev()
                .map(|f| LadderFactor {
                    kind: match f.kind {
                        Ladder::Create => Ladder::Annihilate,
                        Ladder::Annihilate => Ladder::Create,
                    },
                    mode: f.mode,
                })
                .collect();
            result.add_term(conjugated, coefficient.conj());
        }
        result
    }

    pub fn scale(&self, factor: Complex64) -> Self {
        let mut result = Self::zero(self.num_modes);
        for (factors, coefficient) in &self.terms {
            result.add_term(factors.clone(), coefficient * factor);
        }
        result
    }
}

impl Add for &LadderOperator {
    type Output = LadderOperator;

    fn add(self, rhs: &LadderOperator) -> LadderOperator {
        let mut result = self.clone();
        result.num_modes = self.num_modes.max(rhs.num_modes);
        for (factors, coefficient) in &rhs.terms {
            result.add_term(factors.clone(), *coefficient);
        }
        result
    }
}

impl Mul for &LadderOperator {
    type Output = LadderOperator;

    fn mul(self, rhs: &LadderOperator) -> LadderOperator {
        let mut result = LadderOperator::zero(self.num_modes.max(rhs.num_modes));
        for (a, ca) in &self.terms {
            for (b, cb) in &rhs.terms {
                let mut factors = Vec::with_capacity(a.len() + b.len());
                factors.extend_from_slice(a);
                factors.extend_from_slice(b);
                result.add_term(factors, ca * cb);
            }
        }
        result
    }
}

impl fmt::Display for LadderOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (factors, coefficient)) in self.terms.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:+.8}", coefficient.re)?;
            if coefficient.im != 0.0 {
                write!(f, "{:+.8}i", coefficient.im)?;
            }
            write!(f, " *")?;
            for factor in factors {
                write!(f, " {factor}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjoint_reverses_and_swaps_factors() {
        let op = LadderOperator::one_body(3, 0, 2, 1.5);
        let adj = op.adjoint();
        let (factors, coefficient) = adj.terms().next().unwrap();
        assert_eq!(
            factors,
            &[LadderFactor::create(2), LadderFactor::annihilate(0)]
        );
        assert_eq!(*coefficient, Complex64::new(1.5, 0.0));
    }

    #[test]
    fn product_concatenates_factors_in_order() {
        let a = LadderOperator::one_body(2, 0, 1, 2.0);
        let b = LadderOperator::one_body(2, 1, 0, 3.0);
        let product = &a * &b;
        let (factors, coefficient) = product.terms().next().unwrap();
        assert_eq!(factors.len(), 4);
        assert_eq!(factors[2], LadderFactor::create(1));
        assert_eq!(*coefficient, Complex64::new(6.0, 0.0));
    }

    #[test]
    fn sum_merges_equal_products() {
        let a = LadderOperator::one_body(2, 0, 0, 1.0);
        let sum = &a + &a;
        assert_eq!(sum.num_terms(), 1);
        assert_eq!(sum.max_mode(), Some(0));
    }

    #[test]
    fn zero_coefficients_are_not_stored() {
        let op = LadderOperator::one_body(2, 0, 1, 0.0);
        assert_eq!(op.num_terms(), 0);
    }
}
