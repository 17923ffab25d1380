use super::descriptor::DescriptorError;
use nalgebra::DMatrix;

const SYMMETRY_TOLERANCE: f64 = 1e-8;

/// Two-electron repulsion integrals (pq|rs) over real spatial orbitals in
/// chemists' notation.
///
/// Values are stored densely; [`TwoBodyIntegrals::set`] writes all eight
/// index permutations that are equivalent for real orbitals.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoBodyIntegrals {
    num_orbitals: usize,
    data: Vec<f64>,
}

impl TwoBodyIntegrals {
    pub fn zeros(num_orbitals: usize) -> Result<Self, DescriptorError> {
        let len = num_orbitals
            .checked_pow(4)
            .ok_or(DescriptorError::TooManyOrbitals(num_orbitals))?;
        Ok(Self {
            num_orbitals,
            data: vec![0.0; len],
        })
    }

    pub fn num_orbitals(&self) -> usize {
        self.num_orbitals
    }

    #[inline]
    fn index(&self, p: usize, q: usize, r: usize, s: usize) -> usize {
        let n = self.num_orbitals;
        ((p * n + q) * n + r) * n + s
    }

    #[inline]
    pub fn get(&self, p: usize, q: usize, r: usize, s: usize) -> f64 {
        self.data[self.index(p, q, r, s)]
    }

    /// Sets (pq|rs) and its seven symmetry-equivalent permutations.
    pub fn set(&mut self, p: usize, q: usize, r: usize, s: usize, value: f64) {
        for (a, b, c, d) in [
            (p, q, r, s),
            (q, p, r, s),
            (p, q, s, r),
            (q, p, s, r),
            (r, s, p, q),
            (s, r, p, q),
            (r, s, q, p),
            (s, r, q, p),
        ] {
            let idx = self.index(a, b, c, d);
            self.data[idx] = value;
        }
    }

    /// Iterates over the unique index quadruples p≥q, r≥s, pq≥rs with non-zero values.
    pub fn unique_nonzero(&self) -> impl Iterator<Item = ((usize, usize, usize, usize), f64)> + '_ {
        let n = self.num_orbitals;
        (0..n).flat_map(move |p| {
            (0..=p).flat_map(move |q| {
                (0..=p).flat_map(move |r| {
                    let s_max = if r == p { q } else { r };
                    (0..=s_max).filter_map(move |s| {
                        let value = self.get(p, q, r, s);
                        (value != 0.0).then_some(((p, q, r, s), value))
                    })
                })
            })
        })
    }
}

/// One- and two-electron integrals of a restricted spatial-orbital basis.
#[derive(Debug, Clone, PartialEq)]
pub struct ElectronicIntegrals {
    one_body: DMatrix<f64>,
    two_body: TwoBodyIntegrals,
}

impl ElectronicIntegrals {
    /// Bundles one- and two-body integrals after validating their shapes.
    ///
    /// # Errors
    ///
    /// Returns an error if the one-body matrix is not square and symmetric or
    /// if the two-body tensor covers a different number of orbitals.
    pub fn new(one_body: DMatrix<f64>, two_body: TwoBodyIntegrals) -> Result<Self, DescriptorError> {
        check_symmetric_square(&one_body, "one-body")?;
        if two_body.num_orbitals() != one_body.nrows() {
            return Err(DescriptorError::DimensionMismatch {
                what: "two-body integrals",
                expected: one_body.nrows(),
                found: two_body.num_orbitals(),
            });
        }
        Ok(Self { one_body, two_body })
    }

    pub fn num_spatial_orbitals(&self) -> usize {
        self.one_body.nrows()
    }

    pub fn one_body(&self) -> &DMatrix<f64> {
        &self.one_body
    }

    pub fn two_body(&self) -> &TwoBodyIntegrals {
        &self.two_body
    }
}

/// Matrix elements ⟨p|r_k|q⟩ of the position operator along x, y and z.
#[derive(Debug, Clone, PartialEq)]
pub struct DipoleIntegrals {
    axes: [DMatrix<f64>; 3],
}

impl DipoleIntegrals {
    pub fn new(x: DMatrix<f64>, y: DMatrix<f64>, z: DMatrix<f64>) -> Result<Self, DescriptorError> {
        for (matrix, name) in [(&x, "dipole x"), (&y, "dipole y"), (&z, "dipole z")] {
            check_symmetric_square(matrix, name)?;
        }
        if y.nrows() != x.nrows() || z.nrows() != x.nrows() {
            return Err(DescriptorError::DimensionMismatch {
                what: "dipole integrals",
                expected: x.nrows(),
                found: y.nrows().max(z.nrows()),
            });
        }
        Ok(Self { axes: [x, y, z] })
    }

    pub fn num_spatial_orbitals(&self) -> usize {
        self.axes[0].nrows()
    }

    pub fn axis(&self, index: usize) -> &DMatrix<f64> {
        &self.axes[index]
    }

    pub fn axes(&self) -> &[DMatrix<f64>; 3] {
        &self.axes
    }
}

fn check_symmetric_square(matrix: &DMatrix<f64>, what: &'static str) -> Result<(), DescriptorError> {
    if !matrix.is_square() {
        return Err(DescriptorError::DimensionMismatch {
            what,
            expected: matrix.nrows(),
            found: matrix.ncols(),
        });
    }
    let asymmetry = (matrix - matrix.transpose()).amax();
    if asymmetry > SYMMETRY_TOLERANCE {
        return Err(DescriptorError::NotSymmetric { what, asymmetry });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_rejects_orbital_counts_that_overflow() {
        assert!(matches!(
            TwoBodyIntegrals::zeros(usize::MAX / 2),
            Err(DescriptorError::TooManyOrbitals(_))
        ));
    }

    #[test]
    fn set_fills_all_eightfold_permutations() {
        let mut eri = TwoBodyIntegrals::zeros(3).unwrap();
        eri.set(0, 1, 2, 0, 0.25);
        for (p, q, r, s) in [
            (0, 1, 2, 0),
            (1, 0, 2, 0),
            (0, 1, 0, 2),
            (1, 0, 0, 2),
            (2, 0, 0, 1),
            (0, 2, 0, 1),
            (2, 0, 1, 0),
            (0, 2, 1, 0),
        ] {
            assert_eq!(eri.get(p, q, r, s), 0.25);
        }
        assert_eq!(eri.get(0, 0, 1, 2), 0.0);
    }

    #[test]
    fn unique_nonzero_visits_each_class_once() {
        let mut eri = TwoBodyIntegrals::zeros(2).unwrap();
        eri.set(0, 0, 0, 0, 1.0);
        eri.set(1, 1, 0, 0, 0.5);
        eri.set(1, 0, 1, 0, 0.2);
        let entries: Vec<_> = eri.unique_nonzero().collect();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn new_rejects_non_symmetric_one_body() {
        let h = DMatrix::from_row_slice(2, 2, &[1.0, 0.1, 0.2, 1.0]);
        let result = ElectronicIntegrals::new(h, TwoBodyIntegrals::zeros(2).unwrap());
        assert!(matches!(result, Err(DescriptorError::NotSymmetric { .. })));
    }

    #[test]
    fn new_rejects_mismatched_two_body_dimension() {
        let h = DMatrix::identity(2, 2);
        let result = ElectronicIntegrals::new(h, TwoBodyIntegrals::zeros(3).unwrap());
        assert!(matches!(
            result,
            Err(DescriptorError::DimensionMismatch { expected: 2, found: 3, .. })
        ));
    }
}
