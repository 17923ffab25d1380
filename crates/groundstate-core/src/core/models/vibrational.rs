use super::descriptor::DescriptorError;

/// One factor b†_{mode,creation} b_{mode,annihilation} of a vibrational term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModalExcitation {
    pub mode: usize,
    pub creation: usize,
    pub annihilation: usize,
}

impl ModalExcitation {
    pub fn new(mode: usize, creation: usize, annihilation: usize) -> Self {
        Self {
            mode,
            creation,
            annihilation,
        }
    }

    /// The number operator b†_{mode,modal} b_{mode,modal}.
    pub fn number(mode: usize, modal: usize) -> Self {
        Self::new(mode, modal, modal)
    }
}

/// A modal-basis integral `coefficient × Π b†_{m,i} b_{m,j}`.
#[derive(Debug, Clone, PartialEq)]
pub struct VibrationalTerm {
    pub coefficient: f64,
    pub factors: Vec<ModalExcitation>,
}

impl VibrationalTerm {
    pub fn new(coefficient: f64, factors: Vec<ModalExcitation>) -> Self {
        Self {
            coefficient,
            factors,
        }
    }
}

/// A vibrational structure problem expressed in a modal basis (energies in cm⁻¹).
///
/// Each mode `m` carries `num_modals[m]` single-mode basis functions. Terms
/// are validated on construction: every factor must refer to an existing
/// modal and no two factors of the same term may act on the same mode.
#[derive(Debug, Clone, PartialEq)]
pub struct VibrationalDescriptor {
    num_modals: Vec<usize>,
    terms: Vec<VibrationalTerm>,
}

impl VibrationalDescriptor {
    pub fn new(num_modals: Vec<usize>, terms: Vec<VibrationalTerm>) -> Result<Self, DescriptorError> {
        if num_modals.is_empty() {
            return Err(DescriptorError::Missing("num_modals"));
        }
        if let Some(mode) = num_modals.iter().position(|&k| k == 0) {
            return Err(DescriptorError::InvalidVibrationalTerm {
                index: mode,
                reason: format!("mode {mode} has no modals"),
            });
        }
        for (index, term) in terms.iter().enumerate() {
            if !term.coefficient.is_finite() {
                return Err(DescriptorError::InvalidVibrationalTerm {
                    index,
                    reason: "coefficient is not finite".to_string(),
                });
            }
            let mut seen_modes = Vec::with_capacity(term.factors.len());
            for factor in &term.factors {
                let Some(&modals) = num_modals.get(factor.mode) else {
                    return Err(DescriptorError::InvalidVibrationalTerm {
                        index,
                        reason: format!("mode {} does not exist", factor.mode),
                    });
                };
                if factor.creation >= modals || factor.annihilation >= modals {
                    return Err(DescriptorError::InvalidVibrationalTerm {
                        index,
                        reason: format!(
                            "modal index out of range for mode {} ({} modals)",
                            factor.mode, modals
                        ),
                    });
                }
                if seen_modes.contains(&factor.mode) {
                    return Err(DescriptorError::InvalidVibrationalTerm {
                        index,
                        reason: format!("mode {} appears twice", factor.mode),
                    });
                }
                seen_modes.push(factor.mode);
            }
        }
        Ok(Self { num_modals, terms })
    }

    /// Uncoupled harmonic oscillators: ω_m (k + ½) on the number operator of modal k.
    pub fn harmonic(frequencies: &[f64], num_modals: &[usize]) -> Result<Self, DescriptorError> {
        if frequencies.len() != num_modals.len() {
            return Err(DescriptorError::DimensionMismatch {
                what: "harmonic frequencies",
                expected: num_modals.len(),
                found: frequencies.len(),
            });
        }
        let terms = frequencies
            .iter()
            .zip(num_modals)
            .enumerate()
            .flat_map(|(mode, (&omega, &modals))| {
                (0..modals).map(move |k| {
                    VibrationalTerm::new(
                        omega * (k as f64 + 0.5),
                        vec![ModalExcitation::number(mode, k)],
                    )
                })
            })
            .collect();
        Self::new(num_modals.to_vec(), terms)
    }

    pub fn num_modes(&self) -> usize {
        self.num_modals.len()
    }

    pub fn num_modals(&self) -> &[usize] {
        &self.num_modals
    }

    pub fn total_modals(&self) -> usize {
        self.num_modals.iter().sum()
    }

    pub fn terms(&self) -> &[VibrationalTerm] {
        &self.terms
    }

    /// Flat index of modal `modal` of mode `mode` (modes laid out consecutively).
    pub fn modal_offset(&self, mode: usize, modal: usize) -> usize {
        self.num_modals[..mode].iter().sum::<usize>() + modal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harmonic_builds_one_term_per_modal() {
        let descriptor = VibrationalDescriptor::harmonic(&[1000.0, 2000.0], &[2, 3]).unwrap();
        assert_eq!(descriptor.terms().len(), 5);
        assert_eq!(descriptor.total_modals(), 5);
        let last = &descriptor.terms()[4];
        assert_eq!(last.coefficient, 5000.0);
        assert_eq!(last.factors, vec![ModalExcitation::number(1, 2)]);
    }

    #[test]
    fn modal_offset_lays_out_modes_consecutively() {
        let descriptor = VibrationalDescriptor::harmonic(&[1.0, 1.0, 1.0], &[2, 3, 1]).unwrap();
        assert_eq!(descriptor.modal_offset(0, 1), 1);
        assert_eq!(descriptor.modal_offset(1, 0), 2);
        assert_eq!(descriptor.modal_offset(2, 0), 5);
    }

    #[test]
    fn new_rejects_out_of_range_modal() {
        let terms = vec![VibrationalTerm::new(1.0, vec![ModalExcitation::new(0, 2, 0)])];
        let result = VibrationalDescriptor::new(vec![2], terms);
        assert!(matches!(
            result,
            Err(DescriptorError::InvalidVibrationalTerm { index: 0, .. })
        ));
    }

    #[test]
    fn new_rejects_repeated_mode_in_term() {
        let terms = vec![
            VibrationalTerm::new(1.0, vec![ModalExcitation::number(0, 0)]),
            VibrationalTerm::new(
                1.0,
                vec![ModalExcitation::number(1, 0), ModalExcitation::new(1, 1, 0)],
            ),
        ];
        let result = VibrationalDescriptor::new(vec![2, 2], terms);
        assert!(matches!(
            result,
            Err(DescriptorError::InvalidVibrationalTerm { index: 1, .. })
        ));
    }

    #[test]
    fn harmonic_rejects_length_mismatch() {
        let result = VibrationalDescriptor::harmonic(&[1000.0], &[2, 2]);
        assert!(matches!(
            result,
            Err(DescriptorError::DimensionMismatch { .. })
        ));
    }
}
