//! # Core Models Module
//!
//! Immutable descriptions of the physical problems the solver works on.
//!
//! ## Overview
//!
//! A ground-state calculation starts from a [`descriptor::ProblemDescriptor`]:
//!
//! - **Electronic problems** ([`descriptor::ElectronicDescriptor`]) hold an optional
//!   [`molecule::Molecule`], restricted spatial-orbital [`integrals`], particle counts,
//!   the nuclear repulsion energy, optional dipole integrals and the energy shifts
//!   accumulated by problem transformers.
//! - **Vibrational problems** ([`vibrational::VibrationalDescriptor`]) hold the modal
//!   basis size of each mode and the modal-basis integrals of the Hamiltonian.
//!
//! All descriptors validate their inputs on construction and expose getters only,
//! so a descriptor that exists is always internally consistent.
//!
//! ```ignore
//! use groundstate::core::models::vibrational::VibrationalDescriptor;
//!
//! let descriptor = VibrationalDescriptor::harmonic(&[1000.0, 2000.0], &[2, 2])?;
//! assert_eq!(descriptor.total_modals(), 4);
//! ```

pub mod descriptor;
pub mod integrals;
pub mod molecule;
pub mod vibrational;
