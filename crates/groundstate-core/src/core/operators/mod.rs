//! # Operators Module
//!
//! Operator algebra shared by every problem class.
//!
//! - [`pauli`] - Pauli strings in symplectic bit form and their products.
//! - [`qubit`] - [`qubit::QubitOperator`], the weighted Pauli sums eigensolvers consume.
//! - [`ladder`] - Ordered products of creation and annihilation operators.
//! - [`electronic`] - Builders for the electronic Hamiltonian and its observables.
//! - [`excitations`] - Coupled-cluster excitation generators.
//! - [`vibrational`] - Builders for the vibrational Hamiltonian and mode occupations.

pub mod electronic;
pub mod excitations;
pub mod ladder;
pub mod pauli;
pub mod qubit;
pub mod vibrational;
