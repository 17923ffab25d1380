//! # groundstate
//!
//! Ground-state energies of electronic and vibrational problems through qubit
//! mappings and pluggable eigensolvers.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (problem descriptors,
//!   integrals, molecules), operator algebra (ladder operators, Pauli strings,
//!   qubit operators), qubit mappings, problem transformers and file I/O.
//!
//! - **[`engine`]: The Solver Machinery.** The `Transformation` from a
//!   descriptor to a qubit problem, filter predicates selecting a symmetry
//!   sector, the exact and variational eigensolvers, configuration, progress
//!   reporting and cancellation.
//!
//! - **[`workflows`]: The Public API.** The ground-state orchestrator that
//!   sequences transformation and eigensolver and adds back the classical
//!   energy contributions, plus a config-driven entry point.

pub mod core;
pub mod engine;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;
