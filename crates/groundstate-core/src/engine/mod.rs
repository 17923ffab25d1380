//! # Engine Module
//!
//! Solver machinery between the pure [`core`](crate::core) algorithms and the
//! [`workflows`](crate::workflows) entry points.
//!
//! ## Overview
//!
//! A [`transform::Transformation`] turns a problem descriptor into a
//! [`problem::QubitProblem`]; an [`eigensolver::Eigensolver`] then finds its
//! lowest eigenvalue inside the symmetry sector selected by a
//! [`filter::FilterPredicate`].
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Solver and workflow settings with validating builders
//! - **Errors** ([`error`]) - [`error::EngineError`] and its retry classification
//! - **Progress** ([`progress`]) - Callback-based progress reporting
//! - **Cancellation** ([`cancellation`]) - Shared cancel flag with an optional deadline
//! - **Trial states** ([`statevector`], [`ansatz`]) - Dense statevector and parameterized ansätze
//! - **Solvers** ([`eigensolver`]) - Exact diagonalization and variational minimization
//! - **Results** ([`result`]) - Raw and interpreted ground-state results

pub mod ansatz;
pub mod cancellation;
pub mod config;
pub mod eigensolver;
pub mod error;
pub mod filter;
pub mod problem;
pub mod progress;
pub mod result;
pub mod statevector;
pub mod transform;
