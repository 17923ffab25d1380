//! # Core Module
//!
//! Stateless data models and pure algorithms: everything needed to turn a
//! physical problem description into a qubit operator.
//!
//! - **Problem descriptions** ([`models`]) - Molecules, integrals and vibrational modal data
//! - **Operator algebra** ([`operators`]) - Pauli strings, qubit operators and ladder operators
//! - **Qubit encodings** ([`mapping`]) - Jordan–Wigner, parity, Bravyi–Kitaev and direct mappings
//! - **Problem reduction** ([`transformers`]) - Active-space and frozen-core transformers
//! - **File I/O** ([`io`]) - FCIDUMP, XYZ, TOML problem files and CSV traces
//! - **Reference data** ([`utils`]) - Element table and unit conversions
//!
//! Nothing in this module keeps state between calls; the same input always
//! produces the same output.

pub mod io;
pub mod mapping;
pub mod models;
pub mod operators;
pub mod transformers;
pub mod utils;
