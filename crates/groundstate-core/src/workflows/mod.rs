//! # Workflows Module
//!
//! High-level entry points composing the [`engine`](crate::engine) pieces
//! into complete procedures.
//!
//! - **Ground state** ([`ground_state`]) - Maps a problem onto qubits, runs an
//!   eigensolver and interprets the lowest eligible eigenvalue, either through
//!   a hand-assembled [`ground_state::GroundStateSolver`] or the config-driven
//!   [`ground_state::run`].

pub mod ground_state;
