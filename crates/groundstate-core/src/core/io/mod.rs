//! Provides input/output functionality for quantum-chemistry file formats.
//!
//! All structured formats implement the [`traits::ChemistryFile`] trait:
//!
//! - [`fcidump`] - Knowles–Handy FCIDUMP integral files.
//! - [`xyz`] - XYZ molecular geometries with charge and multiplicity tokens.
//!
//! [`descriptor_file`] ties them together into TOML problem descriptions and
//! [`trace`] exports solver output as CSV tables.

pub mod descriptor_file;
pub mod fcidump;
pub mod trace;
pub mod traits;
pub mod xyz;
