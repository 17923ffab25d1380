//! Problem transformers that reduce an electronic descriptor before mapping.
//!
//! Each transformer returns a new descriptor and records the classical energy
//! it removed under a named entry of
//! [`ElectronicDescriptor::energy_shifts`](crate::core::models::descriptor::ElectronicDescriptor::energy_shifts).

pub mod active_space;
