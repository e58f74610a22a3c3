//! Shared CPU⇄GPU definitions for the Afterglow post-processing pipeline.
//!
//! Uniform struct layouts must match the WGSL structs in `shaders/`
//! byte-for-byte; the unit tests pin the sizes.

pub mod color;
pub mod shaders;
pub mod uniforms;
