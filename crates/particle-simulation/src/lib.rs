//! # Particle Simulation
//!
//! Builds the fixed particle pool and drives the per-frame morph between the
//! assembled and dispersed layouts.

pub mod buffers;
pub mod engine;
pub mod error;
pub mod params;
pub mod registry;
pub mod topper;

pub use buffers::*;
pub use engine::*;
pub use error::*;
pub use params::*;
pub use registry::*;
pub use topper::*;
