//! # Particle Renderer
//!
//! wgpu instanced renderer for the morph scene. [`MorphRenderer`] implements
//! [`InstanceSink`], so the engine flushes straight into GPU buffers.
//!
//! [`InstanceSink`]: particle_simulation::InstanceSink

pub mod camera;
pub mod mesh;
pub mod renderer;

pub use camera::*;
pub use mesh::*;
pub use renderer::*;
