//! Default constants for the particle layout
//!
//! World units match the scene camera sitting 12 units from the origin:
//! the assembled cone spans y ∈ [-4, 4] and the dispersed cloud fills the
//! view out to a radius of 25.

/// Lowest point of the cone body and ribbon
pub const Y_MIN: f32 = -4.0;

/// Apex height of the cone body and ribbon
pub const Y_MAX: f32 = 4.0;

/// Cone radius at `Y_MIN`
pub const CONE_RADIUS: f32 = 3.5;

/// Extra radius the ribbon keeps over the cone surface
pub const RIBBON_OFFSET: f32 = 0.2;

/// Number of full turns the ribbon makes from bottom to apex
pub const RIBBON_REVOLUTIONS: f32 = 3.0;

/// Inner radius of the dispersed shell
pub const DISPERSED_RADIUS_MIN: f32 = 8.0;

/// Outer radius of the dispersed shell
pub const DISPERSED_RADIUS_MAX: f32 = 25.0;

/// Total number of particles in the ensemble
pub const PARTICLE_COUNT: usize = 7500;

/// Largest pool accepted at startup; keeps per-group instance buffers well
/// under wgpu's default `max_buffer_size`
pub const MAX_PARTICLE_COUNT: usize = 250_000;

/// Particles making up the helical ribbon
pub const RIBBON_COUNT: usize = 600;

/// Cube ornaments on the cone
pub const DECOR_CUBE_COUNT: usize = 300;

/// Icosahedron ornaments on the cone
pub const DECOR_ICO_COUNT: usize = 300;

/// Ribbon instance scale (all ribbon particles share it)
pub const RIBBON_SCALE: f32 = 0.06;

/// Ornament scale range `[min, max)`
pub const DECOR_SCALE: (f32, f32) = (0.12, 0.22);

/// Leaf scale range `[min, max)`
pub const LEAF_SCALE: (f32, f32) = (0.04, 0.10);

/// Upper bound of each intrinsic spin axis, radians per second
/// (0.02 rad per frame at 60 Hz)
pub const MAX_SPIN: f32 = 1.2;

/// Half-width of the lightness jitter applied to non-solid palettes
pub const LIGHTNESS_JITTER: f32 = 0.02;
