//! # Particle Layout
//!
//! Procedural target shapes (cone body, helical ribbon, dispersed cloud),
//! colour palettes, and the static partition of the particle index space
//! into render groups.

pub mod constants;
pub mod error;
pub mod group;
pub mod layout;
pub mod palette;
pub mod particle;

pub use constants::*;
pub use error::*;
pub use group::*;
pub use layout::*;
pub use palette::*;
pub use particle::*;
