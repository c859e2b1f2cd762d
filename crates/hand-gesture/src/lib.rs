//! # Hand Gesture
//!
//! Turns a stream of hand-landmark frames into a sticky morph [`Mode`] and a
//! continuous rotation drive, shared with the render loop through
//! [`GestureState`].
//!
//! | Gesture | Effect |
//! |---|---|
//! | Thumb and index tips pinched (< 0.18 apart) | Assemble |
//! | Open hand | Disperse |
//! | Wrist left/right of centre | Spin the scene |
//! | No hand | Keep mode, stop gesture spin |
//!
//! [`Mode`]: particle_layout::Mode

pub mod error;
pub mod interpreter;
pub mod landmarks;
pub mod source;
pub mod state;
pub mod tracker;

pub use error::*;
pub use interpreter::*;
pub use landmarks::*;
pub use source::*;
pub use state::*;
pub use tracker::*;
