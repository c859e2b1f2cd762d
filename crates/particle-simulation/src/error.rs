use particle_layout::{LayoutError, RenderGroup};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("particle count must be greater than zero")]
    EmptyPool,

    #[error("particle count {total} exceeds the maximum of {max}")]
    TooManyParticles { total: usize, max: usize },

    #[error(
        "named groups ({ribbon} + {decor_cube} + {decor_ico}) exceed the particle count {total}"
    )]
    GroupsExceedTotal {
        total: usize,
        ribbon: usize,
        decor_cube: usize,
        decor_ico: usize,
    },

    #[error("scale range for {} is invalid: [{min}, {max})", .group.name())]
    InvalidScale {
        group: RenderGroup,
        min: f32,
        max: f32,
    },

    #[error("palette for {} is empty", .group.name())]
    EmptyPalette { group: RenderGroup },

    #[error("morph parameter `{name}` must be finite and non-negative, got {value}")]
    InvalidMorphParam { name: &'static str, value: f32 },

    #[error(transparent)]
    Layout(#[from] LayoutError),
}
