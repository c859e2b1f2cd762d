use thiserror::Error;

/// Which of a particle's two targets failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Assembled,
    Dispersed,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Assembled => f.write_str("assembled"),
            TargetKind::Dispersed => f.write_str("dispersed"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("layout parameter `{name}` is not finite")]
    NonFiniteParam { name: &'static str },

    #[error("vertical range is empty or inverted: y_min={y_min}, y_max={y_max}")]
    InvertedHeight { y_min: f32, y_max: f32 },

    #[error("layout radius `{name}` is negative: {value}")]
    NegativeRadius { name: &'static str, value: f32 },

    #[error("dispersed radii are inverted: min={min}, max={max}")]
    InvertedDispersedRadius { min: f32, max: f32 },

    #[error("particle {id} produced a non-finite {target} target")]
    NonFinitePoint { id: usize, target: TargetKind },
}
