use thiserror::Error;

/// A landmark frame that cannot be interpreted as a hand
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("expected {min}..={max} landmarks, got {got}")]
    WrongCount { got: usize, min: usize, max: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// A gesture tunable that is NaN, infinite or negative
#[derive(Debug, Error, PartialEq)]
#[error("gesture parameter `{name}` must be finite and non-negative, got {value}")]
pub struct GestureParamError {
    pub name: &'static str,
    pub value: f32,
}

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("landmark detector unavailable: {0}")]
    Unavailable(String),

    #[error("landmark stream I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not decode landmark frame: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DetectorError {
    /// Decode failures only spoil one frame; everything else ends the stream.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DetectorError::Decode(_))
    }
}
