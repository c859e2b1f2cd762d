//! Landmark frame → mode decision + rotation drive

use crate::error::GestureParamError;
use crate::landmarks::LandmarkFrame;
use glam::Vec2;
use particle_layout::Mode;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureParams {
    /// Pinch distances strictly below this assemble the ensemble
    pub pinch_threshold: f32,
    /// Rotation drive per unit of wrist offset from the image centre
    pub sensitivity: f32,
    /// When set, an assembled hand only releases once the pinch opens past
    /// this distance. `None` keeps the single hard threshold.
    pub release_threshold: Option<f32>,
}

impl Default for GestureParams {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.18,
            sensitivity: 1.5,
            release_threshold: None,
        }
    }
}

/// Result of interpreting one frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureReading {
    pub hand_present: bool,
    /// Unchanged from the previous mode when no hand is present
    pub mode: Mode,
    /// Zero when no hand is present
    pub rotation_drive: f32,
    pub pinch_distance: Option<f32>,
    /// Mirrored index fingertip in [0, 1]², for the on-screen cursor
    pub cursor: Option<Vec2>,
}

impl GestureParams {
    pub fn validate(&self) -> Result<(), GestureParamError> {
        let release = self.release_threshold.map(|value| ("release_threshold", value));
        for (name, value) in [
            ("pinch_threshold", self.pinch_threshold),
            ("sensitivity", self.sensitivity),
        ]
        .into_iter()
        .chain(release)
        {
            if !value.is_finite() || value < 0.0 {
                return Err(GestureParamError { name, value });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GestureInterpreter {
    params: GestureParams,
}

impl GestureInterpreter {
    pub fn new(params: GestureParams) -> Result<Self, GestureParamError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &GestureParams {
        &self.params
    }

    /// Pure function of the frame and the previous mode.
    pub fn interpret(&self, frame: &LandmarkFrame, previous: Mode) -> GestureReading {
        let hand = match frame {
            LandmarkFrame::NoHand => {
                return GestureReading {
                    hand_present: false,
                    mode: previous,
                    rotation_drive: 0.0,
                    pinch_distance: None,
                    cursor: None,
                };
            }
            LandmarkFrame::Hand(hand) => hand,
        };

        let index = hand.index_tip();
        let pinch_distance = index.distance_2d(&hand.thumb_tip());
        // The camera image is mirrored for display, so a wrist left of centre
        // in image space is a hand to the user's right.
        let rotation_drive = (0.5 - hand.wrist().x) * self.params.sensitivity;

        GestureReading {
            hand_present: true,
            mode: self.classify(pinch_distance, previous),
            rotation_drive,
            pinch_distance: Some(pinch_distance),
            cursor: Some(Vec2::new(1.0 - index.x, index.y)),
        }
    }

    pub fn classify(&self, pinch_distance: f32, previous: Mode) -> Mode {
        let threshold = match (previous, self.params.release_threshold) {
            (Mode::Assembled, Some(release)) => release.max(self.params.pinch_threshold),
            _ => self.params.pinch_threshold,
        };

        if pinch_distance < threshold {
            Mode::Assembled
        } else {
            Mode::Dispersed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::tests::hand_points;
    use crate::landmarks::{HandLandmarks, LandmarkFrame};

    fn frame(wrist: (f32, f32), thumb: (f32, f32), index: (f32, f32)) -> LandmarkFrame {
        LandmarkFrame::Hand(HandLandmarks::new(hand_points(wrist, thumb, index)).unwrap())
    }

    #[test]
    fn test_close_pinch_assembles() {
        let interpreter = GestureInterpreter::default();
        let reading = interpreter.interpret(
            &frame((0.5, 0.9), (0.50, 0.50), (0.50, 0.52)),
            Mode::Dispersed,
        );

        assert!(reading.hand_present);
        assert_eq!(reading.mode, Mode::Assembled);
        assert!((reading.pinch_distance.unwrap() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_open_hand_disperses() {
        let interpreter = GestureInterpreter::default();
        let reading = interpreter.interpret(
            &frame((0.5, 0.9), (0.2, 0.2), (0.8, 0.8)),
            Mode::Assembled,
        );

        assert_eq!(reading.mode, Mode::Dispersed);
        assert!((reading.pinch_distance.unwrap() - 0.8485).abs() < 1e-3);
    }

    #[test]
    fn test_threshold_is_strict() {
        let interpreter = GestureInterpreter::default();
        assert_eq!(interpreter.classify(0.18, Mode::Assembled), Mode::Dispersed);
        assert_eq!(interpreter.classify(0.179, Mode::Dispersed), Mode::Assembled);
    }

    #[test]
    fn test_rotation_drive_from_wrist() {
        let interpreter = GestureInterpreter::default();

        let left = interpreter.interpret(
            &frame((0.3, 0.9), (0.2, 0.2), (0.8, 0.8)),
            Mode::Assembled,
        );
        assert!((left.rotation_drive - 0.3).abs() < 1e-6);

        let right = interpreter.interpret(
            &frame((0.7, 0.9), (0.2, 0.2), (0.8, 0.8)),
            Mode::Assembled,
        );
        assert!((right.rotation_drive + 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_no_hand_keeps_mode_and_zeroes_drive() {
        let interpreter = GestureInterpreter::default();
        for previous in [Mode::Assembled, Mode::Dispersed] {
            let reading = interpreter.interpret(&LandmarkFrame::NoHand, previous);
            assert!(!reading.hand_present);
            assert_eq!(reading.mode, previous);
            assert_eq!(reading.rotation_drive, 0.0);
            assert_eq!(reading.cursor, None);
        }
    }

    #[test]
    fn test_cursor_is_mirrored_index_tip() {
        let interpreter = GestureInterpreter::default();
        let reading = interpreter.interpret(
            &frame((0.5, 0.9), (0.2, 0.3), (0.25, 0.4)),
            Mode::Assembled,
        );
        let cursor = reading.cursor.unwrap();
        assert!((cursor.x - 0.75).abs() < 1e-6);
        assert!((cursor.y - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_release_threshold_adds_hysteresis() {
        let interpreter = GestureInterpreter::new(GestureParams {
            release_threshold: Some(0.24),
            ..Default::default()
        })
        .unwrap();

        // Entering still needs the pinch threshold.
        assert_eq!(interpreter.classify(0.20, Mode::Dispersed), Mode::Dispersed);
        assert_eq!(interpreter.classify(0.17, Mode::Dispersed), Mode::Assembled);

        // Once assembled, small openings inside the band do not flicker.
        assert_eq!(interpreter.classify(0.20, Mode::Assembled), Mode::Assembled);
        assert_eq!(interpreter.classify(0.24, Mode::Assembled), Mode::Dispersed);
    }

    #[test]
    fn test_non_finite_or_negative_params_are_rejected() {
        let bad = [
            GestureParams {
                sensitivity: f32::NAN,
                ..Default::default()
            },
            GestureParams {
                pinch_threshold: f32::NAN,
                ..Default::default()
            },
            GestureParams {
                pinch_threshold: -0.1,
                ..Default::default()
            },
            GestureParams {
                release_threshold: Some(f32::INFINITY),
                ..Default::default()
            },
        ];
        for params in bad {
            assert!(GestureInterpreter::new(params).is_err(), "{params:?}");
        }

        let err = GestureInterpreter::new(GestureParams {
            sensitivity: f32::NEG_INFINITY,
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.name, "sensitivity");

        assert!(GestureInterpreter::new(GestureParams::default()).is_ok());
    }
}
