//! Hand landmark frames
//!
//! Coordinates are normalized to [0, 1] in camera image space (x to the
//! right of the unmirrored image, y downward). Only the wrist, thumb tip and
//! index tip are consumed; the remaining points are carried through.

use crate::error::FrameError;
use serde::Deserialize;

pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;

/// Points per hand produced by the detector
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Fewest points that still include the index fingertip
pub const MIN_LANDMARKS: usize = INDEX_TIP + 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance in the image plane, ignoring depth
    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Detector output as delivered, before validation
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawFrame {
    #[serde(default)]
    pub timestamp_ms: f64,
    /// `None` (or an empty list) means no hand was found
    #[serde(default)]
    pub landmarks: Option<Vec<Landmark>>,
}

impl RawFrame {
    pub fn no_hand(timestamp_ms: f64) -> Self {
        Self {
            timestamp_ms,
            landmarks: None,
        }
    }

    pub fn hand(timestamp_ms: f64, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp_ms,
            landmarks: Some(landmarks),
        }
    }
}

/// Landmarks of one validated hand
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: Vec<Landmark>,
}

impl HandLandmarks {
    pub fn new(points: Vec<Landmark>) -> Result<Self, FrameError> {
        if !(MIN_LANDMARKS..=HAND_LANDMARK_COUNT).contains(&points.len()) {
            return Err(FrameError::WrongCount {
                got: points.len(),
                min: MIN_LANDMARKS,
                max: HAND_LANDMARK_COUNT,
            });
        }

        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(FrameError::NonFinite { index });
        }

        Ok(Self { points })
    }

    pub fn wrist(&self) -> Landmark {
        self.points[WRIST]
    }

    pub fn thumb_tip(&self) -> Landmark {
        self.points[THUMB_TIP]
    }

    pub fn index_tip(&self) -> Landmark {
        self.points[INDEX_TIP]
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }
}

/// One validated detector result
#[derive(Clone, Debug, PartialEq)]
pub enum LandmarkFrame {
    NoHand,
    Hand(HandLandmarks),
}

impl TryFrom<RawFrame> for LandmarkFrame {
    type Error = FrameError;

    fn try_from(raw: RawFrame) -> Result<Self, Self::Error> {
        match raw.landmarks {
            None => Ok(LandmarkFrame::NoHand),
            Some(points) if points.is_empty() => Ok(LandmarkFrame::NoHand),
            Some(points) => HandLandmarks::new(points).map(LandmarkFrame::Hand),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Full hand with wrist, thumb tip and index tip placed explicitly
    pub(crate) fn hand_points(
        wrist: (f32, f32),
        thumb: (f32, f32),
        index: (f32, f32),
    ) -> Vec<Landmark> {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); HAND_LANDMARK_COUNT];
        points[WRIST] = Landmark::new(wrist.0, wrist.1, 0.0);
        points[THUMB_TIP] = Landmark::new(thumb.0, thumb.1, 0.0);
        points[INDEX_TIP] = Landmark::new(index.0, index.1, 0.0);
        points
    }

    #[test]
    fn test_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 9.0);
        assert!((a.distance_2d(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_missing_or_empty_is_no_hand() {
        assert_eq!(
            LandmarkFrame::try_from(RawFrame::no_hand(0.0)),
            Ok(LandmarkFrame::NoHand)
        );
        assert_eq!(
            LandmarkFrame::try_from(RawFrame::hand(0.0, vec![])),
            Ok(LandmarkFrame::NoHand)
        );
    }

    #[test]
    fn test_wrong_count_rejected() {
        let short = vec![Landmark::default(); 8];
        assert_eq!(
            LandmarkFrame::try_from(RawFrame::hand(0.0, short)),
            Err(FrameError::WrongCount {
                got: 8,
                min: 9,
                max: 21
            })
        );

        let long = vec![Landmark::default(); 42];
        assert!(LandmarkFrame::try_from(RawFrame::hand(0.0, long)).is_err());

        let minimal = vec![Landmark::default(); 9];
        assert!(LandmarkFrame::try_from(RawFrame::hand(0.0, minimal)).is_ok());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut points = hand_points((0.5, 0.8), (0.4, 0.5), (0.5, 0.4));
        points[THUMB_TIP].y = f32::NAN;
        assert_eq!(
            HandLandmarks::new(points),
            Err(FrameError::NonFinite { index: THUMB_TIP })
        );
    }

    #[test]
    fn test_deserialize_line() {
        let json = r#"{"timestamp_ms": 12.5, "landmarks": [
            {"x": 0.1, "y": 0.2, "z": 0.0}, {"x": 0.1, "y": 0.2}
        ]}"#;
        let raw: RawFrame = serde_json::from_str(json).unwrap();
        assert_eq!(raw.timestamp_ms, 12.5);
        assert_eq!(raw.landmarks.as_ref().map(Vec::len), Some(2));

        let empty: RawFrame = serde_json::from_str(r#"{"landmarks": null}"#).unwrap();
        assert_eq!(empty, RawFrame::no_hand(0.0));
    }
}
