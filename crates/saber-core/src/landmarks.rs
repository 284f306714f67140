use serde::{Deserialize, Serialize};

use crate::Vector2;

/// Body landmark indices of the 33-point pose model.
pub mod body {
    pub const LEFT_SHOULDER: usize = 11;
    pub const RIGHT_SHOULDER: usize = 12;
    pub const LEFT_HIP: usize = 23;
    pub const RIGHT_HIP: usize = 24;
}

/// Hand landmark indices of the 21-point hand model.
pub mod hand {
    pub const WRIST: usize = 0;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const RING_FINGER_MCP: usize = 13;
    pub const PINKY_MCP: usize = 17;

    /// Landmarks averaged to get the palm center.
    pub const PALM: [usize; 5] = [
        WRIST,
        INDEX_FINGER_MCP,
        MIDDLE_FINGER_MCP,
        RING_FINGER_MCP,
        PINKY_MCP,
    ];
}

/// A single landmark as reported by the sensor, normalized to `[0, 1]` of the image
/// width and height.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct NormalizedLandmark {
    pub x: f64,
    pub y: f64,
    /// Relative depth. Carried through but unused, the simulation is 2D.
    #[serde(default)]
    pub z: f64,
    #[serde(default)]
    pub visibility: Option<f64>,
}

impl NormalizedLandmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            visibility: None,
        }
    }
}

/// Which hand the sensor believes it saw.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

/// A detected hand in normalized coordinates.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RawHand {
    pub landmarks: Vec<NormalizedLandmark>,
    #[serde(default)]
    pub handedness: Handedness,
    /// Handedness confidence
    #[serde(default)]
    pub score: f64,
}

/// Everything the landmark sensor produced for one video frame.
///
/// Missing detection lists deserialize as empty, which is the normal state when
/// nobody is in view.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SensorFrame {
    /// Capture time of the frame, in milliseconds
    #[serde(default)]
    pub timestamp_ms: f64,
    #[serde(default)]
    pub bodies: Vec<Vec<NormalizedLandmark>>,
    #[serde(default)]
    pub hands: Vec<RawHand>,
}

/// Body landmarks of one person in pixel space. Index-stable, see [`body`].
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct BodyPose {
    pub landmarks: Vec<Vector2>,
}

impl BodyPose {
    pub fn new(landmarks: Vec<Vector2>) -> Self {
        Self { landmarks }
    }

    /// The landmark at `index`, if the sensor reported it.
    pub fn get(&self, index: usize) -> Option<Vector2> {
        self.landmarks.get(index).copied()
    }

    /// Mean of all landmarks.
    pub fn mean(&self) -> Option<Vector2> {
        mean_of(self.landmarks.iter().copied())
    }
}

/// Hand landmarks in pixel space together with the sensor's handedness guess.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct HandPose {
    pub landmarks: Vec<Vector2>,
    pub handedness: Handedness,
    pub score: f64,
}

impl HandPose {
    pub fn new(landmarks: Vec<Vector2>) -> Self {
        Self {
            landmarks,
            handedness: Handedness::Unknown,
            score: 0.0,
        }
    }

    pub fn get(&self, index: usize) -> Option<Vector2> {
        self.landmarks.get(index).copied()
    }

    /// Mean of the wrist and the four finger base joints that are present, falling
    /// back to the wrist alone.
    pub fn palm_center(&self) -> Option<Vector2> {
        mean_of(hand::PALM.iter().filter_map(|&i| self.get(i))).or_else(|| self.get(hand::WRIST))
    }

    pub fn index_tip(&self) -> Option<Vector2> {
        self.get(hand::INDEX_FINGER_TIP)
    }
}

/// Mean of a set of points, `None` if the set is empty.
pub fn mean_of(points: impl IntoIterator<Item = Vector2>) -> Option<Vector2> {
    let (sum, count) = points
        .into_iter()
        .fold((Vector2::zeros(), 0usize), |(sum, n), p| (sum + p, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_frame_defaults_missing_lists() {
        let frame: SensorFrame = serde_json::from_str(r#"{"timestamp_ms": 12.5}"#).unwrap();
        assert_eq!(frame.timestamp_ms, 12.5);
        assert!(frame.bodies.is_empty());
        assert!(frame.hands.is_empty());
    }

    #[test]
    fn test_deserialize_hand() {
        let hand: RawHand = serde_json::from_str(
            r#"{"landmarks": [{"x": 0.5, "y": 0.25}], "handedness": "Right", "score": 0.9}"#,
        )
        .unwrap();
        assert_eq!(hand.handedness, Handedness::Right);
        assert_eq!(hand.landmarks[0], NormalizedLandmark::new(0.5, 0.25));

        let hand: RawHand = serde_json::from_str(r#"{"landmarks": []}"#).unwrap();
        assert_eq!(hand.handedness, Handedness::Unknown);
    }

    #[test]
    fn test_palm_center_uses_palm_joints() {
        let mut landmarks = vec![Vector2::new(100.0, 100.0); 21];
        landmarks[hand::WRIST] = Vector2::new(0.0, 0.0);
        landmarks[hand::INDEX_FINGER_MCP] = Vector2::new(10.0, 0.0);
        landmarks[hand::MIDDLE_FINGER_MCP] = Vector2::new(20.0, 0.0);
        landmarks[hand::RING_FINGER_MCP] = Vector2::new(30.0, 0.0);
        landmarks[hand::PINKY_MCP] = Vector2::new(40.0, 10.0);
        let hand = HandPose::new(landmarks);

        assert_eq!(hand.palm_center(), Some(Vector2::new(20.0, 2.0)));
    }

    #[test]
    fn test_palm_center_partial_hand() {
        let hand = HandPose::new(vec![Vector2::new(3.0, 4.0)]);
        assert_eq!(hand.palm_center(), Some(Vector2::new(3.0, 4.0)));
        assert!(hand.index_tip().is_none());

        let empty = HandPose::new(vec![]);
        assert!(empty.palm_center().is_none());
    }

    #[test]
    fn test_body_mean() {
        let body = BodyPose::new(vec![Vector2::new(0.0, 0.0), Vector2::new(4.0, 2.0)]);
        assert_eq!(body.mean(), Some(Vector2::new(2.0, 1.0)));
        assert!(BodyPose::default().mean().is_none());
    }
}
