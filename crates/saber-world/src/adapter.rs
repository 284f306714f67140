use saber_core::{BodyPose, FrameSettings, HandPose, NormalizedLandmark, SensorFrame, Vector2};

/// Sensor output for one frame, converted to pixel space.
#[derive(Debug, Clone, Default)]
pub struct PixelFrame {
    pub bodies: Vec<BodyPose>,
    pub hands: Vec<HandPose>,
}

/// Converts normalized sensor landmarks into pixel coordinates of a `width` x `height`
/// frame.
#[derive(Debug, Clone)]
pub struct LandmarkAdapter {
    width: f64,
    height: f64,
}

impl LandmarkAdapter {
    pub fn new(settings: &FrameSettings) -> Self {
        Self {
            width: settings.width,
            height: settings.height,
        }
    }

    fn to_pixels(&self, lm: &NormalizedLandmark) -> Vector2 {
        Vector2::new(lm.x * self.width, lm.y * self.height)
    }

    /// Scale every landmark of the frame. Never fails; a frame without detections
    /// yields empty lists.
    pub fn adapt(&self, frame: &SensorFrame) -> PixelFrame {
        let bodies = frame
            .bodies
            .iter()
            .map(|lms| BodyPose::new(lms.iter().map(|lm| self.to_pixels(lm)).collect()))
            .collect();
        let hands = frame
            .hands
            .iter()
            .map(|hand| HandPose {
                landmarks: hand.landmarks.iter().map(|lm| self.to_pixels(lm)).collect(),
                handedness: hand.handedness,
                score: hand.score,
            })
            .collect();

        PixelFrame { bodies, hands }
    }
}

#[cfg(test)]
mod tests {
    use saber_core::{Handedness, RawHand};

    use super::*;

    #[test]
    fn test_scales_to_frame() {
        let adapter = LandmarkAdapter::new(&FrameSettings {
            width: 1280.0,
            height: 720.0,
        });
        let frame = SensorFrame {
            timestamp_ms: 0.0,
            bodies: vec![vec![
                NormalizedLandmark::new(0.5, 0.5),
                NormalizedLandmark::new(0.25, 1.0),
            ]],
            hands: vec![RawHand {
                landmarks: vec![NormalizedLandmark::new(1.0, 0.0)],
                handedness: Handedness::Left,
                score: 0.75,
            }],
        };

        let out = adapter.adapt(&frame);
        assert_eq!(out.bodies.len(), 1);
        assert_eq!(out.bodies[0].landmarks[0], Vector2::new(640.0, 360.0));
        assert_eq!(out.bodies[0].landmarks[1], Vector2::new(320.0, 720.0));
        assert_eq!(out.hands[0].landmarks[0], Vector2::new(1280.0, 0.0));
        assert_eq!(out.hands[0].handedness, Handedness::Left);
        assert_eq!(out.hands[0].score, 0.75);
    }

    #[test]
    fn test_empty_frame() {
        let adapter = LandmarkAdapter::new(&FrameSettings::default());
        let out = adapter.adapt(&SensorFrame::default());
        assert!(out.bodies.is_empty());
        assert!(out.hands.is_empty());
    }
}
