use std::f64::consts::PI;

use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use saber_core::{
    body, hand, Handedness, MatchInstant, NormalizedLandmark, RawHand, SensorFrame,
};
use saber_executor::LandmarkSource;

const BODY_LANDMARKS: usize = 33;
const HAND_LANDMARKS: usize = 21;
/// Noise added to every landmark, in normalized units
const JITTER: f64 = 0.002;

struct MockFighter {
    /// Resting x of the body center
    home_x: f64,
    /// +1 when the opponent is to the right
    facing: f64,
    /// Phase offset of the sway and the strike, in radians
    phase: f64,
}

impl MockFighter {
    fn center_x(&self, t: f64) -> f64 {
        self.home_x + 0.02 * (1.3 * t + self.phase).sin()
    }

    fn body(&self, t: f64, rng: &mut StdRng) -> Vec<NormalizedLandmark> {
        let cx = self.center_x(t);
        let mut landmarks = vec![NormalizedLandmark::new(cx, 0.48); BODY_LANDMARKS];
        landmarks[body::LEFT_SHOULDER] = NormalizedLandmark::new(cx - 0.045, 0.35);
        landmarks[body::RIGHT_SHOULDER] = NormalizedLandmark::new(cx + 0.045, 0.35);
        landmarks[body::LEFT_HIP] = NormalizedLandmark::new(cx - 0.04, 0.62);
        landmarks[body::RIGHT_HIP] = NormalizedLandmark::new(cx + 0.04, 0.62);
        for lm in landmarks.iter_mut() {
            jitter(lm, rng);
        }
        landmarks
    }

    /// The sword hand sweeps an arc from a raised guard down into the opponent.
    fn sword_hand(&self, t: f64, rng: &mut StdRng) -> RawHand {
        let swing = 0.5 + 0.5 * (2.0 * t + self.phase).sin();
        let reach = 0.06 + 0.08 * swing;
        let angle = -0.9 + 0.9 * swing;
        let palm_x = self.center_x(t) + self.facing * reach;
        let palm_y = 0.42 + 0.06 * angle;
        let (dx, dy) = (self.facing * angle.cos(), angle.sin());

        let mut landmarks = vec![NormalizedLandmark::new(palm_x, palm_y); HAND_LANDMARKS];
        landmarks[hand::INDEX_FINGER_TIP] =
            NormalizedLandmark::new(palm_x + 0.03 * dx, palm_y + 0.03 * dy);
        for lm in landmarks.iter_mut() {
            jitter(lm, rng);
        }

        RawHand {
            landmarks,
            handedness: if self.facing > 0.0 {
                Handedness::Right
            } else {
                Handedness::Left
            },
            score: 0.95,
        }
    }
}

fn jitter(lm: &mut NormalizedLandmark, rng: &mut StdRng) {
    lm.x += rng.gen_range(-JITTER..JITTER);
    lm.y += rng.gen_range(-JITTER..JITTER);
}

/// A synthetic scene of two fighters facing each other and trading strikes.
///
/// Never runs out of frames. The same seed gives the same noise.
pub struct MockSensor {
    fighters: [MockFighter; 2],
    rng: StdRng,
}

impl MockSensor {
    pub fn new(seed: u64) -> Self {
        Self {
            fighters: [
                MockFighter {
                    home_x: 0.32,
                    facing: 1.0,
                    phase: 0.0,
                },
                MockFighter {
                    home_x: 0.68,
                    facing: -1.0,
                    phase: PI,
                },
            ],
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn frame_at(&mut self, now: MatchInstant) -> SensorFrame {
        let t = now.as_secs();
        let mut bodies = Vec::with_capacity(self.fighters.len());
        let mut hands = Vec::with_capacity(self.fighters.len());
        for fighter in &self.fighters {
            bodies.push(fighter.body(t, &mut self.rng));
            hands.push(fighter.sword_hand(t, &mut self.rng));
        }

        SensorFrame {
            timestamp_ms: t * 1000.0,
            bodies,
            hands,
        }
    }
}

impl LandmarkSource for MockSensor {
    async fn detect(&mut self, now: MatchInstant) -> Result<Option<SensorFrame>> {
        Ok(Some(self.frame_at(now)))
    }
}
