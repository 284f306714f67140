use saber_core::{
    body, mean_of, BodyPose, BoxSize, Hitbox, PlayerSlot, SlotPair, TrackerSettings, Vector2,
};

use crate::filter::Ema2;

/// Reference width used when neither shoulders nor hips are visible, in px.
const FALLBACK_REFERENCE_WIDTH: f64 = 80.0;
const WIDTH_PER_REFERENCE: f64 = 2.2;
const HEIGHT_PER_TORSO: f64 = 2.0;
/// Torso height assumed per unit of reference width when no side is fully visible.
const TORSO_PER_REFERENCE: f64 = 2.0;
const MIN_BOX_W: f64 = 140.0;
const MAX_BOX_W: f64 = 360.0;
const MIN_BOX_H: f64 = 220.0;
const MAX_BOX_H: f64 = 520.0;

/// Body center from the shoulders and hips. Needs at least two of the four,
/// otherwise the mean of every landmark is used.
pub fn center_from_pose(pose: &BodyPose) -> Option<Vector2> {
    let torso: Vec<Vector2> = [
        body::LEFT_SHOULDER,
        body::RIGHT_SHOULDER,
        body::LEFT_HIP,
        body::RIGHT_HIP,
    ]
    .iter()
    .filter_map(|&i| pose.get(i))
    .collect();

    if torso.len() >= 2 {
        mean_of(torso)
    } else {
        pose.mean()
    }
}

fn distance(pose: &BodyPose, a: usize, b: usize) -> Option<f64> {
    Some((pose.get(b)? - pose.get(a)?).norm())
}

/// Raw hitbox size for one body.
///
/// Width comes from the shoulder span (or hip span, or a fixed fallback), height from
/// the longer fully visible shoulder-to-hip side. Both are clamped to human
/// proportions.
pub fn estimate_box_size(pose: &BodyPose) -> BoxSize {
    let reference_w = distance(pose, body::LEFT_SHOULDER, body::RIGHT_SHOULDER)
        .filter(|w| *w > 0.0)
        .or_else(|| distance(pose, body::LEFT_HIP, body::RIGHT_HIP).filter(|w| *w > 0.0))
        .unwrap_or(FALLBACK_REFERENCE_WIDTH);

    let torso_h = [
        distance(pose, body::LEFT_SHOULDER, body::LEFT_HIP),
        distance(pose, body::RIGHT_SHOULDER, body::RIGHT_HIP),
    ]
    .into_iter()
    .flatten()
    .fold(0.0f64, f64::max);
    let torso_h = if torso_h > 0.0 {
        torso_h
    } else {
        reference_w * TORSO_PER_REFERENCE
    };

    BoxSize::new(
        (reference_w * WIDTH_PER_REFERENCE).clamp(MIN_BOX_W, MAX_BOX_W),
        (torso_h * HEIGHT_PER_TORSO).clamp(MIN_BOX_H, MAX_BOX_H),
    )
}

/// Tracks one fixed-size, center-smoothed hitbox per slot.
///
/// Box sizes lock once, on the first frame both slots have a body, and stay locked
/// until [`HitboxTracker::reset`]. Centers are smoothed every frame a body is seen.
#[derive(Debug, Clone)]
pub struct HitboxTracker {
    settings: TrackerSettings,
    centers: SlotPair<Ema2>,
    /// Whether the slot had a body on the last update
    present: SlotPair<bool>,
    /// Shared box size, set once calibration locks
    size: Option<BoxSize>,
    hitboxes: SlotPair<Option<Hitbox>>,
}

impl HitboxTracker {
    pub fn new(settings: &TrackerSettings) -> Self {
        Self {
            settings: settings.clone(),
            centers: SlotPair::new(
                Ema2::new(settings.center_ema_alpha),
                Ema2::new(settings.center_ema_alpha),
            ),
            present: SlotPair::default(),
            size: None,
            hitboxes: SlotPair::default(),
        }
    }

    pub fn is_calibrated(&self) -> bool {
        self.size.is_some()
    }

    /// The locked box size, if calibrated.
    pub fn size(&self) -> Option<BoxSize> {
        self.size
    }

    /// Update from this frame's slot assignment. Returns `true` on the frame
    /// calibration locks.
    pub fn update(&mut self, bodies: SlotPair<Option<&BodyPose>>) -> bool {
        let mut locked_now = false;
        if self.size.is_none() {
            if let Some((left, right)) = bodies.both() {
                let raw_left = estimate_box_size(left);
                let raw_right = estimate_box_size(right);
                let size = raw_left
                    .max(&raw_right)
                    .scaled(self.settings.calibration_scale);
                log::info!(
                    "Calibrated hitbox size {:.0}x{:.0} (raw left {:.0}x{:.0}, right {:.0}x{:.0})",
                    size.w,
                    size.h,
                    raw_left.w,
                    raw_left.h,
                    raw_right.w,
                    raw_right.h
                );
                self.size = Some(size);
                locked_now = true;
            }
        }

        for slot in PlayerSlot::ALL {
            let center = bodies.get(slot).and_then(center_from_pose);
            *self.present.get_mut(slot) = center.is_some();
            let hitbox = match center {
                Some(center) => {
                    let smoothed = self.centers.get_mut(slot).update(center);
                    self.size.map(|size| {
                        Hitbox::centered(smoothed, size)
                            .translated(self.slot_offset(slot))
                            .snapped(self.settings.snap_grid)
                    })
                }
                None => None,
            };
            *self.hitboxes.get_mut(slot) = hitbox;
        }

        locked_now
    }

    fn slot_offset(&self, slot: PlayerSlot) -> Vector2 {
        let x = match slot {
            PlayerSlot::Left => self.settings.slot_offset_x,
            PlayerSlot::Right => -self.settings.slot_offset_x,
        };
        Vector2::new(x, self.settings.slot_offset_y)
    }

    /// Smoothed body center of a slot that was seen on the last update.
    pub fn center(&self, slot: PlayerSlot) -> Option<Vector2> {
        if *self.present.get(slot) {
            self.centers.get(slot).get()
        } else {
            None
        }
    }

    pub fn hitbox(&self, slot: PlayerSlot) -> Option<Hitbox> {
        *self.hitboxes.get(slot)
    }

    pub fn hitboxes(&self) -> SlotPair<Option<Hitbox>> {
        self.hitboxes
    }

    /// Drop calibration, smoothing state and hitboxes.
    pub fn reset(&mut self) {
        for slot in PlayerSlot::ALL {
            self.centers.get_mut(slot).reset();
        }
        self.present = SlotPair::default();
        self.size = None;
        self.hitboxes = SlotPair::default();
    }
}
