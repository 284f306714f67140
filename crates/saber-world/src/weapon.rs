use saber_core::{BladeSegment, HandPose, Vector2, WeaponSettings};

/// Derives a blade for a player from their striking hand.
#[derive(Debug, Clone)]
pub struct WeaponTracker {
    blade_length: f64,
}

impl WeaponTracker {
    pub fn new(settings: &WeaponSettings) -> Self {
        Self {
            blade_length: settings.blade_length,
        }
    }

    /// The blade held in `hand`: starts at the palm and points through the index
    /// fingertip. `None` if the palm or the fingertip is missing.
    ///
    /// A fingertip on top of the palm gives no direction, the blade then collapses to
    /// a point at the palm.
    pub fn blade(&self, hand: &HandPose) -> Option<BladeSegment> {
        let grip = hand.palm_center()?;
        let tip = hand.index_tip()?;
        let direction = unit_or_zero(tip - grip);
        Some(BladeSegment::new(grip, grip + direction * self.blade_length))
    }
}

fn unit_or_zero(v: Vector2) -> Vector2 {
    let norm = v.norm();
    if norm > 0.0 {
        v / norm
    } else {
        Vector2::zeros()
    }
}
