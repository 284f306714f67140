//! Per-frame mapping of detections onto the two player slots.
//!
//! Nothing here carries identity across frames: two players swapping sides swap
//! slots as well.

use saber_core::{BodyPose, HandPose, SlotPair, Vector2};

/// Order bodies by the mean x of their landmarks. The leftmost is `Left`, the next
/// is `Right`, anyone else is ignored. Bodies without landmarks cannot be placed
/// and are skipped.
pub fn assign_left_right(bodies: &[BodyPose]) -> SlotPair<Option<&BodyPose>> {
    let mut placed: Vec<(f64, &BodyPose)> = bodies
        .iter()
        .filter_map(|body| body.mean().map(|m| (m.x, body)))
        .collect();
    if placed.len() < bodies.len() {
        log::trace!(
            "Skipping {} bodies without landmarks",
            bodies.len() - placed.len()
        );
    }
    placed.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut ordered = placed.into_iter().map(|(_, body)| body);
    let left = ordered.next();
    let right = ordered.next();
    SlotPair::new(left, right)
}

/// Assign each hand to the slot whose body center is nearer to its palm. Ties go
/// to `Left`. A slot without a known center is infinitely far away. Hands without
/// a palm center are dropped.
pub fn split_hands_by_player<'a>(
    hands: &'a [HandPose],
    center_left: Option<Vector2>,
    center_right: Option<Vector2>,
) -> SlotPair<Vec<&'a HandPose>> {
    let dist2 = |center: Option<Vector2>, p: Vector2| {
        center.map_or(f64::INFINITY, |c| (p - c).norm_squared())
    };

    let mut split = SlotPair::new(Vec::new(), Vec::new());
    for hand in hands {
        let Some(palm) = hand.palm_center() else {
            continue;
        };
        if dist2(center_left, palm) <= dist2(center_right, palm) {
            split.left.push(hand);
        } else {
            split.right.push(hand);
        }
    }
    split
}

/// The hand whose palm is farthest from the body center, read as the arm that is
/// striking. `None` without hands or without a center.
pub fn pick_most_extended_hand<'a>(
    hands: &[&'a HandPose],
    center: Option<Vector2>,
) -> Option<&'a HandPose> {
    let center = center?;
    let mut best: Option<(&HandPose, f64)> = None;
    for &hand in hands {
        let Some(palm) = hand.palm_center() else {
            continue;
        };
        let d2 = (palm - center).norm_squared();
        if best.map_or(true, |(_, best_d2)| d2 > best_d2) {
            best = Some((hand, d2));
        }
    }
    best.map(|(hand, _)| hand)
}
