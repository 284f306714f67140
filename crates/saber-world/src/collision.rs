use saber_core::{line_intersects_rect, BladeSegment, Hitbox, PlayerSlot, SlotPair};

/// Slots whose hitbox is touched by the opposing blade this frame.
///
/// Each direction is tested on its own: both players can connect on the same
/// frame.
pub fn detect_contacts(
    blades: &SlotPair<Option<BladeSegment>>,
    hitboxes: &SlotPair<Option<Hitbox>>,
) -> SlotPair<bool> {
    let touched = |target: PlayerSlot| match (blades.get(target.opponent()), hitboxes.get(target)) {
        (Some(blade), Some(hitbox)) => line_intersects_rect(blade, hitbox),
        _ => false,
    };
    SlotPair::new(touched(PlayerSlot::Left), touched(PlayerSlot::Right))
}
