use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One of the two fixed match positions.
///
/// Slots are re-assigned every frame from the horizontal order of the detected
/// bodies, so a slot is a position on screen rather than a person.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    Left,
    Right,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::Left, PlayerSlot::Right];

    /// The slot on the other side of the arena.
    pub fn opponent(self) -> PlayerSlot {
        match self {
            PlayerSlot::Left => PlayerSlot::Right,
            PlayerSlot::Right => PlayerSlot::Left,
        }
    }
}

impl Display for PlayerSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerSlot::Left => write!(f, "Left"),
            PlayerSlot::Right => write!(f, "Right"),
        }
    }
}

/// A value held once per slot.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct SlotPair<T> {
    pub left: T,
    pub right: T,
}

impl<T> SlotPair<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn get(&self, slot: PlayerSlot) -> &T {
        match slot {
            PlayerSlot::Left => &self.left,
            PlayerSlot::Right => &self.right,
        }
    }

    pub fn get_mut(&mut self, slot: PlayerSlot) -> &mut T {
        match slot {
            PlayerSlot::Left => &mut self.left,
            PlayerSlot::Right => &mut self.right,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(PlayerSlot, T) -> U) -> SlotPair<U> {
        SlotPair {
            left: f(PlayerSlot::Left, self.left),
            right: f(PlayerSlot::Right, self.right),
        }
    }
}

impl<T> SlotPair<Option<T>> {
    /// Number of slots holding a value.
    pub fn count_some(&self) -> usize {
        self.left.is_some() as usize + self.right.is_some() as usize
    }

    pub fn both(&self) -> Option<(&T, &T)> {
        match (&self.left, &self.right) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(PlayerSlot::Left.opponent(), PlayerSlot::Right);
        assert_eq!(PlayerSlot::Right.opponent(), PlayerSlot::Left);
    }

    #[test]
    fn test_slot_pair_access() {
        let mut pair = SlotPair::new(Some(1), None);
        assert_eq!(pair.count_some(), 1);
        assert!(pair.both().is_none());

        *pair.get_mut(PlayerSlot::Right) = Some(2);
        assert_eq!(pair.get(PlayerSlot::Right), &Some(2));
        assert_eq!(pair.both(), Some((&1, &2)));

        let doubled = pair.map(|_, v| v.map(|v| v * 2));
        assert_eq!(doubled, SlotPair::new(Some(2), Some(4)));
    }
}
