use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{BladeSegment, Hitbox, MatchInstant, PlayerSlot, SlotPair};

/// Number of sprite steps in a HUD health bar, not counting the empty one.
pub const HEALTH_BUCKETS: u8 = 10;

/// Progress of a single match.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(tag = "type", content = "winner")]
pub enum MatchPhase {
    /// Hitbox sizes are not locked yet
    #[default]
    Idle,
    InProgress,
    Finished(PlayerSlot),
}

impl Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchPhase::Idle => write!(f, "Idle"),
            MatchPhase::InProgress => write!(f, "InProgress"),
            MatchPhase::Finished(winner) => write!(f, "Finished({})", winner),
        }
    }
}

/// Tracking status shown to the players. Has no effect on the simulation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchStatus {
    #[default]
    WaitingForPlayers,
    /// Calibration locked on this frame
    Calibrated,
    Tracking,
    /// Calibrated, but a player dropped out of view
    NeedsRecalibration,
}

impl Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            MatchStatus::WaitingForPlayers => "Show two people side-by-side",
            MatchStatus::Calibrated => "Calibrated",
            MatchStatus::Tracking => "Tracking 2 players",
            MatchStatus::NeedsRecalibration => "Need two people visible",
        };
        write!(f, "{}", msg)
    }
}

/// A hit registered by the match state machine.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct HitEvent {
    /// The slot that took the hit
    pub target: PlayerSlot,
    pub attacker: PlayerSlot,
    /// Target's hp after the damage was applied
    pub hp_after: u32,
    pub at: MatchInstant,
}

/// Everything the renderer and HUD need after one tick.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    /// Time the tick ran at
    pub time: MatchInstant,
    /// Capture timestamp of the sensor frame, in milliseconds
    pub frame_timestamp_ms: f64,
    pub hitboxes: SlotPair<Option<Hitbox>>,
    pub blades: SlotPair<Option<BladeSegment>>,
    pub hp_left: u32,
    pub hp_right: u32,
    /// Health bar sprite index per slot, `0..=HEALTH_BUCKETS`
    pub health_buckets: SlotPair<u8>,
    pub winner: Option<PlayerSlot>,
    pub phase: MatchPhase,
    pub status: MatchStatus,
    pub calibrated: bool,
    pub hits: Vec<HitEvent>,
    /// Set on the single tick where the match ended
    pub finished_this_tick: bool,
}

impl FrameOutput {
    pub fn hp(&self, slot: PlayerSlot) -> u32 {
        match slot {
            PlayerSlot::Left => self.hp_left,
            PlayerSlot::Right => self.hp_right,
        }
    }
}

/// Map `hp` onto a health bar sprite index.
///
/// Rounds up, so the bar only shows empty once hp is actually 0 and steps down on
/// the first point of damage.
pub fn health_bucket(hp: u32, max_hp: u32) -> u8 {
    if max_hp == 0 {
        return 0;
    }
    let ratio = (hp as f64 / max_hp as f64).clamp(0.0, 1.0);
    (ratio * HEALTH_BUCKETS as f64).ceil() as u8
}
