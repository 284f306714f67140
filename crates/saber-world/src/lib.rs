mod adapter;
mod assignment;
mod collision;
mod filter;
mod hitbox;
mod match_state;
mod weapon;

pub use adapter::{LandmarkAdapter, PixelFrame};
pub use assignment::{assign_left_right, pick_most_extended_hand, split_hands_by_player};
pub use collision::detect_contacts;
pub use filter::Ema2;
pub use hitbox::{center_from_pose, estimate_box_size, HitboxTracker};
pub use match_state::MatchState;
pub use saber_core::{FrameOutput, MatchSettings, SensorFrame};
pub use weapon::WeaponTracker;

use saber_core::{
    health_bucket, BladeSegment, HitEvent, MatchInstant, MatchPhase, MatchStatus, PlayerSlot,
    SettingsError, SlotPair,
};

/// Owns all per-slot state of a match and advances it one sensor frame at a time.
///
/// Nothing here is global: the smoothing filters, the calibration lock, hp and
/// cooldowns all live in this struct and change only through
/// [`MatchEngine::ingest_frame`] (or [`MatchEngine::tick`]) and [`MatchEngine::reset`].
pub struct MatchEngine {
    adapter: LandmarkAdapter,
    hitbox_tracker: HitboxTracker,
    weapon_tracker: WeaponTracker,
    match_state: MatchState,
    /// Blades from the last ingested frame
    blades: SlotPair<Option<BladeSegment>>,
    status: MatchStatus,
    /// Hits registered by the last ingested frame
    hits: Vec<HitEvent>,
    finished_this_tick: bool,
    last_time: MatchInstant,
    last_frame_timestamp_ms: f64,
}

impl MatchEngine {
    /// Create an engine from validated settings. Settings that would make the match
    /// meaningless are rejected rather than clamped.
    pub fn new(settings: &MatchSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            adapter: LandmarkAdapter::new(&settings.frame),
            hitbox_tracker: HitboxTracker::new(&settings.tracker),
            weapon_tracker: WeaponTracker::new(&settings.weapon),
            match_state: MatchState::new(&settings.rules),
            blades: SlotPair::default(),
            status: MatchStatus::WaitingForPlayers,
            hits: Vec::new(),
            finished_this_tick: false,
            last_time: MatchInstant::default(),
            last_frame_timestamp_ms: 0.0,
        })
    }

    /// Run one sensor frame through assignment, smoothing, weapons, collision and the
    /// match rules.
    pub fn ingest_frame(&mut self, frame: &SensorFrame, now: MatchInstant) {
        self.hits.clear();
        self.last_time = now;
        self.last_frame_timestamp_ms = frame.timestamp_ms;

        let pixels = self.adapter.adapt(frame);
        let bodies = assign_left_right(&pixels.bodies);
        let visible = bodies.count_some();

        let locked_now = self.hitbox_tracker.update(bodies);
        if locked_now {
            self.match_state.start();
        }

        let centers = SlotPair::new(
            self.hitbox_tracker.center(PlayerSlot::Left),
            self.hitbox_tracker.center(PlayerSlot::Right),
        );
        let hands = split_hands_by_player(&pixels.hands, centers.left, centers.right);
        let weapon_tracker = &self.weapon_tracker;
        self.blades = hands.map(|slot, hands| {
            pick_most_extended_hand(&hands, *centers.get(slot))
                .and_then(|hand| weapon_tracker.blade(hand))
        });

        let was_finished = self.match_state.is_finished();
        let contacts = detect_contacts(&self.blades, &self.hitbox_tracker.hitboxes());
        for target in PlayerSlot::ALL {
            if !*contacts.get(target) {
                continue;
            }
            log::trace!("Blade contact on {}", target);
            if let Some(hit) = self.match_state.register_hit(target, now) {
                self.hits.push(hit);
            }
        }
        self.finished_this_tick = !was_finished && self.match_state.is_finished();

        let status = if locked_now {
            MatchStatus::Calibrated
        } else if !self.hitbox_tracker.is_calibrated() {
            MatchStatus::WaitingForPlayers
        } else if visible == 2 {
            MatchStatus::Tracking
        } else {
            MatchStatus::NeedsRecalibration
        };
        if status != self.status {
            log::debug!("Status changed: {:?} -> {:?}", self.status, status);
        }
        self.status = status;
    }

    /// Ingest `frame` and report the resulting state.
    pub fn tick(&mut self, frame: &SensorFrame, now: MatchInstant) -> FrameOutput {
        self.ingest_frame(frame, now);
        self.output()
    }

    /// Snapshot of the state after the last ingested frame.
    pub fn output(&self) -> FrameOutput {
        let max_hp = self.match_state.max_hp();
        FrameOutput {
            time: self.last_time,
            frame_timestamp_ms: self.last_frame_timestamp_ms,
            hitboxes: self.hitbox_tracker.hitboxes(),
            blades: self.blades,
            hp_left: self.match_state.hp(PlayerSlot::Left),
            hp_right: self.match_state.hp(PlayerSlot::Right),
            health_buckets: SlotPair::new(
                health_bucket(self.match_state.hp(PlayerSlot::Left), max_hp),
                health_bucket(self.match_state.hp(PlayerSlot::Right), max_hp),
            ),
            winner: self.match_state.winner(),
            phase: self.match_state.phase(),
            status: self.status,
            calibrated: self.hitbox_tracker.is_calibrated(),
            hits: self.hits.clone(),
            finished_this_tick: self.finished_this_tick,
        }
    }

    /// Start over: full hp, no winner, no cooldowns, no hitboxes, uncalibrated. Safe
    /// to call at any point, including repeatedly.
    pub fn reset(&mut self) {
        log::info!("Resetting match");
        self.hitbox_tracker.reset();
        self.match_state.reset();
        self.blades = SlotPair::default();
        self.hits.clear();
        self.finished_this_tick = false;
        self.status = MatchStatus::WaitingForPlayers;
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn phase(&self) -> MatchPhase {
        self.match_state.phase()
    }

    pub fn is_calibrated(&self) -> bool {
        self.hitbox_tracker.is_calibrated()
    }

    pub fn hp(&self, slot: PlayerSlot) -> u32 {
        self.match_state.hp(slot)
    }

    pub fn winner(&self) -> Option<PlayerSlot> {
        self.match_state.winner()
    }
}
