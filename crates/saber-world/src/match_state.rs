use std::time::Duration;

use saber_core::{
    HitEvent, MatchInstant, MatchPhase, PlayerSlot, RuleSettings, SlotPair,
};

/// Health, hit cooldowns and the winner of the current match.
///
/// Hp only goes down within a match and never leaves `[0, max_hp]`. The winner is
/// decided once and stays fixed until [`MatchState::reset`].
#[derive(Debug, Clone)]
pub struct MatchState {
    max_hp: u32,
    hit_damage: u32,
    hit_cooldown: Duration,
    phase: MatchPhase,
    hp: SlotPair<u32>,
    last_hit: SlotPair<Option<MatchInstant>>,
}

impl MatchState {
    pub fn new(rules: &RuleSettings) -> Self {
        Self {
            max_hp: rules.max_hp,
            hit_damage: rules.hit_damage,
            hit_cooldown: rules.hit_cooldown(),
            phase: MatchPhase::Idle,
            hp: SlotPair::new(rules.max_hp, rules.max_hp),
            last_hit: SlotPair::default(),
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn hp(&self, slot: PlayerSlot) -> u32 {
        *self.hp.get(slot)
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn last_hit(&self, slot: PlayerSlot) -> Option<MatchInstant> {
        *self.last_hit.get(slot)
    }

    pub fn winner(&self) -> Option<PlayerSlot> {
        match self.phase {
            MatchPhase::Finished(winner) => Some(winner),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, MatchPhase::Finished(_))
    }

    /// Hitbox sizes locked: the match is on.
    pub fn start(&mut self) {
        if self.phase == MatchPhase::Idle {
            log::info!("Match started");
            self.phase = MatchPhase::InProgress;
        }
    }

    fn cooling_down(&self, target: PlayerSlot, now: MatchInstant) -> bool {
        self.last_hit
            .get(target)
            .map_or(false, |last| !now.has_elapsed(&last, self.hit_cooldown))
    }

    /// Apply a blade contact on `target`.
    ///
    /// Registers a hit only while the match is in progress, the target still has hp,
    /// and the target's cooldown has run out. Returns the hit if it registered.
    pub fn register_hit(&mut self, target: PlayerSlot, now: MatchInstant) -> Option<HitEvent> {
        if self.phase != MatchPhase::InProgress {
            return None;
        }
        if self.hp(target) == 0 || self.cooling_down(target, now) {
            return None;
        }

        let hp = self.hp.get_mut(target);
        *hp = hp.saturating_sub(self.hit_damage);
        let hp_after = *hp;
        *self.last_hit.get_mut(target) = Some(now);

        let attacker = target.opponent();
        log::info!(
            "{} hit {} at {:.3}s, hp {}",
            attacker,
            target,
            now.as_secs(),
            hp_after
        );

        if hp_after == 0 && !self.is_finished() {
            self.phase = MatchPhase::Finished(attacker);
            log::info!("Match finished, {} wins", attacker);
        }

        Some(HitEvent {
            target,
            attacker,
            hp_after,
            at: now,
        })
    }

    /// Full health, no winner, no cooldowns, back to `Idle`.
    pub fn reset(&mut self) {
        self.phase = MatchPhase::Idle;
        self.hp = SlotPair::new(self.max_hp, self.max_hp);
        self.last_hit = SlotPair::default();
    }
}
