use std::time::Duration;

use saber_core::MatchInstant;

/// Throttles ticks to a target frame rate.
///
/// A tick is admitted only once a full frame budget has passed since the last admitted
/// one. The first request is always admitted.
#[derive(Debug, Clone)]
pub struct FrameGate {
    budget: Duration,
    last: Option<MatchInstant>,
}

impl FrameGate {
    pub fn new(budget: Duration) -> Self {
        Self { budget, last: None }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Whether a tick may run at `now`. Admitting records `now` as the last tick.
    pub fn admit(&mut self, now: MatchInstant) -> bool {
        let admitted = self
            .last
            .map_or(true, |last| now.has_elapsed(&last, self.budget));
        if admitted {
            self.last = Some(now);
        }
        admitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_throttles() {
        let mut gate = FrameGate::new(Duration::from_millis(33));
        assert!(gate.admit(MatchInstant::from_millis(500.0)));
        assert!(!gate.admit(MatchInstant::from_millis(510.0)));
        assert!(!gate.admit(MatchInstant::from_millis(532.0)));
        assert!(gate.admit(MatchInstant::from_millis(540.0)));
        // Rejected requests do not move the window
        assert!(!gate.admit(MatchInstant::from_millis(560.0)));
        assert!(gate.admit(MatchInstant::from_millis(580.0)));
    }

    #[test]
    fn test_gate_admits_exactly_one_budget_later() {
        let mut gate = FrameGate::new(Duration::from_millis(250));
        assert!(gate.admit(MatchInstant::from_millis(100.0)));
        assert!(gate.admit(MatchInstant::from_millis(350.0)));

        // 30 fps budget on the executor clock
        let mut gate = FrameGate::new(Duration::from_nanos(33_333_333));
        assert!(gate.admit(MatchInstant::from_elapsed(Duration::from_nanos(100_000_001))));
        assert!(!gate.admit(MatchInstant::from_elapsed(Duration::from_nanos(133_333_333))));
        assert!(gate.admit(MatchInstant::from_elapsed(Duration::from_nanos(133_333_334))));
    }
}
