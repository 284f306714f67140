use std::time::Duration;

use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: f64 = 1e9;

/// A point in match time since the session clock started.
///
/// Held as whole nanoseconds so cooldown and frame budget comparisons are exact.
/// Serialized as seconds. The executor derives it from the time elapsed on a
/// monotonic clock; tests and replays build it directly from seconds.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(from = "f64", into = "f64")]
pub struct MatchInstant(i64);

impl MatchInstant {
    /// Fractional input is rounded to the nearest nanosecond. Non-finite input
    /// saturates (NaN maps to zero).
    pub fn from_secs(secs: f64) -> Self {
        MatchInstant((secs * NANOS_PER_SEC).round() as i64)
    }

    pub fn from_millis(millis: f64) -> Self {
        MatchInstant((millis * 1e6).round() as i64)
    }

    pub fn from_elapsed(elapsed: Duration) -> Self {
        MatchInstant(i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX))
    }

    pub fn as_secs(&self) -> f64 {
        self.0 as f64 / NANOS_PER_SEC
    }

    /// Seconds between `earlier` and `self`. Negative if `earlier` is in the future.
    pub fn duration_since(&self, earlier: &Self) -> f64 {
        self.0.saturating_sub(earlier.0) as f64 / NANOS_PER_SEC
    }

    /// Whether at least `interval` has passed between `earlier` and `self`.
    pub fn has_elapsed(&self, earlier: &Self, interval: Duration) -> bool {
        (self.0 as i128 - earlier.0 as i128) >= interval.as_nanos() as i128
    }
}

impl From<f64> for MatchInstant {
    fn from(secs: f64) -> Self {
        MatchInstant::from_secs(secs)
    }
}

impl From<MatchInstant> for f64 {
    fn from(instant: MatchInstant) -> Self {
        instant.as_secs()
    }
}
