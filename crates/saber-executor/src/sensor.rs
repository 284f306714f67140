use std::future::Future;

use anyhow::Result;
use saber_core::{MatchInstant, SensorFrame};

/// The external landmark detector.
///
/// Each call runs detection on the current video frame. The executor awaits the
/// returned future to completion before it touches any match state, and never has
/// two calls in flight.
pub trait LandmarkSource {
    /// Detect landmarks for the frame at `now`.
    ///
    /// `Ok(None)` means the source has no more frames and the session should end. An
    /// error only costs the current tick.
    fn detect(
        &mut self,
        now: MatchInstant,
    ) -> impl Future<Output = Result<Option<SensorFrame>>> + Send;
}
