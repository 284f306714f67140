use saber_core::Vector2;

/// Single-pole exponential moving average over 2D points.
///
/// The first observation seeds the filter exactly. After that each update moves the
/// state a fraction `alpha` of the way toward the observation.
#[derive(Debug, Clone)]
pub struct Ema2 {
    alpha: f64,
    value: Option<Vector2>,
}

impl Ema2 {
    /// Creates a new unseeded filter.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in `(0, 1]`. Settings are validated before a filter
    /// is ever built from them.
    pub fn new(alpha: f64) -> Self {
        assert!(
            alpha > 0.0 && alpha <= 1.0,
            "Alpha must be in (0, 1], got {}",
            alpha
        );
        Ema2 { alpha, value: None }
    }

    /// Feed an observation and return the smoothed value.
    pub fn update(&mut self, observation: Vector2) -> Vector2 {
        let next = match self.value {
            Some(prev) => prev + (observation - prev) * self.alpha,
            None => observation,
        };
        self.value = Some(next);
        next
    }

    /// The current smoothed value, `None` until the first observation.
    pub fn get(&self) -> Option<Vector2> {
        self.value
    }

    pub fn is_seeded(&self) -> bool {
        self.value.is_some()
    }

    /// Forget the state. The next observation seeds the filter again.
    pub fn reset(&mut self) {
        self.value = None;
    }
}
