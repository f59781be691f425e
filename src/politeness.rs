use rand::Rng;
use std::time::Duration;

/// Lower bound of the randomized delay, as a fraction of the base delay
pub const JITTER_MIN: f64 = 0.5;
/// Upper bound of the randomized delay, as a fraction of the base delay
pub const JITTER_MAX: f64 = 1.5;

/// Delay policy applied before every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Politeness {
    base: Duration,
    randomize: bool,
}

impl Politeness {
    pub fn new(base: Duration, randomize: bool) -> Self {
        Self { base, randomize }
    }

    /// Build from a delay in seconds; invalid values collapse to no delay
    pub fn from_secs_f64(secs: f64, randomize: bool) -> Self {
        let base = Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO);
        Self::new(base, randomize)
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    /// Delay to wait before the next request
    pub fn next_delay<R: Rng>(&self, rng: &mut R) -> Duration {
        if self.base.is_zero() || !self.randomize {
            return self.base;
        }
        let factor = rng.gen_range(JITTER_MIN..=JITTER_MAX);
        self.base.mul_f64(factor)
    }
}
