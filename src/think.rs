//! # Think Durations
//!
//! How long an agent thinks between meals is irrelevant to correctness; it only shapes
//! contention. A [`ThinkSource`] supplies one duration per think phase.
//!
//! - [`FixedThink`]: the same duration every time. `FixedThink(Duration::ZERO)` is the
//!   maximum-contention setting used by the liveness tests.
//! - [`RandomThink`]: uniform in an inclusive millisecond range, optionally seeded.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// Supplies the length of each think phase.
pub trait ThinkSource: Send + 'static {
    fn next_think(&mut self) -> Duration;
}

/// Always thinks for the same duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedThink(pub Duration);

impl ThinkSource for FixedThink {
    fn next_think(&mut self) -> Duration {
        self.0
    }
}

/// Thinks for a uniformly random number of milliseconds in `min..=max`.
#[derive(Debug, Clone)]
pub struct RandomThink {
    min_millis: u64,
    max_millis: u64,
    rng: StdRng,
}

impl RandomThink {
    /// Bounds are swapped if given in reverse. A `seed` makes the sequence reproducible.
    pub fn new(min_millis: u64, max_millis: u64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            min_millis: min_millis.min(max_millis),
            max_millis: min_millis.max(max_millis),
            rng,
        }
    }
}

impl ThinkSource for RandomThink {
    fn next_think(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(self.min_millis..=self.max_millis))
    }
}
