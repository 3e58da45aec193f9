// Import the injectable random source used for every draw
use crate::random::RandomSource;
// Import serialization traits - these allow saving genes inside a checkpoint
use serde::{Deserialize, Serialize};

/// One tick's worth of movement
///
/// A gene is a displacement pair `(dx, dy)` applied to a fly's position.
///
/// **Rust Concept: Small fixed-size types**
/// - `i8` holds -128..=127, more than enough for a per-tick step
/// - The whole gene is 2 bytes and `Copy`, so genomes are dense arrays
/// - `Default` gives the zero gene, used to fill genome slots up front
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gene {
    pub dx: i8,
    pub dy: i8,
}

impl Gene {
    pub const ZERO: Gene = Gene { dx: 0, dy: 0 };

    pub const fn new(dx: i8, dy: i8) -> Self {
        Self { dx, dy }
    }

    /// Draw a fresh gene, each axis uniform in `[-speed, speed]`
    ///
    /// The x displacement is drawn before the y displacement. Scripted tests
    /// rely on that order.
    ///
    /// # Panics
    /// Panics if `speed` is negative (inverted bounds) or above `i8::MAX`.
    pub fn random(speed: i32, rng: &mut impl RandomSource) -> Self {
        let dx = rng.random_int(-speed, speed);
        let dy = rng.random_int(-speed, speed);
        Self {
            dx: to_step(dx),
            dy: to_step(dy),
        }
    }
}

fn to_step(value: i32) -> i8 {
    i8::try_from(value).unwrap_or_else(|_| panic!("gene step {} does not fit in an i8", value))
}
