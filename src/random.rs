// Random numbers and clamping for the simulation
//
// Every random decision a fly makes goes through the `RandomSource` trait.
// The population never reaches for `rand::thread_rng()` itself: the caller
// hands it a source, so a run with a fixed seed replays bit for bit and tests
// can script the exact draws they want.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of inclusive random integers
///
/// **Rust Concept: Traits as seams**
/// `Population` is generic over this trait, so the same code runs with a
/// seeded `StdRng` in the binary and with a hand-written script in tests.
/// Generics are monomorphized, so there is no dynamic dispatch cost.
pub trait RandomSource {
    /// Uniform integer in `lower..=upper`
    ///
    /// # Panics
    /// Implementations must panic when `lower > upper`.
    fn random_int(&mut self, lower: i32, upper: i32) -> i32;
}

/// Seeded random source backed by `StdRng`
///
/// `StdRng` is reproducible for a given seed (within one `rand` version),
/// which is what the determinism guarantee needs.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: StdRng,
    seed: u64,
}

impl SeededRandom {
    /// Create a source from a 64-bit seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this source was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn random_int(&mut self, lower: i32, upper: i32) -> i32 {
        check_bounds("generate a random integer", lower, upper);
        self.rng.gen_range(lower..=upper)
    }
}

/// Clamp `n` into `lower..=upper`
///
/// # Panics
/// Panics if `lower > upper`. Swapping the bounds would hide a broken
/// configuration, so this fails fast instead.
pub fn clamp(lower: i32, n: i32, upper: i32) -> i32 {
    check_bounds("clamp a value", lower, upper);
    n.clamp(lower, upper)
}

fn check_bounds(action: &str, lower: i32, upper: i32) {
    assert!(
        lower <= upper,
        "tried to {} where lower bound {} > upper bound {}",
        action,
        lower,
        upper
    );
}

/// Random source that replays a fixed list of values
///
/// Used by tests that need to know exactly which genes a fly draws.
/// Each value is checked against the requested range so a script that
/// drifts out of sync with the code fails loudly.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    values: Vec<i32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            values: values.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Number of values not yet consumed
    pub fn remaining(&self) -> usize {
        self.values.len() - self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn random_int(&mut self, lower: i32, upper: i32) -> i32 {
        check_bounds("generate a random integer", lower, upper);
        let value = *self
            .values
            .get(self.cursor)
            .unwrap_or_else(|| panic!("scripted random source exhausted after {} draws", self.cursor));
        assert!(
            (lower..=upper).contains(&value),
            "scripted value {} is outside {}..={}",
            value,
            lower,
            upper
        );
        self.cursor += 1;
        value
    }
}
