// Simulation configuration
//
// All the knobs of the genetic algorithm live in one serde-friendly struct.
// The defaults reproduce the classic flies setup (600x600, 500 flies); a JSON
// file can override any subset of them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Largest per-axis speed a gene can hold
///
/// Genes store displacements as `i8`, so a fly can never move more than 127
/// units along an axis in one tick. Keeping genes small keeps large
/// populations cheap.
pub const MAX_SPEED: i32 = i8::MAX as i32;

/// Integer point in simulation space
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

/// Errors found while validating a configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("population_size must be at least 1")]
    EmptyPopulation,

    #[error("max_moves must be at least 1")]
    NoMoves,

    #[error("speed {0} must be between 1 and {}", MAX_SPEED)]
    SpeedOutOfRange(i32),

    #[error("mutation_rate {0} must be a percentage between 0 and 100")]
    MutationRateOutOfRange(u8),

    #[error("bounds {width}x{height} must both be positive")]
    EmptyBounds { width: i32, height: i32 },

    #[error("start {0:?} lies outside the simulation bounds")]
    StartOutOfBounds(Point),

    #[error("goal {index} at {point:?} lies outside the simulation bounds")]
    GoalOutOfBounds { index: usize, point: Point },

    #[error("goal_radius {0} must not be negative")]
    NegativeGoalRadius(i32),
}

/// Errors from loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Parameters of one simulation
///
/// **Rust Concept: `#[serde(default)]`**
/// With the container-level `default` attribute, any field missing from a
/// JSON file is taken from `SimulationConfig::default()`. A file containing
/// only `{"speed": 3}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of flies alive in each generation
    pub population_size: usize,

    /// Genome capacity, which is also the lifetime of a fly in ticks
    pub max_moves: usize,

    /// Per-axis bound on a single gene: genes lie in `[-speed, speed]`
    pub speed: i32,

    /// Chance, in percent, of re-rolling an inherited gene each tick
    ///
    /// The mutation draw is a uniform integer in `0..=100` compared with
    /// `<=`, so a rate of 0 still mutates with probability 1/101.
    pub mutation_rate: u8,

    /// Simulation bounds; positions are clamped into `[0, width]`
    pub width: i32,
    pub height: i32,

    /// Where every fly begins its life
    pub start: Point,

    /// Goal markers, touched strictly in this order
    pub goals: Vec<Point>,

    /// How close a fly must get to a goal to count as touching it
    pub goal_radius: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let width = 600;
        let height = 600;
        Self {
            population_size: 500,
            max_moves: 90,
            speed: 7,
            mutation_rate: 5,
            width,
            height,
            start: Point::new(width / 2, height * 3 / 4),
            goals: vec![Point::new(width / 2, height / 6)],
            goal_radius: 8,
        }
    }
}

impl SimulationConfig {
    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against the contract the simulation relies on
    ///
    /// An invalid configuration is a programming error on the caller's side;
    /// we refuse it up front instead of clamping or reordering anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.max_moves == 0 {
            return Err(ConfigError::NoMoves);
        }
        if !(1..=MAX_SPEED).contains(&self.speed) {
            return Err(ConfigError::SpeedOutOfRange(self.speed));
        }
        if self.mutation_rate > 100 {
            return Err(ConfigError::MutationRateOutOfRange(self.mutation_rate));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::EmptyBounds {
                width: self.width,
                height: self.height,
            });
        }
        if !self.contains(self.start) {
            return Err(ConfigError::StartOutOfBounds(self.start));
        }
        if let Some((index, &point)) = self
            .goals
            .iter()
            .enumerate()
            .find(|(_, goal)| !self.contains(**goal))
        {
            return Err(ConfigError::GoalOutOfBounds { index, point });
        }
        if self.goal_radius < 0 {
            return Err(ConfigError::NegativeGoalRadius(self.goal_radius));
        }
        Ok(())
    }

    /// Whether a point lies inside `[0, width] x [0, height]`
    pub fn contains(&self, point: Point) -> bool {
        (0..=self.width).contains(&point.x) && (0..=self.height).contains(&point.y)
    }

    /// Length of the bounds' diagonal, the largest possible distance
    pub fn diagonal(&self) -> f64 {
        Point::new(0, 0).distance(Point::new(self.width, self.height))
    }
}
