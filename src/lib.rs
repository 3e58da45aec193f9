// Library root for the flies genetic algorithm
//
// This file is the entry point for the library crate (flies)
// It declares all the modules that make up our library
//
// A population of flies starts at the same point and tries to reach a goal.
// Each fly follows a genome of per-tick moves; when every fly has run out of
// moves, the fittest becomes the only parent of the next generation.

// Building blocks: configuration, randomness, genetic material
pub mod config;
pub mod random;
pub mod genes;

// The individual and how it is scored
pub mod fly;
pub mod fitness;

// The generation manager and persistence
pub mod population;
pub mod checkpoint;

// Drawing frames for the driver
pub mod render;

// Re-export commonly used types at the library root for convenience
// This allows users to write:
//   use flies::Population;
// instead of:
//   use flies::population::Population;
pub use checkpoint::{Checkpoint, CheckpointError};
pub use config::{ConfigError, ConfigLoadError, Point, SimulationConfig};
pub use fly::{Fly, FlyView};
pub use genes::{Gene, Genome};
pub use population::{GenerationPhase, GenerationSummary, Population, TickOutcome};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use render::{render_frame, RenderStyle};
