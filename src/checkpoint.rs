// Saving and resuming a run
//
// A checkpoint only needs the configuration, the generation number and the
// parent of the current generation: every fly of a generation is a fresh
// copy of that parent, so the whole population can be rebuilt from it.

use crate::config::{ConfigError, SimulationConfig};
use crate::fly::Fly;
use crate::population::Population;
use crate::random::RandomSource;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("failed to access checkpoint file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed checkpoint: {0}")]
    Json(#[from] serde_json::Error),

    #[error("checkpoint configuration is invalid: {0}")]
    Config(#[from] ConfigError),

    #[error("parent genome holds {actual} moves but the configuration expects {expected}")]
    GenomeMismatch { expected: usize, actual: usize },

    #[error("parent has {fixed} fixed moves but its genome only holds {capacity}")]
    FixedPrefixTooLong { fixed: usize, capacity: usize },

    #[error("parent has {moves_remaining} moves left but its genome only holds {capacity}")]
    MovesOutOfRange { moves_remaining: usize, capacity: usize },

    #[error("parent gene {index} ({dx}, {dy}) is faster than speed {speed}")]
    GeneOutOfRange { index: usize, dx: i8, dy: i8, speed: i32 },

    #[error("generation number must start at 1")]
    ZeroGeneration,
}

/// Everything needed to rebuild a population
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub generation: u64,
    pub config: SimulationConfig,
    /// Parent of the saved generation; `None` for a founder generation
    pub parent: Option<Fly>,
}

impl Checkpoint {
    /// Write the checkpoint as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CheckpointError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a checkpoint written by `save`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

// Checkpointing methods for Population
//
// **Rust Concept: Multiple impl blocks**
// The core type lives in population.rs; persistence is bolted on here so the
// simulation itself never touches the filesystem.
impl<R: RandomSource> Population<R> {
    /// Capture the current generation
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            generation: self.generation(),
            config: self.config().clone(),
            parent: self.parent().cloned(),
        }
    }

    /// Rebuild the generation a checkpoint describes
    ///
    /// The flies start fresh from the saved parent, so resuming replays the
    /// generation from its first tick.
    pub fn from_checkpoint(checkpoint: Checkpoint, rng: R) -> Result<Self, CheckpointError> {
        if checkpoint.generation == 0 {
            return Err(CheckpointError::ZeroGeneration);
        }

        checkpoint.config.validate()?;
        if let Some(parent) = &checkpoint.parent {
            check_parent(parent, &checkpoint.config)?;
        }

        let population = Population::with_parent(
            checkpoint.config,
            rng,
            checkpoint.generation,
            checkpoint.parent,
        )?;
        Ok(population)
    }
}

/// A saved parent must look like one `Fly::step` could have produced
/// under `config`, or its children would replay moves no fly can make
fn check_parent(parent: &Fly, config: &SimulationConfig) -> Result<(), CheckpointError> {
    let capacity = parent.genome().capacity();
    if capacity != config.max_moves {
        return Err(CheckpointError::GenomeMismatch {
            expected: config.max_moves,
            actual: capacity,
        });
    }

    if parent.genome_length_used() > capacity {
        return Err(CheckpointError::FixedPrefixTooLong {
            fixed: parent.genome_length_used(),
            capacity,
        });
    }

    if parent.moves_remaining() > capacity {
        return Err(CheckpointError::MovesOutOfRange {
            moves_remaining: parent.moves_remaining(),
            capacity,
        });
    }

    // Slots past the fixed prefix are never read before being redrawn,
    // but a well-formed genome keeps them zeroed, so check them all
    let speed = config.speed;
    let too_fast = |step: i8| i32::from(step).abs() > speed;
    if let Some((index, gene)) = parent
        .genome()
        .genes()
        .iter()
        .enumerate()
        .find(|(_, gene)| too_fast(gene.dx) || too_fast(gene.dy))
    {
        return Err(CheckpointError::GeneOutOfRange {
            index,
            dx: gene.dx,
            dy: gene.dy,
            speed,
        });
    }

    Ok(())
}
