// Import configuration and geometry
use crate::config::{Point, SimulationConfig};
// Genetic material
use crate::genes::{Gene, Genome};
// Random draws and the fail-fast clamp
use crate::random::{clamp, RandomSource};

use log::trace;
use serde::{Deserialize, Serialize};

/// A single fly: one individual of the genetic algorithm
///
/// A fly lives for exactly `max_moves` ticks. Each tick it reads (or draws)
/// one gene from its genome and moves by that much. When its moves run out it
/// dies; when the whole generation is dead the fittest fly becomes the sole
/// parent of the next one.
///
/// **Rust Concept: Private fields with accessors**
/// Positions and counters can only change through `step`, so the lifetime
/// invariants (bounded position, counters that only go one way) hold for
/// every fly, whoever owns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fly {
    genome: Genome,
    position: Point,
    moves_remaining: usize,
    goals_reached: usize,
    alive: bool,
}

/// Read-only view of a fly for rendering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlyView {
    pub x: i32,
    pub y: i32,
    pub alive: bool,
}

impl Fly {
    /// Create a fly, optionally as the child of `parent`
    ///
    /// - Founder (`None`): zeroed genome with nothing fixed.
    /// - Child (`Some`): the parent's whole genome is copied verbatim,
    ///   including its fixed length. Nothing is mutated here; mutation
    ///   happens lazily while the child steps.
    ///
    /// Either way the fly starts at `config.start` with a full set of moves.
    pub fn create(parent: Option<&Fly>, config: &SimulationConfig) -> Self {
        // **Rust Concept: Option combinators**
        // `map_or_else` picks between "copy the parent's genome" and
        // "build a fresh one" without an explicit match
        let genome = parent.map_or_else(
            || Genome::new(config.max_moves),
            |parent| parent.genome.clone(),
        );

        Self {
            moves_remaining: genome.capacity(),
            genome,
            position: config.start,
            goals_reached: 0,
            alive: true,
        }
    }

    /// Advance this fly by one tick
    ///
    /// 1. A dead or exhausted fly is marked dead and does nothing else.
    /// 2. The slot for this tick is `capacity - moves_remaining`.
    /// 3. If that slot is not fixed yet, or the mutation roll succeeds, a
    ///    fresh gene is drawn into it. A slot that was not fixed becomes fixed.
    /// 4. The gene is applied and the position clamped into the bounds.
    /// 5. One move is used up, and the active goal is checked.
    pub fn step(&mut self, config: &SimulationConfig, rng: &mut impl RandomSource) {
        if !self.alive || self.moves_remaining == 0 {
            self.alive = false;
            return;
        }

        let next_index = self.genome.capacity() - self.moves_remaining;
        let unexplored = !self.genome.is_fixed(next_index);

        // `||` short-circuits: the mutation roll is only drawn for
        // inherited slots, an unexplored slot is always re-drawn
        if unexplored || rng.random_int(0, 100) <= i32::from(config.mutation_rate) {
            self.genome.set(next_index, Gene::random(config.speed, rng));
        }

        if unexplored {
            self.genome.fix_next();
        }

        // Saturate before clamping: bounds may sit right at `i32::MAX`
        let gene = self.genome.gene(next_index);
        self.position = Point::new(
            clamp(0, self.position.x.saturating_add(i32::from(gene.dx)), config.width),
            clamp(0, self.position.y.saturating_add(i32::from(gene.dy)), config.height),
        );
        self.moves_remaining -= 1;

        self.check_goal(config);
    }

    /// Count the active goal as reached if we are close enough to it
    fn check_goal(&mut self, config: &SimulationConfig) {
        let Some(goal) = config.goals.get(self.goals_reached) else {
            return;
        };

        if self.position.distance(*goal) <= f64::from(config.goal_radius) {
            self.goals_reached += 1;
            trace!(
                "fly reached goal {} at ({}, {}) with {} moves left",
                self.goals_reached,
                goal.x,
                goal.y,
                self.moves_remaining
            );
        }
    }

    /// The goal this fly is heading for
    ///
    /// Once every goal is reached, the last one stays active. `None` only
    /// when no goals are configured.
    pub fn active_goal(&self, config: &SimulationConfig) -> Option<Point> {
        config
            .goals
            .get(self.goals_reached)
            .or_else(|| config.goals.last())
            .copied()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn moves_remaining(&self) -> usize {
        self.moves_remaining
    }

    /// Length of the fixed genome prefix (inherited or lived this lifetime)
    pub fn genome_length_used(&self) -> usize {
        self.genome.fixed_len()
    }

    pub fn goals_reached(&self) -> usize {
        self.goals_reached
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Snapshot of what a renderer needs
    pub fn view(&self) -> FlyView {
        FlyView {
            x: self.position.x,
            y: self.position.y,
            alive: self.alive,
        }
    }
}
