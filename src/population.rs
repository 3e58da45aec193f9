// Import the pieces a generation is built from
use crate::config::{ConfigError, Point, SimulationConfig};
use crate::fitness::{evaluate_parallel, select_fittest};
use crate::fly::{Fly, FlyView};
use crate::random::RandomSource;

use log::debug;
use serde::{Deserialize, Serialize};

/// Where a population is in its generation cycle
///
/// `Populating -> Ticking -> (all dead) -> Selecting -> Populating`
///
/// There is no terminal state: the cycle repeats for as long as the driver
/// keeps calling `tick`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationPhase {
    /// A fresh generation has been created and not ticked yet
    Populating,
    /// Flies are being stepped
    Ticking,
    /// The generation is dead and its parent is being chosen
    Selecting,
}

/// What happened during one tick
#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// At least one fly is still alive
    Continued,
    /// Every fly died, the population was rebuilt; carries the summary of
    /// the generation that just ended
    NewGeneration(GenerationSummary),
}

/// Statistics of a finished generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Number of the generation that ended
    pub generation: u64,
    /// Index of the fly chosen as parent; `None` for the founder generation
    pub parent_index: Option<usize>,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub best_goals_reached: usize,
    /// Final position and status of every fly, in index order
    pub final_flies: Vec<FlyView>,
}

/// The generation manager
///
/// Owns every fly of the current generation, the configuration and the
/// random source. Nothing about the simulation lives in global state: the
/// driver constructs one `Population` and drives it with `tick`.
///
/// **Rust Concept: Generic over a trait**
/// `R: RandomSource` lets the same manager run with a seeded generator in
/// the binary and with a scripted one in tests.
pub struct Population<R: RandomSource> {
    flies: Vec<Fly>,
    generation: u64,
    phase: GenerationPhase,
    config: SimulationConfig,
    rng: R,
    /// Parent of the current generation, `None` while it is made of founders
    parent: Option<Fly>,
}

impl<R: RandomSource> Population<R> {
    /// Create generation 1: `population_size` founder flies
    ///
    /// # Errors
    /// Returns the validation error if the configuration is malformed (empty
    /// population, inverted or empty bounds, ...). A population is never
    /// built from an invalid configuration.
    pub fn new(config: SimulationConfig, rng: R) -> Result<Self, ConfigError> {
        Self::with_parent(config, rng, 1, None)
    }

    /// Build a population of children of `parent` (founders if `None`)
    pub(crate) fn with_parent(
        config: SimulationConfig,
        rng: R,
        generation: u64,
        parent: Option<Fly>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let flies = Self::populate(&config, parent.as_ref());

        Ok(Self {
            flies,
            generation,
            phase: GenerationPhase::Populating,
            config,
            rng,
            parent,
        })
    }

    /// `population_size` flies, each an independent copy of `parent`
    fn populate(config: &SimulationConfig, parent: Option<&Fly>) -> Vec<Fly> {
        (0..config.population_size)
            .map(|_| Fly::create(parent, config))
            .collect()
    }

    /// Advance the simulation by one tick
    ///
    /// Every fly is stepped in index order against the shared random source,
    /// which keeps runs reproducible for a given seed. If no fly is alive
    /// afterwards, the generation is replaced before returning.
    pub fn tick(&mut self) -> TickOutcome {
        self.phase = GenerationPhase::Ticking;

        // **Rust Concept: Disjoint field borrows**
        // `self.flies` is borrowed mutably while `self.config` and
        // `self.rng` are borrowed separately; the compiler allows it because
        // they are different fields
        for fly in &mut self.flies {
            fly.step(&self.config, &mut self.rng);
        }

        let generation_dead = self.flies.iter().all(|fly| !fly.is_alive());
        if generation_dead {
            TickOutcome::NewGeneration(self.advance_generation())
        } else {
            TickOutcome::Continued
        }
    }

    /// Replace the current generation with the next one
    ///
    /// - Generation 1 is all founders, so no selection is made and the next
    ///   generation is founders again.
    /// - Otherwise the fly with the strictly greatest fitness (lowest index
    ///   on ties) becomes the single parent of every fly in the next
    ///   generation.
    ///
    /// The old flies are dropped in bulk; none of them is carried over.
    pub fn advance_generation(&mut self) -> GenerationSummary {
        self.phase = GenerationPhase::Selecting;

        let fitness = evaluate_parallel(&self.flies, &self.config);
        let best_index = select_fittest(&fitness).unwrap_or(0);

        let parent_index = (self.generation > 1).then_some(best_index);
        let summary = GenerationSummary {
            generation: self.generation,
            parent_index,
            best_fitness: fitness[best_index],
            mean_fitness: fitness.iter().sum::<f64>() / fitness.len() as f64,
            best_goals_reached: self
                .flies
                .iter()
                .map(Fly::goals_reached)
                .max()
                .unwrap_or(0),
            final_flies: self.snapshot(),
        };

        let parent = parent_index.map(|index| self.flies[index].clone());
        self.flies = Self::populate(&self.config, parent.as_ref());
        self.parent = parent;
        self.generation += 1;
        self.phase = GenerationPhase::Populating;

        debug!(
            "generation {} ended (best fitness {:.2}, parent {:?}); starting generation {}",
            summary.generation, summary.best_fitness, summary.parent_index, self.generation
        );

        summary
    }

    /// Position and status of every fly, in index order
    pub fn snapshot(&self) -> Vec<FlyView> {
        self.flies.iter().map(Fly::view).collect()
    }

    /// Goal markers, in the order they must be touched
    pub fn goals(&self) -> &[Point] {
        &self.config.goals
    }

    /// Current generation number (starts at 1)
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    pub fn flies(&self) -> &[Fly] {
        &self.flies
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Parent of the current generation, if it was selected from a previous one
    pub fn parent(&self) -> Option<&Fly> {
        self.parent.as_ref()
    }

    pub fn alive_count(&self) -> usize {
        self.flies.iter().filter(|fly| fly.is_alive()).count()
    }

    /// Give the random source back, e.g. to check how much of a script was used
    pub fn into_rng(self) -> R {
        self.rng
    }

    #[cfg(test)]
    pub(crate) fn from_flies(config: SimulationConfig, rng: R, generation: u64, flies: Vec<Fly>) -> Self {
        Self {
            flies,
            generation,
            phase: GenerationPhase::Ticking,
            config,
            rng,
            parent: None,
        }
    }
}

// Tests for Population
#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, SeededRandom};

    fn tiny_config(population_size: usize) -> SimulationConfig {
        SimulationConfig {
            population_size,
            max_moves: 3,
            speed: 5,
            mutation_rate: 0,
            width: 100,
            height: 100,
            start: Point::new(50, 50),
            goals: vec![Point::new(50, 0)],
            goal_radius: 1,
        }
    }

    /// A founder walked through `moves` with a scripted source
    fn walked(config: &SimulationConfig, moves: &[(i32, i32)]) -> Fly {
        let script = moves.iter().flat_map(|&(dx, dy)| [dx, dy]);
        let mut rng = ScriptedRandom::new(script);
        let mut fly = Fly::create(None, config);
        for _ in moves {
            fly.step(config, &mut rng);
        }
        fly
    }

    #[test]
    fn test_population_creation() {
        let config = SimulationConfig::default();
        let pop = Population::new(config.clone(), SeededRandom::new(1)).unwrap();

        assert_eq!(pop.flies().len(), 500);
        assert_eq!(pop.generation(), 1);
        assert_eq!(pop.phase(), GenerationPhase::Populating);
        assert!(pop.parent().is_none());
        assert_eq!(pop.alive_count(), 500);
        assert!(pop.snapshot().iter().all(|v| v.alive && v.x == 300 && v.y == 450));
        assert_eq!(pop.goals(), config.goals.as_slice());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SimulationConfig { population_size: 0, ..SimulationConfig::default() };
        let result = Population::new(config, SeededRandom::new(1));
        assert!(matches!(result, Err(ConfigError::EmptyPopulation)));
    }

    #[test]
    fn test_generation_ends_one_tick_after_moves_run_out() {
        let mut pop = Population::new(tiny_config(4), SeededRandom::new(5)).unwrap();

        for _ in 0..3 {
            assert_eq!(pop.tick(), TickOutcome::Continued);
            assert_eq!(pop.phase(), GenerationPhase::Ticking);
        }
        // Moves are exhausted but the flies only die on the next step
        assert_eq!(pop.alive_count(), 4);

        match pop.tick() {
            TickOutcome::NewGeneration(summary) => {
                assert_eq!(summary.generation, 1);
                assert_eq!(summary.parent_index, None);
                assert_eq!(summary.final_flies.len(), 4);
                assert!(summary.final_flies.iter().all(|v| !v.alive));
            }
            TickOutcome::Continued => panic!("generation should have ended"),
        }
        assert_eq!(pop.generation(), 2);
        assert_eq!(pop.phase(), GenerationPhase::Populating);
        assert_eq!(pop.alive_count(), 4);
    }

    #[test]
    fn test_founder_generation_skips_selection() {
        let config = tiny_config(6);
        let mut pop = Population::new(config.clone(), SeededRandom::new(8)).unwrap();
        for _ in 0..3 {
            pop.tick();
        }

        let summary = pop.advance_generation();

        assert_eq!(summary.parent_index, None);
        assert_eq!(pop.generation(), 2);
        assert_eq!(pop.flies().len(), config.population_size);
        assert!(pop.parent().is_none());
        for fly in pop.flies() {
            assert_eq!(fly.genome_length_used(), 0);
            assert_eq!(fly.position(), config.start);
        }
    }

    #[test]
    fn test_selection_picks_first_maximal_fly() {
        let config = tiny_config(3);
        // Fitness is minus the distance to (50, 0):
        // index 0 ends at y=45, indices 1 and 2 both end at y=40
        let flies = vec![
            walked(&config, &[(0, -5)]),
            walked(&config, &[(0, -5), (0, -5)]),
            walked(&config, &[(0, -5), (0, -5)]),
        ];
        let mut pop = Population::from_flies(config.clone(), SeededRandom::new(1), 2, flies);

        let summary = pop.advance_generation();

        assert_eq!(summary.parent_index, Some(1));
        assert_eq!(summary.best_fitness, -40.0);
        assert_eq!(pop.generation(), 3);

        let parent = pop.parent().unwrap();
        assert_eq!(parent.genome_length_used(), 2);
        for child in pop.flies() {
            assert_eq!(child.genome(), parent.genome());
            assert_eq!(child.genome_length_used(), 2);
            assert_eq!(child.position(), config.start);
            assert!(child.is_alive());
        }
    }

    #[test]
    fn test_children_diverge_independently() {
        // Certain mutation: every inherited slot is re-rolled each tick
        let config = SimulationConfig {
            mutation_rate: 100,
            max_moves: 20,
            ..tiny_config(8)
        };
        let parent = walked(&config, &[(1, 1); 20]);
        let mut pop = Population::with_parent(config, SeededRandom::new(21), 2, Some(parent))
            .unwrap();

        for _ in 0..20 {
            pop.tick();
        }

        let distinct: std::collections::HashSet<_> =
            pop.flies().iter().map(|f| f.genome().fixed_genes().to_vec()).collect();
        assert!(distinct.len() > 1, "children should not share one mutated genome");
        assert!(pop.flies().iter().all(|f| f.genome_length_used() == 20));
    }

    #[test]
    fn test_bounds_hold_for_every_tick() {
        let config = SimulationConfig {
            population_size: 50,
            max_moves: 30,
            speed: 40,
            start: Point::new(5, 95),
            ..tiny_config(50)
        };
        let mut pop = Population::new(config.clone(), SeededRandom::new(77)).unwrap();

        for _ in 0..200 {
            pop.tick();
            for view in pop.snapshot() {
                assert!((0..=config.width).contains(&view.x));
                assert!((0..=config.height).contains(&view.y));
            }
        }
        assert!(pop.generation() > 1);
    }

    #[test]
    fn test_same_seed_same_trajectories() {
        let config = SimulationConfig { population_size: 40, ..SimulationConfig::default() };
        let mut a = Population::new(config.clone(), SeededRandom::new(2024)).unwrap();
        let mut b = Population::new(config, SeededRandom::new(2024)).unwrap();

        for _ in 0..400 {
            assert_eq!(a.tick(), b.tick());
            assert_eq!(a.snapshot(), b.snapshot());
        }
        assert_eq!(a.generation(), b.generation());
        assert_eq!(a.flies(), b.flies());
    }
}
