// Configuration supplies the goals and the bounds used for weighting
use crate::config::SimulationConfig;
use crate::fly::Fly;

// Rayon provides parallel iterators for free performance!
// Fitness is a pure function of one fly, so every fly can be scored at once
use rayon::prelude::*;

/// Bonus awarded per goal reached
///
/// One diagonal plus one: no distance inside the bounds can make up for a
/// missing goal, so more goals always wins.
pub fn goal_bonus(config: &SimulationConfig) -> f64 {
    config.diagonal() + 1.0
}

/// Score a fly (higher is better)
///
/// `goals_reached * goal_bonus - distance to the active goal`
///
/// The distance term keeps flies that reached the same number of goals
/// orderable by how close they ended up. With no goals configured every fly
/// scores 0.0, and selection falls back to the first fly.
pub fn fly_fitness(fly: &Fly, config: &SimulationConfig) -> f64 {
    let Some(goal) = fly.active_goal(config) else {
        return 0.0;
    };

    fly.goals_reached() as f64 * goal_bonus(config) - fly.position().distance(goal)
}

// Fitness as a query on the fly itself
//
// **Rust Concept: Multiple impl blocks**
// `Fly` is defined in fly.rs, but we can add methods to it here. Keeping the
// scoring next to the selection code makes the weighting easy to tune.
impl Fly {
    pub fn fitness(&self, config: &SimulationConfig) -> f64 {
        fly_fitness(self, config)
    }
}

/// Score every fly in parallel
///
/// `par_iter().map().collect()` keeps the output in index order, so the
/// result lines up with `flies` no matter how the work was split.
pub fn evaluate_parallel(flies: &[Fly], config: &SimulationConfig) -> Vec<f64> {
    flies.par_iter().map(|fly| fly_fitness(fly, config)).collect()
}

/// Index of the fittest entry: the FIRST strictly greatest value
///
/// Comparison uses `>`, never `>=`, so among equal maxima the lowest index
/// wins. Returns `None` for an empty slice.
///
/// **Why not `Iterator::max_by`?**
/// `max_by` returns the LAST maximal element on ties, which is exactly the
/// tie-break we don't want.
pub fn select_fittest(fitness: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (index, &score) in fitness.iter().enumerate() {
        let better = match best {
            None => true,
            Some((_, best_score)) => score > best_score,
        };
        if better {
            best = Some((index, score));
        }
    }

    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Point;
    use crate::random::ScriptedRandom;

    fn config_with_goal(goal: Point) -> SimulationConfig {
        SimulationConfig {
            population_size: 3,
            max_moves: 2,
            speed: 5,
            mutation_rate: 0,
            width: 100,
            height: 100,
            start: Point::new(50, 50),
            goals: vec![goal],
            goal_radius: 2,
        }
    }

    fn walked(config: &SimulationConfig, script: &[i32]) -> Fly {
        let mut rng = ScriptedRandom::new(script.iter().copied());
        let mut fly = Fly::create(None, config);
        for _ in 0..script.len() / 2 {
            fly.step(config, &mut rng);
        }
        fly
    }

    #[test]
    fn test_select_first_of_equal_maxima() {
        assert_eq!(select_fittest(&[5.0, 9.0, 9.0]), Some(1));
    }

    #[test]
    fn test_select_edge_cases() {
        assert_eq!(select_fittest(&[]), None);
        assert_eq!(select_fittest(&[0.0, 0.0, 0.0]), Some(0));
        assert_eq!(select_fittest(&[-3.0, -1.0, -2.0]), Some(1));
        assert_eq!(select_fittest(&[1.0, 2.0, 2.0 - f64::EPSILON]), Some(1));
    }

    #[test]
    fn test_closer_fly_scores_higher() {
        let config = config_with_goal(Point::new(50, 10));
        let closer = walked(&config, &[0, -5, 0, -5]);
        let farther = walked(&config, &[0, -5, 0, 5]);

        assert_eq!(closer.fitness(&config), -30.0);
        assert_eq!(farther.fitness(&config), -40.0);
        assert!(closer.fitness(&config) > farther.fitness(&config));
    }

    #[test]
    fn test_goal_beats_any_distance() {
        let config = config_with_goal(Point::new(55, 50));
        // Reaches the goal and then walks away from it
        let reached = walked(&config, &[5, 0, -5, 0]);
        // Never touches the goal but ends next to it
        let near_miss = walked(&config, &[2, 0, 0, 0]);

        assert_eq!(reached.goals_reached(), 1);
        assert_eq!(near_miss.goals_reached(), 0);
        assert!(reached.fitness(&config) > near_miss.fitness(&config));
        // Worst case for a goal-reacher still beats best case without one
        assert!(goal_bonus(&config) - config.diagonal() > 0.0);
    }

    #[test]
    fn test_no_goals_scores_zero() {
        let config = SimulationConfig { goals: vec![], ..config_with_goal(Point::new(0, 0)) };
        let fly = walked(&config, &[1, 1]);
        assert_eq!(fly.fitness(&config), 0.0);
    }

    #[test]
    fn test_parallel_matches_sequential_order() {
        let config = config_with_goal(Point::new(50, 10));
        let flies = vec![
            walked(&config, &[0, -5, 0, 5]),
            walked(&config, &[0, -5, 0, -5]),
            walked(&config, &[5, 5, 5, 5]),
        ];

        let scores = evaluate_parallel(&flies, &config);
        let expected: Vec<f64> = flies.iter().map(|f| f.fitness(&config)).collect();
        assert_eq!(scores, expected);
        assert_eq!(select_fittest(&scores), Some(1));
    }
}
