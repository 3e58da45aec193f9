// Benchmark suite for the simulation loop
//
// Measures a full generation of ticks and the fitness evaluation that ends
// it, across a few population sizes.
//
// Run with: cargo bench --bench tick_bench

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use flies::fitness::{evaluate_parallel, fly_fitness};
use flies::{Fly, Population, SeededRandom, SimulationConfig};

/// Configuration with the reference settings and a chosen population size
fn config_with(population_size: usize) -> SimulationConfig {
    SimulationConfig {
        population_size,
        ..SimulationConfig::default()
    }
}

/// Benchmark one whole generation: `max_moves + 1` ticks including rebuild
fn benchmark_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation");

    for size in [50, 500, 5000].iter() {
        let config = config_with(*size);
        let ticks = config.max_moves + 1;

        group.bench_with_input(BenchmarkId::new("ticks", size), &config, |b, config| {
            b.iter_batched(
                || Population::new(config.clone(), SeededRandom::new(1)).unwrap(),
                |mut pop| {
                    for _ in 0..ticks {
                        black_box(pop.tick());
                    }
                    pop
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

/// Compare scalar and parallel fitness evaluation over a lived generation
fn benchmark_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness");

    for size in [500, 5000].iter() {
        let config = config_with(*size);
        let mut pop = Population::new(config.clone(), SeededRandom::new(2)).unwrap();
        for _ in 0..config.max_moves {
            pop.tick();
        }
        let flies: Vec<Fly> = pop.flies().to_vec();

        group.bench_with_input(BenchmarkId::new("scalar", size), &flies, |b, flies| {
            b.iter(|| {
                flies
                    .iter()
                    .map(|fly| fly_fitness(black_box(fly), &config))
                    .collect::<Vec<f64>>()
            })
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &flies, |b, flies| {
            b.iter(|| evaluate_parallel(black_box(flies), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_generation, benchmark_fitness);
criterion_main!(benches);
