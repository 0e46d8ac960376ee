//! Performance benchmarks for leafcutter

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use leafcutter::{Environment, SimulationConfig};

fn benchmark_environment_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("environment_step");

    for (grid_size, ants) in [(20usize, 30usize), (50, 100), (100, 300)] {
        let mut config = SimulationConfig::default();
        config.grid_size = grid_size;
        config.initial_ants = ants;
        config.simulation_steps = 10_000;

        let mut env = Environment::with_seed(config, 42);

        // Warm up
        for _ in 0..10 {
            env.step();
        }

        group.bench_with_input(
            BenchmarkId::new("grid", grid_size),
            &grid_size,
            |b, _| {
                b.iter(|| {
                    env.step();
                });
            },
        );
    }

    group.finish();
}

fn benchmark_render_grid(c: &mut Criterion) {
    let mut config = SimulationConfig::default();
    config.grid_size = 100;
    config.initial_ants = 200;
    let env = Environment::with_seed(config, 42);

    c.bench_function("render_grid_100", |b| {
        b.iter(|| env.render_grid());
    });
}

criterion_group!(benches, benchmark_environment_step, benchmark_render_grid);
criterion_main!(benches);
