//! Benchmarks for the proximity pass and particle motion.
//!
//! Run with: `cargo bench --bench edges`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use particle_field::{find_edges, spawn_particles, Distribution, FieldConfig, Motion};

fn bench_find_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_edges");

    for count in [60u32, 120, 250, 500] {
        let config = FieldConfig::new().with_particle_count(count).with_seed(1);
        let particles = spawn_particles(&config);
        let mut edges = Vec::new();

        group.bench_with_input(BenchmarkId::from_parameter(count), &particles, |b, particles| {
            b.iter(|| {
                find_edges(black_box(particles), 12.0, &mut edges);
                black_box(edges.len())
            })
        });
    }

    group.finish();
}

fn bench_distributions(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_edges_distribution");

    for (name, distribution) in [
        ("sphere_shell", Distribution::SphereShell),
        ("cube", Distribution::Cube),
        ("helix", Distribution::Helix),
    ] {
        let config = FieldConfig::new()
            .with_distribution(distribution)
            .with_seed(1);
        let particles = spawn_particles(&config);
        let mut edges = Vec::new();

        group.bench_function(name, |b| {
            b.iter(|| {
                find_edges(black_box(&particles), 12.0, &mut edges);
                black_box(edges.len())
            })
        });
    }

    group.finish();
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    for (name, motion) in [("orbit", Motion::Orbit), ("drift", Motion::Drift)] {
        let config = FieldConfig::new().with_seed(1);
        let mut particles = spawn_particles(&config);

        group.bench_function(name, |b| {
            let mut elapsed = 0.0f32;
            b.iter(|| {
                elapsed += 1.0 / 60.0;
                for particle in &mut particles {
                    particle.advance(motion, elapsed, 4.0);
                }
                black_box(particles[0].position)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_find_edges, bench_distributions, bench_advance);
criterion_main!(benches);
