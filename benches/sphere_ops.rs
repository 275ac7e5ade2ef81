//! Benchmarks for the spherical mapping kernels.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spheremap::algo::spherical::{harmonic_map, HarmonicOptions};
use spheremap::mesh::primitives;
use spheremap::prelude::*;

fn projected_icosphere(levels: usize) -> SphereContext {
    let mesh = primitives::icosphere(levels).unwrap();
    let mut ctx = SphereContext::new(mesh).unwrap();
    ctx.project_to_unit_sphere().unwrap();
    ctx
}

fn bench_setup(c: &mut Criterion) {
    let mesh = primitives::icosphere(3).unwrap();

    c.bench_function("context_new_icosphere3", |b| {
        b.iter(|| SphereContext::new(black_box(mesh.clone())).unwrap());
    });
}

fn bench_energy(c: &mut Criterion) {
    let ctx = projected_icosphere(3);

    c.bench_function("energy_uniform_icosphere3", |b| {
        b.iter(|| ctx.energy(black_box(EnergyMode::Uniform)));
    });

    c.bench_function("energy_cotangent_icosphere3", |b| {
        b.iter(|| ctx.energy(black_box(EnergyMode::Cotangent)));
    });
}

fn bench_gradients(c: &mut Criterion) {
    let mut ctx = projected_icosphere(3);

    c.bench_function("gradients_cotangent_icosphere3", |b| {
        b.iter(|| ctx.compute_gradients(black_box(EnergyMode::Cotangent)));
    });
}

fn bench_harmonic(c: &mut Criterion) {
    let options = HarmonicOptions::default().with_max_iterations(10);

    c.bench_function("harmonic_10_iterations_icosphere2", |b| {
        b.iter_batched(
            || projected_icosphere(2),
            |mut ctx| harmonic_map(&mut ctx, &options, &Progress::none()).unwrap(),
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_setup, bench_energy, bench_gradients, bench_harmonic);
criterion_main!(benches);
