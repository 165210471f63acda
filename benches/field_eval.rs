//! Benchmarks for CPU-side field evaluation and overlay assembly.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec2;
use rand::Rng;

use fluxfield::coords::CANVAS_SIZE;
use fluxfield::field;
use fluxfield::overlay;
use fluxfield::raster::FieldRaster;
use fluxfield::scene::{EntityKind, Scene, KIND_CAPACITY};

fn scatter(scene: &mut Scene, kind: EntityKind, count: usize) {
    let mut rng = rand::thread_rng();
    for _ in 0..count {
        let pos = Vec2::new(
            rng.gen_range(0.0..CANVAS_SIZE),
            rng.gen_range(0.0..CANVAS_SIZE),
        );
        scene.insert(kind, pos).unwrap();
    }
}

fn bench_field_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_at");

    for per_kind in [1usize, 4, 16] {
        let mut scene = Scene::new();
        scatter(&mut scene, EntityKind::Proton, per_kind);
        scatter(&mut scene, EntityKind::Electron, per_kind);

        group.bench_with_input(
            BenchmarkId::new("charges", per_kind * 2),
            &scene,
            |b, scene| {
                let probe = Vec2::new(123.0, 456.0);
                b.iter(|| {
                    black_box(field::field_at(
                        black_box(probe),
                        scene.protons(),
                        scene.electrons(),
                    ))
                })
            },
        );
    }

    group.finish();
}

fn bench_raster_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster_render");
    // 250k samples per iteration; keep the sample count modest.
    group.sample_size(10);

    for per_kind in [1usize, 8, 16] {
        let mut scene = Scene::new();
        scatter(&mut scene, EntityKind::Proton, per_kind);
        scatter(&mut scene, EntityKind::Electron, per_kind);

        group.bench_with_input(
            BenchmarkId::new("charges", per_kind * 2),
            &scene,
            |b, scene| b.iter(|| black_box(FieldRaster::render(scene, 2000.0))),
        );
    }

    group.finish();
}

fn bench_overlay_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay_build");

    let mut scene = Scene::new();
    scatter(&mut scene, EntityKind::Proton, 8);
    scatter(&mut scene, EntityKind::Electron, 8);
    scatter(&mut scene, EntityKind::Sensor, KIND_CAPACITY);

    group.bench_function("full_sensor_store", |b| {
        b.iter(|| black_box(overlay::build(&scene)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_field_at,
    bench_raster_render,
    bench_overlay_build,
);
criterion_main!(benches);
