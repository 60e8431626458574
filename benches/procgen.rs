//! Benchmarks for the two per-frame-relevant hot paths: map generation
//! (once per level) and collision prediction (twice per mover per tick).

use bevy::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::collections::HashMap;

use streetrunner::collision::{Body, Collider, CollisionMap};
use streetrunner::procgen::WaveGrid;

fn wave_generation(c: &mut Criterion) {
    c.bench_function("wave_grid_generate_16x16", |b| {
        b.iter(|| {
            let mut wave = WaveGrid::new(16, 2).unwrap();
            let mut rng = StdRng::seed_from_u64(42);
            black_box(wave.generate(&mut rng))
        })
    });

    c.bench_function("wave_grid_generate_48x48", |b| {
        b.iter(|| {
            let mut wave = WaveGrid::new(48, 4).unwrap();
            let mut rng = StdRng::seed_from_u64(42);
            black_box(wave.generate(&mut rng))
        })
    });
}

fn collision_prediction(c: &mut Criterion) {
    let mut map = CollisionMap::with_grain(4.0, 4.0).unwrap();
    let mut bodies = HashMap::new();

    // an 8x8 field of box obstacles around the mover
    for i in 0..64u32 {
        let entity = Entity::from_raw(i + 1);
        let pos = Vec3::new((i % 8) as f32 * 3.0, 0.0, (i / 8) as f32 * 3.0);
        map.insert_obstacle(entity, pos);
        bodies.insert(
            entity,
            Body::new(pos, Collider::box_shape(1.0, 1.0, 2.0), 0.0),
        );
    }

    let mover = Entity::from_raw(1000);
    let body = Body::new(
        Vec3::new(10.0, 0.0, 10.0),
        Collider::cylinder(1.0, 1.0, 1.0),
        2.0,
    );

    c.bench_function("predict_collision_64_obstacles", |b| {
        b.iter(|| {
            black_box(map.predict_collision(mover, &body, Vec3::X, |e| bodies.get(&e).copied()))
        })
    });
}

criterion_group!(benches, wave_generation, collision_prediction);
criterion_main!(benches);
