use std::hint::black_box;

use bodyview_render::{CircleStencil, LineSprite};
use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec2;

fn primitives_benchmark(c: &mut Criterion) {
    let stencil = CircleStencil::new(32, 512.0, 424.0);
    let projection = stencil.projection();

    // One body's worth of bones and joints
    let mut group = c.benchmark_group("Primitives");
    group.bench_function("line_sprite_transforms_24", |b| {
        b.iter(|| {
            for i in 0..24 {
                let start = Vec2::new(100.0 + i as f32 * 3.0, 50.0 + i as f32 * 7.0);
                let end = Vec2::new(130.0 - i as f32 * 2.0, 80.0 + i as f32 * 5.0);
                let sprite = LineSprite::new(black_box(start), black_box(end), 6.0);
                black_box(projection * sprite.transform());
            }
        })
    });
    group.bench_function("circle_transforms_27", |b| {
        b.iter(|| {
            for i in 0..27 {
                let center = Vec2::new(100.0 + i as f32 * 5.0, 200.0);
                black_box(stencil.transform(black_box(center), 5.0));
            }
        })
    });
    group.finish();
}

criterion_group!(benches, primitives_benchmark);
criterion_main!(benches);
