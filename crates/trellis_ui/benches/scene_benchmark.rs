//! # Scene Benchmark
//!
//! Frame budget targets for a 1,000-node scene:
//! - Animation step for every node: < 200µs
//! - Hit test: < 20µs
//! - Full paint pass: < 500µs
//!
//! Run with: `cargo bench --package trellis_ui`

// Benchmarks don't need strict docs
#![allow(missing_docs)]
#![allow(clippy::cast_precision_loss)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use trellis_ui::{Animation, CanvasViewport, Color, Easing, NodeId, Point, Rect, Scene};

/// A grid of `count` nodes in rows of 40, each under one of 10 panels.
fn grid(count: usize) -> (Scene, Vec<NodeId>) {
    let mut scene = Scene::new(CanvasViewport::new(1920.0, 1080.0));
    let panels: Vec<NodeId> = (0..10)
        .map(|i| {
            let panel = scene.create_node();
            scene.add_root(panel);
            scene.set_bounds(panel, Rect::new(0.0, i as f32 * 100.0, 1920.0, 100.0));
            panel
        })
        .collect();

    let nodes = (0..count)
        .map(|i| {
            let node = scene.create_node();
            scene.add_child(panels[i % panels.len()], node);
            scene.set_bounds(node, Rect::new((i / 10 % 40) as f32 * 48.0, 4.0, 44.0, 44.0));
            node
        })
        .collect();
    scene.assign_paint_order();
    (scene, nodes)
}

fn bench_animation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("animation_step");

    for count in [100_usize, 1_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let (mut scene, nodes) = grid(count);
            let anims = [Animation::color(Color::BLACK), Animation::opacity(0.25), Animation::rotation(90.0)];
            b.iter(|| {
                for &node in &nodes {
                    if !scene.is_animating(node) {
                        scene.animate_eased(node, 1_000.0, Easing::CubicInOut, anims.to_vec());
                    }
                }
                scene.update_animations(black_box(16.0));
            });
        });
    }

    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let (scene, _) = grid(1_000);

    c.bench_function("hit_test_1000", |b| {
        let mut i = 0_u32;
        b.iter(|| {
            i = i.wrapping_add(7);
            let point = Point::new((i % 1920) as f32, (i % 1000) as f32);
            black_box(scene.node_at(black_box(point)))
        });
    });
}

fn bench_paint_pass(c: &mut Criterion) {
    let (mut scene, _) = grid(1_000);

    c.bench_function("paint_pass_1000", |b| {
        b.iter(|| black_box(scene.paint_pass(black_box(16.0))));
    });
}

criterion_group!(benches, bench_animation_step, bench_hit_test, bench_paint_pass);
criterion_main!(benches);
