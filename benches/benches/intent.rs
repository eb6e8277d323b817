// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Rect};
use understory_intent::geometry::segment_intersects_rect;
use understory_intent::{Environment, IntentManager, Key, RegisterOptions};

/// A grid of 40x20 cells, 64 per row, tab order by id.
struct Grid {
    len: u32,
}

impl Grid {
    fn cell(id: u32) -> Rect {
        let x = f64::from(id % 64) * 50.0;
        let y = f64::from(id / 64) * 30.0;
        Rect::new(x, y, x + 40.0, y + 20.0)
    }
}

impl Environment<u32> for Grid {
    fn bounds(&self, handle: &u32) -> Rect {
        Self::cell(*handle)
    }
    fn is_connected(&self, handle: &u32) -> bool {
        *handle < self.len
    }
    fn focusable_elements(&self, out: &mut Vec<u32>) {
        out.extend(0..self.len);
    }
    fn install_listeners(&mut self) {}
    fn remove_listeners(&mut self) {}
}

fn populated(len: u32) -> IntentManager<u32, Grid> {
    let mut intent = IntentManager::new(Grid { len });
    for id in 0..len {
        intent.register(id, || {}, RegisterOptions::new().persistent().hit_slop(5.0));
    }
    intent
}

fn bench_segment(c: &mut Criterion) {
    let rect = Rect::new(100.0, 100.0, 200.0, 200.0);
    let segments = [
        (Point::new(0.0, 150.0), Point::new(300.0, 150.0)),
        (Point::new(0.0, 0.0), Point::new(50.0, 300.0)),
        (Point::new(150.0, 150.0), Point::new(150.0, 150.0)),
        (Point::new(250.0, 0.0), Point::new(90.0, 250.0)),
    ];
    c.bench_function("geometry/segment_intersects_rect", |b| {
        b.iter(|| {
            for (p1, p2) in segments {
                black_box(segment_intersects_rect(black_box(p1), black_box(p2), rect));
            }
        });
    });
}

fn bench_pointer_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("intent/pointer_move");

    for len in [64_u32, 512, 4_096] {
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let mut intent = populated(len);
            let mut t = 0_u64;
            b.iter(|| {
                t += 16;
                // Sweep diagonally so some elements are hovered and some predicted.
                let phase = (t / 16 % 200) as f64;
                intent.on_pointer_move(Point::new(phase * 16.0, phase * 4.0), t);
            });
            black_box(intent.callback_hits().total);
        });
    }

    group.finish();
}

fn bench_tab_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("intent/tab_prediction");

    for len in [64_u32, 512, 4_096] {
        group.bench_with_input(BenchmarkId::new("sequential", len), &len, |b, &len| {
            let mut intent = populated(len);
            let mut focused = 0_u32;
            b.iter(|| {
                intent.on_key_down(Key::Tab { shift: false });
                intent.on_focus_changed(focused);
                focused = (focused + 1) % len;
            });
        });

        group.bench_with_input(BenchmarkId::new("after_structure_change", len), &len, |b, &len| {
            b.iter_batched(
                || {
                    let mut intent = populated(len);
                    intent.on_structure_changed();
                    intent
                },
                |mut intent| {
                    intent.on_key_down(Key::Tab { shift: false });
                    intent.on_focus_changed(len / 2);
                    black_box(intent);
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("intent/scroll_frame");

    for len in [64_u32, 512] {
        group.throughput(Throughput::Elements(u64::from(len)));
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let mut intent = populated(len);
            intent.on_pointer_move(Point::new(400.0, 10.0), 0);
            let mut offset = 0.0;
            let mut t = 0_u64;
            b.iter(|| {
                offset -= 3.0;
                t += 16;
                for id in 0..len {
                    let rect = Grid::cell(id) + kurbo::Vec2::new(0.0, offset);
                    intent.on_bounds_changed(id, rect, true, t);
                }
                intent.end_frame();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_segment,
    bench_pointer_move,
    bench_tab_prediction,
    bench_scroll
);
criterion_main!(benches);
