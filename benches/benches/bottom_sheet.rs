// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for the per-sample and per-frame paths of `understory_bottom_sheet`.

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Size;
use understory_bottom_sheet::{
    BottomSheet, DisplayMetrics, Interpolator, PointerSample, SheetContent, TransitionDriver,
    TransitionKind, VelocityTracker,
};

struct Panel;

impl SheetContent for Panel {
    fn measured_height(&self) -> f64 {
        1200.0
    }
}

fn peeked_sheet() -> BottomSheet<Panel> {
    let mut sheet = BottomSheet::new(DisplayMetrics::new(1080.0, 1920.0));
    sheet.set_container(Size::new(1080.0, 1920.0), 0.0);
    sheet.set_peek_offset(600.0);
    sheet.show(Panel, None);
    sheet.on_pre_draw();
    let mut now = 0;
    while sheet.on_frame(now) {
        now += 16;
    }
    sheet
}

/// Down, a run of upward and downward moves that never leaves the peeked range, then cancel.
fn gesture(moves: usize) -> Vec<PointerSample> {
    let mut samples = Vec::with_capacity(moves + 2);
    samples.push(PointerSample::down(100.0, 1600.0, 0));
    for i in 1..=moves {
        let phase = (i % 40) as f64;
        let rise = if phase < 20.0 { phase } else { 40.0 - phase };
        let y = 1590.0 - rise * 10.0;
        samples.push(PointerSample::moved(100.0, y, i as u64 * 8));
    }
    samples.push(PointerSample::cancel(100.0, 1590.0, (moves as u64 + 1) * 8));
    samples
}

fn bench_drag(c: &mut Criterion) {
    let _ = env_logger::try_init();
    let mut group = c.benchmark_group("sheet/drag");
    for moves in [16_usize, 128, 1_024] {
        let samples = gesture(moves);
        group.throughput(Throughput::Elements(samples.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(moves), &samples, |b, samples| {
            b.iter_batched(
                peeked_sheet,
                |mut sheet| {
                    for sample in samples {
                        black_box(sheet.handle_pointer(*sample));
                    }
                    black_box(sheet.offset());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheet/frames");
    group.bench_function("expand_then_dismiss", |b| {
        b.iter_batched(
            peeked_sheet,
            |mut sheet| {
                let mut now = 10_000;
                sheet.expand();
                while sheet.on_frame(now) {
                    now += 4;
                }
                sheet.dismiss();
                while sheet.on_frame(now) {
                    now += 4;
                }
                black_box(sheet.visuals().dim_alpha);
            },
            BatchSize::SmallInput,
        );
    });
    group.bench_function("driver_tick", |b| {
        let mut driver = TransitionDriver::new(250, Interpolator::Decelerate(1.6));
        b.iter(|| {
            driver.start(TransitionKind::Peek, 0.0, 800.0);
            let mut now = 0;
            while let Some(frame) = driver.tick(now) {
                black_box(frame.value);
                now += 1;
            }
        });
    });
    group.finish();
}

fn bench_velocity(c: &mut Criterion) {
    let mut tracker = VelocityTracker::new();
    for i in 0..64_u32 {
        tracker.add(u64::from(i) * 4, f64::from(i) * 3.0);
    }
    c.bench_function("velocity/impulse_full_ring", |b| {
        b.iter(|| black_box(black_box(&tracker).velocity()));
    });
}

criterion_group!(benches, bench_drag, bench_frames, bench_velocity);
criterion_main!(benches);
