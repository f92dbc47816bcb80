//! # Effect Benchmark
//!
//! Cost of one full frame per effect at common screen sizes, plus the
//! one-time table build. A 60 Hz display leaves 16.6 ms per frame.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use oldschool_core::effects::DistortionTable;
use oldschool_core::{Effect, EffectKind, FrameBuffer, Geometry};

const SIZES: [(u32, u32); 3] = [(320, 240), (640, 480), (1920, 1080)];

fn bench_produce(c: &mut Criterion) {
    for kind in [EffectKind::Xor, EffectKind::Tunnel] {
        let mut group = c.benchmark_group(format!("produce_{kind}"));

        for (width, height) in SIZES {
            let geometry = Geometry::new(width, height).unwrap();
            let effect = kind.build(geometry);
            let front = FrameBuffer::new(geometry);
            let mut back = FrameBuffer::new(geometry);
            let mut ticks = 0u32;

            group.throughput(Throughput::Elements(geometry.pixel_count() as u64));
            group.bench_with_input(
                BenchmarkId::from_parameter(format!("{width}x{height}")),
                &geometry,
                |b, _| {
                    b.iter(|| {
                        ticks = ticks.wrapping_add(16);
                        effect.produce(black_box(&front), &mut back, ticks, ticks.wrapping_sub(16));
                    });
                },
            );
        }

        group.finish();
    }
}

fn bench_distortion_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("distortion_table_build");
    group.sample_size(20);

    for (width, height) in SIZES {
        let geometry = Geometry::new(width, height).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &geometry,
            |b, &geometry| b.iter(|| DistortionTable::new(black_box(geometry))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_produce, bench_distortion_table);
criterion_main!(benches);
