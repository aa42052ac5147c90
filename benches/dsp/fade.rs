//! Benchmarks for the complete fade filter callback.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fade::{graph::RenderCtx, FadeConfig, FadeFilter};

use crate::BLOCK_SIZES;

pub fn bench_fade(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/fade");
    let ctx = RenderCtx::new(48_000.0, 2);
    let config = FadeConfig::new(u32::MAX, u32::MAX);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size * 2).map(|i| ((i % 64) as f32 / 32.0) - 1.0).collect();
        let mut output = vec![0.0f32; size * 2];

        let (mut filter, mut handle) = FadeFilter::new(config);
        let _ = handle.arm_fade_in();
        group.bench_with_input(BenchmarkId::new("fading_in", size), &size, |b, _| {
            b.iter(|| filter.process(Some(black_box(input.as_slice())), black_box(&mut output), &ctx))
        });

        let (mut filter, _handle) = FadeFilter::fade_out_ready(config);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("steady_in_place", size), &size, |b, _| {
            b.iter(|| filter.process_in_place(black_box(&mut buffer), &ctx))
        });
    }

    group.finish();
}
