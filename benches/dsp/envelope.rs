//! Benchmarks for the fade envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fade::{dsp::envelope::FadeEnvelope, FadeConfig, FadeKind};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    // Long enough that the ramp never finishes during a run
    let config = FadeConfig::new(u32::MAX, u32::MAX);

    for &size in BLOCK_SIZES {
        let mut gains = vec![0.0f32; size];

        let mut env = FadeEnvelope::new(config);
        env.request(FadeKind::In);
        group.bench_with_input(BenchmarkId::new("fading_in", size), &size, |b, _| {
            b.iter(|| black_box(env.render(black_box(&mut gains))))
        });

        let mut env = FadeEnvelope::steady(config);
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| black_box(env.render(black_box(&mut gains))))
        });

        let mut env = FadeEnvelope::steady(config);
        env.request(FadeKind::Out);
        group.bench_with_input(BenchmarkId::new("fading_out", size), &size, |b, _| {
            b.iter(|| black_box(env.render(black_box(&mut gains))))
        });
    }

    group.finish();
}
