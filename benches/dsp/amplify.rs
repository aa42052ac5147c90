//! Benchmarks for gain application primitives.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use saavy_fade::dsp::amplify;

use crate::BLOCK_SIZES;

pub fn bench_amplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/amplify");

    for &size in BLOCK_SIZES {
        let signal: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let gains: Vec<f32> = (0..size).map(|i| i as f32 / size as f32).collect();

        let mut signal_copy = signal.clone();
        group.bench_with_input(
            BenchmarkId::new("multiply_in_place", size),
            &size,
            |b, _| {
                b.iter(|| {
                    signal_copy.copy_from_slice(&signal);
                    amplify::multiply_in_place(black_box(&mut signal_copy), black_box(&gains))
                })
            },
        );

        // Stereo interleaved: twice the samples, same number of gains
        let stereo: Vec<f32> = signal.iter().flat_map(|&s| [s, -s]).collect();
        let mut output = vec![0.0f32; size * 2];
        group.bench_with_input(
            BenchmarkId::new("frame_gains_stereo", size),
            &size,
            |b, _| {
                b.iter(|| {
                    amplify::apply_frame_gains_into(
                        black_box(&mut output),
                        black_box(&stereo),
                        black_box(&gains),
                        2,
                    )
                })
            },
        );
    }

    group.finish();
}
