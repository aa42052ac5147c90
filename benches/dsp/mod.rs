//! Benchmarks for the fade DSP path.

mod amplify;
mod envelope;
mod fade;

pub use amplify::bench_amplify;
pub use envelope::bench_envelope;
pub use fade::bench_fade;
