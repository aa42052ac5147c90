//! Low-level DSP primitives used by the fade filter.
//!
//! These components are allocation-free and realtime-safe. They stay focused
//! on the signal math; the graph layer adds the thread handoff and
//! buffer validation around them.

/// Per-frame gain application for interleaved and planar buffers.
pub mod amplify;
/// Linear fade-in/fade-out envelope state machine.
pub mod envelope;

pub use envelope::{FadeEnvelope, FadeKind, FadePhase, FadeStage};
