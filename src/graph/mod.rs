//! Composable building blocks for putting the fade filter into a render graph.
//!
//! Graph nodes wrap the low-level DSP primitives with what a host needs:
//! block-based rendering, thread handoff and chaining. The `extensions`
//! module adds fluent helpers so a source can be wrapped in a fade with one
//! call.

/// Fluent combinators (`.through()`, `.fade()`).
pub mod extensions;
/// Fade filter (audio thread) and its control handle.
pub mod fade;
/// Core traits shared by all graph nodes.
pub mod node;
/// Test tones and constant sources.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use fade::{FadeFilter, FadeHandle};
pub use node::{GraphNode, RenderCtx};
