pub mod config; // Fade durations in frames
pub mod dsp;
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod notify; // Control-thread completion delivery

pub use config::FadeConfig;
pub use dsp::envelope::{FadeKind, FadeStage};
pub use error::FadeError;
pub use graph::fade::{FadeFilter, FadeHandle};
pub use notify::{FadeListener, FadeNotifier};

pub const MAX_BLOCK_SIZE: usize = 2048;
