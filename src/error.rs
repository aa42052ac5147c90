use thiserror::Error;

use crate::dsp::envelope::{FadeKind, FadeStage};

/// Everything the fade filter can report back to the control thread.
///
/// None of these are raised on the audio thread: `InvalidBuffer` is only
/// counted there and surfaces through [`crate::FadeHandle::faults`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FadeError {
    #[error("fade in progress, configuration deferred until it finishes")]
    ConfigRejected,

    #[error("configuration queue is full")]
    ConfigQueueFull,

    #[error("invalid audio buffer")]
    InvalidBuffer,

    #[error("{0} already active")]
    RedundantTrigger(FadeKind),

    #[error("cannot arm {requested} while {stage}")]
    TriggerRejected { requested: FadeKind, stage: FadeStage },

    #[error("{kind} completion callback panicked: {message}")]
    CallbackPanicked { kind: FadeKind, message: String },
}
