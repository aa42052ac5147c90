//! Fade durations, stored as frame counts.
//!
//! Durations are specified in milliseconds by the control side and converted
//! once, at configuration time, into whole frames for the stream's sample rate.
//! The render path only ever sees frames.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sample rate assumed by [`FadeConfig::default`].
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;

/// Default fade length used for both directions.
pub const DEFAULT_FADE_MS: f32 = 10.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeConfig {
    pub fade_in_frames: u32,
    pub fade_out_frames: u32,
}

impl FadeConfig {
    pub fn new(fade_in_frames: u32, fade_out_frames: u32) -> Self {
        Self {
            fade_in_frames,
            fade_out_frames,
        }
    }

    /// Build a config from durations in milliseconds.
    pub fn from_millis(fade_in_ms: f32, fade_out_ms: f32, sample_rate: f32) -> Self {
        Self {
            fade_in_frames: ms_to_frames(fade_in_ms, sample_rate),
            fade_out_frames: ms_to_frames(fade_out_ms, sample_rate),
        }
    }

    /// Frame count for the given fade direction.
    pub fn frames(&self, kind: crate::FadeKind) -> u32 {
        match kind {
            crate::FadeKind::In => self.fade_in_frames,
            crate::FadeKind::Out => self.fade_out_frames,
        }
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self::from_millis(DEFAULT_FADE_MS, DEFAULT_FADE_MS, DEFAULT_SAMPLE_RATE)
    }
}

/// `round(ms * sample_rate / 1000)`, saturating at zero for negative or
/// non-finite input.
pub fn ms_to_frames(ms: f32, sample_rate: f32) -> u32 {
    let frames = (ms as f64 * sample_rate as f64 / 1000.0).round();
    if frames.is_finite() && frames > 0.0 {
        frames.min(u32::MAX as f64) as u32
    } else {
        0
    }
}
