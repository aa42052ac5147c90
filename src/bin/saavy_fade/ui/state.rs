//! State types shown by the UI
//!
//! Everything here is read on the control thread; nothing is shared with
//! the audio callback except through the fade handle.

use std::collections::VecDeque;

use saavy_fade::{FadeConfig, FadeHandle, FadeStage};

/// Newest entries are kept, oldest dropped
const EVENT_LOG_SIZE: usize = 6;

/// Static state captured once at startup
#[derive(Clone, Copy, Debug)]
pub struct UiStateInit {
    /// Audio sample rate in Hz
    pub sample_rate: f32,
    /// Output channel count
    pub channels: usize,
    /// Test tone frequency in Hz
    pub frequency: f32,
}

/// Point-in-time view of the fade filter
#[derive(Clone, Copy, Debug)]
pub struct FadeSnapshot {
    pub stage: FadeStage,
    pub gain: f32,
    pub faults: u64,
    pub config: FadeConfig,
    pub fade_in_ms: Option<f32>,
    pub fade_out_ms: Option<f32>,
}

impl FadeSnapshot {
    pub fn from_handle(handle: &FadeHandle) -> Self {
        Self {
            stage: handle.stage(),
            gain: handle.gain(),
            faults: handle.faults(),
            config: handle.config(),
            fade_in_ms: handle.fade_in_ms(),
            fade_out_ms: handle.fade_out_ms(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EventLog {
    entries: VecDeque<String>,
}

impl EventLog {
    pub fn push(&mut self, message: String) {
        if self.entries.len() == EVENT_LOG_SIZE {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }
}
