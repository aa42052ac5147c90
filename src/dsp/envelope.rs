use std::fmt;

use crate::config::FadeConfig;

/*
Fade Envelope Implementation
============================

This module implements the gain envelope behind the fade filter: a linear
ramp from silence to unity (fade-in) or from the current gain to silence
(fade-out), advanced one frame at a time on the audio thread.

Vocabulary
----------

  gain        The multiplier applied to every sample of a frame, always in
              [0.0, 1.0].

  stage       Which part of the envelope we're in: Idle, FadingIn, Steady or
              FadingOut. Idle is silent, Steady is unity.

  elapsed     Frames produced since the current fade started. Only the
              envelope itself advances this counter.

  request     An armed fade-in or fade-out, handed over by the control thread
              and applied on the next buffer boundary.


The Shape: Linear Ramps
-----------------------

  Gain
    1.0 ┤        ┌──────────┐
        │       ╱            ╲
        │      ╱              ╲
    0.0 ┼─────╱                ╲──────→ Frames
         Idle  FadingIn  Steady FadingOut Idle

For a fade of F frames starting at elapsed = e, frame i of a buffer gets:

    fade-in:   gain = (e + i) / F
    fade-out:  gain = start * (1 - (e + i) / F)

The first fade-in frame is exactly 0.0 and the first fade-out frame is
exactly `start` (1.0 when leaving Steady). After F frames the ramp has done
its job and the stage switches, mid-buffer if need be, to Steady (gain 1.0)
or Idle (gain 0.0). Both laws meet the next stage's constant at the boundary
so there is no step in the output.


The State Machine
-----------------

    ┌──────┐  fade-in   ┌──────────┐  F frames  ┌────────┐
    │ Idle │ ─────────→ │ FadingIn │ ─────────→ │ Steady │
    └──────┘            └──────────┘            └────────┘
        ↑                    │ fade-out              │ fade-out
        │                    ↓                       ↓
        │  F frames     ┌───────────┐                │
        └────────────── │ FadingOut │ ←──────────────┘
                        └───────────┘

Fade-out interrupting a fade-in starts from the gain the fade-in had reached,
so `start` < 1.0 and the ramp still spans the full fade-out length.

Reaching the end of a ramp produces a completion (`FadeKind::In` or
`FadeKind::Out`) exactly once, on the frame after the last attenuated one.


Configuration Changes
---------------------

A new FadeConfig arriving mid-fade would change F under a running ramp and
produce a jump. Instead it is parked and applied the moment the envelope
settles in Idle or Steady.
*/

/// Direction of a fade, used both for requests and for completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FadeKind {
    In,
    Out,
}

impl fmt::Display for FadeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FadeKind::In => f.write_str("fade-in"),
            FadeKind::Out => f.write_str("fade-out"),
        }
    }
}

/// Coarse envelope stage, without the per-frame bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FadeStage {
    Idle,
    FadingIn,
    Steady,
    FadingOut,
}

impl FadeStage {
    pub fn is_fading(self) -> bool {
        matches!(self, FadeStage::FadingIn | FadeStage::FadingOut)
    }
}

impl fmt::Display for FadeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FadeStage::Idle => f.write_str("idle"),
            FadeStage::FadingIn => f.write_str("fading in"),
            FadeStage::Steady => f.write_str("steady"),
            FadeStage::FadingOut => f.write_str("fading out"),
        }
    }
}

/// Full envelope state as owned by the audio thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadePhase {
    Idle,
    FadingIn { elapsed: u32 },
    Steady,
    FadingOut { elapsed: u32, start_gain: f32 },
}

impl FadePhase {
    pub fn stage(&self) -> FadeStage {
        match self {
            FadePhase::Idle => FadeStage::Idle,
            FadePhase::FadingIn { .. } => FadeStage::FadingIn,
            FadePhase::Steady => FadeStage::Steady,
            FadePhase::FadingOut { .. } => FadeStage::FadingOut,
        }
    }
}

pub struct FadeEnvelope {
    config: FadeConfig,
    pending_config: Option<FadeConfig>,
    phase: FadePhase,
    gain: f32, // gain of the most recently produced frame
}

impl FadeEnvelope {
    /// Silent envelope waiting for a fade-in.
    pub fn new(config: FadeConfig) -> Self {
        Self {
            config,
            pending_config: None,
            phase: FadePhase::Idle,
            gain: 0.0,
        }
    }

    /// Unity envelope waiting for a fade-out.
    pub fn steady(config: FadeConfig) -> Self {
        Self {
            config,
            pending_config: None,
            phase: FadePhase::Steady,
            gain: 1.0,
        }
    }

    /// Apply an armed fade. Returns false when the request is not valid for
    /// the current stage and was ignored.
    pub fn request(&mut self, kind: FadeKind) -> bool {
        match (kind, self.phase) {
            (FadeKind::In, FadePhase::Idle) => {
                self.phase = FadePhase::FadingIn { elapsed: 0 };
                true
            }
            (FadeKind::Out, FadePhase::Steady) => {
                self.phase = FadePhase::FadingOut {
                    elapsed: 0,
                    start_gain: 1.0,
                };
                true
            }
            (FadeKind::Out, FadePhase::FadingIn { elapsed }) => {
                // Pick up exactly where the fade-in would have continued
                let start_gain = ramp(elapsed, self.config.fade_in_frames);
                self.phase = FadePhase::FadingOut {
                    elapsed: 0,
                    start_gain,
                };
                true
            }
            _ => false,
        }
    }

    /// Replace the fade lengths, or park them until the current fade ends.
    pub fn set_config(&mut self, config: FadeConfig) {
        if self.phase.stage().is_fading() {
            self.pending_config = Some(config);
        } else {
            self.config = config;
            self.pending_config = None;
        }
    }

    /// Produce the gain for one frame and advance. Returns the completed fade
    /// if this frame ended one.
    pub fn next_frame(&mut self) -> Option<FadeKind> {
        let completed = match self.phase {
            FadePhase::Idle => {
                self.gain = 0.0;
                None
            }

            FadePhase::Steady => {
                self.gain = 1.0;
                None
            }

            FadePhase::FadingIn { elapsed } => {
                let total = self.config.fade_in_frames;
                if elapsed >= total {
                    // Zero-length fade: jump straight to unity
                    self.gain = 1.0;
                    self.phase = FadePhase::Steady;
                    Some(FadeKind::In)
                } else {
                    self.gain = ramp(elapsed, total);
                    let elapsed = elapsed + 1;
                    if elapsed == total {
                        self.phase = FadePhase::Steady;
                        Some(FadeKind::In)
                    } else {
                        self.phase = FadePhase::FadingIn { elapsed };
                        None
                    }
                }
            }

            FadePhase::FadingOut {
                elapsed,
                start_gain,
            } => {
                let total = self.config.fade_out_frames;
                if elapsed >= total {
                    self.gain = 0.0;
                    self.phase = FadePhase::Idle;
                    Some(FadeKind::Out)
                } else {
                    self.gain = start_gain * (1.0 - ramp(elapsed, total));
                    let elapsed = elapsed + 1;
                    if elapsed == total {
                        self.phase = FadePhase::Idle;
                        Some(FadeKind::Out)
                    } else {
                        self.phase = FadePhase::FadingOut {
                            elapsed,
                            start_gain,
                        };
                        None
                    }
                }
            }
        };

        if completed.is_some() {
            self.settle();
        }

        debug_assert!((0.0..=1.0).contains(&self.gain));
        completed
    }

    /// Fill `gains` with one value per frame. At most one fade can complete
    /// within a single call since requests are only applied between calls.
    pub fn render(&mut self, gains: &mut [f32]) -> Option<FadeKind> {
        match self.phase {
            FadePhase::Idle => {
                gains.fill(0.0);
                if !gains.is_empty() {
                    self.gain = 0.0;
                }
                None
            }
            FadePhase::Steady => {
                gains.fill(1.0);
                if !gains.is_empty() {
                    self.gain = 1.0;
                }
                None
            }
            _ => {
                let mut completed = None;
                for gain in gains.iter_mut() {
                    if let Some(kind) = self.next_frame() {
                        completed = Some(kind);
                    }
                    *gain = self.gain;
                }
                completed
            }
        }
    }

    fn settle(&mut self) {
        if let Some(config) = self.pending_config.take() {
            self.config = config;
        }
    }

    pub fn phase(&self) -> FadePhase {
        self.phase
    }

    pub fn stage(&self) -> FadeStage {
        self.phase.stage()
    }

    /// Gain of the last produced frame.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn config(&self) -> FadeConfig {
        self.config
    }

    pub fn pending_config(&self) -> Option<FadeConfig> {
        self.pending_config
    }

    pub fn is_fading(&self) -> bool {
        self.phase.stage().is_fading()
    }
}

#[inline]
fn ramp(elapsed: u32, total: u32) -> f32 {
    (elapsed as f64 / total as f64) as f32
}
