use std::sync::{
    atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering},
    Arc,
};

use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    config::FadeConfig,
    dsp::{
        amplify,
        envelope::{FadeEnvelope, FadeKind, FadeStage},
    },
    error::FadeError,
    graph::node::{GraphNode, RenderCtx},
    notify::{FadeListener, FadeNotifier},
    MAX_BLOCK_SIZE,
};

/*
Fade Filter
===========

The filter is split in two halves that share one small block of atomics:

  FadeFilter   lives on the audio thread. It owns the envelope and is the only
               code that advances time.

  FadeHandle   lives on the control thread. It arms fades, changes durations
               and drains completions into user callbacks.

    control thread                          audio thread
    ──────────────                          ────────────
    arm_fade_in()  ──► request  (u8) ──────► swap at buffer start
    configure()    ──► config queue (rtrb) ► applied when not fading
    dispatch()     ◄── completion queue ◄─── pushed when a ramp ends
    stage()/gain() ◄── published snapshot ◄─ stored on request and at buffer end
    faults()       ◄── fault counter ◄────── bad buffer

The request slot holds only the latest intent: arming twice before the audio
thread runs leaves one request, not two. The stage snapshot is stored before
the request slot is cleared, so the handle always sees one or the other.

Completions travel the other way through an rtrb queue, in the order the fades
finished. A full queue counts as a fault; the handle is expected to drain it
every UI tick.

Nothing in the render path allocates, locks or logs. Bad buffers (missing
input, mismatched lengths, NaN/inf samples) render as silence and bump the
fault counter; the envelope still advances so fades stay locked to the host
clock.
*/

const CONFIG_QUEUE_SIZE: usize = 16;
const COMPLETION_QUEUE_SIZE: usize = 64;

const REQUEST_NONE: u8 = 0;
const REQUEST_FADE_IN: u8 = 1;
const REQUEST_FADE_OUT: u8 = 2;

struct Shared {
    request: AtomicU8,
    faults: AtomicU64,
    stage: AtomicU8,
    gain: AtomicU32,
}

impl Shared {
    fn new(stage: FadeStage, gain: f32) -> Self {
        Self {
            request: AtomicU8::new(REQUEST_NONE),
            faults: AtomicU64::new(0),
            stage: AtomicU8::new(encode_stage(stage)),
            gain: AtomicU32::new(gain.to_bits()),
        }
    }
}

fn encode_stage(stage: FadeStage) -> u8 {
    match stage {
        FadeStage::Idle => 0,
        FadeStage::FadingIn => 1,
        FadeStage::Steady => 2,
        FadeStage::FadingOut => 3,
    }
}

fn decode_stage(value: u8) -> FadeStage {
    match value {
        1 => FadeStage::FadingIn,
        2 => FadeStage::Steady,
        3 => FadeStage::FadingOut,
        _ => FadeStage::Idle,
    }
}

/// Audio-thread half: multiplies the stream by the fade envelope.
pub struct FadeFilter {
    env: FadeEnvelope,
    shared: Arc<Shared>,
    config_rx: Consumer<FadeConfig>,
    completion_tx: Producer<FadeKind>,
    gains: Vec<f32>,
}

impl FadeFilter {
    /// Silent filter; audio comes up once a fade-in is armed.
    pub fn new(config: FadeConfig) -> (Self, FadeHandle) {
        Self::with_envelope(FadeEnvelope::new(config))
    }

    /// Unity filter that passes audio until a fade-out is armed.
    pub fn fade_out_ready(config: FadeConfig) -> (Self, FadeHandle) {
        Self::with_envelope(FadeEnvelope::steady(config))
    }

    fn with_envelope(env: FadeEnvelope) -> (Self, FadeHandle) {
        let config = env.config();
        let shared = Arc::new(Shared::new(env.stage(), env.gain()));
        let (config_tx, config_rx) = RingBuffer::<FadeConfig>::new(CONFIG_QUEUE_SIZE);
        let (completion_tx, completion_rx) = RingBuffer::<FadeKind>::new(COMPLETION_QUEUE_SIZE);

        let filter = Self {
            env,
            shared: Arc::clone(&shared),
            config_rx,
            completion_tx,
            gains: vec![0.0; MAX_BLOCK_SIZE],
        };
        let handle = FadeHandle {
            shared,
            config_tx,
            completion_rx,
            config,
            fade_in_ms: None,
            fade_out_ms: None,
            notifier: FadeNotifier::new(),
        };

        (filter, handle)
    }

    /// Render `input × gain` into `output`, both interleaved per `ctx`.
    ///
    /// `None` stands for a missing host buffer: the output is silenced and
    /// counted as a fault. An empty `output` is a no-op.
    pub fn process(&mut self, input: Option<&[f32]>, output: &mut [f32], ctx: &RenderCtx) {
        if output.is_empty() {
            return;
        }
        self.poll_control();

        let completed = match validate_interleaved(input, output.len(), ctx) {
            Ok((input, channels)) => {
                let frames = output.len() / channels;
                self.run_chunks(frames, |offset, gains| {
                    let range = offset * channels..(offset + gains.len()) * channels;
                    amplify::apply_frame_gains_into(
                        &mut output[range.clone()],
                        &input[range],
                        gains,
                        channels,
                    );
                })
            }
            Err(_) => {
                output.fill(0.0);
                self.fault(declared_frames(output.len(), ctx))
            }
        };

        self.publish(completed);
    }

    /// Same as [`process`](Self::process) but transforms `buffer` in place.
    pub fn process_in_place(&mut self, buffer: &mut [f32], ctx: &RenderCtx) {
        if buffer.is_empty() {
            return;
        }
        self.poll_control();

        let valid = match ctx.frames(buffer.len()) {
            Some(_) if has_non_finite(buffer) => Err(FadeError::InvalidBuffer),
            Some(frames) => Ok(frames),
            None => Err(FadeError::InvalidBuffer),
        };

        let completed = match valid {
            Ok(frames) => {
                let channels = ctx.channels;
                self.run_chunks(frames, |offset, gains| {
                    let range = offset * channels..(offset + gains.len()) * channels;
                    amplify::apply_frame_gains(&mut buffer[range], gains, channels);
                })
            }
            Err(_) => {
                buffer.fill(0.0);
                self.fault(declared_frames(buffer.len(), ctx))
            }
        };

        self.publish(completed);
    }

    /// Apply the envelope to planar channels in place. Every channel must
    /// have the same length.
    pub fn process_planar(&mut self, channels: &mut [&mut [f32]]) {
        let frames = channels.first().map_or(0, |ch| ch.len());
        if frames == 0 {
            return;
        }
        self.poll_control();

        let valid = channels
            .iter()
            .all(|ch| ch.len() == frames && !has_non_finite(ch));

        let completed = if valid {
            self.run_chunks(frames, |offset, gains| {
                for ch in channels.iter_mut() {
                    amplify::multiply_in_place(&mut ch[offset..offset + gains.len()], gains);
                }
            })
        } else {
            for ch in channels.iter_mut() {
                ch.fill(0.0);
            }
            self.fault(frames)
        };

        self.publish(completed);
    }

    fn poll_control(&mut self) {
        while let Ok(config) = self.config_rx.pop() {
            self.env.set_config(config);
        }

        let request = self.shared.request.load(Ordering::Acquire);
        let kind = match request {
            REQUEST_FADE_IN => FadeKind::In,
            REQUEST_FADE_OUT => FadeKind::Out,
            _ => return,
        };

        // Requests that don't fit the current stage are dropped here too;
        // the handle's view may be one buffer stale.
        self.env.request(kind);
        self.shared
            .stage
            .store(encode_stage(self.env.stage()), Ordering::Release);

        // A newer request written since the load stays for the next buffer
        let _ = self.shared.request.compare_exchange(
            request,
            REQUEST_NONE,
            Ordering::AcqRel,
            Ordering::Relaxed,
        );
    }

    /// Render gains in blocks of at most MAX_BLOCK_SIZE frames and hand each
    /// block to `apply` along with its frame offset.
    fn run_chunks(
        &mut self,
        frames: usize,
        mut apply: impl FnMut(usize, &[f32]),
    ) -> Option<FadeKind> {
        let mut completed = None;
        let mut offset = 0;

        while offset < frames {
            let len = (frames - offset).min(MAX_BLOCK_SIZE);
            let gains = &mut self.gains[..len];
            if let Some(kind) = self.env.render(gains) {
                completed = Some(kind);
            }
            apply(offset, gains);
            offset += len;
        }

        completed
    }

    fn fault(&mut self, frames: usize) -> Option<FadeKind> {
        self.shared.faults.fetch_add(1, Ordering::Relaxed);
        self.run_chunks(frames, |_, _| {})
    }

    fn publish(&mut self, completed: Option<FadeKind>) {
        self.shared
            .stage
            .store(encode_stage(self.env.stage()), Ordering::Release);
        self.shared
            .gain
            .store(self.env.gain().to_bits(), Ordering::Relaxed);

        if let Some(kind) = completed {
            if self.completion_tx.push(kind).is_err() {
                self.shared.faults.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn stage(&self) -> FadeStage {
        self.env.stage()
    }

    pub fn gain(&self) -> f32 {
        self.env.gain()
    }

    pub fn config(&self) -> FadeConfig {
        self.env.config()
    }
}

impl GraphNode for FadeFilter {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.process_in_place(out, ctx);
    }

    fn is_active(&self) -> bool {
        self.env.stage() != FadeStage::Idle
    }
}

fn validate_interleaved<'a>(
    input: Option<&'a [f32]>,
    len: usize,
    ctx: &RenderCtx,
) -> Result<(&'a [f32], usize), FadeError> {
    let input = input.ok_or(FadeError::InvalidBuffer)?;
    ctx.frames(len).ok_or(FadeError::InvalidBuffer)?;

    if input.len() != len || has_non_finite(input) {
        return Err(FadeError::InvalidBuffer);
    }

    Ok((input, ctx.channels))
}

/// Frames the host asked for, even when the layout is broken.
fn declared_frames(samples: usize, ctx: &RenderCtx) -> usize {
    samples / ctx.channels.max(1)
}

#[inline]
fn has_non_finite(samples: &[f32]) -> bool {
    samples.iter().any(|s| !s.is_finite())
}

/// Control-thread half: arms fades, updates durations and delivers
/// completion notifications.
pub struct FadeHandle {
    shared: Arc<Shared>,
    config_tx: Producer<FadeConfig>,
    completion_rx: Consumer<FadeKind>,
    config: FadeConfig,
    fade_in_ms: Option<f32>,
    fade_out_ms: Option<f32>,
    notifier: FadeNotifier,
}

impl FadeHandle {
    /// Set fade durations in milliseconds for a stream at `sample_rate`.
    ///
    /// While a fade runs the new lengths are queued and only take effect once
    /// it finishes; that case reports [`FadeError::ConfigRejected`].
    pub fn configure(
        &mut self,
        fade_in_ms: f32,
        fade_out_ms: f32,
        sample_rate: f32,
    ) -> Result<(), FadeError> {
        let config = FadeConfig::from_millis(fade_in_ms, fade_out_ms, sample_rate);
        let result = self.set_config(config);

        if !matches!(result, Err(FadeError::ConfigQueueFull)) {
            self.fade_in_ms = Some(fade_in_ms);
            self.fade_out_ms = Some(fade_out_ms);
        }
        result
    }

    /// Set fade lengths directly in frames.
    pub fn set_config(&mut self, config: FadeConfig) -> Result<(), FadeError> {
        self.config_tx
            .push(config)
            .map_err(|_| FadeError::ConfigQueueFull)?;
        self.config = config;

        if self.stage().is_fading() {
            log::debug!("fade in progress, deferring config {:?}", config);
            return Err(FadeError::ConfigRejected);
        }
        Ok(())
    }

    /// Arm a fade-in from silence.
    pub fn arm_fade_in(&mut self) -> Result<(), FadeError> {
        match self.effective_stage() {
            FadeStage::Idle => {
                self.shared.request.store(REQUEST_FADE_IN, Ordering::Release);
                Ok(())
            }
            FadeStage::FadingIn | FadeStage::Steady => {
                log::debug!("fade-in already active, ignoring");
                Err(FadeError::RedundantTrigger(FadeKind::In))
            }
            stage @ FadeStage::FadingOut => {
                log::debug!("fade-in armed while {}, ignoring", stage);
                Err(FadeError::TriggerRejected {
                    requested: FadeKind::In,
                    stage,
                })
            }
        }
    }

    /// Arm a fade-out. Interrupting a fade-in starts from its current gain.
    pub fn arm_fade_out(&mut self) -> Result<(), FadeError> {
        match self.effective_stage() {
            FadeStage::Steady | FadeStage::FadingIn => {
                self.shared.request.store(REQUEST_FADE_OUT, Ordering::Release);
                Ok(())
            }
            FadeStage::FadingOut | FadeStage::Idle => {
                log::debug!("fade-out already active, ignoring");
                Err(FadeError::RedundantTrigger(FadeKind::Out))
            }
        }
    }

    /// Alias of [`arm_fade_out`](Self::arm_fade_out) under its older name.
    pub fn start_fade_out(&mut self) -> Result<(), FadeError> {
        self.arm_fade_out()
    }

    /// Arm a fade-out and run `f` once it has finished.
    ///
    /// If a fade-out is already running, `f` is attached to it instead. On
    /// any other failure the previously registered callback is kept.
    ///
    /// Completions already posted are delivered first, so `f` only ever
    /// sees a fade-out that ends after this call.
    pub fn start_fade_out_then(
        &mut self,
        f: impl FnOnce() + Send + 'static,
    ) -> Result<(), FadeError> {
        // Panics here are logged by the notifier; `f` is not involved yet
        let _ = self.dispatch();

        let already_fading_out = self.effective_stage() == FadeStage::FadingOut;
        let previous = self.notifier.replace_fade_out_callback(Some(Box::new(f)));

        let result = self.arm_fade_out();
        if result.is_err() && !already_fading_out {
            self.notifier.replace_fade_out_callback(previous);
        }
        result
    }

    /// Take the oldest undelivered completion.
    ///
    /// Completions taken here bypass the notifier; use
    /// [`dispatch`](Self::dispatch) to have callbacks invoked.
    pub fn poll_completion(&mut self) -> Option<FadeKind> {
        self.completion_rx.pop().ok()
    }

    /// Deliver every pending completion to the registered callbacks and
    /// listener. Call from the control thread, e.g. once per UI tick.
    ///
    /// Returns how many completions were delivered. A panicking callback is
    /// reported as [`FadeError::CallbackPanicked`] after the remaining
    /// notifications have still gone out.
    pub fn dispatch(&mut self) -> Result<usize, FadeError> {
        let mut delivered = 0;
        let mut first_error = None;

        while let Some(kind) = self.poll_completion() {
            delivered += 1;
            if let Err(err) = self.notifier.deliver(kind) {
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(delivered),
        }
    }

    pub fn on_fade_in_complete(&mut self, f: impl FnOnce() + Send + 'static) {
        self.notifier.on_fade_in_complete(f);
    }

    pub fn on_fade_out_complete(&mut self, f: impl FnOnce() + Send + 'static) {
        self.notifier.on_fade_out_complete(f);
    }

    pub fn set_listener(&mut self, listener: impl FadeListener + 'static) {
        self.notifier.set_listener(listener);
    }

    pub fn notifier_mut(&mut self) -> &mut FadeNotifier {
        &mut self.notifier
    }

    /// Stage as of the end of the last rendered buffer.
    pub fn stage(&self) -> FadeStage {
        decode_stage(self.shared.stage.load(Ordering::Acquire))
    }

    /// Stage the filter will be in once any pending request is applied.
    fn effective_stage(&self) -> FadeStage {
        match self.shared.request.load(Ordering::Acquire) {
            REQUEST_FADE_IN => FadeStage::FadingIn,
            REQUEST_FADE_OUT => FadeStage::FadingOut,
            _ => self.stage(),
        }
    }

    pub fn is_fading(&self) -> bool {
        self.effective_stage().is_fading()
    }

    /// Gain of the last rendered frame.
    pub fn gain(&self) -> f32 {
        f32::from_bits(self.shared.gain.load(Ordering::Relaxed))
    }

    /// Number of buffers rendered as silence because they were malformed, plus
    /// completions lost to a full queue.
    pub fn faults(&self) -> u64 {
        self.shared.faults.load(Ordering::Relaxed)
    }

    /// Most recently requested fade lengths (may still be pending).
    pub fn config(&self) -> FadeConfig {
        self.config
    }

    pub fn fade_in_ms(&self) -> Option<f32> {
        self.fade_in_ms
    }

    pub fn fade_out_ms(&self) -> Option<f32> {
        self.fade_out_ms
    }
}
