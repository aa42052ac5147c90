use std::f32::consts::TAU;

use crate::graph::node::{GraphNode, RenderCtx};

/*
Test Tones
==========

Sources to put in front of the fade filter when there is no real input:

Sine: a single frequency, no harmonics. Any click or step in the gain ramp is
  immediately audible against it, which makes it the best ear test for a fade.

Constant: every frame is the same level. Useless to listen to, but the output
  of `constant(1.0).through(fade)` *is* the gain envelope, which is what tests
  and benchmarks want.

All channels of a frame carry the same sample.

Example usage:
  let (node, handle) = ToneNode::sine(440.0).with_amplitude(0.2).fade(config);
*/

#[derive(Debug, Clone, Copy)]
enum Shape {
    Sine { frequency: f32 },
    Constant,
}

pub struct ToneNode {
    shape: Shape,
    amplitude: f32,
    phase: f32, // 0.0..1.0
}

impl ToneNode {
    pub fn sine(frequency: f32) -> Self {
        Self {
            shape: Shape::Sine { frequency },
            amplitude: 1.0,
            phase: 0.0,
        }
    }

    pub fn constant(level: f32) -> Self {
        Self {
            shape: Shape::Constant,
            amplitude: level,
            phase: 0.0,
        }
    }

    pub fn with_amplitude(mut self, amplitude: f32) -> Self {
        self.amplitude = amplitude;
        self
    }

    #[inline]
    fn next_sample(&mut self, sample_rate: f32) -> f32 {
        match self.shape {
            Shape::Constant => self.amplitude,
            Shape::Sine { frequency } => {
                let sample = (self.phase * TAU).sin() * self.amplitude;
                self.phase = (self.phase + frequency / sample_rate).fract();
                sample
            }
        }
    }
}

impl GraphNode for ToneNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let channels = ctx.channels.max(1);
        for frame in out.chunks_mut(channels) {
            let sample = self.next_sample(ctx.sample_rate);
            frame.fill(sample);
        }
    }
}
