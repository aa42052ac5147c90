/// Context passed to graph nodes during rendering
///
/// Contains the stream format the host is rendering:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - channels: Number of interleaved channels per frame
pub struct RenderCtx {
    pub sample_rate: f32,
    pub channels: usize,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, channels: usize) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Single-channel stream
    pub fn mono(sample_rate: f32) -> Self {
        Self::new(sample_rate, 1)
    }

    /// Number of whole frames in an interleaved buffer of `samples` length,
    /// or `None` if the length doesn't divide into frames.
    pub fn frames(&self, samples: usize) -> Option<usize> {
        if self.channels == 0 || samples % self.channels != 0 {
            None
        } else {
            Some(samples / self.channels)
        }
    }
}

/// Core trait for audio processing graph nodes
///
/// A node renders into `out` in place: sources overwrite it, effects
/// transform what is already there. Interleaved layout per `ctx.channels`.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Check if this node is still producing sound
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(out, ctx)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
