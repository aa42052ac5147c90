use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series, passing the output of the first (source)
into the second (effect). This is how the fade filter is put behind whatever
produces the audio:

  Source renders:  [0.5, 0.8, -0.3, 0.9, ...]
  Fade processes in-place (gain ramp 0.0 → 1.0)
  Final output:    [0.0, 0.2, -0.15, 0.68, ...]

Signal Flow:
------------
  [Source] ──→ [Effect] ──→ output

Chains nest, so `a.through(b).through(c)` renders a, then b, then c.
*/

pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut F {
        &mut self.filter
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }

    fn is_active(&self) -> bool {
        self.source.is_active() && self.filter.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::FadeConfig,
        graph::{extensions::NodeExt, fade::FadeFilter, oscillator::ToneNode},
    };

    fn ctx() -> RenderCtx {
        RenderCtx::mono(48_000.0)
    }

    #[test]
    fn renders_source_then_filter() {
        let (filter, mut handle) = FadeFilter::new(FadeConfig::new(4, 4));
        let mut node = ToneNode::constant(0.5).through(filter);
        handle.arm_fade_in().unwrap();

        let mut buffer = vec![9.0; 6];
        node.render_block(&mut buffer, &ctx());
        assert_eq!(buffer, [0.0, 0.125, 0.25, 0.375, 0.5, 0.5]);
    }

    #[test]
    fn silent_filter_makes_chain_inactive() {
        let (filter, _handle) = FadeFilter::new(FadeConfig::default());
        let node = ToneNode::sine(440.0).through(filter);
        assert!(!node.is_active());

        let (filter, _handle) = FadeFilter::fade_out_ready(FadeConfig::default());
        let node = ToneNode::sine(440.0).through(filter);
        assert!(node.is_active());
    }
}
