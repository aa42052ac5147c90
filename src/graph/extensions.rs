use crate::{
    config::FadeConfig,
    graph::{
        fade::{FadeFilter, FadeHandle},
        node::GraphNode,
        through::Through,
    },
};

pub trait NodeExt: GraphNode + Sized {
    fn through<F: GraphNode>(self, filter: F) -> Through<Self, F> {
        Through::new(self, filter)
    }

    /// Put a silent fade filter behind this node and return its handle.
    fn fade(self, config: FadeConfig) -> (Through<Self, FadeFilter>, FadeHandle) {
        let (filter, handle) = FadeFilter::new(config);
        (Through::new(self, filter), handle)
    }

    /// Same as [`fade`](Self::fade) but starting at unity, ready to fade out.
    fn fade_out_ready(self, config: FadeConfig) -> (Through<Self, FadeFilter>, FadeHandle) {
        let (filter, handle) = FadeFilter::fade_out_ready(config);
        (Through::new(self, filter), handle)
    }
}

impl<T: GraphNode> NodeExt for T {}
