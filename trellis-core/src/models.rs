//! Render results and telemetry models.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

use crate::ids::NodeId;

/// Per-node telemetry captured by a render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeStats {
    /// Freeze-time cost estimate for this node's own fragments.
    pub expected_tokens: f64,
    /// Cost of the same fragments in the final assembled render: measured
    /// through the cost model when one was supplied, otherwise the
    /// freeze-time estimate.
    pub actual_tokens: f64,
}

/// The outcome of a render call.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// The flattened text, elision markers included.
    pub text: String,
    /// Total cost: the exact measured cost when a cost model was supplied,
    /// otherwise the sum of rendered nodes' freeze-time costs.
    pub cost: f64,
    /// Nodes whose own fragments contributed text (post elision-collapse).
    pub rendered: HashMap<NodeId, NodeStats>,
    pub metadata: RenderMetadata,
}

/// Per-call telemetry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderMetadata {
    /// Monotonically increasing render-call counter, unique across the
    /// process lifetime. Used for telemetry correlation.
    pub render_seq: u64,
    /// Time spent freezing/selecting the target set.
    pub snapshot: Duration,
    /// Time spent assembling text and collapsing elisions.
    pub assembly: Duration,
    /// Whether the result was served from the render cache.
    pub from_cache: bool,
    /// Sum of freeze-time estimates over the final target set.
    pub expected_cost: f64,
}

static RENDER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Next value of the process-wide render counter.
pub fn next_render_seq() -> u64 {
    RENDER_SEQ.fetch_add(1, Ordering::Relaxed)
}
