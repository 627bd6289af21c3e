//! Budget-constrained render.
//!
//! Three modes, picked from the options:
//! - no budget: render everything except masked subtrees (exact,
//!   unconstrained);
//! - budget without a cost model: greedy knapsack over freeze-time cost
//!   estimates, structurally guaranteed under budget;
//! - budget with a cost model: greedy candidate set, then measure the
//!   assembled text exactly and iteratively evict the most marginal nodes
//!   (reverse acceptance order) until the true cost fits.
//!
//! If even the root alone exceeds the budget, the result is the root's
//! elision marker — a legitimate best-effort result whose cost may exceed
//! the requested budget, not an error.

mod assemble;

use std::collections::HashSet;
use std::time::Instant;

use tracing::debug;

use trellis_core::ids::NodeId;
use trellis_core::models::{next_render_seq, RenderMetadata, RenderResult};
use trellis_core::node::RenderNode;
use trellis_core::traits::ICostModel;

use crate::cache::RenderCache;
use crate::queue::MaxQueue;

use self::assemble::assemble;

/// Per-call render options.
#[derive(Default)]
pub struct RenderOptions<'a> {
    /// Maximum cost of the result; `None` renders everything.
    pub budget: Option<f64>,
    /// Node ids to force-exclude, subtrees included.
    pub mask: HashSet<NodeId>,
    /// Exact cost model; without one, freeze-time estimates are trusted.
    pub cost_model: Option<&'a dyn ICostModel>,
}

impl<'a> RenderOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_mask(mut self, mask: impl IntoIterator<Item = NodeId>) -> Self {
        self.mask = mask.into_iter().collect();
        self
    }

    pub fn with_cost_model(mut self, model: &'a dyn ICostModel) -> Self {
        self.cost_model = Some(model);
        self
    }
}

/// Render a frozen (and typically rectified) tree.
pub fn render(root: &RenderNode, opts: &RenderOptions) -> RenderResult {
    let render_seq = next_render_seq();
    let select_start = Instant::now();

    if opts.mask.contains(&root.id) {
        return marker_fallback(root, opts, render_seq, select_start);
    }

    match opts.budget {
        None => {
            let snapshot = select_start.elapsed();
            let assembly_start = Instant::now();
            let asm = assemble(root, None, &opts.mask, opts.cost_model);
            let cost = match opts.cost_model {
                Some(model) => model.measure(&asm.text),
                None => estimate_sum(&asm),
            };
            RenderResult {
                cost,
                rendered: asm.rendered,
                text: asm.text,
                metadata: RenderMetadata {
                    render_seq,
                    snapshot,
                    assembly: assembly_start.elapsed(),
                    from_cache: false,
                    expected_cost: cost,
                },
            }
        }
        Some(budget) => {
            let accepted = select(root, budget, &opts.mask);
            if accepted.is_empty() {
                return marker_fallback(root, opts, render_seq, select_start);
            }
            let expected_cost: f64 = accepted.iter().map(|n| n.cost).sum();
            debug!(
                accepted = accepted.len(),
                expected_cost, budget, "greedy selection complete"
            );
            let snapshot = select_start.elapsed();

            match opts.cost_model {
                None => {
                    let assembly_start = Instant::now();
                    let included: HashSet<NodeId> = accepted.iter().map(|n| n.id).collect();
                    let asm = assemble(root, Some(&included), &opts.mask, None);
                    if asm.rendered.is_empty() {
                        // The accepted set collapsed to the root's marker;
                        // price it like the infeasible fallback.
                        return marker_result(root, opts, render_seq, snapshot, assembly_start);
                    }
                    let cost = estimate_sum(&asm);
                    RenderResult {
                        cost,
                        rendered: asm.rendered,
                        text: asm.text,
                        metadata: RenderMetadata {
                            render_seq,
                            snapshot,
                            assembly: assembly_start.elapsed(),
                            from_cache: false,
                            expected_cost,
                        },
                    }
                }
                Some(model) => {
                    render_exact(root, opts, model, budget, accepted, render_seq, snapshot)
                }
            }
        }
    }
}

/// Exact-cost mode: assemble the greedy candidate set, measure, and evict
/// marginal nodes until the measured cost fits.
///
/// Evictions subtract the node's freeze-time estimate rather than
/// re-measuring after each drop; the assembled text is only re-measured
/// once the running estimate fits. The loop terminates because each outer
/// iteration either returns or strictly shrinks the candidate set.
fn render_exact(
    root: &RenderNode,
    opts: &RenderOptions,
    model: &dyn ICostModel,
    budget: f64,
    mut accepted: Vec<&RenderNode>,
    render_seq: u64,
    snapshot: std::time::Duration,
) -> RenderResult {
    let assembly_start = Instant::now();
    loop {
        let included: HashSet<NodeId> = accepted.iter().map(|n| n.id).collect();
        let asm = assemble(root, Some(&included), &opts.mask, Some(model));
        let true_cost = model.measure(&asm.text);

        if true_cost <= budget {
            // Estimates over the candidates that survived eviction.
            let expected_cost: f64 = accepted.iter().map(|n| n.cost).sum();
            debug!(true_cost, budget, nodes = accepted.len(), "render fits");
            return RenderResult {
                cost: true_cost,
                rendered: asm.rendered,
                text: asm.text,
                metadata: RenderMetadata {
                    render_seq,
                    snapshot,
                    assembly: assembly_start.elapsed(),
                    from_cache: false,
                    expected_cost,
                },
            };
        }

        // Drop the most marginal candidates (reverse acceptance order),
        // estimating the savings from their freeze-time costs.
        let mut estimated = true_cost;
        let mut evicted = 0usize;
        while estimated > budget && accepted.len() > 1 {
            let Some(marginal) = accepted.pop() else { break };
            estimated -= marginal.cost;
            evicted += 1;
        }

        if evicted == 0 {
            // Root alone still over budget: elide everything.
            debug!(true_cost, budget, "no marginal nodes left, eliding to marker");
            return marker_result(root, opts, render_seq, snapshot, assembly_start);
        }
        debug!(evicted, estimated, true_cost, "evicting marginal nodes, retrying");
    }
}

/// Greedy knapsack selection, in acceptance order.
///
/// Pops the highest-value node; if its estimate fits the remaining budget it
/// is accepted and its children enter the queue, otherwise it is dropped
/// outright (never re-queued). Masked nodes never enter the queue, which
/// excludes their whole subtree.
fn select<'a>(root: &'a RenderNode, budget: f64, mask: &HashSet<NodeId>) -> Vec<&'a RenderNode> {
    let mut queue = MaxQueue::new();
    queue.insert(root, root.value());

    let mut remaining = budget;
    let mut accepted = Vec::new();
    while let Some((node, _)) = queue.pop() {
        if node.cost > remaining {
            continue;
        }
        remaining -= node.cost;
        accepted.push(node);
        for child in &node.children {
            if !mask.contains(&child.id) {
                queue.insert(child, child.value());
            }
        }
    }
    accepted
}

/// Sum of freeze-time estimates over the nodes that actually rendered.
fn estimate_sum(asm: &assemble::Assembly) -> f64 {
    asm.rendered.values().map(|s| s.expected_tokens).sum()
}

fn marker_fallback(
    root: &RenderNode,
    opts: &RenderOptions,
    render_seq: u64,
    select_start: Instant,
) -> RenderResult {
    let snapshot = select_start.elapsed();
    marker_result(root, opts, render_seq, snapshot, Instant::now())
}

/// The infeasible-budget result: just the root's elision marker. Its cost
/// may legitimately exceed the requested budget.
fn marker_result(
    root: &RenderNode,
    opts: &RenderOptions,
    render_seq: u64,
    snapshot: std::time::Duration,
    assembly_start: Instant,
) -> RenderResult {
    let text = root.elision_marker.clone();
    let cost = match opts.cost_model {
        Some(model) => model.measure(&text),
        None => text.len() as f64,
    };
    RenderResult {
        text,
        cost,
        rendered: std::collections::HashMap::new(),
        metadata: RenderMetadata {
            render_seq,
            snapshot,
            assembly: assembly_start.elapsed(),
            from_cache: false,
            expected_cost: cost,
        },
    }
}

/// Render front-end with a bounded result cache.
///
/// The cache is the only shared mutable state in the pipeline; it is
/// internally synchronized, so one `Renderer` may serve concurrent render
/// calls.
pub struct Renderer {
    cache: RenderCache,
}

impl Renderer {
    /// Create a renderer whose cache holds at most `cache_capacity` entries.
    pub fn new(cache_capacity: u64) -> Self {
        Self {
            cache: RenderCache::new(cache_capacity),
        }
    }

    /// Render through the cache: a cached result for the same root is
    /// reused when it provably subsumes this request.
    pub fn render(&self, root: &RenderNode, opts: &RenderOptions) -> RenderResult {
        let tokenizer = opts.cost_model.map(|m| m.identity());
        if let Some(mut hit) =
            self.cache
                .lookup(root.id, opts.budget, &opts.mask, tokenizer.as_ref())
        {
            debug!(root = ?root.id, "render cache hit");
            hit.metadata.render_seq = next_render_seq();
            hit.metadata.from_cache = true;
            return hit;
        }

        let result = render(root, opts);
        self.cache
            .store(root.id, opts.budget, &opts.mask, tokenizer, &result);
        result
    }
}
