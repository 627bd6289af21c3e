//! Weight rectification.
//!
//! Redistributes node weights bottom-up so that rectified value
//! (`effective weight / cost`) is non-increasing from any node to its
//! ancestors. The greedy renderer pops nodes in value order top-down; without
//! this property a rejected ancestor could hide a more valuable descendant
//! and the traversal would need to backtrack.
//!
//! The fold works on "groups": node sets with aggregate cost and weight,
//! keyed by their average value. A subtree that is locally too valuable
//! relative to its cost gets its excess folded into an ancestor group,
//! producing a coarser unit with the same or lower average value. Value only
//! ever flows from descendants up to ancestors, never the reverse.

use std::collections::HashMap;

use trellis_core::ids::NodeId;
use trellis_core::node::RenderNode;

use crate::queue::MaxQueue;

/// A fold unit: a set of nodes priced and weighted as one.
#[derive(Debug, Clone)]
struct Group {
    /// Member node ids with their individual costs, needed to split the
    /// group's value back into per-node effective weights at the end.
    members: Vec<(NodeId, f64)>,
    total_cost: f64,
    total_weight: f64,
}

impl Group {
    fn solo(node: &RenderNode) -> Self {
        Self {
            members: vec![(node.id, node.cost)],
            total_cost: node.cost,
            total_weight: node.weight,
        }
    }

    /// Average value: weight per unit cost, cost clamped to 1.
    fn value(&self) -> f64 {
        self.total_weight / self.total_cost.max(1.0)
    }

    fn absorb(&mut self, other: Group) {
        self.members.extend(other.members);
        self.total_cost += other.total_cost;
        self.total_weight += other.total_weight;
    }
}

/// Rectify the tree's weights in place.
///
/// `weighter` may reassign a node's base weight before the fold; `None`
/// keeps the weight already on the node. Weights are clamped to `>= 0`.
/// Nodes with zero weight and no weighted descendants are pruned early and
/// keep `effective_weight = None`.
pub fn rectify_weights(
    root: &mut RenderNode,
    weighter: Option<&dyn Fn(&RenderNode) -> Option<f64>>,
) {
    root.walk_mut(&mut |node| {
        let base = match weighter {
            Some(f) => f(node).unwrap_or(node.weight),
            None => node.weight,
        };
        node.weight = base.max(0.0);
    });

    let mut queue = fold(root);

    let mut assigned: HashMap<NodeId, f64> = HashMap::new();
    for (group, _) in queue.drain() {
        let value = group.value();
        for (id, cost) in group.members {
            assigned.insert(id, value * cost.max(1.0));
        }
    }

    root.walk_mut(&mut |node| {
        if let Some(&weight) = assigned.get(&node.id) {
            node.effective_weight = Some(weight);
        }
    });

    tracing::debug!(groups = assigned.len(), "weights rectified");
}

/// Post-order fold. Returns the surviving groups of this subtree, keyed by
/// their average value, for the parent to continue folding.
fn fold(node: &RenderNode) -> MaxQueue<Group> {
    let mut merged = MaxQueue::new();
    for child in &node.children {
        merged.merge(fold(child));
    }

    // Zero weight and no weighted descendants: contributes nothing.
    if node.weight <= 0.0 && merged.is_empty() {
        return merged;
    }

    let mut group = Group::solo(node);
    // Fold in every descendant group strictly more valuable than this
    // group's running average; each absorption can only raise the average.
    while let Some((top, top_value)) = merged.pop() {
        if top_value > group.value() {
            group.absorb(top);
        } else {
            merged.insert(top, top_value);
            break;
        }
    }

    let priority = group.value();
    merged.insert(group, priority);
    merged
}
