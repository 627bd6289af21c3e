//! The frozen render tree.
//!
//! A `RenderNode` interleaves text fragments with children: fragment `i` is
//! emitted before child `i`, and the final fragment after all children, so
//! `fragments.len() == children.len() + 1` always holds. The tree is
//! immutable after construction except for `effective_weight`, which weight
//! rectification sets exactly once before any render.

use crate::errors::{TreeError, TrellisResult};
use crate::ids::NodeId;

/// Marker substituted for an elided subtree unless the node overrides it.
pub const DEFAULT_ELISION_MARKER: &str = "[...]";

/// One node of a frozen, costed render tree.
#[derive(Debug, Clone)]
pub struct RenderNode {
    /// Process-unique identity; cache key and exclusion-mask key.
    pub id: NodeId,
    /// Interleaved text fragments, exactly `children.len() + 1` of them.
    pub fragments: Vec<String>,
    /// Ordered children, owned exclusively by this node.
    pub children: Vec<RenderNode>,
    /// Price of including this node's own fragments in the budget.
    /// Set once at freeze time; defaults to 1.
    pub cost: f64,
    /// Caller-assigned relative importance.
    pub weight: f64,
    /// Rectified weight. Once set it supersedes `weight` for priority
    /// ordering, but `weight` is preserved for later comparisons.
    pub effective_weight: Option<f64>,
    /// Whether this node's elision marker may merge with an immediately
    /// preceding identical marker.
    pub can_merge: bool,
    /// Marker substituted for this node and its subtree when elided.
    pub elision_marker: String,
    /// When set, this node's own fragments are only emitted if at least one
    /// child actually rendered (section headers with no body are dropped).
    pub require_rendered_child: bool,
}

impl RenderNode {
    /// Construct a node, enforcing the fragment arity invariant.
    pub fn new(
        id: NodeId,
        fragments: Vec<String>,
        children: Vec<RenderNode>,
    ) -> TrellisResult<Self> {
        if fragments.len() != children.len() + 1 {
            return Err(TreeError::FragmentArity {
                fragments: fragments.len(),
                children: children.len(),
            });
        }
        Ok(Self {
            id,
            fragments,
            children,
            cost: 1.0,
            weight: 0.0,
            effective_weight: None,
            can_merge: false,
            elision_marker: DEFAULT_ELISION_MARKER.to_string(),
            require_rendered_child: false,
        })
    }

    /// Set the freeze-time cost. Rejects negative costs.
    pub fn with_cost(mut self, cost: f64) -> TrellisResult<Self> {
        if cost < 0.0 {
            return Err(TreeError::NegativeCost { cost });
        }
        self.cost = cost;
        Ok(self)
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.elision_marker = marker.into();
        self
    }

    pub fn with_can_merge(mut self, can_merge: bool) -> Self {
        self.can_merge = can_merge;
        self
    }

    pub fn with_require_rendered_child(mut self, require: bool) -> Self {
        self.require_rendered_child = require;
        self
    }

    /// The weight used for priority ordering: rectified if present,
    /// otherwise the caller-assigned weight.
    pub fn effective(&self) -> f64 {
        self.effective_weight.unwrap_or(self.weight)
    }

    /// Rectified value: effective weight per unit cost. Costs below 1 are
    /// clamped so zero-cost nodes do not produce infinite values.
    pub fn value(&self) -> f64 {
        self.effective() / self.cost.max(1.0)
    }

    /// Total number of nodes in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(RenderNode::subtree_len).sum::<usize>()
    }

    /// Depth-first pre-order visit of this subtree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a RenderNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Mutable depth-first pre-order visit of this subtree.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut RenderNode)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}
