//! The caller-facing virtual tree.
//!
//! A `SourceNode` is the shape collaborators hand to the freeze step: the
//! same interleaved fragments/children contract as `RenderNode`, plus the
//! per-node knobs the freeze step copies over. It carries no cost — costs
//! are computed at freeze time from the caller's cost model.

use crate::errors::{TreeError, TrellisResult};
use crate::ids::SourceId;

/// One node of a virtual tree awaiting freeze.
#[derive(Debug, Clone)]
pub struct SourceNode {
    /// Stable identity for the frozen-subtree cache. Mint a new one when
    /// the subtree's content changes.
    pub id: SourceId,
    /// Interleaved text fragments, exactly `children.len() + 1` of them.
    pub fragments: Vec<String>,
    pub children: Vec<SourceNode>,
    /// Per-node elision marker override; `None` inherits the default.
    pub marker: Option<String>,
    /// Caller-assigned relative importance.
    pub weight: f64,
    pub can_merge: bool,
    pub require_rendered_child: bool,
}

impl SourceNode {
    /// Construct a source node, enforcing the fragment arity invariant.
    pub fn new(
        id: SourceId,
        fragments: Vec<String>,
        children: Vec<SourceNode>,
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
            marker: None,
            weight: 0.0,
            can_merge: false,
            require_rendered_child: false,
        })
    }

    /// Leaf with a single text fragment.
    pub fn text(id: SourceId, text: impl Into<String>) -> Self {
        Self {
            id,
            fragments: vec![text.into()],
            children: Vec::new(),
            marker: None,
            weight: 0.0,
            can_merge: false,
            require_rendered_child: false,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
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

    /// Concatenation of this node's own fragments, in order. This is the
    /// text the freeze step prices with the cost model.
    pub fn own_text(&self) -> String {
        self.fragments.concat()
    }
}
