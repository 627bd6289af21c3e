//! Snapshot step: turn a caller-built source tree into a frozen, costed
//! render tree.
//!
//! Freezing is post-order: children first, then this node's cost from the
//! cost model over its own fragments. The optional frozen-subtree cache
//! skips re-measuring unchanged subtrees — callers must mint a fresh
//! `SourceId` whenever a subtree's content changes; the cache cannot verify
//! content, only identity.

use moka::sync::Cache;

use trellis_core::errors::TrellisResult;
use trellis_core::ids::{IdGen, SourceId};
use trellis_core::node::RenderNode;
use trellis_core::source::SourceNode;
use trellis_core::traits::ICostModel;

/// Bounded map from source id to the last frozen subtree.
///
/// A hit hands back a clone: rectification writes `effective_weight` per
/// render, so frozen subtrees are never shared mutably. Node ids inside a
/// cached subtree are stable across renders, which is what lets the render
/// cache key on the root id.
pub type FrozenCache = Cache<SourceId, RenderNode>;

/// Build a frozen-subtree cache with an explicit capacity.
pub fn frozen_cache(max_entries: u64) -> FrozenCache {
    Cache::builder().max_capacity(max_entries).build()
}

/// Freeze a source tree into a `RenderNode` tree.
///
/// `cost_model` prices each node's own fragments; without one every node
/// costs 1. `default_marker` is inherited by nodes that do not override
/// their elision marker.
pub fn freeze(
    source: &SourceNode,
    cost_model: Option<&dyn ICostModel>,
    default_marker: &str,
    ids: &IdGen,
    cache: Option<&FrozenCache>,
) -> TrellisResult<RenderNode> {
    if let Some(cache) = cache {
        if let Some(hit) = cache.get(&source.id) {
            return Ok(hit);
        }
    }

    let children = source
        .children
        .iter()
        .map(|child| freeze(child, cost_model, default_marker, ids, cache))
        .collect::<TrellisResult<Vec<_>>>()?;

    let cost = match cost_model {
        Some(model) => model.measure(&source.own_text()),
        None => 1.0,
    };

    let marker = source.marker.as_deref().unwrap_or(default_marker);
    let node = RenderNode::new(ids.node_id(), source.fragments.clone(), children)?
        .with_cost(cost)?
        .with_weight(source.weight)
        .with_marker(marker)
        .with_can_merge(source.can_merge)
        .with_require_rendered_child(source.require_rendered_child);

    if let Some(cache) = cache {
        cache.insert(source.id, node.clone());
    }
    Ok(node)
}
