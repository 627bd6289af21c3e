//! Bounded render-result cache.
//!
//! Keyed on the tree-root id. A cached result is reused for a new request
//! when the cached render was computed under an equal-or-more-generous
//! constraint and its cost already fits the new budget, with the same
//! tokenizer and a set-equal mask. Anything stale or mismatched is a miss —
//! never an error — and the fresh result overwrites the entry.

use std::collections::{BTreeSet, HashMap, HashSet};

use moka::sync::Cache;

use trellis_core::ids::NodeId;
use trellis_core::models::{NodeStats, RenderMetadata, RenderResult};
use trellis_core::traits::TokenizerId;

#[derive(Debug, Clone)]
struct CachedRender {
    budget: Option<f64>,
    mask: BTreeSet<NodeId>,
    tokenizer: Option<TokenizerId>,
    text: String,
    cost: f64,
    rendered: HashMap<NodeId, NodeStats>,
    expected_cost: f64,
}

/// Bounded map from root id to the most recent render for that root.
pub struct RenderCache {
    entries: Cache<NodeId, CachedRender>,
}

impl RenderCache {
    /// Create a cache holding at most `max_entries` roots.
    pub fn new(max_entries: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(max_entries).build(),
        }
    }

    /// Look up a reusable result for `root`.
    pub fn lookup(
        &self,
        root: NodeId,
        budget: Option<f64>,
        mask: &HashSet<NodeId>,
        tokenizer: Option<&TokenizerId>,
    ) -> Option<RenderResult> {
        let entry = self.entries.get(&root)?;

        if entry.tokenizer.as_ref() != tokenizer {
            return None;
        }
        if entry.mask.len() != mask.len() || !mask.iter().all(|id| entry.mask.contains(id)) {
            return None;
        }
        if !subsumes(entry.budget, entry.cost, budget) {
            return None;
        }

        Some(RenderResult {
            text: entry.text.clone(),
            cost: entry.cost,
            rendered: entry.rendered.clone(),
            metadata: RenderMetadata {
                expected_cost: entry.expected_cost,
                from_cache: true,
                ..RenderMetadata::default()
            },
        })
    }

    /// Record the most recent render for `root`, replacing any prior entry.
    pub fn store(
        &self,
        root: NodeId,
        budget: Option<f64>,
        mask: &HashSet<NodeId>,
        tokenizer: Option<TokenizerId>,
        result: &RenderResult,
    ) {
        self.entries.insert(
            root,
            CachedRender {
                budget,
                mask: mask.iter().copied().collect(),
                tokenizer,
                text: result.text.clone(),
                cost: result.cost,
                rendered: result.rendered.clone(),
                expected_cost: result.metadata.expected_cost,
            },
        );
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

/// Whether a render computed under `cached_budget` with measured
/// `cached_cost` is still valid under `new_budget`. An unconstrained cached
/// render is infinitely generous; an unconstrained request can only be
/// served by an unconstrained cached render.
fn subsumes(cached_budget: Option<f64>, cached_cost: f64, new_budget: Option<f64>) -> bool {
    match (cached_budget, new_budget) {
        (None, None) => true,
        (None, Some(new)) => cached_cost <= new,
        (Some(_), None) => false,
        (Some(cached), Some(new)) => cached >= new && cached_cost <= new,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsumption_rules() {
        // Unconstrained cache entry serves any budget its cost fits.
        assert!(subsumes(None, 10.0, None));
        assert!(subsumes(None, 10.0, Some(15.0)));
        assert!(!subsumes(None, 10.0, Some(5.0)));
        // Constrained entry never serves an unconstrained request.
        assert!(!subsumes(Some(20.0), 10.0, None));
        // Constrained entry serves tighter-or-equal budgets its cost fits.
        assert!(subsumes(Some(20.0), 10.0, Some(15.0)));
        assert!(subsumes(Some(20.0), 10.0, Some(20.0)));
        assert!(!subsumes(Some(20.0), 10.0, Some(25.0)));
        assert!(!subsumes(Some(20.0), 18.0, Some(15.0)));
    }
}
