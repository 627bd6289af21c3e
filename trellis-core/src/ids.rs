//! Id generation for render and source nodes.
//!
//! Ids are process-unique and never reused for a structurally different
//! node. The generator is an explicit object handed to freeze/construction
//! rather than a module-level counter, so parallel tests never share state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identity of a frozen render node. Cache key and exclusion-mask key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Identity of a caller-side source (virtual) node.
///
/// Callers must mint a fresh `SourceId` whenever a subtree's content
/// changes; the frozen-subtree cache keys on it and cannot verify content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub u64);

/// Monotonic id generator. Cheap to clone, safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct IdGen {
    next: Arc<AtomicU64>,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_id(&self) -> NodeId {
        NodeId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    pub fn source_id(&self) -> SourceId {
        SourceId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
