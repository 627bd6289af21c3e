//! # trellis-core
//!
//! Foundation crate for the Trellis renderer.
//! Defines the node model, id generation, cost traits, errors, and the
//! result/metadata models. Every other crate in the workspace depends on this.

pub mod errors;
pub mod ids;
pub mod models;
pub mod node;
pub mod source;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use errors::{TreeError, TrellisResult};
pub use ids::{IdGen, NodeId, SourceId};
pub use models::{NodeStats, RenderMetadata, RenderResult};
pub use node::{RenderNode, DEFAULT_ELISION_MARKER};
pub use source::SourceNode;
pub use traits::{ICostModel, TokenizerId};
