//! # trellis-render
//!
//! The budget-constrained hierarchical text renderer.
//!
//! Pipeline: a caller-built [`SourceNode`](trellis_core::SourceNode) tree is
//! frozen into a costed [`RenderNode`](trellis_core::RenderNode) tree
//! ([`freeze`]), weights are redistributed so greedy top-down selection is
//! sound ([`rectify::rectify_weights`]), and [`render::render`] flattens the
//! highest-value subset into a single string under the budget, substituting
//! elision markers for everything dropped. [`Renderer`] wraps the pipeline
//! with a bounded result cache.

pub mod cache;
pub mod freeze;
pub mod providers;
pub mod queue;
pub mod rectify;
pub mod render;

pub use cache::RenderCache;
pub use freeze::{freeze, frozen_cache, FrozenCache};
pub use providers::Provider;
pub use queue::MaxQueue;
pub use rectify::rectify_weights;
pub use render::{render, RenderOptions, Renderer};
