//! # trellis-tokens
//!
//! Accurate token counting via tiktoken-rs with blake3 content-hash caching.
//! Provides the reference `ICostModel` implementation for the renderer.

mod counter;

pub use counter::TokenCounter;
