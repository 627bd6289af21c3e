use serde::{Deserialize, Serialize};

/// Opaque tokenizer identity, used purely as a cache-key discriminator.
/// The renderer never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenizerId(pub String);

impl TokenizerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Cost model: maps assembled text to its budget cost.
///
/// Expected to be deterministic for a given tokenizer identity. May be
/// expensive (real tokenization); the renderer calls it at most once per
/// assembled candidate string per attempt, plus once per node at freeze.
/// A panicking cost model propagates to the caller unmodified.
pub trait ICostModel: Send + Sync {
    /// Cost of `text` in budget units (typically tokens).
    fn measure(&self, text: &str) -> f64;

    /// Identity of the underlying tokenizer, for cache discrimination.
    fn identity(&self) -> TokenizerId;
}
