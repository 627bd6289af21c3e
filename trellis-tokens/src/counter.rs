//! Token counting with content-hash caching.
//!
//! Keys are blake3 content hashes, values are token counts. Tokenizing the
//! same fragment repeatedly across renders is the common case, so the cache
//! pays for itself after one reuse.

use moka::sync::Cache;
use tiktoken_rs::{o200k_base, CoreBPE};

use trellis_core::traits::{ICostModel, TokenizerId};

const DEFAULT_CACHE_CAPACITY: u64 = 16_384;

/// Token counter over an embedded o200k vocabulary.
pub struct TokenCounter {
    bpe: CoreBPE,
    cache: Cache<String, usize>,
    name: String,
}

impl TokenCounter {
    /// Create a counter with the given count-cache capacity (entries).
    pub fn new(cache_capacity: u64) -> Self {
        // The vocabulary is compiled into the binary; parsing it cannot
        // fail for any input the caller controls.
        let bpe = o200k_base().expect("embedded o200k_base vocabulary");
        Self {
            bpe,
            cache: Cache::builder().max_capacity(cache_capacity).build(),
            name: "o200k_base".to_string(),
        }
    }

    /// Exact token count, no caching.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }

    /// Exact token count through the content-hash cache.
    pub fn count_cached(&self, text: &str) -> usize {
        let key = blake3::hash(text.as_bytes()).to_hex().to_string();
        if let Some(count) = self.cache.get(&key) {
            return count;
        }
        let count = self.count(text);
        self.cache.insert(key, count);
        count
    }
}

impl Default for TokenCounter {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ICostModel for TokenCounter {
    fn measure(&self, text: &str) -> f64 {
        self.count_cached(text) as f64
    }

    fn identity(&self) -> TokenizerId {
        TokenizerId::new(self.name.clone())
    }
}
