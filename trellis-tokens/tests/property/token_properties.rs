use proptest::prelude::*;
use trellis_tokens::TokenCounter;

proptest! {
    #[test]
    fn cached_equals_uncached(s in ".{0,200}") {
        let counter = TokenCounter::default();
        let uncached = counter.count(&s);
        let cached = counter.count_cached(&s);
        prop_assert_eq!(uncached, cached);
    }

    #[test]
    fn subadditivity(a in ".{0,100}", b in ".{0,100}") {
        let counter = TokenCounter::default();
        let combined = format!("{}{}", a, b);
        let count_a = counter.count(&a);
        let count_b = counter.count(&b);
        let count_combined = counter.count(&combined);
        prop_assert!(
            count_combined <= count_a + count_b + 1,
            "subadditivity: {} <= {} + {} + 1",
            count_combined, count_a, count_b
        );
    }

    #[test]
    fn count_bounded_by_length(s in ".{1,200}") {
        let counter = TokenCounter::default();
        let count = counter.count(&s);
        // Every token covers at least one byte, even under byte fallback.
        prop_assert!(count <= s.len());
    }
}
