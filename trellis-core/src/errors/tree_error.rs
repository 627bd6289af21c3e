/// Tree construction and freeze errors.
///
/// Every variant indicates a caller bug, not a runtime condition to recover
/// from: trees that violate the arity contract must fail loudly at
/// construction time.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("fragment arity violated: {fragments} fragments for {children} children (expected {})", .children + 1)]
    FragmentArity { fragments: usize, children: usize },

    #[error("negative cost {cost} for node (costs must be >= 0)")]
    NegativeCost { cost: f64 },
}
