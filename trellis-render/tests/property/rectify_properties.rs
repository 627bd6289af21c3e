use proptest::prelude::*;

use trellis_core::ids::IdGen;
use trellis_core::node::RenderNode;
use trellis_render::rectify::rectify_weights;

/// Shape-only tree description; node ids are minted when the tree is built.
#[derive(Debug, Clone)]
struct TreeSpec {
    weight: f64,
    cost: f64,
    children: Vec<TreeSpec>,
}

fn arb_tree(max_cost: f64) -> impl Strategy<Value = TreeSpec> {
    let leaf = (0.0..10.0f64, 0.0..max_cost).prop_map(|(weight, cost)| TreeSpec {
        weight,
        cost,
        children: Vec::new(),
    });
    leaf.prop_recursive(4, 40, 4, move |inner| {
        (
            0.0..10.0f64,
            0.0..max_cost,
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(weight, cost, children)| TreeSpec { weight, cost, children })
    })
}

fn build(spec: &TreeSpec, ids: &IdGen) -> RenderNode {
    let children: Vec<RenderNode> = spec.children.iter().map(|c| build(c, ids)).collect();
    let fragments = vec![String::new(); children.len() + 1];
    RenderNode::new(ids.node_id(), fragments, children)
        .unwrap()
        .with_weight(spec.weight)
        .with_cost(spec.cost)
        .unwrap()
}

fn assert_monotone(node: &RenderNode) {
    for child in &node.children {
        assert!(
            child.value() <= node.value() + 1e-6,
            "child value {} exceeds parent value {}",
            child.value(),
            node.value()
        );
        assert_monotone(child);
    }
}

fn weight_mass(node: &RenderNode) -> f64 {
    let own = if node.effective_weight.is_some() { node.weight } else { 0.0 };
    own + node.children.iter().map(weight_mass).sum::<f64>()
}

fn effective_mass(node: &RenderNode) -> f64 {
    node.effective_weight.unwrap_or(0.0)
        + node.children.iter().map(effective_mass).sum::<f64>()
}

proptest! {
    /// After rectification, no node is more valuable than its parent.
    #[test]
    fn rectified_values_never_increase_upward(spec in arb_tree(20.0)) {
        let ids = IdGen::new();
        let mut root = build(&spec, &ids);
        rectify_weights(&mut root, None);
        assert_monotone(&root);
    }

    /// With costs >= 1 (no clamping), rectification redistributes weight but
    /// never creates or destroys it: the effective weights of enqueued nodes
    /// sum to their original weights.
    #[test]
    fn rectification_preserves_weight_mass(spec in arb_tree(20.0)) {
        let ids = IdGen::new();
        let mut root = build(&spec, &ids);
        // Clamp costs up to 1 so group values split back exactly.
        root.walk_mut(&mut |n| n.cost = n.cost.max(1.0));
        rectify_weights(&mut root, None);

        let original = weight_mass(&root);
        let effective = effective_mass(&root);
        prop_assert!(
            (original - effective).abs() <= original.abs() * 1e-6 + 1e-6,
            "mass changed: {original} -> {effective}"
        );
    }

    /// Rectifying twice is a no-op on effective weights: the tree is already
    /// monotone, so every group folds exactly as before.
    #[test]
    fn rectification_is_stable_under_rerun(spec in arb_tree(20.0)) {
        let ids = IdGen::new();
        let mut root = build(&spec, &ids);
        rectify_weights(&mut root, None);
        let first: Vec<Option<f64>> = collect_effective(&root);
        rectify_weights(&mut root, None);
        let second: Vec<Option<f64>> = collect_effective(&root);
        for (a, b) in first.iter().zip(second.iter()) {
            match (a, b) {
                (Some(x), Some(y)) => prop_assert!((x - y).abs() < 1e-6),
                (a, b) => prop_assert_eq!(a, b),
            }
        }
    }
}

fn collect_effective(root: &RenderNode) -> Vec<Option<f64>> {
    let mut out = Vec::new();
    root.walk(&mut |n| out.push(n.effective_weight));
    out
}
