//! Text assembly: depth-first flattening of a frozen tree into a string,
//! substituting elision markers for excluded subtrees and collapsing
//! adjacent mergeable markers separated only by whitespace.

use std::collections::{HashMap, HashSet};

use trellis_core::ids::NodeId;
use trellis_core::models::NodeStats;
use trellis_core::node::RenderNode;
use trellis_core::traits::ICostModel;

/// Tolerance for "rectification raised this node's weight" checks; guards
/// against float roundoff in `value * cost` round-trips.
const WEIGHT_EPSILON: f64 = 1e-9;

pub(crate) struct Assembly {
    pub text: String,
    /// Nodes whose own fragments were emitted, post elision-collapse.
    pub rendered: HashMap<NodeId, NodeStats>,
    /// End offset of the last emitted marker, with its text.
    last_marker: Option<(String, usize)>,
}

/// Flatten `root`. `included` is the target set from budget selection;
/// `None` means everything (unconstrained mode). Masked subtrees are always
/// excluded. `cost_model` prices each rendered node's own fragments for the
/// per-node stats; without one the freeze-time estimate stands in.
pub(crate) fn assemble(
    root: &RenderNode,
    included: Option<&HashSet<NodeId>>,
    mask: &HashSet<NodeId>,
    cost_model: Option<&dyn ICostModel>,
) -> Assembly {
    let mut memo = HashMap::new();
    decide(root, included, mask, &mut memo);

    let mut asm = Assembly {
        text: String::new(),
        rendered: HashMap::new(),
        last_marker: None,
    };
    emit(root, &memo, cost_model, &mut asm);
    asm
}

/// Whether a node demands a rendered child before its own fragments count.
///
/// Two triggers: the explicit flag, and rectification having raised the
/// node's weight above its own (its priority was financed by descendants,
/// so rendering it alone would misrepresent that value).
fn requires_rendered_child(node: &RenderNode) -> bool {
    node.require_rendered_child
        || node
            .effective_weight
            .is_some_and(|ew| ew > node.weight + WEIGHT_EPSILON)
}

/// Bottom-up pass: decide which nodes emit their own fragments.
///
/// A node renders iff it is in the target set, not masked, and — when it
/// requires a rendered child — at least one child renders. A node that
/// fails collapses to its marker; its subtree is not visited at emit time,
/// so descendants of a failed node never count as rendered.
fn decide(
    node: &RenderNode,
    included: Option<&HashSet<NodeId>>,
    mask: &HashSet<NodeId>,
    memo: &mut HashMap<NodeId, bool>,
) -> bool {
    let excluded =
        mask.contains(&node.id) || included.is_some_and(|set| !set.contains(&node.id));
    if excluded {
        memo.insert(node.id, false);
        return false;
    }

    let mut any_child = false;
    for child in &node.children {
        any_child |= decide(child, included, mask, memo);
    }

    let renders = !requires_rendered_child(node) || any_child;
    memo.insert(node.id, renders);
    renders
}

fn emit(
    node: &RenderNode,
    memo: &HashMap<NodeId, bool>,
    cost_model: Option<&dyn ICostModel>,
    asm: &mut Assembly,
) {
    if !memo.get(&node.id).copied().unwrap_or(false) {
        emit_marker(node, asm);
        return;
    }

    for (i, child) in node.children.iter().enumerate() {
        asm.text.push_str(&node.fragments[i]);
        emit(child, memo, cost_model, asm);
    }
    asm.text.push_str(node.fragments.last().map(String::as_str).unwrap_or(""));

    let actual_tokens = match cost_model {
        Some(model) => model.measure(&node.fragments.concat()),
        None => node.cost,
    };
    asm.rendered.insert(
        node.id,
        NodeStats {
            expected_tokens: node.cost,
            actual_tokens,
        },
    );
}

/// Emit a node's elision marker, unless it merges with the previous one:
/// same marker text, separated only by whitespace, and the node allows it.
fn emit_marker(node: &RenderNode, asm: &mut Assembly) {
    if node.can_merge {
        if let Some((marker, end)) = &asm.last_marker {
            if marker == &node.elision_marker
                && asm.text[*end..].chars().all(char::is_whitespace)
            {
                return;
            }
        }
    }
    asm.text.push_str(&node.elision_marker);
    asm.last_marker = Some((node.elision_marker.clone(), asm.text.len()));
}
