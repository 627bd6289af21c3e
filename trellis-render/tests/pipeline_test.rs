//! End-to-end pipeline: providers -> freeze -> rectify -> render, priced by
//! the real tokenizer.

use trellis_core::ids::IdGen;
use trellis_core::traits::ICostModel;
use trellis_render::freeze::{freeze, frozen_cache};
use trellis_render::providers::Provider;
use trellis_render::rectify::rectify_weights;
use trellis_render::render::{RenderOptions, Renderer};
use trellis_tokens::TokenCounter;

fn completion_prompt() -> Provider {
    Provider::Concat(vec![
        Provider::TraitList {
            header: "// Relevant types:".to_string(),
            traits: vec![
                "trait Shape { fn area(&self) -> f64; }".to_string(),
                "struct Circle { radius: f64 }".to_string(),
                "struct Square { side: f64 }".to_string(),
            ],
            weight: 1.0,
        },
        Provider::Prefix {
            text: "use std::f64::consts::PI;\n\nfn total_area(shapes: &[Box<dyn Shape>]) -> f64 {\n    shapes.iter()".to_string(),
            weight: 4.0,
        },
    ])
}

#[test]
fn full_budget_renders_everything() {
    let ids = IdGen::new();
    let counter = TokenCounter::default();
    let source = completion_prompt().into_source(&ids).unwrap();
    let mut root = freeze(&source, Some(&counter), "// ...\n", &ids, None).unwrap();
    rectify_weights(&mut root, None);

    let opts = RenderOptions::new().with_budget(500.0).with_cost_model(&counter);
    let result = Renderer::new(8).render(&root, &opts);

    assert!(result.text.contains("// Relevant types:"));
    assert!(result.text.contains("trait Shape"));
    assert!(result.text.contains("shapes.iter()"));
    assert!(result.cost <= 500.0);
}

#[test]
fn tight_budget_keeps_the_cursor_end_of_the_prefix() {
    let ids = IdGen::new();
    let counter = TokenCounter::default();
    let source = completion_prompt().into_source(&ids).unwrap();
    let mut root = freeze(&source, Some(&counter), "// ...\n", &ids, None).unwrap();
    rectify_weights(&mut root, None);

    let opts = RenderOptions::new().with_budget(20.0).with_cost_model(&counter);
    let result = Renderer::new(8).render(&root, &opts);

    assert!(result.cost <= 20.0, "cost {} over budget", result.cost);
    // The last prefix line carries the highest weight; whatever else was
    // elided, the text nearest the cursor survives.
    assert!(
        result.text.contains("shapes.iter()"),
        "cursor-adjacent line missing from: {:?}",
        result.text
    );
}

#[test]
fn repeated_renders_reuse_frozen_subtrees_and_results() {
    let ids = IdGen::new();
    let counter = TokenCounter::default();
    let cache = frozen_cache(128);
    let renderer = Renderer::new(8);
    let source = completion_prompt().into_source(&ids).unwrap();

    let mut first_root =
        freeze(&source, Some(&counter), "// ...\n", &ids, Some(&cache)).unwrap();
    rectify_weights(&mut first_root, None);
    let opts = RenderOptions::new().with_budget(100.0).with_cost_model(&counter);
    let first = renderer.render(&first_root, &opts);

    // Unchanged source: the frozen tree keeps its identity, so the second
    // render is a cache hit with bit-identical text.
    let mut second_root =
        freeze(&source, Some(&counter), "// ...\n", &ids, Some(&cache)).unwrap();
    rectify_weights(&mut second_root, None);
    assert_eq!(first_root.id, second_root.id);

    let second = renderer.render(&second_root, &opts);
    assert!(second.metadata.from_cache);
    assert_eq!(second.text, first.text);
}

#[test]
fn estimates_track_the_real_tokenizer() {
    let ids = IdGen::new();
    let counter = TokenCounter::default();
    let source = completion_prompt().into_source(&ids).unwrap();
    let root = freeze(&source, Some(&counter), "// ...\n", &ids, None).unwrap();

    // Freeze-time per-node estimates are real token counts of each node's
    // own fragments.
    let prefix_line = &root.children[1].children[0];
    assert_eq!(prefix_line.cost, counter.measure("use std::f64::consts::PI;\n"));
}
