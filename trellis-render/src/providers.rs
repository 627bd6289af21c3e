//! Composite source providers.
//!
//! Thin builders that turn common content shapes into source trees for the
//! freeze step: a document prefix whose leading lines may be elided, a list
//! of related trait/type snippets under a header, and plain concatenation.
//! One tagged enum with a single `into_source` match, no virtual dispatch.

use trellis_core::errors::TrellisResult;
use trellis_core::ids::IdGen;
use trellis_core::source::SourceNode;

/// A content fragment provider.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Document text before the cursor. Split per line so the renderer can
    /// drop leading lines first: lines closer to the cursor weigh more.
    Prefix { text: String, weight: f64 },
    /// Related snippets under a section header. The header only renders if
    /// at least one snippet does.
    TraitList {
        header: String,
        traits: Vec<String>,
        weight: f64,
    },
    /// Ordered concatenation of other providers.
    Concat(Vec<Provider>),
}

impl Provider {
    /// Build the source tree for this provider.
    pub fn into_source(self, ids: &IdGen) -> TrellisResult<SourceNode> {
        match self {
            Provider::Prefix { text, weight } => {
                let lines: Vec<&str> = text.split_inclusive('\n').collect();
                let count = lines.len().max(1);
                let children: Vec<SourceNode> = lines
                    .iter()
                    .enumerate()
                    .map(|(i, line)| {
                        SourceNode::text(ids.source_id(), *line)
                            // Linear ramp: the line nearest the cursor gets
                            // the full weight, the farthest almost none.
                            .with_weight(weight * (i + 1) as f64 / count as f64)
                            .with_can_merge(true)
                    })
                    .collect();
                let fragments = vec![String::new(); children.len() + 1];
                SourceNode::new(ids.source_id(), fragments, children)
            }
            Provider::TraitList {
                header,
                traits,
                weight,
            } => {
                let children: Vec<SourceNode> = traits
                    .into_iter()
                    .map(|snippet| {
                        SourceNode::text(ids.source_id(), snippet)
                            .with_weight(weight)
                            .with_can_merge(true)
                    })
                    .collect();
                let mut fragments = Vec::with_capacity(children.len() + 1);
                fragments.push(format!("{header}\n"));
                fragments.extend(vec!["\n".to_string(); children.len()]);
                SourceNode::new(ids.source_id(), fragments, children)
                    .map(|node| node.with_require_rendered_child(true))
            }
            Provider::Concat(parts) => {
                let children: Vec<SourceNode> = parts
                    .into_iter()
                    .map(|part| part.into_source(ids))
                    .collect::<TrellisResult<_>>()?;
                let fragments = vec![String::new(); children.len() + 1];
                SourceNode::new(ids.source_id(), fragments, children)
            }
        }
    }
}
