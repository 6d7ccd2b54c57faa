//! Accumulation of decoded values into a deduplicated projection.

use std::collections::HashMap;

use loregraph_common::{GraphData, GraphEdge, GraphNode};

use crate::decode::GraphValue;

/// Accumulates nodes and edges by store identity.
///
/// The first observation for a given id wins; later sightings of the same
/// id are discarded without merging their properties, whatever snapshot
/// they carry. Output order is unspecified.
#[derive(Debug, Default)]
pub struct Projection {
    nodes: HashMap<String, GraphNode>,
    edges: HashMap<String, GraphEdge>,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one decoded value; lists recurse element-wise, scalars are
    /// ignored.
    pub fn absorb(&mut self, value: GraphValue) {
        match value {
            GraphValue::Node(node) => {
                self.nodes.entry(node.id.clone()).or_insert(node);
            }
            GraphValue::Relation(edge) => {
                self.edges.entry(edge.id.clone()).or_insert(edge);
            }
            GraphValue::Many(values) => {
                for value in values {
                    self.absorb(value);
                }
            }
            GraphValue::Other => {}
        }
    }

    /// Finish assembly. With `close_edges`, only edges whose endpoints are
    /// both present among the accumulated nodes survive; a relationship
    /// whose far endpoint was excluded by filtering cannot be rendered and
    /// is dropped.
    pub fn finish(self, close_edges: bool) -> GraphData {
        let Projection { nodes, mut edges } = self;
        if close_edges {
            edges.retain(|_, edge| {
                nodes.contains_key(&edge.from) && nodes.contains_key(&edge.to)
            });
        }
        GraphData {
            nodes: nodes.into_values().collect(),
            edges: edges.into_values().collect(),
        }
    }
}
