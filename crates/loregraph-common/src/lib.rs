use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod config;
pub mod error;

pub use config::{AppConfig, StoreConfig};
pub use error::{Error, Result};

/// One entity of the knowledge graph, projected for rendering.
///
/// `id` is the store-assigned identifier rendered as a string. It is stable
/// within a single store instance only; never persist it as a long-term key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl GraphNode {
    /// Build a node record from the store's label tags and property bag.
    ///
    /// The display label falls back `name` -> `title` -> first label tag,
    /// verbatim, no trimming. The node type is always the first label tag;
    /// entities may carry more tags but only the first is surfaced.
    pub fn new(id: String, labels: &[String], properties: Map<String, Value>) -> Self {
        let first_label = labels.first().cloned().unwrap_or_default();
        let label = display_label(&properties)
            .map(str::to_owned)
            .unwrap_or_else(|| first_label.clone());
        Self {
            id,
            label,
            node_type: first_label,
            properties,
        }
    }
}

fn display_label(properties: &Map<String, Value>) -> Option<&str> {
    properties
        .get("name")
        .and_then(Value::as_str)
        .or_else(|| properties.get("title").and_then(Value::as_str))
}

/// One directed relationship instance between two entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    pub label: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl GraphEdge {
    pub fn new(
        id: String,
        from: String,
        to: String,
        label: String,
        properties: Map<String, Value>,
    ) -> Self {
        Self {
            id,
            from,
            to,
            label,
            properties,
        }
    }
}

/// The assembled projection handed to a renderer.
///
/// Collections are unordered; callers must not rely on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphData {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

/// Caller-supplied filter for a graph query.
///
/// Two effective shapes: when `center_node` is non-empty a bounded-depth
/// traversal around matching entities is performed and the attribute fields
/// are ignored; otherwise the attribute fields select entities and
/// relationships directly. All matching is case-insensitive substring, no
/// wildcard or regex syntax.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphFilter {
    pub center_node: Option<String>,
    pub depth: Option<i64>,
    pub node_types: Vec<String>,
    pub node_names: Vec<String>,
    pub relationship_types: Vec<String>,
}

impl GraphFilter {
    /// True when the filter selects the traversal strategy.
    pub fn has_center(&self) -> bool {
        self.center_node.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// Distinct label tags and relationship type tags present in the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSchema {
    pub labels: Vec<String>,
    pub relationship_types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(pairs: &[(&str, &str)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect()
    }

    #[test]
    fn label_prefers_name_over_title() {
        let node = GraphNode::new(
            "1".into(),
            &["Character".into()],
            props(&[("name", "Frodo"), ("title", "Ring-bearer")]),
        );
        assert_eq!(node.label, "Frodo");
        assert_eq!(node.node_type, "Character");
    }

    #[test]
    fn label_falls_back_to_title() {
        let node = GraphNode::new(
            "1".into(),
            &["Character".into()],
            props(&[("title", "Ring-bearer")]),
        );
        assert_eq!(node.label, "Ring-bearer");
    }

    #[test]
    fn label_falls_back_to_first_tag() {
        let node = GraphNode::new(
            "1".into(),
            &["Character".into(), "Hobbit".into()],
            Map::new(),
        );
        assert_eq!(node.label, "Character");
        assert_eq!(node.node_type, "Character");
    }

    #[test]
    fn label_ignores_non_string_name() {
        let mut properties = Map::new();
        properties.insert("name".into(), json!(42));
        properties.insert("title".into(), json!("Ring-bearer"));
        let node = GraphNode::new("1".into(), &["Character".into()], properties);
        assert_eq!(node.label, "Ring-bearer");
    }

    #[test]
    fn node_type_serializes_as_type() {
        let node = GraphNode::new("1".into(), &["Location".into()], Map::new());
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Location");
        assert!(json.get("node_type").is_none());
    }

    #[test]
    fn filter_deserializes_camel_case() {
        let filter: GraphFilter = serde_json::from_str(
            r#"{"centerNode":"Frodo","depth":2,"relationshipTypes":["LIVES_IN"]}"#,
        )
        .unwrap();
        assert_eq!(filter.center_node.as_deref(), Some("Frodo"));
        assert_eq!(filter.depth, Some(2));
        assert_eq!(filter.relationship_types, vec!["LIVES_IN"]);
        assert!(filter.node_types.is_empty());
    }

    #[test]
    fn empty_center_does_not_select_traversal() {
        let filter = GraphFilter {
            center_node: Some(String::new()),
            ..GraphFilter::default()
        };
        assert!(!filter.has_center());
        assert!(GraphFilter::default().center_node.is_none());
    }
}
