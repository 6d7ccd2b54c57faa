//! Cypher statement construction.
//!
//! Two traversal strategies cover the filtered-query surface: a bounded-depth
//! traversal around a center entity, and an attribute-filtered neighborhood
//! scan. Every user-supplied string or list travels as a bound parameter;
//! only the hop bound is interpolated into the pattern text, because Bolt
//! cannot bind variable-length range literals.

use loregraph_common::GraphFilter;

/// A ready-to-run statement: text, bound parameters, and the columns its
/// rows expose.
#[derive(Debug, Clone, PartialEq)]
pub struct CypherStatement {
    pub text: String,
    pub params: Vec<(&'static str, Param)>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    List(Vec<String>),
}

impl CypherStatement {
    fn new(text: String, params: Vec<(&'static str, Param)>, columns: &[&str]) -> Self {
        Self {
            text,
            params,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Every entity plus every directed relationship between matched pairs.
pub fn full_graph() -> CypherStatement {
    CypherStatement::new(
        "MATCH (n)\nOPTIONAL MATCH (n)-[r]->(m)\nRETURN n, r, m".into(),
        Vec::new(),
        &["n", "r", "m"],
    )
}

pub fn labels_catalog() -> CypherStatement {
    CypherStatement::new(
        "CALL db.labels() YIELD label RETURN label".into(),
        Vec::new(),
        &["label"],
    )
}

pub fn relationship_catalog() -> CypherStatement {
    CypherStatement::new(
        "CALL db.relationshipTypes() YIELD relationshipType RETURN relationshipType".into(),
        Vec::new(),
        &["relationshipType"],
    )
}

/// Select the strategy for a filter: traversal when a center entity is
/// named, attribute scan otherwise.
pub fn build_filtered(filter: &GraphFilter) -> CypherStatement {
    match filter.center_node.as_deref() {
        Some(center) if !center.is_empty() => traversal(center, filter.depth.unwrap_or(1)),
        _ => neighborhood(filter),
    }
}

/// Bounded-depth traversal around entities whose name or title contains the
/// center string. The center row is always returned, so an entity with no
/// relationships still appears; path nodes and relationships come back as
/// list-valued columns. Non-positive depth degrades to a single hop rather
/// than emitting a malformed range.
fn traversal(center: &str, depth: i64) -> CypherStatement {
    let depth = depth.max(1);
    let text = format!(
        "MATCH (c)\n\
         WHERE toLower(coalesce(c.name, '')) CONTAINS toLower($center)\n\
         \x20  OR toLower(coalesce(c.title, '')) CONTAINS toLower($center)\n\
         OPTIONAL MATCH p = (c)-[*1..{depth}]-()\n\
         RETURN c, nodes(p) AS reached, relationships(p) AS hops"
    );
    CypherStatement::new(
        text,
        vec![("center", Param::Text(center.to_owned()))],
        &["c", "reached", "hops"],
    )
}

/// Attribute-filtered scan: label-tag membership and name/title substring
/// filters on the entity, then an undirected neighborhood expansion
/// optionally restricted by relationship type. Each filter is omitted when
/// its list is empty; with all three empty this matches every entity and
/// every relationship.
///
/// Only the matched entity and the relationship are returned. The far
/// endpoint is deliberately not surfaced, so a relationship leading outside
/// the matched set is dropped by the assembler's endpoint closure.
fn neighborhood(filter: &GraphFilter) -> CypherStatement {
    let mut conditions: Vec<&str> = Vec::new();
    let mut params: Vec<(&'static str, Param)> = Vec::new();

    if !filter.node_types.is_empty() {
        conditions.push("any(tag IN labels(n) WHERE tag IN $node_types)");
        params.push(("node_types", Param::List(filter.node_types.clone())));
    }
    if !filter.node_names.is_empty() {
        conditions.push(
            "any(term IN $node_names WHERE toLower(coalesce(n.name, '')) CONTAINS toLower(term)\n\
             \x20    OR toLower(coalesce(n.title, '')) CONTAINS toLower(term))",
        );
        params.push(("node_names", Param::List(filter.node_names.clone())));
    }

    let mut text = String::from("MATCH (n)");
    if !conditions.is_empty() {
        text.push_str("\nWHERE ");
        text.push_str(&conditions.join("\n  AND "));
    }
    text.push_str("\nOPTIONAL MATCH (n)-[r]-()");
    if !filter.relationship_types.is_empty() {
        text.push_str("\nWHERE type(r) IN $relationship_types");
        params.push((
            "relationship_types",
            Param::List(filter.relationship_types.clone()),
        ));
    }
    text.push_str("\nRETURN n, r");

    CypherStatement::new(text, params, &["n", "r"])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param_names(statement: &CypherStatement) -> Vec<&'static str> {
        statement.params.iter().map(|(name, _)| *name).collect()
    }

    #[test]
    fn center_filter_selects_traversal() {
        let filter = GraphFilter {
            center_node: Some("Frodo".into()),
            depth: Some(2),
            // Attribute fields are ignored once a center is named.
            node_types: vec!["Location".into()],
            ..GraphFilter::default()
        };
        let statement = build_filtered(&filter);
        assert!(statement.text.contains("[*1..2]"));
        assert_eq!(param_names(&statement), vec!["center"]);
        assert_eq!(statement.columns, vec!["c", "reached", "hops"]);
    }

    #[test]
    fn center_string_is_bound_not_inlined() {
        let hostile = "\"' OR 1=1 //";
        let filter = GraphFilter {
            center_node: Some(hostile.into()),
            ..GraphFilter::default()
        };
        let statement = build_filtered(&filter);
        assert!(!statement.text.contains(hostile));
        assert_eq!(
            statement.params,
            vec![("center", Param::Text(hostile.into()))]
        );
    }

    #[test]
    fn depth_widens_monotonically() {
        let at = |depth| {
            build_filtered(&GraphFilter {
                center_node: Some("Frodo".into()),
                depth: Some(depth),
                ..GraphFilter::default()
            })
        };
        assert!(at(1).text.contains("[*1..1]"));
        assert!(at(3).text.contains("[*1..3]"));
    }

    #[test]
    fn non_positive_depth_degrades_to_one_hop() {
        for depth in [0, -5] {
            let statement = build_filtered(&GraphFilter {
                center_node: Some("Frodo".into()),
                depth: Some(depth),
                ..GraphFilter::default()
            });
            assert!(statement.text.contains("[*1..1]"), "depth {depth}");
        }
    }

    #[test]
    fn missing_depth_defaults_to_one_hop() {
        let statement = build_filtered(&GraphFilter {
            center_node: Some("Frodo".into()),
            ..GraphFilter::default()
        });
        assert!(statement.text.contains("[*1..1]"));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let statement = build_filtered(&GraphFilter::default());
        assert!(!statement.text.contains("WHERE"));
        assert!(statement.params.is_empty());
        assert_eq!(statement.columns, vec!["n", "r"]);
    }

    #[test]
    fn attribute_filters_are_independently_omitted() {
        let statement = build_filtered(&GraphFilter {
            node_types: vec!["Location".into()],
            ..GraphFilter::default()
        });
        assert!(statement.text.contains("labels(n)"));
        assert!(!statement.text.contains("$node_names"));
        assert!(!statement.text.contains("$relationship_types"));
        assert_eq!(param_names(&statement), vec!["node_types"]);
    }

    #[test]
    fn all_attribute_filters_combine() {
        let statement = build_filtered(&GraphFilter {
            node_types: vec!["Character".into()],
            node_names: vec!["rodo".into()],
            relationship_types: vec!["LIVES_IN".into()],
            ..GraphFilter::default()
        });
        assert_eq!(
            param_names(&statement),
            vec!["node_types", "node_names", "relationship_types"]
        );
        assert!(statement.text.contains("type(r) IN $relationship_types"));
    }

    #[test]
    fn full_graph_returns_both_endpoints() {
        let statement = full_graph();
        assert_eq!(statement.columns, vec!["n", "r", "m"]);
        assert!(statement.text.contains("OPTIONAL MATCH (n)-[r]->(m)"));
    }
}
