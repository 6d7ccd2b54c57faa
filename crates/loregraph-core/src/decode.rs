//! Decoding of Bolt result values into a closed shape set.
//!
//! Every value coming off a result row is decoded exactly once into
//! [`GraphValue`]; downstream assembly dispatches on the tag and never
//! re-tests shapes. Values that are neither graph elements nor lists of
//! them decode to [`GraphValue::Other`] and are silently ignored; a row of
//! scalar columns is valid, not an error.

use loregraph_common::{GraphEdge, GraphNode};
use neo4rs::Row;
use serde_json::{Map, Value};

/// One result value in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphValue {
    Node(GraphNode),
    Relation(GraphEdge),
    Many(Vec<GraphValue>),
    Other,
}

fn node_properties(node: &neo4rs::Node) -> Map<String, Value> {
    let mut properties = Map::new();
    for key in node.keys() {
        let key: &str = key.as_ref();
        if let Ok(value) = node.get::<Value>(key) {
            properties.insert(key.to_owned(), value);
        }
    }
    properties
}

fn relation_properties(rel: &neo4rs::Relation) -> Map<String, Value> {
    let mut properties = Map::new();
    for key in rel.keys() {
        let key: &str = key.as_ref();
        if let Ok(value) = rel.get::<Value>(key) {
            properties.insert(key.to_owned(), value);
        }
    }
    properties
}

fn node_record(node: &neo4rs::Node) -> GraphNode {
    let labels: Vec<String> = node.labels().iter().map(|l| l.to_string()).collect();
    GraphNode::new(node.id().to_string(), &labels, node_properties(node))
}

fn relation_record(rel: &neo4rs::Relation) -> GraphEdge {
    GraphEdge::new(
        rel.id().to_string(),
        rel.start_node_id().to_string(),
        rel.end_node_id().to_string(),
        rel.typ().to_string(),
        relation_properties(rel),
    )
}

/// Decode the value under one column of a row.
///
/// Probes the shapes the store can return for graph elements: a node, a
/// relationship, or (possibly nested) homogeneous lists of either, which is
/// how path projections like `nodes(p)` and `relationships(p)` arrive.
/// Null and scalar values fall through to `Other`.
pub fn decode_column(row: &Row, column: &str) -> GraphValue {
    if let Ok(node) = row.get::<neo4rs::Node>(column) {
        return GraphValue::Node(node_record(&node));
    }
    if let Ok(rel) = row.get::<neo4rs::Relation>(column) {
        return GraphValue::Relation(relation_record(&rel));
    }
    if let Ok(nodes) = row.get::<Vec<neo4rs::Node>>(column) {
        return GraphValue::Many(
            nodes
                .iter()
                .map(|n| GraphValue::Node(node_record(n)))
                .collect(),
        );
    }
    if let Ok(rels) = row.get::<Vec<neo4rs::Relation>>(column) {
        return GraphValue::Many(
            rels.iter()
                .map(|r| GraphValue::Relation(relation_record(r)))
                .collect(),
        );
    }
    if let Ok(nested) = row.get::<Vec<Vec<neo4rs::Node>>>(column) {
        return GraphValue::Many(
            nested
                .iter()
                .map(|nodes| {
                    GraphValue::Many(
                        nodes
                            .iter()
                            .map(|n| GraphValue::Node(node_record(n)))
                            .collect(),
                    )
                })
                .collect(),
        );
    }
    if let Ok(nested) = row.get::<Vec<Vec<neo4rs::Relation>>>(column) {
        return GraphValue::Many(
            nested
                .iter()
                .map(|rels| {
                    GraphValue::Many(
                        rels.iter()
                            .map(|r| GraphValue::Relation(relation_record(r)))
                            .collect(),
                    )
                })
                .collect(),
        );
    }
    GraphValue::Other
}

/// Best-effort column list of a raw statement's final `RETURN` clause.
///
/// The Bolt client does not surface result-set metadata, so raw operator
/// statements are scanned textually: aliases (`AS x`) are honored, bare
/// identifiers are taken as-is, and anything unresolvable (`*`, unaliased
/// expressions) is skipped. Built statements never go through this path;
/// they carry their column lists explicitly.
pub fn return_columns(statement: &str) -> Vec<String> {
    let Some(clause) = final_return_clause(statement) else {
        return Vec::new();
    };
    let clause = strip_keyword_prefix(clause, "DISTINCT");
    let clause = truncate_at_modifiers(clause);

    split_top_level(clause)
        .into_iter()
        .filter_map(column_name)
        .collect()
}

/// Text after the last `RETURN` keyword appearing at word boundaries.
/// Taking the last occurrence skips `RETURN`s inside subquery expressions.
fn final_return_clause(statement: &str) -> Option<&str> {
    let bytes = statement.as_bytes();
    let keyword = b"return";
    let mut clause_start = None;
    for start in 0..bytes.len().saturating_sub(keyword.len() - 1) {
        let end = start + keyword.len();
        if !bytes[start..end].eq_ignore_ascii_case(keyword) {
            continue;
        }
        let bounded_before = start == 0 || !is_ident_byte(bytes[start - 1]);
        let bounded_after = end >= bytes.len() || !is_ident_byte(bytes[end]);
        if bounded_before && bounded_after {
            clause_start = Some(end);
        }
    }
    clause_start.map(|start| statement[start..].trim())
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn strip_keyword_prefix<'a>(clause: &'a str, keyword: &str) -> &'a str {
    let trimmed = clause.trim_start();
    let bytes = trimmed.as_bytes();
    if bytes.len() > keyword.len()
        && bytes[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
        && bytes[keyword.len()].is_ascii_whitespace()
    {
        trimmed[keyword.len()..].trim_start()
    } else {
        clause
    }
}

/// Cut the clause at a top-level `ORDER BY`, `SKIP`, or `LIMIT`.
fn truncate_at_modifiers(clause: &str) -> &str {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev_ident = false;
    for (idx, ch) in clause.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            prev_ident = false;
            continue;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0 && !prev_ident {
            let rest = clause[idx..].as_bytes();
            for keyword in ["order", "skip", "limit"] {
                if rest.len() >= keyword.len()
                    && rest[..keyword.len()].eq_ignore_ascii_case(keyword.as_bytes())
                    && (rest.len() == keyword.len() || !is_ident_byte(rest[keyword.len()]))
                {
                    return clause[..idx].trim_end();
                }
            }
        }
        prev_ident = ch.is_alphanumeric() || ch == '_';
    }
    clause
}

/// Split on commas outside quotes, parentheses, brackets, and braces.
fn split_top_level(clause: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (idx, ch) in clause.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&clause[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    items.push(&clause[start..]);
    items
}

/// Resolve one projection item to its column name, or `None` when the name
/// cannot be known without server metadata.
fn column_name(item: &str) -> Option<String> {
    let item = item.trim();
    if item.is_empty() || item == "*" {
        return None;
    }
    if let Some(alias) = trailing_alias(item) {
        return Some(alias);
    }
    let bare = item.trim_matches('`');
    is_identifier(bare).then(|| bare.to_owned())
}

/// The alias after a top-level ` AS `, if present.
fn trailing_alias(item: &str) -> Option<String> {
    let bytes = item.as_bytes();
    let mut alias_at = None;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (idx, ch) in item.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        if depth == 0
            && idx + 4 <= bytes.len()
            && bytes[idx..idx + 4].eq_ignore_ascii_case(b" as ")
        {
            alias_at = Some(idx + 4);
        }
    }
    let alias = item[alias_at?..].trim().trim_matches('`');
    is_identifier(alias).then(|| alias.to_owned())
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifiers() {
        assert_eq!(
            return_columns("MATCH (n)-[r]->(m) RETURN n, r, m"),
            vec!["n", "r", "m"]
        );
    }

    #[test]
    fn aliases_win_over_expressions() {
        assert_eq!(
            return_columns("MATCH (c) RETURN c, nodes(p) AS reached, relationships(p) AS hops"),
            vec!["c", "reached", "hops"]
        );
    }

    #[test]
    fn keyword_case_is_ignored() {
        assert_eq!(return_columns("match (n) return n"), vec!["n"]);
    }

    #[test]
    fn modifiers_are_stripped() {
        assert_eq!(
            return_columns("MATCH (n) RETURN n ORDER BY n.name SKIP 5 LIMIT 10"),
            vec!["n"]
        );
    }

    #[test]
    fn unaliased_expressions_are_skipped() {
        assert_eq!(
            return_columns("MATCH (n) RETURN n, count(n), n.name"),
            vec!["n"]
        );
    }

    #[test]
    fn star_is_unsupported() {
        assert!(return_columns("MATCH (n) RETURN *").is_empty());
    }

    #[test]
    fn no_return_clause_yields_nothing() {
        assert!(return_columns("CREATE INDEX foo IF NOT EXISTS FOR (n:X) ON (n.y)").is_empty());
    }

    #[test]
    fn last_return_wins() {
        assert_eq!(
            return_columns("MATCH (n) WHERE EXISTS { MATCH (n)--() RETURN 1 } RETURN n"),
            vec!["n"]
        );
    }

    #[test]
    fn commas_inside_functions_do_not_split() {
        assert_eq!(
            return_columns("MATCH (a), (b) RETURN coalesce(a.name, a.title) AS who, b"),
            vec!["who", "b"]
        );
    }

    #[test]
    fn returns_inside_identifiers_are_not_clauses() {
        assert_eq!(
            return_columns("MATCH (n) WHERE n.returned = true RETURN n"),
            vec!["n"]
        );
    }

    #[test]
    fn distinct_prefix_is_stripped() {
        assert_eq!(return_columns("MATCH (n) RETURN DISTINCT n"), vec!["n"]);
    }
}
